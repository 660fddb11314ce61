//! 配置管理模块
//!
//! 提供引擎配置的加载、解析和管理功能。
//! 支持从 TOML 配置文件加载，也支持命令行参数覆盖。
//!
//! # 配置文件格式 (config.toml)
//!
//! ```toml
//! [window]
//! width = 1280
//! height = 720
//!
//! [camera]
//! fov = 60.0          # 垂直视场角（度数）
//! near = 0.1
//! far = 1000.0
//! move_speed = 10.0
//!
//! [logging]
//! level = "info"      # trace, debug, info, warn, error
//! file_output = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{ConfigError, Result};

/// 引擎配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// 窗口配置（只用于计算宽高比）
    #[serde(default)]
    pub window: WindowConfig,

    /// 编辑器相机配置
    #[serde(default)]
    pub camera: CameraSettings,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 窗口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// 窗口宽度
    #[serde(default = "default_width")]
    pub width: u32,

    /// 窗口高度
    #[serde(default = "default_height")]
    pub height: u32,
}

/// 编辑器相机配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    /// 垂直视场角（度数）
    #[serde(default = "default_fov")]
    pub fov: f32,

    /// 近裁剪面距离
    #[serde(default = "default_near")]
    pub near: f32,

    /// 远裁剪面距离
    #[serde(default = "default_far")]
    pub far: f32,

    /// 移动速度（单位/秒）
    #[serde(default = "default_move_speed")]
    pub move_speed: f32,

    /// 初始位置
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],

    /// 初始注视点
    #[serde(default)]
    pub target: [f32; 3],
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// 是否输出到文件
    #[serde(default = "default_file_output")]
    pub file_output: bool,

    /// 日志文件路径
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

// 默认值函数
fn default_width() -> u32 { 1280 }
fn default_height() -> u32 { 720 }
fn default_fov() -> f32 { 60.0 }
fn default_near() -> f32 { 0.1 }
fn default_far() -> f32 { 1000.0 }
fn default_move_speed() -> f32 { 10.0 }
fn default_camera_position() -> [f32; 3] { [0.0, 2.0, 10.0] }
fn default_log_level() -> LogLevel { LogLevel::Info }
fn default_file_output() -> bool { false }
fn default_log_file() -> String { "hearth.log".to_string() }

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov: default_fov(),
            near: default_near(),
            far: default_far(),
            move_speed: default_move_speed(),
            position: default_camera_position(),
            target: [0.0, 0.0, 0.0],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_output: default_file_output(),
            log_file: default_log_file(),
        }
    }
}

impl WindowConfig {
    /// 宽高比
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

impl Config {
    /// 从配置文件加载
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let contents = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path_str.clone()))?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()).into())
    }

    /// 从配置文件加载，如果文件不存在则使用默认配置
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::from_file(path).unwrap_or_default()
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// 从命令行参数覆盖配置
    ///
    /// 支持的参数：
    /// - `--width <value>`: 设置窗口宽度
    /// - `--height <value>`: 设置窗口高度
    /// - `--fov <value>`: 设置垂直视场角（度数）
    pub fn apply_args<I>(&mut self, args: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

        if let Some(width) = arg_value(&args, "--width") {
            self.window.width = width;
        }

        if let Some(height) = arg_value(&args, "--height") {
            self.window.height = height;
        }

        if let Some(fov) = arg_value(&args, "--fov") {
            self.camera.fov = fov;
        }
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "window.width/height".to_string(),
                reason: "Window dimensions must be greater than 0".to_string(),
            }.into());
        }

        if !(self.camera.fov > 0.0 && self.camera.fov < 180.0) {
            return Err(ConfigError::InvalidValue {
                field: "camera.fov".to_string(),
                reason: "Field of view must be within (0, 180) degrees".to_string(),
            }.into());
        }

        if self.camera.near <= 0.0 || self.camera.far <= self.camera.near {
            return Err(ConfigError::InvalidValue {
                field: "camera.near/far".to_string(),
                reason: "Planes must satisfy 0 < near < far".to_string(),
            }.into());
        }

        Ok(())
    }
}

/// 读取 `--flag <value>` 形式的参数
pub(crate) fn arg_value<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    let idx = args.iter().position(|a| a == flag)?;
    args.get(idx + 1)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.camera.fov, 60.0);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.window.width = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.camera.far = 0.05;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_args() {
        let mut config = Config::default();
        config.apply_args(["hearth", "--width", "1920", "--height", "1080", "--fov", "75"]);

        assert_eq!(config.window.width, 1920);
        assert_eq!(config.window.height, 1080);
        assert_eq!(config.camera.fov, 75.0);
    }

    #[test]
    fn test_apply_args_ignores_garbage() {
        let mut config = Config::default();
        config.apply_args(["hearth", "--width", "wide"]);
        assert_eq!(config.window.width, 1280);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("[window]\nwidth = 640\n").unwrap();
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.camera.move_speed, 10.0);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.camera.move_speed = 3.5;
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.camera.move_speed, 3.5);
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let config = Config::from_file_or_default("does/not/exist.toml");
        assert_eq!(config.window.width, 1280);
    }
}
