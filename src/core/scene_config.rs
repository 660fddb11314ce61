//! 场景配置模块
//!
//! 定义无窗口运行器的场景配置：要加载的模型、模型的初始变换和模拟帧数。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::config::arg_value;
use crate::core::error::{ConfigError, HearthError, Result};
use crate::math::{utils::deg_to_rad, Quaternion, Vector3};

/// 3D 变换数据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformConfig {
    /// 位置 (x, y, z)
    #[serde(default = "default_position")]
    pub position: [f32; 3],

    /// 旋转（欧拉角，度数）(pitch, yaw, roll)
    #[serde(default = "default_rotation")]
    pub rotation: [f32; 3],

    /// 缩放 (x, y, z)
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],
}

fn default_position() -> [f32; 3] {
    [0.0, 0.0, 0.0]
}

fn default_rotation() -> [f32; 3] {
    [0.0, 0.0, 0.0]
}

fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn default_frames() -> u32 {
    120
}

fn default_delta_time() -> f32 {
    1.0 / 60.0
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            position: default_position(),
            rotation: default_rotation(),
            scale: default_scale(),
        }
    }
}

impl TransformConfig {
    pub fn position(&self) -> Vector3 {
        Vector3::from(self.position)
    }

    pub fn scale(&self) -> Vector3 {
        Vector3::from(self.scale)
    }

    /// 欧拉角转换为四元数
    pub fn rotation(&self) -> Quaternion {
        Quaternion::from_euler_angles(
            deg_to_rad(self.rotation[0]),
            deg_to_rad(self.rotation[1]),
            deg_to_rad(self.rotation[2]),
        )
    }
}

/// 模型配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// 模型文件路径
    pub path: String,

    /// 模型变换
    #[serde(default)]
    pub transform: TransformConfig,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: "assets/models/sphere.obj".to_string(),
            transform: TransformConfig::default(),
        }
    }
}

/// 场景配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// 模型配置
    #[serde(default)]
    pub model: ModelConfig,

    /// 模拟的帧数
    #[serde(default = "default_frames")]
    pub frames: u32,

    /// 每帧时间步长（秒）
    #[serde(default = "default_delta_time")]
    pub delta_time: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            frames: default_frames(),
            delta_time: default_delta_time(),
        }
    }
}

impl SceneConfig {
    /// 从文件加载场景配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| HearthError::Config(ConfigError::FileNotFound(format!(
                "Failed to read scene config file '{}': {}",
                path.display(),
                e
            ))))?;

        toml::from_str(&contents)
            .map_err(|e| HearthError::Config(ConfigError::ParseError(format!(
                "Failed to parse scene config: {}",
                e
            ))))
    }

    /// 从文件加载，如果文件不存在则返回默认配置
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if path.exists() {
            match Self::from_file(path) {
                Ok(config) => {
                    tracing::info!("Loaded scene config from: {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to load scene config: {}, using defaults", e);
                    Self::default()
                }
            }
        } else {
            tracing::info!("Scene config not found, using defaults");
            Self::default()
        }
    }

    /// 从命令行参数覆盖：`--model <path>`、`--frames <n>`
    pub fn apply_args<I>(&mut self, args: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

        if let Some(path) = arg_value::<String>(&args, "--model") {
            self.model.path = path;
        }
        if let Some(frames) = arg_value(&args, "--frames") {
            self.frames = frames;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_transform() {
        let transform = TransformConfig::default();
        assert_eq!(transform.position, [0.0, 0.0, 0.0]);
        assert_eq!(transform.rotation, [0.0, 0.0, 0.0]);
        assert_eq!(transform.scale, [1.0, 1.0, 1.0]);
        assert!(transform.rotation().angle().abs() < 1e-6);
    }

    #[test]
    fn test_rotation_in_degrees() {
        let transform = TransformConfig {
            rotation: [0.0, 90.0, 0.0],
            ..Default::default()
        };
        let angle = transform.rotation().angle();
        assert!((angle - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_default_scene() {
        let scene = SceneConfig::default();
        assert_eq!(scene.frames, 120);
        assert_eq!(scene.model.path, "assets/models/sphere.obj");
    }

    #[test]
    fn test_parse_scene_toml() {
        let scene: SceneConfig = toml::from_str(
            "frames = 10\n[model]\npath = \"robot.obj\"\n[model.transform]\nposition = [1.0, 2.0, 3.0]\n",
        )
        .unwrap();

        assert_eq!(scene.frames, 10);
        assert_eq!(scene.model.path, "robot.obj");
        assert_eq!(scene.model.transform.position(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(scene.model.transform.scale, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_apply_args() {
        let mut scene = SceneConfig::default();
        scene.apply_args(["hearth", "--model", "cube.obj", "--frames", "3"]);
        assert_eq!(scene.model.path, "cube.obj");
        assert_eq!(scene.frames, 3);
    }
}
