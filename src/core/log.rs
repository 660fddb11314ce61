//! 日志系统模块
//!
//! 基于 `tracing` 提供结构化的日志记录功能。引擎内部用 `engine_*` 宏
//! （target `hearth::engine`），运行器用 `app_*` 宏（target `hearth::app`），
//! 这样可以用 `RUST_LOG=hearth::engine=debug` 单独放开场景图的日志。
//!
//! # 使用示例
//!
//! ```no_run
//! use hearth::core::{config::LoggingConfig, log};
//!
//! log::init_from_config(&LoggingConfig::default());
//!
//! tracing::info!(objects = 12, "Scene loaded");
//! hearth::engine_warn!("Texture missing, drawing untextured");
//! ```

use std::path::Path;
use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use super::config::{LogLevel, LoggingConfig};

const DEFAULT_LOG_FILE: &str = "hearth.log";

/// 按日志配置初始化，必须在程序开始时调用一次
pub fn init_from_config(config: &LoggingConfig) {
    let log_file = config.file_output.then_some(config.log_file.as_str());
    init_logger(config.level, config.file_output, log_file);
}

/// 初始化日志系统
///
/// 设置了 `RUST_LOG` 时以环境变量为准，否则使用 `level`。
///
/// # 参数
///
/// * `level` - 日志级别
/// * `file_output` - 是否同时输出到按天滚动的文件
/// * `log_file_path` - 日志文件路径（可选，默认为 "hearth.log"）
pub fn init_logger(level: LogLevel, file_output: bool, log_file_path: Option<&str>) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter()));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true);

    let file_layer = file_output.then(|| {
        let path = Path::new(log_file_path.unwrap_or(DEFAULT_LOG_FILE));
        let directory = path.parent().unwrap_or(Path::new("."));
        let filename = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(DEFAULT_LOG_FILE);

        fmt::layer()
            .with_target(true)
            .with_ansi(false)
            .with_writer(RollingFileAppender::new(Rotation::DAILY, directory, filename))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();
}

impl LogLevel {
    /// `EnvFilter` 使用的指令字符串
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// 引擎核心日志 - Info 级别
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {
        tracing::info!(target: "hearth::engine", $($arg)*)
    };
}

/// 引擎核心日志 - Warn 级别
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "hearth::engine", $($arg)*)
    };
}

/// 引擎核心日志 - Error 级别
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {
        tracing::error!(target: "hearth::engine", $($arg)*)
    };
}

/// 应用层日志 - Info 级别
#[macro_export]
macro_rules! app_info {
    ($($arg:tt)*) => {
        tracing::info!(target: "hearth::app", $($arg)*)
    };
}

/// 应用层日志 - Error 级别
#[macro_export]
macro_rules! app_error {
    ($($arg:tt)*) => {
        tracing::error!(target: "hearth::app", $($arg)*)
    };
}

/// 日志级别转换
impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

/// 帧级别的追踪 span
///
/// ```no_run
/// let _guard = hearth::span_frame!(3).entered();
/// ```
#[macro_export]
macro_rules! span_frame {
    ($frame:expr) => {
        tracing::span!(tracing::Level::TRACE, "frame", index = $frame)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(Level::from(LogLevel::Info), Level::INFO);
        assert_eq!(Level::from(LogLevel::Error), Level::ERROR);
    }

    #[test]
    fn test_filter_strings() {
        assert_eq!(LogLevel::Debug.as_filter(), "debug");
        assert_eq!(LogLevel::Warn.as_filter(), "warn");
    }
}
