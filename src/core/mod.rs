//! 核心功能模块
//!
//! 本模块提供了引擎的基础功能，包括日志系统、配置管理、错误处理和输入状态。
//! 这些模块独立于具体的图形 API。
//!
//! # 模块组织
//!
//! - `log`：日志系统，提供结构化的日志记录功能
//! - `config`：引擎配置，支持从配置文件加载
//! - `scene_config`：无窗口运行器的场景配置
//! - `error`：错误处理，定义统一的错误类型
//! - `input`：按键状态查询接口

pub mod config;
pub mod error;
pub mod input;
pub mod log;
pub mod scene_config;

// 重新导出常用类型，方便使用
pub use config::Config;
pub use error::{ConfigError, HearthError, MeshLoadError, Result, SceneError};
pub use input::{Input, KeyCode, KeyState, KeyboardState};
pub use scene_config::SceneConfig;
