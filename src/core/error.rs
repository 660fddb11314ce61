//! 错误处理模块
//!
//! 定义了引擎中使用的统一错误类型。
//!
//! # 设计原则
//!
//! - 为每种错误类型提供清晰的上下文信息
//! - 支持错误链（error source）
//! - 易于模式匹配和错误处理

use std::fmt;
use std::path::PathBuf;

use crate::scene::GameObjectId;

/// 引擎统一的 Result 类型
pub type Result<T> = std::result::Result<T, HearthError>;

/// Hearth 引擎的错误类型
#[derive(Debug)]
pub enum HearthError {
    /// 配置错误
    Config(ConfigError),

    /// 网格加载错误
    MeshLoading(MeshLoadError),

    /// 场景图错误
    Scene(SceneError),

    /// IO 错误
    Io(std::io::Error),
}

/// 配置相关的错误
#[derive(Debug)]
pub enum ConfigError {
    /// 配置文件未找到
    FileNotFound(String),

    /// 配置文件解析失败
    ParseError(String),

    /// 配置值无效
    InvalidValue { field: String, reason: String },
}

/// 网格加载相关的错误
#[derive(Debug)]
pub enum MeshLoadError {
    /// 文件不存在
    FileNotFound(PathBuf),

    /// 不支持的文件格式
    UnsupportedFormat(String),

    /// 解析失败
    ParseError(String),

    /// 数据验证失败（元素数量不一致、索引越界等）
    ValidationError(String),

    /// 材质索引超出场景材质表
    MissingMaterial { index: usize, available: usize },
}

/// 场景图相关的错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// GameObject 不存在或已被删除
    InvalidObject(GameObjectId),

    /// 组件索引无效
    InvalidComponent { object: String, index: usize },

    /// 不允许删除 Transform 组件
    TransformRequired(String),

    /// 操作会在层级中产生环
    CyclicParent { child: String, parent: String },

    /// 场景根节点不能被删除或移动
    RootRequired,

    /// 动画库中没有该名称的动画
    UnknownAnimation(String),
}

impl fmt::Display for HearthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HearthError::Config(e) => write!(f, "Configuration error: {}", e),
            HearthError::MeshLoading(e) => write!(f, "Mesh loading error: {}", e),
            HearthError::Scene(e) => write!(f, "Scene error: {}", e),
            HearthError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {}", path),
            ConfigError::ParseError(msg) => write!(f, "Failed to parse config: {}", msg),
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl fmt::Display for MeshLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshLoadError::FileNotFound(path) => write!(f, "Mesh file not found: {}", path.display()),
            MeshLoadError::UnsupportedFormat(msg) => write!(f, "Unsupported mesh format: {}", msg),
            MeshLoadError::ParseError(msg) => write!(f, "Failed to parse mesh: {}", msg),
            MeshLoadError::ValidationError(msg) => write!(f, "Mesh validation failed: {}", msg),
            MeshLoadError::MissingMaterial { index, available } => write!(
                f,
                "Material index {} out of range ({} materials)",
                index, available
            ),
        }
    }
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::InvalidObject(id) => write!(f, "GameObject {:?} does not exist", id),
            SceneError::InvalidComponent { object, index } => {
                write!(f, "GameObject '{}' has no component at index {}", object, index)
            }
            SceneError::TransformRequired(name) => {
                write!(f, "GameObject '{}' must keep its transform component", name)
            }
            SceneError::CyclicParent { child, parent } => write!(
                f,
                "Cannot parent '{}' under its own descendant '{}'",
                child, parent
            ),
            SceneError::RootRequired => write!(f, "The scene root cannot be deleted or reparented"),
            SceneError::UnknownAnimation(name) => write!(f, "Animation '{}' is not loaded", name),
        }
    }
}

impl std::error::Error for HearthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HearthError::Io(e) => Some(e),
            HearthError::Config(e) => Some(e),
            HearthError::MeshLoading(e) => Some(e),
            HearthError::Scene(e) => Some(e),
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for MeshLoadError {}
impl std::error::Error for SceneError {}

impl From<std::io::Error> for HearthError {
    fn from(err: std::io::Error) -> Self {
        HearthError::Io(err)
    }
}

impl From<ConfigError> for HearthError {
    fn from(err: ConfigError) -> Self {
        HearthError::Config(err)
    }
}

impl From<MeshLoadError> for HearthError {
    fn from(err: MeshLoadError) -> Self {
        HearthError::MeshLoading(err)
    }
}

impl From<SceneError> for HearthError {
    fn from(err: SceneError) -> Self {
        HearthError::Scene(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err: HearthError = MeshLoadError::ValidationError("3 normals for 4 vertices".into()).into();
        assert_eq!(
            err.to_string(),
            "Mesh loading error: Mesh validation failed: 3 normals for 4 vertices"
        );
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;

        let err: HearthError = SceneError::TransformRequired("Root".into()).into();
        assert!(err.source().is_some());
    }
}
