//! 引擎模块
//!
//! 独立于场景图、按帧驱动的引擎级子系统。
//!
//! - `camera`：编辑器相机，持有用于裁剪的视锥体

mod camera;

pub use camera::ModuleCamera;
