//! Hearth - 场景图与组件核心
//!
//! Hearth 是一个小型实时 3D 引擎的场景层：GameObject 树、挂在节点上的组件
//! （Transform、Mesh、Material、Camera、Animation）、视锥体裁剪、骨骼蒙皮以及编辑器相机。
//! 图形 API 与即时模式 UI 都通过 trait 接入，本库本身不依赖任何窗口或 GPU。
//!
//! # 模块结构
//!
//! - `core`: 日志、配置、错误处理、输入状态
//! - `math`: 向量/矩阵/四元数、包围盒、视锥体
//! - `renderer`: 固定管线风格的渲染命令接口与命令记录器
//! - `editor`: 检视面板控件接口
//! - `import`: 导入记录（网格、材质、节点树）与 OBJ 导入器
//! - `component`: 组件类型及其更新/绘制/编辑器钩子
//! - `animation`: 动画片段与采样
//! - `scene`: GameObject 与场景
//! - `module`: 编辑器相机
//!
//! # 使用示例
//!
//! ```no_run
//! use std::path::Path;
//! use hearth::import::import_scene;
//! use hearth::module::ModuleCamera;
//! use hearth::renderer::{CommandRecorder, TextureRegistry};
//! use hearth::scene::Scene;
//!
//! # fn main() -> hearth::core::Result<()> {
//! let imported = import_scene(Path::new("assets/models/sphere.obj"))?;
//!
//! let mut scene = Scene::new();
//! let mut textures = TextureRegistry::new();
//! scene.load_model(&imported, Path::new("assets/models"), &mut textures)?;
//!
//! let camera = ModuleCamera::default();
//! let mut recorder = CommandRecorder::new();
//!
//! scene.update(1.0 / 60.0)?;
//! scene.draw(&mut recorder, camera.frustum());
//! # Ok(())
//! # }
//! ```

pub mod animation;
pub mod component;
pub mod core;
pub mod editor;
pub mod import;
pub mod math;
pub mod module;
pub mod renderer;
pub mod scene;
