//! 组件系统模块
//!
//! GameObject 上挂载的各类组件：Transform、Mesh、Material、Camera、Animation。
//! 每个组件实现 [`Component`]，提供每帧更新、绘制和编辑器面板三个钩子。

mod animation;
mod camera;
mod component;
mod material;
mod mesh;
mod transform;

pub use animation::{AnimationBlend, ComponentAnimation};
pub use camera::ComponentCamera;
pub use component::{AnyComponent, Component, ComponentBox, ComponentType, ComponentUpdate};
pub use material::ComponentMaterial;
pub use mesh::{Bone, ComponentMesh};
pub use transform::ComponentTransform;
