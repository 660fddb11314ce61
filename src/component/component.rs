//! 组件基础接口
//!
//! 每个 GameObject 挂载若干组件。组件类型是封闭的：Transform 由 GameObject 直接持有，
//! 其余类型（Mesh/Material/Camera/Animation）统一放进 [`AnyComponent`]，
//! 通过 `match` 分发到各自的实现。

use super::{ComponentAnimation, ComponentCamera, ComponentMaterial, ComponentMesh};
use crate::editor::{EditorResponse, Inspector};
use crate::math::Matrix4;
use crate::renderer::Renderer;

/// 组件类型标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    Transform,
    Mesh,
    Material,
    Camera,
    Animation,
    Unknown,
}

impl ComponentType {
    pub fn name(self) -> &'static str {
        match self {
            ComponentType::Transform => "Transform",
            ComponentType::Mesh => "Mesh",
            ComponentType::Material => "Material",
            ComponentType::Camera => "Camera",
            ComponentType::Animation => "Animation",
            ComponentType::Unknown => "Unknown",
        }
    }

    /// 每个 GameObject 上最多只能有一个的类型
    pub fn is_singleton(self) -> bool {
        matches!(
            self,
            ComponentType::Transform | ComponentType::Mesh | ComponentType::Material
        )
    }
}

/// 组件每帧更新时可见的上下文
#[derive(Debug, Clone, Copy)]
pub struct ComponentUpdate<'a> {
    pub delta_time: f32,
    /// 所属 GameObject 的全局变换（本帧已刷新）
    pub owner_global: Matrix4,
    /// 蒙皮矩阵表，按网格骨骼顺序；未解析的骨骼为 `None`
    pub bone_palette: Option<&'a [Option<Matrix4>]>,
}

impl<'a> ComponentUpdate<'a> {
    pub fn new(delta_time: f32, owner_global: Matrix4) -> Self {
        Self {
            delta_time,
            owner_global,
            bone_palette: None,
        }
    }

    pub fn with_bone_palette(mut self, palette: &'a [Option<Matrix4>]) -> Self {
        self.bone_palette = Some(palette);
        self
    }
}

/// 组件 trait
///
/// 所有钩子返回 `bool`：更新/绘制返回是否成功，编辑器钩子返回是否被交互。
pub trait Component {
    fn component_type(&self) -> ComponentType;

    fn name(&self) -> &str {
        self.component_type().name()
    }

    fn on_update(&mut self, _ctx: &ComponentUpdate<'_>) -> bool {
        true
    }

    fn on_draw(&self, _renderer: &mut dyn Renderer) -> bool {
        true
    }

    fn on_editor(&mut self, _inspector: &mut dyn Inspector) -> bool {
        false
    }
}

/// 可挂载到 GameObject 上的组件
#[derive(Debug, Clone)]
pub enum AnyComponent {
    Mesh(ComponentMesh),
    Material(ComponentMaterial),
    Camera(ComponentCamera),
    Animation(ComponentAnimation),
}

impl AnyComponent {
    /// 按类型构造默认组件；Transform 由 GameObject 自己创建，Unknown 不可构造
    pub fn create(ty: ComponentType) -> Option<Self> {
        match ty {
            ComponentType::Mesh => Some(AnyComponent::Mesh(ComponentMesh::new())),
            ComponentType::Material => Some(AnyComponent::Material(ComponentMaterial::new())),
            ComponentType::Camera => Some(AnyComponent::Camera(ComponentCamera::new())),
            ComponentType::Animation => Some(AnyComponent::Animation(ComponentAnimation::new())),
            ComponentType::Transform | ComponentType::Unknown => None,
        }
    }

    fn as_dyn(&self) -> &dyn Component {
        match self {
            AnyComponent::Mesh(c) => c,
            AnyComponent::Material(c) => c,
            AnyComponent::Camera(c) => c,
            AnyComponent::Animation(c) => c,
        }
    }

    fn as_dyn_mut(&mut self) -> &mut dyn Component {
        match self {
            AnyComponent::Mesh(c) => c,
            AnyComponent::Material(c) => c,
            AnyComponent::Camera(c) => c,
            AnyComponent::Animation(c) => c,
        }
    }

    pub fn as_mesh(&self) -> Option<&ComponentMesh> {
        match self {
            AnyComponent::Mesh(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_mesh_mut(&mut self) -> Option<&mut ComponentMesh> {
        match self {
            AnyComponent::Mesh(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_material(&self) -> Option<&ComponentMaterial> {
        match self {
            AnyComponent::Material(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_material_mut(&mut self) -> Option<&mut ComponentMaterial> {
        match self {
            AnyComponent::Material(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_camera(&self) -> Option<&ComponentCamera> {
        match self {
            AnyComponent::Camera(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_animation(&self) -> Option<&ComponentAnimation> {
        match self {
            AnyComponent::Animation(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_animation_mut(&mut self) -> Option<&mut ComponentAnimation> {
        match self {
            AnyComponent::Animation(c) => Some(c),
            _ => None,
        }
    }
}

impl Component for AnyComponent {
    fn component_type(&self) -> ComponentType {
        self.as_dyn().component_type()
    }

    fn name(&self) -> &str {
        self.as_dyn().name()
    }

    fn on_update(&mut self, ctx: &ComponentUpdate<'_>) -> bool {
        self.as_dyn_mut().on_update(ctx)
    }

    fn on_draw(&self, renderer: &mut dyn Renderer) -> bool {
        self.as_dyn().on_draw(renderer)
    }

    fn on_editor(&mut self, inspector: &mut dyn Inspector) -> bool {
        self.as_dyn_mut().on_editor(inspector)
    }
}

/// 组件存储包装器
///
/// 保存组件实例和它的启用标志；`active == false` 时不参与更新和绘制。
#[derive(Debug, Clone)]
pub struct ComponentBox<C = AnyComponent> {
    pub active: bool,
    component: C,
}

impl<C: Component> ComponentBox<C> {
    pub fn new(component: C) -> Self {
        Self {
            active: true,
            component,
        }
    }

    pub fn get(&self) -> &C {
        &self.component
    }

    pub fn get_mut(&mut self) -> &mut C {
        &mut self.component
    }

    pub fn component_type(&self) -> ComponentType {
        self.component.component_type()
    }

    /// 组件面板：标题栏带 Active 复选框，`deletable` 时再带一个 Delete 按钮
    pub fn on_editor(&mut self, inspector: &mut dyn Inspector, deletable: bool) -> EditorResponse {
        let mut response = EditorResponse::default();

        if inspector.collapsing_header(self.component.name()) {
            response.interacted |= inspector.checkbox("Active", &mut self.active);

            if deletable {
                inspector.same_line();
                if inspector.button("Delete") {
                    response.delete_requested = true;
                    response.interacted = true;
                }
            }

            response.interacted |= self.component.on_editor(inspector);
        }

        response.interacted |= inspector.is_item_clicked();
        response
    }
}
