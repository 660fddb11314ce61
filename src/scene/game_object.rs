//! GameObject - 场景图节点
//!
//! 作为组件容器，持有一个 Transform 和若干挂载组件。
//! 节点之间的父子关系用 [`GameObjectId`] 表示，真正的所有权在 [`Scene`](super::Scene) 的槽位数组里。

use super::GameObjectId;
use crate::component::{
    AnyComponent, Component, ComponentAnimation, ComponentBox, ComponentMaterial, ComponentMesh,
    ComponentTransform, ComponentType, ComponentUpdate,
};
use crate::core::error::{Result, SceneError};
use crate::editor::{EditorResponse, Inspector};
use crate::math::{Aabb, Quaternion, Vector3};

/// GameObject - 游戏对象
#[derive(Debug, Clone)]
pub struct GameObject {
    name: String,

    /// 是否参与更新和绘制
    pub active: bool,

    /// 编辑器中是否被选中（绘制包围盒和坐标轴）
    pub selected: bool,

    id: GameObjectId,
    parent: Option<GameObjectId>,
    root: GameObjectId,
    pub(super) children: Vec<GameObjectId>,

    /// Transform 在构造时创建，不能删除
    transform: ComponentBox<ComponentTransform>,

    /// 其余组件，按挂载顺序
    components: Vec<ComponentBox>,
}

impl GameObject {
    pub(super) fn new(
        id: GameObjectId,
        name: impl Into<String>,
        parent: Option<GameObjectId>,
        root: GameObjectId,
    ) -> Self {
        Self {
            name: name.into(),
            active: true,
            selected: false,
            id,
            parent,
            root,
            children: Vec::new(),
            transform: ComponentBox::new(ComponentTransform::new()),
            components: Vec::new(),
        }
    }

    // ========== 层级 ==========

    pub fn id(&self) -> GameObjectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn parent(&self) -> Option<GameObjectId> {
        self.parent
    }

    pub(super) fn set_parent_link(&mut self, parent: Option<GameObjectId>) {
        self.parent = parent;
    }

    /// 所在模型树的根节点
    pub fn root(&self) -> GameObjectId {
        self.root
    }

    pub(super) fn set_root(&mut self, root: GameObjectId) {
        self.root = root;
    }

    pub fn children(&self) -> &[GameObjectId] {
        &self.children
    }

    // ========== Transform ==========

    pub fn transform(&self) -> &ComponentTransform {
        self.transform.get()
    }

    pub fn transform_mut(&mut self) -> &mut ComponentTransform {
        self.transform.get_mut()
    }

    pub fn transform_box(&self) -> &ComponentBox<ComponentTransform> {
        &self.transform
    }

    pub fn transform_box_mut(&mut self) -> &mut ComponentBox<ComponentTransform> {
        &mut self.transform
    }

    /// 设置局部位置、缩放和旋转
    pub fn set_local_transform(&mut self, position: Vector3, scale: Vector3, rotation: Quaternion) {
        self.transform.get_mut().load(position, scale, rotation);
    }

    /// 设置局部位置和旋转，保留缩放
    pub fn set_local_transform_no_scale(&mut self, position: Vector3, rotation: Quaternion) {
        self.transform.get_mut().load_no_scale(position, rotation);
    }

    // ========== 组件 ==========

    /// 创建并挂载一个组件
    ///
    /// Transform/Mesh/Material 每种最多一个，重复创建会被拒绝并记录警告；
    /// `Unknown` 类型无法创建。两种情况都返回 `None`。
    pub fn create_component(&mut self, ty: ComponentType) -> Option<&mut AnyComponent> {
        if ty == ComponentType::Transform {
            crate::engine_warn!(object = %self.name, "Error adding component: already a transform");
            return None;
        }
        let component = AnyComponent::create(ty)?;
        self.attach(component)
    }

    /// 挂载一个已经构造好的组件，单例类型的规则与 [`create_component`](Self::create_component) 相同
    pub fn attach(&mut self, component: AnyComponent) -> Option<&mut AnyComponent> {
        let ty = component.component_type();
        if ty.is_singleton() && self.components.iter().any(|c| c.component_type() == ty) {
            crate::engine_warn!(
                object = %self.name,
                component = ty.name(),
                "Error adding component: already present"
            );
            return None;
        }

        self.components.push(ComponentBox::new(component));
        self.components.last_mut().map(ComponentBox::get_mut)
    }

    /// 删除组件，`index` 按挂载顺序计数，0 是 Transform
    pub fn delete_component(&mut self, index: usize) -> Result<()> {
        if index == 0 {
            return Err(SceneError::TransformRequired(self.name.clone()).into());
        }
        if index > self.components.len() {
            return Err(SceneError::InvalidComponent {
                object: self.name.clone(),
                index,
            }
            .into());
        }

        let removed = self.components.remove(index - 1);
        tracing::debug!(
            object = %self.name,
            component = removed.component_type().name(),
            "Component deleted"
        );
        Ok(())
    }

    /// 组件总数（含 Transform）
    pub fn component_count(&self) -> usize {
        self.components.len() + 1
    }

    /// 按挂载顺序列出组件类型（第一个总是 Transform）
    pub fn component_types(&self) -> Vec<ComponentType> {
        std::iter::once(ComponentType::Transform)
            .chain(self.components.iter().map(ComponentBox::component_type))
            .collect()
    }

    /// Transform 之外的组件
    pub fn components(&self) -> &[ComponentBox] {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut [ComponentBox] {
        &mut self.components
    }

    /// 指定类型中最后一个处于启用状态的组件
    pub fn get_component(&self, ty: ComponentType) -> Option<&AnyComponent> {
        self.components
            .iter()
            .rev()
            .find(|c| c.active && c.component_type() == ty)
            .map(ComponentBox::get)
    }

    /// 指定类型的全部启用组件，按挂载顺序
    pub fn get_components(&self, ty: ComponentType) -> impl Iterator<Item = &AnyComponent> {
        self.components
            .iter()
            .filter(move |c| c.active && c.component_type() == ty)
            .map(ComponentBox::get)
    }

    fn find_box(&self, ty: ComponentType) -> Option<&ComponentBox> {
        self.components.iter().find(|c| c.component_type() == ty)
    }

    fn find_box_mut(&mut self, ty: ComponentType) -> Option<&mut ComponentBox> {
        self.components.iter_mut().find(|c| c.component_type() == ty)
    }

    pub fn mesh(&self) -> Option<&ComponentMesh> {
        self.find_box(ComponentType::Mesh)?.get().as_mesh()
    }

    pub fn mesh_mut(&mut self) -> Option<&mut ComponentMesh> {
        self.find_box_mut(ComponentType::Mesh)?.get_mut().as_mesh_mut()
    }

    pub fn is_mesh_active(&self) -> bool {
        self.find_box(ComponentType::Mesh).is_some_and(|c| c.active)
    }

    pub fn material(&self) -> Option<&ComponentMaterial> {
        self.find_box(ComponentType::Material)?.get().as_material()
    }

    pub fn material_mut(&mut self) -> Option<&mut ComponentMaterial> {
        self.find_box_mut(ComponentType::Material)?.get_mut().as_material_mut()
    }

    pub fn is_material_active(&self) -> bool {
        self.find_box(ComponentType::Material).is_some_and(|c| c.active)
    }

    /// 最后一个启用的 Animation 组件
    pub fn animation(&self) -> Option<&ComponentAnimation> {
        self.get_component(ComponentType::Animation)?.as_animation()
    }

    pub fn animation_mut(&mut self) -> Option<&mut ComponentAnimation> {
        self.components
            .iter_mut()
            .rev()
            .find(|c| c.active && c.component_type() == ComponentType::Animation)?
            .get_mut()
            .as_animation_mut()
    }

    /// 网格局部空间的包围盒，没有网格时为空
    pub fn bounding_box(&self) -> Aabb {
        self.mesh().map(ComponentMesh::bounding_box).unwrap_or_default()
    }

    /// 按挂载顺序运行所有启用组件的更新钩子
    pub(super) fn update_components(&mut self, ctx: &ComponentUpdate<'_>) -> bool {
        let mut ok = true;

        if self.transform.active {
            ok &= self.transform.get_mut().on_update(ctx);
        }

        for component in self.components.iter_mut().filter(|c| c.active) {
            if !component.get_mut().on_update(ctx) {
                crate::engine_warn!(
                    object = %self.name,
                    component = component.component_type().name(),
                    "Component update failed"
                );
                ok = false;
            }
        }

        ok
    }

    /// 检视面板
    ///
    /// 组件面板里的 Delete 立即删除对应组件；对象自身的删除请求通过返回值交给场景处理。
    pub fn on_editor(&mut self, inspector: &mut dyn Inspector) -> EditorResponse {
        let mut response = EditorResponse::default();

        inspector.text(&self.name);
        response.interacted |= inspector.checkbox("Enabled", &mut self.active);
        inspector.same_line();
        if inspector.button("Delete GameObject") {
            response.delete_requested = true;
            response.interacted = true;
        }

        response.interacted |= self.transform.on_editor(inspector, false).interacted;

        let mut doomed = Vec::new();
        for (i, component) in self.components.iter_mut().enumerate() {
            let r = component.on_editor(inspector, true);
            response.interacted |= r.interacted;
            if r.delete_requested {
                doomed.push(i + 1);
            }
        }

        for index in doomed.into_iter().rev() {
            if let Err(e) = self.delete_component(index) {
                crate::engine_error!(object = %self.name, error = %e, "Failed to delete component");
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::testing::ScriptedInspector;

    fn object() -> GameObject {
        let id = GameObjectId::new(1, 0);
        GameObject::new(id, "Node", None, id)
    }

    #[test]
    fn test_new_object_has_only_transform() {
        let obj = object();
        assert_eq!(obj.component_types(), vec![ComponentType::Transform]);
        assert_eq!(obj.component_count(), 1);
        assert!(obj.bounding_box().is_empty());
    }

    #[test]
    fn test_singleton_components_rejected() {
        let mut obj = object();

        assert!(obj.create_component(ComponentType::Transform).is_none());
        assert!(obj.create_component(ComponentType::Mesh).is_some());
        assert!(obj.create_component(ComponentType::Mesh).is_none());
        assert!(obj.create_component(ComponentType::Material).is_some());
        assert!(obj.create_component(ComponentType::Material).is_none());
        assert!(obj.create_component(ComponentType::Unknown).is_none());
        assert!(obj.create_component(ComponentType::Camera).is_some());
        assert!(obj.create_component(ComponentType::Camera).is_some());

        let types = obj.component_types();
        let count = |ty| types.iter().filter(|t| **t == ty).count();
        assert_eq!(count(ComponentType::Transform), 1);
        assert_eq!(count(ComponentType::Mesh), 1);
        assert_eq!(count(ComponentType::Material), 1);
        assert_eq!(count(ComponentType::Camera), 2);
    }

    #[test]
    fn test_delete_component() {
        let mut obj = object();
        obj.create_component(ComponentType::Mesh);
        obj.create_component(ComponentType::Camera);

        assert!(matches!(
            obj.delete_component(0),
            Err(crate::core::HearthError::Scene(SceneError::TransformRequired(_)))
        ));
        assert!(obj.delete_component(5).is_err());

        obj.delete_component(1).unwrap();
        assert_eq!(
            obj.component_types(),
            vec![ComponentType::Transform, ComponentType::Camera]
        );
        assert!(obj.mesh().is_none());

        // 删除后可以重新创建单例组件
        assert!(obj.create_component(ComponentType::Mesh).is_some());
    }

    #[test]
    fn test_get_component_skips_inactive() {
        let mut obj = object();
        obj.create_component(ComponentType::Animation);
        obj.create_component(ComponentType::Animation);
        obj.components_mut()[1].active = false;

        assert_eq!(obj.get_components(ComponentType::Animation).count(), 1);
        assert!(obj.get_component(ComponentType::Animation).is_some());

        obj.components_mut()[0].active = false;
        assert!(obj.get_component(ComponentType::Animation).is_none());
        assert!(obj.animation().is_none());
    }

    #[test]
    fn test_editor_delete_uses_component_path() {
        let mut obj = object();
        obj.create_component(ComponentType::Camera);
        let mut inspector = ScriptedInspector {
            clicks: vec!["Delete".into()],
            ..Default::default()
        };

        let response = obj.on_editor(&mut inspector);

        assert!(response.interacted);
        assert!(!response.delete_requested);
        assert_eq!(obj.component_types(), vec![ComponentType::Transform]);
    }
}
