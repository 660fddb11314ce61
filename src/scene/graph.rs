//! 场景
//!
//! 槽位数组持有全部 GameObject，负责层级维护、每帧更新与绘制遍历，
//! 以及把导入记录构建成 GameObject 树。

use std::path::Path;

use super::{GameObject, GameObjectId};
use crate::animation::{AnimationClip, AnimationLibrary, AnimationPose};
use crate::component::{
    AnyComponent, Component, ComponentAnimation, ComponentMaterial, ComponentMesh, ComponentType,
    ComponentUpdate,
};
use crate::core::error::{MeshLoadError, Result, SceneError};
use crate::editor::Inspector;
use crate::import::{ImportedScene, SceneMaterial, SceneMesh, SceneNode};
use crate::math::{Color, Frustum, Matrix4, Vector3};
use crate::renderer::{Renderer, TextureHandle, TextureLoader};

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    object: Option<GameObject>,
}

/// 场景：GameObject 树及其动画库
#[derive(Debug)]
pub struct Scene {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: GameObjectId,
    animations: AnimationLibrary,
}

impl Scene {
    pub fn new() -> Self {
        let root = GameObjectId::new(0, 0);
        Self {
            slots: vec![Slot {
                generation: 0,
                object: Some(GameObject::new(root, "Root", None, root)),
            }],
            free: Vec::new(),
            root,
            animations: AnimationLibrary::new(),
        }
    }

    // ========== 访问 ==========

    /// 场景根节点
    pub fn root(&self) -> GameObjectId {
        self.root
    }

    /// 存活的 GameObject 数量（含根节点）
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.object.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: GameObjectId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: GameObjectId) -> Option<&GameObject> {
        let slot = self.slots.get(id.index())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.object.as_ref()
    }

    pub fn get_mut(&mut self, id: GameObjectId) -> Option<&mut GameObject> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.object.as_mut()
    }

    fn object(&self, id: GameObjectId) -> Result<&GameObject> {
        self.get(id).ok_or_else(|| SceneError::InvalidObject(id).into())
    }

    fn object_mut(&mut self, id: GameObjectId) -> Result<&mut GameObject> {
        self.get_mut(id).ok_or_else(|| SceneError::InvalidObject(id).into())
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameObject> {
        self.slots.iter().filter_map(|s| s.object.as_ref())
    }

    pub fn parent(&self, id: GameObjectId) -> Option<GameObjectId> {
        self.get(id)?.parent()
    }

    pub fn children(&self, id: GameObjectId) -> &[GameObjectId] {
        match self.get(id) {
            Some(obj) => obj.children(),
            None => &[],
        }
    }

    pub fn animations(&self) -> &AnimationLibrary {
        &self.animations
    }

    pub fn animations_mut(&mut self) -> &mut AnimationLibrary {
        &mut self.animations
    }

    /// 以 `id` 为根的子树，深度优先先序
    pub fn subtree(&self, id: GameObjectId) -> Vec<GameObjectId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(obj) = self.get(next) {
                out.push(next);
                stack.extend(obj.children().iter().rev());
            }
        }
        out
    }

    fn is_ancestor_or_self(&self, ancestor: GameObjectId, node: GameObjectId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    // ========== 层级 ==========

    fn allocate(&mut self, build: impl FnOnce(GameObjectId) -> GameObject) -> GameObjectId {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                let id = GameObjectId::new(index, slot.generation);
                slot.object = Some(build(id));
                id
            }
            None => {
                let id = GameObjectId::new(self.slots.len() as u32, 0);
                self.slots.push(Slot {
                    generation: 0,
                    object: Some(build(id)),
                });
                id
            }
        }
    }

    /// 创建 GameObject 并挂到 `parent` 下（`None` 表示场景根节点）
    ///
    /// 直接挂在场景根下的节点是自己所在模型树的根，其余节点继承父节点的根。
    pub fn create_game_object(
        &mut self,
        name: impl Into<String>,
        parent: Option<GameObjectId>,
    ) -> Result<GameObjectId> {
        let parent = parent.unwrap_or(self.root);
        let parent_root = self.object(parent)?.root();
        let scene_root = self.root;

        let id = self.allocate(|id| {
            let root = if parent == scene_root { id } else { parent_root };
            GameObject::new(id, name, Some(parent), root)
        });
        self.object_mut(parent)?.children.push(id);

        Ok(id)
    }

    /// 把 `child` 移到 `parent` 下
    ///
    /// `parent` 为 `None` 或与当前父节点相同时什么都不做；会形成环时返回错误。
    /// 整棵被移动子树的根链接随之更新。
    pub fn set_parent(&mut self, child: GameObjectId, parent: Option<GameObjectId>) -> Result<()> {
        let Some(parent) = parent else {
            return Ok(());
        };

        let current = self.object(child)?.parent();
        let parent_name = self.object(parent)?.name().to_string();
        if current == Some(parent) {
            return Ok(());
        }
        if child == self.root {
            return Err(SceneError::RootRequired.into());
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(SceneError::CyclicParent {
                child: self.object(child)?.name().to_string(),
                parent: parent_name,
            }
            .into());
        }

        if let Some(old) = current {
            self.detach_from(old, child);
        }
        self.object_mut(child)?.set_parent_link(Some(parent));
        self.object_mut(parent)?.children.push(child);

        let root = if parent == self.root {
            child
        } else {
            self.object(parent)?.root()
        };
        for node in self.subtree(child) {
            if let Some(obj) = self.get_mut(node) {
                obj.set_root(root);
            }
        }

        Ok(())
    }

    fn detach_from(&mut self, parent: GameObjectId, child: GameObjectId) {
        let Some(obj) = self.get_mut(parent) else {
            crate::engine_error!(parent = %parent, child = %child, "Inconsistent hierarchy: parent no longer exists");
            return;
        };

        match obj.children.iter().position(|c| *c == child) {
            Some(i) => {
                obj.children.remove(i);
            }
            None => {
                crate::engine_error!(
                    parent = %obj.name(),
                    child = %child,
                    "Inconsistent hierarchy: object has a parent but isn't in its child list"
                );
            }
        }
    }

    /// 删除节点及其整棵子树，同时从父节点的子节点列表中移除
    pub fn delete_game_object(&mut self, id: GameObjectId) -> Result<()> {
        if id == self.root {
            return Err(SceneError::RootRequired.into());
        }

        if let Some(parent) = self.object(id)?.parent() {
            self.detach_from(parent, id);
        }

        let doomed = self.subtree(id);
        for node in doomed.iter().rev() {
            let slot = &mut self.slots[node.index()];
            slot.object = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(node.index() as u32);
        }

        tracing::debug!(object = %id, released = doomed.len(), "GameObject deleted");
        Ok(())
    }

    /// 删除组件，`index` 按挂载顺序计数，0 是 Transform
    pub fn delete_component(&mut self, id: GameObjectId, index: usize) -> Result<()> {
        self.object_mut(id)?.delete_component(index)
    }

    pub fn set_selected(&mut self, id: GameObjectId, selected: bool) -> Result<()> {
        self.object_mut(id)?.selected = selected;
        Ok(())
    }

    /// 在 `from` 的后代（不含自身）中按名称深度优先查找
    ///
    /// 同一层的多个同名节点取最后一个；某个子节点本身不匹配时，
    /// 只有在尚未找到结果的情况下才会深入它的子树。
    pub fn find_by_name(&self, from: GameObjectId, name: &str) -> Option<GameObjectId> {
        let obj = self.get(from)?;
        let mut found = None;

        for &child_id in obj.children() {
            let Some(child) = self.get(child_id) else {
                continue;
            };
            if child.name() == name {
                found = Some(child_id);
            } else if found.is_none() {
                found = self.find_by_name(child_id, name);
            }
        }

        found
    }

    // ========== 变换 ==========

    /// 从 `id` 开始自顶向下重新计算全局矩阵
    pub fn update_global_transforms(&mut self, id: GameObjectId) -> Result<()> {
        let parent_global = self
            .parent(id)
            .and_then(|p| self.get(p))
            .map_or_else(Matrix4::identity, |p| p.transform().global_matrix());
        self.recursive_update_transforms(id, &parent_global)
    }

    /// 全局 = 父全局 * 局部，深度优先向下传播
    pub fn recursive_update_transforms(&mut self, id: GameObjectId, parent_global: &Matrix4) -> Result<()> {
        let obj = self.object_mut(id)?;
        let global = obj.transform_mut().update_transform(parent_global);
        let children = obj.children().to_vec();

        for child in children {
            self.recursive_update_transforms(child, &global)?;
        }
        Ok(())
    }

    // ========== 每帧更新 ==========

    /// 每帧更新
    ///
    /// 先把动画姿态写入节点，再刷新全局矩阵，最后按挂载顺序运行各组件的更新钩子。
    pub fn update(&mut self, delta_time: f32) -> Result<()> {
        self.apply_animations();
        self.update_global_transforms(self.root)?;
        self.update_components(self.root, delta_time)
    }

    fn sample_animation(&self, anim: &ComponentAnimation) -> Option<AnimationPose> {
        if !anim.is_playing() {
            return None;
        }

        let clip = anim.clip()?;
        let Some(pose) = self.animations.sample(clip, anim.time(), anim.is_looping()) else {
            tracing::debug!(clip, "Animation clip is not loaded");
            return None;
        };

        let from = anim.blend().and_then(|blend| {
            self.animations
                .sample(&blend.from, blend.from_time, anim.is_looping())
                .map(|from| (from, blend.weight()))
        });

        Some(match from {
            Some((from, weight)) => from.blend(&pose, weight),
            None => pose,
        })
    }

    /// 只采样启用子树中的动画组件，与组件更新的遍历范围一致
    fn apply_animations(&mut self) {
        let mut poses: Vec<(GameObjectId, AnimationPose)> = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(obj) = self.get(id) else {
                continue;
            };
            if let Some(pose) = obj.animation().and_then(|anim| self.sample_animation(anim)) {
                poses.push((id, pose));
            }
            stack.extend(
                obj.children()
                    .iter()
                    .copied()
                    .filter(|&child| self.get(child).is_some_and(|c| c.active)),
            );
        }

        for (owner, pose) in poses {
            for node in self.subtree(owner) {
                let Some(obj) = self.get_mut(node) else {
                    continue;
                };
                let Some(node_pose) = pose.get(obj.name()).copied() else {
                    continue;
                };

                let transform = obj.transform_mut();
                if let Some(position) = node_pose.position {
                    transform.set_position(position);
                }
                if let Some(rotation) = node_pose.rotation {
                    transform.set_rotation(rotation);
                }
                if let Some(scale) = node_pose.scale {
                    transform.set_scale(scale);
                }
            }
        }
    }

    /// 每根骨骼在网格空间中的动画矩阵：meshGlobal⁻¹ * boneGlobal
    fn bone_palette(&self, mesh: &ComponentMesh, mesh_global: &Matrix4) -> Vec<Option<Matrix4>> {
        let inverse = mesh_global.try_inverse().unwrap_or_else(Matrix4::identity);
        mesh.bones()
            .iter()
            .map(|bone| {
                bone.target
                    .and_then(|target| self.get(target))
                    .map(|obj| inverse * obj.transform().global_matrix())
            })
            .collect()
    }

    fn update_components(&mut self, id: GameObjectId, delta_time: f32) -> Result<()> {
        let obj = self.object(id)?;
        let global = obj.transform().global_matrix();
        let palette = obj
            .mesh()
            .filter(|mesh| mesh.has_bones())
            .map(|mesh| self.bone_palette(mesh, &global));

        let mut ctx = ComponentUpdate::new(delta_time, global);
        if let Some(palette) = &palette {
            ctx = ctx.with_bone_palette(palette);
        }

        let obj = self.object_mut(id)?;
        obj.update_components(&ctx);
        let children = obj.children().to_vec();

        for child in children {
            if self.object(child)?.active {
                self.update_components(child, delta_time)?;
            }
        }
        Ok(())
    }

    // ========== 绘制 ==========

    /// 绘制整棵树
    ///
    /// 节点的世界空间包围盒完全在视锥体外时跳过整棵子树。
    /// 子节点在父节点的变换作用域内绘制。
    pub fn draw(&self, renderer: &mut dyn Renderer, frustum: &Frustum) {
        self.draw_node(self.root, renderer, frustum);
    }

    fn draw_node(&self, id: GameObjectId, renderer: &mut dyn Renderer, frustum: &Frustum) {
        let Some(obj) = self.get(id) else {
            return;
        };

        let bbox = obj.bounding_box();
        if !frustum.intersects_aabb(&bbox.transformed(&obj.transform().global_matrix())) {
            return;
        }

        renderer.push_transform();

        if obj.transform_box().active {
            obj.transform().on_draw(renderer);
        }

        if obj.selected {
            renderer.draw_bounding_box(&bbox, Color::GREEN);
            renderer.draw_axis();
        }

        renderer.bind_texture(TextureHandle::NONE);

        if obj.is_material_active() {
            if let Some(material) = obj.material() {
                material.on_draw(renderer);
            }
        }

        if obj.is_mesh_active() {
            if let Some(mesh) = obj.mesh() {
                mesh.on_draw(renderer);
            }
        }

        renderer.bind_texture(TextureHandle::NONE);

        if let Some(camera) = obj.get_component(ComponentType::Camera) {
            camera.on_draw(renderer);
        }

        for &child in obj.children() {
            if self.get(child).is_some_and(|c| c.active) {
                self.draw_node(child, renderer, frustum);
            }
        }

        renderer.pop_transform();
    }

    /// 从每个节点向它的启用子节点画一条线
    pub fn draw_hierarchy(&self, renderer: &mut dyn Renderer) {
        self.draw_hierarchy_node(self.root, renderer);
    }

    fn draw_hierarchy_node(&self, id: GameObjectId, renderer: &mut dyn Renderer) {
        let Some(obj) = self.get(id) else {
            return;
        };

        renderer.push_transform();
        if obj.transform_box().active {
            obj.transform().on_draw(renderer);
        }

        for &child_id in obj.children() {
            let Some(child) = self.get(child_id).filter(|c| c.active) else {
                continue;
            };
            renderer.draw_line(&Vector3::zeros(), &child.transform().position(), Color::BLUE);
            self.draw_hierarchy_node(child_id, renderer);
        }

        renderer.pop_transform();
    }

    // ========== 编辑器 ==========

    /// 节点的检视面板；面板里请求删除节点时走与 [`delete_game_object`](Self::delete_game_object) 相同的路径
    pub fn on_editor(&mut self, id: GameObjectId, inspector: &mut dyn Inspector) -> Result<bool> {
        let response = self.object_mut(id)?.on_editor(inspector);

        if response.delete_requested {
            if id == self.root {
                crate::engine_warn!("The scene root cannot be deleted");
            } else {
                self.delete_game_object(id)?;
            }
        }

        Ok(response.interacted)
    }

    // ========== 模型加载 ==========

    /// 一步创建 Mesh 和 Material 组件，材质按 `mesh.material_index` 从表中选取
    pub fn load_mesh_from_scene(
        &mut self,
        id: GameObjectId,
        mesh: &SceneMesh,
        materials: &[SceneMaterial],
        folder: &Path,
        textures: &mut dyn TextureLoader,
    ) -> Result<()> {
        self.object(id)?;

        let material = materials
            .get(mesh.material_index)
            .ok_or(MeshLoadError::MissingMaterial {
                index: mesh.material_index,
                available: materials.len(),
            })?;

        let mut mesh_component = ComponentMesh::new();
        mesh_component.load(mesh)?;

        let mut material_component = ComponentMaterial::new();
        material_component.load(material, folder, textures);

        let obj = self.object_mut(id)?;
        obj.attach(AnyComponent::Mesh(mesh_component));
        obj.attach(AnyComponent::Material(material_component));
        Ok(())
    }

    fn resolve_bone(&self, root: GameObjectId, name: &str) -> Option<GameObjectId> {
        let root_obj = self.get(root)?;
        if root_obj.name() == name {
            Some(root)
        } else {
            self.find_by_name(root, name)
        }
    }

    /// 解析子树中所有网格的骨骼名称，必须在整棵树建好之后调用
    pub fn load_bones(&mut self, id: GameObjectId) -> Result<()> {
        self.object(id)?;

        for node in self.subtree(id) {
            let Some(obj) = self.get(node) else {
                continue;
            };
            let Some(mesh) = obj.mesh().filter(|m| m.has_bones()) else {
                continue;
            };

            let root = obj.root();
            let targets: Vec<Option<GameObjectId>> = mesh
                .bones()
                .iter()
                .map(|bone| self.resolve_bone(root, &bone.name))
                .collect();

            for (bone, target) in mesh.bones().iter().zip(&targets) {
                if target.is_none() {
                    crate::engine_warn!(object = %obj.name(), bone = %bone.name, "Bone not found in hierarchy");
                }
            }

            if let Some(mesh) = self.get_mut(node).and_then(GameObject::mesh_mut) {
                for (bone, target) in mesh.bones_mut().iter_mut().zip(targets) {
                    bone.target = target;
                }
            }
        }

        Ok(())
    }

    /// 把导入的场景构建成挂在场景根下的一棵 GameObject 树
    ///
    /// 节点上的第一个网格挂在节点自身，其余网格各自成为子节点。
    /// 构建失败时已创建的部分会被删除。
    pub fn load_model(
        &mut self,
        imported: &ImportedScene,
        folder: &Path,
        textures: &mut dyn TextureLoader,
    ) -> Result<GameObjectId> {
        for clip in &imported.animations {
            self.animations.insert(clip.clone());
        }

        let model_root = self.create_game_object(imported.root.name.clone(), None)?;
        if let Err(e) = self.populate_node(model_root, &imported.root, imported, folder, textures) {
            self.delete_game_object(model_root)?;
            return Err(e);
        }

        self.load_bones(model_root)?;
        self.update_global_transforms(model_root)?;

        crate::engine_info!(
            model = %imported.root.name,
            objects = self.subtree(model_root).len(),
            meshes = imported.meshes.len(),
            "Model loaded"
        );

        Ok(model_root)
    }

    fn populate_node(
        &mut self,
        id: GameObjectId,
        node: &SceneNode,
        imported: &ImportedScene,
        folder: &Path,
        textures: &mut dyn TextureLoader,
    ) -> Result<()> {
        self.object_mut(id)?
            .set_local_transform(node.position, node.scale, node.rotation);

        for (i, &mesh_index) in node.meshes.iter().enumerate() {
            let mesh = imported.meshes.get(mesh_index).ok_or_else(|| {
                MeshLoadError::ValidationError(format!(
                    "node '{}' references mesh {} of {}",
                    node.name,
                    mesh_index,
                    imported.meshes.len()
                ))
            })?;

            let target = if i == 0 {
                id
            } else {
                let name = if mesh.name.is_empty() {
                    format!("{}_{}", node.name, i)
                } else {
                    mesh.name.clone()
                };
                self.create_game_object(name, Some(id))?
            };

            self.load_mesh_from_scene(target, mesh, &imported.materials, folder, textures)?;
        }

        for child in &node.children {
            let child_id = self.create_game_object(child.name.clone(), Some(id))?;
            self.populate_node(child_id, child, imported, folder, textures)?;
        }

        Ok(())
    }

    // ========== 动画 ==========

    /// 注册动画片段，并在节点上挂一个循环播放它的 Animation 组件
    pub fn load_anim(&mut self, id: GameObjectId, clip: AnimationClip) -> Result<()> {
        self.object(id)?;
        let name = clip.name.clone();
        self.animations.insert(clip);

        if let Some(AnyComponent::Animation(anim)) =
            self.object_mut(id)?.create_component(ComponentType::Animation)
        {
            anim.set_clip(name);
            anim.play(true);
        }
        Ok(())
    }

    /// 在 `duration` 秒内过渡到已加载的片段 `clip`；节点上还没有 Animation 组件时直接开始播放
    pub fn change_anim(&mut self, id: GameObjectId, clip: &str, duration: f32) -> Result<()> {
        if !self.animations.contains(clip) {
            return Err(SceneError::UnknownAnimation(clip.to_string()).into());
        }

        let obj = self.object_mut(id)?;
        match obj.animation_mut() {
            Some(anim) => anim.blend_to(clip, duration),
            None => {
                if let Some(AnyComponent::Animation(anim)) =
                    obj.create_component(ComponentType::Animation)
                {
                    anim.set_clip(clip);
                    anim.play(true);
                }
            }
        }
        Ok(())
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
