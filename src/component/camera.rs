//! Camera 组件
//!
//! 挂在 GameObject 上的相机。视锥体的位置和朝向每帧跟随所属节点的全局变换，
//! 绘制时在节点局部空间里画出视锥体轮廓。

use super::{Component, ComponentType, ComponentUpdate};
use crate::editor::Inspector;
use crate::math::{matrix, Color, Frustum, Vector3};
use crate::renderer::Renderer;

/// Camera 组件
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentCamera {
    /// 世界空间视锥体
    frustum: Frustum,
    aspect_ratio: f32,
}

impl ComponentCamera {
    pub fn new() -> Self {
        let frustum = Frustum::default();
        let aspect_ratio = frustum.aspect_ratio();
        Self { frustum, aspect_ratio }
    }

    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    /// 垂直视场角（弧度）
    pub fn set_fov(&mut self, vertical_fov: f32) {
        self.frustum.set_fov(vertical_fov, self.aspect_ratio);
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
        self.frustum.set_aspect_ratio(aspect_ratio);
    }

    pub fn set_plane_distances(&mut self, near: f32, far: f32) {
        self.frustum.near_plane_distance = near;
        self.frustum.far_plane_distance = far;
    }

    /// 节点局部空间中的视锥体：原点，朝向 -Z
    fn local_frustum(&self) -> Frustum {
        Frustum {
            position: Vector3::zeros(),
            front: -Vector3::z(),
            up: Vector3::y(),
            ..self.frustum.clone()
        }
    }
}

impl Default for ComponentCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for ComponentCamera {
    fn component_type(&self) -> ComponentType {
        ComponentType::Camera
    }

    fn on_update(&mut self, ctx: &ComponentUpdate<'_>) -> bool {
        let global = &ctx.owner_global;
        let front = global.transform_vector(&-Vector3::z());
        let up = global.transform_vector(&Vector3::y());

        if front.norm() <= f32::EPSILON || up.norm() <= f32::EPSILON {
            return false;
        }

        self.frustum.position = matrix::transform_point(global, &Vector3::zeros());
        self.frustum.front = front.normalize();
        self.frustum.up = up.normalize();
        true
    }

    fn on_draw(&self, renderer: &mut dyn Renderer) -> bool {
        renderer.draw_frustum(&self.local_frustum(), Color::BLUE);
        true
    }

    fn on_editor(&mut self, inspector: &mut dyn Inspector) -> bool {
        let mut fov = self.frustum.vertical_fov.to_degrees();
        let mut near = self.frustum.near_plane_distance;
        let mut far = self.frustum.far_plane_distance;
        let mut changed = false;

        if inspector.drag_float("FOV", &mut fov, 0.5, 1.0, 179.0) {
            self.set_fov(fov.to_radians());
            changed = true;
        }
        if inspector.drag_float("Near Plane", &mut near, 0.01, 0.01, far) {
            changed = true;
        }
        if inspector.drag_float("Far Plane", &mut far, 1.0, near, 10000.0) {
            changed = true;
        }
        if changed {
            self.set_plane_distances(near, far);
        }

        changed
    }
}
