//! Transform 组件
//!
//! 管理游戏对象相对父节点的位置、旋转和缩放。
//! 局部矩阵每次按 T·R·S 现算；全局矩阵只在层级刷新时写入。

use super::{Component, ComponentType};
use crate::editor::Inspector;
use crate::math::{matrix, Matrix4, Quaternion, Vector3};
use crate::renderer::Renderer;

/// Transform 组件
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentTransform {
    position: Vector3,
    scale: Vector3,
    rotation: Quaternion,

    /// 上一次层级刷新得到的全局矩阵
    global: Matrix4,
}

impl ComponentTransform {
    pub fn new() -> Self {
        Self {
            position: Vector3::zeros(),
            scale: Vector3::repeat(1.0),
            rotation: Quaternion::identity(),
            global: Matrix4::identity(),
        }
    }

    /// 一次性设置位置、缩放和旋转
    pub fn load(&mut self, position: Vector3, scale: Vector3, rotation: Quaternion) {
        self.position = position;
        self.scale = scale;
        self.rotation = rotation;
    }

    /// 设置位置和旋转，保留缩放
    pub fn load_no_scale(&mut self, position: Vector3, rotation: Quaternion) {
        self.position = position;
        self.rotation = rotation;
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
    }

    pub fn scale(&self) -> Vector3 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vector3) {
        self.scale = scale;
    }

    pub fn rotation(&self) -> Quaternion {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Quaternion) {
        self.rotation = rotation;
    }

    /// 局部矩阵：T * R * S
    pub fn local_matrix(&self) -> Matrix4 {
        matrix::compose(&self.position, &self.rotation, &self.scale)
    }

    pub fn global_matrix(&self) -> Matrix4 {
        self.global
    }

    /// 全局 = 父全局 * 局部，返回新的全局矩阵供子节点使用
    pub fn update_transform(&mut self, parent_global: &Matrix4) -> Matrix4 {
        self.global = parent_global * self.local_matrix();
        self.global
    }
}

impl Default for ComponentTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for ComponentTransform {
    fn component_type(&self) -> ComponentType {
        ComponentType::Transform
    }

    fn on_draw(&self, renderer: &mut dyn Renderer) -> bool {
        renderer.multiply_transform(&self.local_matrix());
        true
    }

    fn on_editor(&mut self, inspector: &mut dyn Inspector) -> bool {
        let mut changed = false;

        let mut position: [f32; 3] = self.position.into();
        if inspector.drag_float3("Position", &mut position, 0.1) {
            self.position = Vector3::from(position);
            changed = true;
        }

        // 编辑器里用欧拉角（度）显示旋转
        let (roll, pitch, yaw) = self.rotation.euler_angles();
        let mut euler = [roll.to_degrees(), pitch.to_degrees(), yaw.to_degrees()];
        if inspector.drag_float3("Rotation", &mut euler, 1.0) {
            self.rotation = Quaternion::from_euler_angles(
                euler[0].to_radians(),
                euler[1].to_radians(),
                euler[2].to_radians(),
            );
            changed = true;
        }

        let mut scale: [f32; 3] = self.scale.into();
        if inspector.drag_float3("Scale", &mut scale, 0.1) {
            self.scale = Vector3::from(scale);
            changed = true;
        }

        changed
    }
}
