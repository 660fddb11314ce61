//! 统一的数学库模块
//!
//! 提供场景图常用的数学类型和函数，基于 `nalgebra`。
//!
//! # 模块组织
//!
//! - **基础类型**：Vector2/3/4, Matrix4, Quaternion, Color
//! - **常量**：PI, DEG_TO_RAD 等
//! - **工具函数**：lerp, deg_to_rad 等
//! - **矩阵辅助函数**：TRS 组合与分解
//! - **包围盒**：`Aabb`（见 bounds 子模块）
//! - **视锥体**：`Frustum`（见 frustum 子模块）

pub use nalgebra::{
    Matrix4 as Mat4, Point3, UnitQuaternion, Vector2 as Vec2, Vector3 as Vec3,
    Vector4 as Vec4,
};

pub type Vector2 = Vec2<f32>;
pub type Vector3 = Vec3<f32>;
pub type Vector4 = Vec4<f32>;
pub type Matrix4 = Mat4<f32>;
pub type Quaternion = UnitQuaternion<f32>;

pub mod bounds;
pub mod frustum;

pub use bounds::Aabb;
pub use frustum::{Frustum, Plane};

/// 颜色类型（RGBA，范围 0.0-1.0）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// 创建 RGB 颜色（alpha = 1.0）
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn from_array(rgba: [f32; 4]) -> Self {
        Self::new(rgba[0], rgba[1], rgba[2], rgba[3])
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// RGB 乘以系数，alpha 不变
    pub fn scaled_rgb(&self, factor: f32) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor, self.a)
    }

    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// 数学常量
pub mod constants {
    pub const PI: f32 = std::f32::consts::PI;

    /// 角度转弧度的系数
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// 弧度转角度的系数
    pub const RAD_TO_DEG: f32 = 180.0 / PI;

    /// 浮点数比较的 epsilon
    pub const EPSILON: f32 = 1e-6;
}

/// 数学工具函数
pub mod utils {
    use super::*;

    /// 线性插值
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// 向量线性插值
    pub fn lerp_vec3(a: &Vector3, b: &Vector3, t: f32) -> Vector3 {
        a + (b - a) * t
    }

    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// 检查两个浮点数是否近似相等
    pub fn approx_eq(a: f32, b: f32, epsilon: f32) -> bool {
        (a - b).abs() < epsilon
    }

    /// 逐元素比较两个矩阵
    pub fn matrix_approx_eq(a: &Matrix4, b: &Matrix4, epsilon: f32) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| approx_eq(*x, *y, epsilon))
    }
}

/// 矩阵辅助函数
pub mod matrix {
    use super::*;

    /// 组合：T * R * S
    pub fn compose(position: &Vector3, rotation: &Quaternion, scale: &Vector3) -> Matrix4 {
        Matrix4::new_translation(position)
            * rotation.to_homogeneous()
            * Matrix4::new_nonuniform_scaling(scale)
    }

    /// 把仿射矩阵分解为 (平移, 旋转, 缩放)
    ///
    /// 缩放取各基向量的长度；若矩阵含镜像（行列式为负），把 x 轴缩放取反。
    pub fn decompose(m: &Matrix4) -> (Vector3, Quaternion, Vector3) {
        let translation = Vector3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)]);

        let basis = m.fixed_view::<3, 3>(0, 0).into_owned();
        let mut scale = Vector3::new(
            basis.column(0).norm(),
            basis.column(1).norm(),
            basis.column(2).norm(),
        );
        if basis.determinant() < 0.0 {
            scale.x = -scale.x;
        }

        let mut rotation = basis;
        for (i, s) in scale.iter().enumerate() {
            if s.abs() > constants::EPSILON {
                rotation.column_mut(i).scale_mut(1.0 / s);
            }
        }

        let rotation = Quaternion::from_matrix(&rotation);
        (translation, rotation, scale)
    }

    /// 创建透视投影矩阵
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Matrix4 {
        Matrix4::new_perspective(aspect, fov_y, near, far)
    }

    /// 创建 Look-At 视图矩阵
    pub fn look_at(eye: &Vector3, target: &Vector3, up: &Vector3) -> Matrix4 {
        Matrix4::look_at_rh(&Point3::from(*eye), &Point3::from(*target), up)
    }

    /// 变换一个点（w = 1）
    pub fn transform_point(m: &Matrix4, p: &Vector3) -> Vector3 {
        m.transform_point(&Point3::from(*p)).coords
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_scaled_rgb() {
        let color = Color::new(0.5, 0.5, 0.5, 0.8).scaled_rgb(2.0);
        assert_eq!(color.to_array(), [1.0, 1.0, 1.0, 0.8]);
    }

    #[test]
    fn test_compose_translation() {
        let m = matrix::compose(
            &Vector3::new(1.0, 2.0, 3.0),
            &Quaternion::identity(),
            &Vector3::new(1.0, 1.0, 1.0),
        );
        let p = matrix::transform_point(&m, &Vector3::zeros());
        assert!((p - Vector3::new(1.0, 2.0, 3.0)).norm() < 1e-6);
    }

    #[test]
    fn test_decompose_roundtrip() {
        let position = Vector3::new(1.0, -2.0, 0.5);
        let rotation = Quaternion::from_euler_angles(0.3, -0.7, 1.1);
        let scale = Vector3::new(2.0, 0.5, 3.0);
        let m = matrix::compose(&position, &rotation, &scale);

        let (t, r, s) = matrix::decompose(&m);
        assert!((t - position).norm() < 1e-5);
        assert!((s - scale).norm() < 1e-4);
        assert!(r.angle_to(&rotation) < 1e-4);
        assert!(utils::matrix_approx_eq(&matrix::compose(&t, &r, &s), &m, 1e-4));
    }
}
