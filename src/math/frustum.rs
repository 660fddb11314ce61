//! 视锥体
//!
//! 由位置、朝向、视场角和近远裁剪面定义的透视视锥体，
//! 提供投影/视图矩阵以及针对包围盒的裁剪测试。

use super::{matrix, Aabb, Matrix4, Vector3, Vector4};

/// 平面：`normal · p + d = 0`，法线指向视锥体内部
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vector3,
    pub d: f32,
}

impl Plane {
    fn from_coefficients(v: Vector4) -> Self {
        let normal = Vector3::new(v.x, v.y, v.z);
        let len = normal.norm();
        if len > 0.0 {
            Self { normal: normal / len, d: v.w / len }
        } else {
            Self { normal, d: v.w }
        }
    }

    /// 有符号距离（正值在内侧）
    pub fn signed_distance(&self, p: &Vector3) -> f32 {
        self.normal.dot(p) + self.d
    }
}

/// 透视视锥体
#[derive(Debug, Clone, PartialEq)]
pub struct Frustum {
    pub position: Vector3,
    /// 前向量（单位向量）
    pub front: Vector3,
    /// 上向量（单位向量）
    pub up: Vector3,
    /// 垂直视场角（弧度）
    pub vertical_fov: f32,
    /// 水平视场角（弧度）
    pub horizontal_fov: f32,
    pub near_plane_distance: f32,
    pub far_plane_distance: f32,
}

/// 由垂直视场角和宽高比计算水平视场角：`2·atan(r·tan(v/2))`
pub fn horizontal_fov(vertical_fov: f32, aspect_ratio: f32) -> f32 {
    2.0 * (aspect_ratio * (vertical_fov * 0.5).tan()).atan()
}

impl Frustum {
    /// 设置垂直视场角（弧度），并按给定宽高比重新计算水平视场角
    pub fn set_fov(&mut self, vertical_fov: f32, aspect_ratio: f32) {
        self.vertical_fov = vertical_fov;
        self.horizontal_fov = horizontal_fov(vertical_fov, aspect_ratio);
    }

    /// 保持垂直视场角，按新宽高比重新计算水平视场角
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.horizontal_fov = horizontal_fov(self.vertical_fov, aspect_ratio);
    }

    /// 宽高比（由两个视场角推导）
    pub fn aspect_ratio(&self) -> f32 {
        (self.horizontal_fov * 0.5).tan() / (self.vertical_fov * 0.5).tan()
    }

    /// 右向量
    pub fn right(&self) -> Vector3 {
        self.front.cross(&self.up).normalize()
    }

    /// 透视投影矩阵
    pub fn projection_matrix(&self) -> Matrix4 {
        matrix::perspective(
            self.vertical_fov,
            self.aspect_ratio(),
            self.near_plane_distance,
            self.far_plane_distance,
        )
    }

    /// 视图矩阵
    pub fn view_matrix(&self) -> Matrix4 {
        matrix::look_at(&self.position, &(self.position + self.front), &self.up)
    }

    /// 6 个裁剪面：左、右、下、上、近、远
    pub fn planes(&self) -> [Plane; 6] {
        let clip = self.projection_matrix() * self.view_matrix();
        let r0 = clip.row(0).transpose();
        let r1 = clip.row(1).transpose();
        let r2 = clip.row(2).transpose();
        let r3 = clip.row(3).transpose();

        [
            Plane::from_coefficients(r3 + r0),
            Plane::from_coefficients(r3 - r0),
            Plane::from_coefficients(r3 + r1),
            Plane::from_coefficients(r3 - r1),
            Plane::from_coefficients(r3 + r2),
            Plane::from_coefficients(r3 - r2),
        ]
    }

    pub fn contains_point(&self, p: &Vector3) -> bool {
        self.planes().iter().all(|plane| plane.signed_distance(p) >= 0.0)
    }

    /// 包围盒是否与视锥体相交
    ///
    /// 对每个平面取离内侧最远的角点（p-vertex），只要有一个平面把它排除在外，
    /// 整个包围盒就在视锥体之外。空包围盒视为可见。
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        if aabb.is_empty() {
            return true;
        }

        self.planes().iter().all(|plane| {
            let p = Vector3::new(
                if plane.normal.x >= 0.0 { aabb.max.x } else { aabb.min.x },
                if plane.normal.y >= 0.0 { aabb.max.y } else { aabb.min.y },
                if plane.normal.z >= 0.0 { aabb.max.z } else { aabb.min.z },
            );
            plane.signed_distance(&p) >= 0.0
        })
    }
}

impl Default for Frustum {
    /// 位于原点、朝向 -Z、60° 垂直视场角、16:9
    fn default() -> Self {
        let vertical_fov = 60f32.to_radians();
        Self {
            position: Vector3::zeros(),
            front: -Vector3::z(),
            up: Vector3::y(),
            vertical_fov,
            horizontal_fov: horizontal_fov(vertical_fov, 16.0 / 9.0),
            near_plane_distance: 0.1,
            far_plane_distance: 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_aspect_ratio() {
        let frustum = Frustum::default();
        assert!((frustum.aspect_ratio() - 16.0 / 9.0).abs() < 1e-4);
    }

    #[test]
    fn test_point_containment() {
        let frustum = Frustum::default();
        assert!(frustum.contains_point(&Vector3::new(0.0, 0.0, -10.0)));
        assert!(!frustum.contains_point(&Vector3::new(0.0, 0.0, 10.0)));
        assert!(!frustum.contains_point(&Vector3::new(0.0, 0.0, -2000.0)));
    }

    #[test]
    fn test_aabb_culling() {
        let frustum = Frustum::default();

        let in_front = Aabb::new(Vector3::new(-1.0, -1.0, -6.0), Vector3::new(1.0, 1.0, -4.0));
        assert!(frustum.intersects_aabb(&in_front));

        let behind = Aabb::new(Vector3::new(-1.0, -1.0, 4.0), Vector3::new(1.0, 1.0, 6.0));
        assert!(!frustum.intersects_aabb(&behind));

        let far_left = Aabb::new(Vector3::new(-500.0, -1.0, -6.0), Vector3::new(-400.0, 1.0, -4.0));
        assert!(!frustum.intersects_aabb(&far_left));

        // 跨越视锥体边界的包围盒仍然可见
        let straddling = Aabb::new(Vector3::new(-100.0, -1.0, -6.0), Vector3::new(0.0, 1.0, -4.0));
        assert!(frustum.intersects_aabb(&straddling));
    }

    #[test]
    fn test_set_fov_recomputes_horizontal() {
        let mut frustum = Frustum::default();
        let v = 45f32.to_radians();
        frustum.set_fov(v, 2.0);
        assert!((frustum.horizontal_fov - 2.0 * (2.0 * (v * 0.5).tan()).atan()).abs() < 1e-6);

        frustum.set_aspect_ratio(1.0);
        assert!((frustum.horizontal_fov - v).abs() < 1e-6);
        assert!((frustum.aspect_ratio() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_aabb_is_never_culled() {
        assert!(Frustum::default().intersects_aabb(&Aabb::negative_infinity()));
    }
}
