//! 轴对齐包围盒

use super::{matrix, Matrix4, Vector3};

/// 轴对齐包围盒（AABB）
///
/// 空包围盒使用"负无穷"表示：`min = +∞`，`max = -∞`，
/// 这样对任意点调用 [`Aabb::enclose_point`] 都会正确地扩展它。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector3,
    pub max: Vector3,
}

impl Aabb {
    pub fn new(min: Vector3, max: Vector3) -> Self {
        Self { min, max }
    }

    /// 空包围盒
    pub fn negative_infinity() -> Self {
        Self {
            min: Vector3::repeat(f32::INFINITY),
            max: Vector3::repeat(f32::NEG_INFINITY),
        }
    }

    /// 包含所有点的最小包围盒
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a [f32; 3]>,
    {
        let mut aabb = Self::negative_infinity();
        aabb.enclose(points);
        aabb
    }

    pub fn set_negative_infinity(&mut self) {
        *self = Self::negative_infinity();
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn enclose_point(&mut self, p: &Vector3) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    pub fn enclose<'a, I>(&mut self, points: I)
    where
        I: IntoIterator<Item = &'a [f32; 3]>,
    {
        for p in points {
            self.enclose_point(&Vector3::from(*p));
        }
    }

    pub fn center(&self) -> Vector3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }

    /// 8 个角点
    pub fn corners(&self) -> [Vector3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vector3::new(a.x, a.y, a.z),
            Vector3::new(b.x, a.y, a.z),
            Vector3::new(a.x, b.y, a.z),
            Vector3::new(b.x, b.y, a.z),
            Vector3::new(a.x, a.y, b.z),
            Vector3::new(b.x, a.y, b.z),
            Vector3::new(a.x, b.y, b.z),
            Vector3::new(b.x, b.y, b.z),
        ]
    }

    /// 变换到另一个空间后重新求包围盒
    pub fn transformed(&self, m: &Matrix4) -> Self {
        if self.is_empty() {
            return *self;
        }

        let mut out = Self::negative_infinity();
        for corner in self.corners() {
            out.enclose_point(&matrix::transform_point(m, &corner));
        }
        out
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::negative_infinity()
    }
}
