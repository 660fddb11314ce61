//! 渲染器接口模块
//!
//! 场景图不直接调用图形 API，而是通过 [`Renderer`] trait 发出固定管线风格的命令：
//! 设置材质、绑定纹理、启用/禁用顶点流、绘制索引三角形、压栈/出栈变换以及调试图元。
//! 所有调用都是同步的，并且会修改全局 GPU 状态，因此启用与禁用必须成对出现。
//!
//! # 模块结构
//!
//! - `recorder`: 记录命令的渲染器实现，用于无窗口运行和测试
//! - `textures`: 纹理路径到句柄的注册表

mod recorder;
mod textures;

pub use recorder::{CommandRecorder, DrawCommand};
pub use textures::TextureRegistry;

use std::path::Path;

use crate::math::{Aabb, Color, Frustum, Matrix4, Vector3};

/// GPU 纹理句柄，0 表示无纹理
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureHandle(pub u32);

impl TextureHandle {
    pub const NONE: TextureHandle = TextureHandle(0);

    pub fn is_none(&self) -> bool {
        self.0 == 0
    }
}

/// 顶点属性流
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexStream {
    /// 位置，3 个分量
    Position,
    /// 法线，3 个分量
    Normal,
    /// 纹理坐标，2 个分量
    TexCoord,
}

impl VertexStream {
    /// 每个顶点的浮点分量数
    pub fn components(self) -> usize {
        match self {
            VertexStream::Position | VertexStream::Normal => 3,
            VertexStream::TexCoord => 2,
        }
    }
}

/// 材质参数（固定管线的 ambient/diffuse/specular/shininess）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialParams {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub shininess: f32,
}

/// 固定管线风格的渲染命令接口
pub trait Renderer {
    fn set_material(&mut self, params: &MaterialParams);

    fn bind_texture(&mut self, texture: TextureHandle);

    /// 启用一个顶点流，`data` 是扁平化的分量数组
    fn enable_stream(&mut self, stream: VertexStream, data: &[f32]);

    fn disable_stream(&mut self, stream: VertexStream);

    /// 用当前启用的顶点流绘制三角形列表
    fn draw_indexed_triangles(&mut self, indices: &[u32]);

    fn push_transform(&mut self);

    fn pop_transform(&mut self);

    /// 当前变换右乘 `m`
    fn multiply_transform(&mut self, m: &Matrix4);

    fn draw_bounding_box(&mut self, aabb: &Aabb, color: Color);

    fn draw_axis(&mut self);

    fn draw_line(&mut self, from: &Vector3, to: &Vector3, color: Color);

    fn draw_frustum(&mut self, frustum: &Frustum, color: Color);
}

/// 纹理加载器
///
/// 给定文件路径返回 GPU 纹理句柄；失败时返回 `None`，调用方退化为无纹理绘制。
pub trait TextureLoader {
    fn load_texture(&mut self, path: &Path) -> Option<TextureHandle>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_handle_none() {
        assert!(TextureHandle::NONE.is_none());
        assert!(TextureHandle::default().is_none());
        assert!(!TextureHandle(7).is_none());
    }

    #[test]
    fn test_stream_components() {
        assert_eq!(VertexStream::Position.components(), 3);
        assert_eq!(VertexStream::TexCoord.components(), 2);
    }
}
