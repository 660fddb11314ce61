//! 命令记录渲染器
//!
//! 不访问 GPU，只把收到的命令按顺序记录下来，同时跟踪变换栈深度和启用的顶点流。

use super::{MaterialParams, Renderer, TextureHandle, VertexStream};
use crate::math::{Aabb, Color, Frustum, Matrix4, Vector3};

/// 一条被记录的渲染命令
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    SetMaterial(MaterialParams),
    BindTexture(TextureHandle),
    EnableStream { stream: VertexStream, len: usize },
    DisableStream(VertexStream),
    DrawIndexed { index_count: usize },
    PushTransform,
    PopTransform,
    MultiplyTransform(Matrix4),
    BoundingBox(Aabb),
    Axis,
    Line { from: Vector3, to: Vector3 },
    Frustum,
}

/// 记录命令的渲染器
#[derive(Debug, Default)]
pub struct CommandRecorder {
    commands: Vec<DrawCommand>,
    stack_depth: usize,
    enabled: Vec<VertexStream>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// 清空记录，通常在每帧开始时调用
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn draw_call_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::DrawIndexed { .. }))
            .count()
    }

    pub fn stack_depth(&self) -> usize {
        self.stack_depth
    }

    /// 当前仍处于启用状态的顶点流
    pub fn enabled_streams(&self) -> &[VertexStream] {
        &self.enabled
    }
}

impl Renderer for CommandRecorder {
    fn set_material(&mut self, params: &MaterialParams) {
        self.commands.push(DrawCommand::SetMaterial(*params));
    }

    fn bind_texture(&mut self, texture: TextureHandle) {
        self.commands.push(DrawCommand::BindTexture(texture));
    }

    fn enable_stream(&mut self, stream: VertexStream, data: &[f32]) {
        if !self.enabled.contains(&stream) {
            self.enabled.push(stream);
        }
        self.commands.push(DrawCommand::EnableStream { stream, len: data.len() });
    }

    fn disable_stream(&mut self, stream: VertexStream) {
        self.enabled.retain(|s| *s != stream);
        self.commands.push(DrawCommand::DisableStream(stream));
    }

    fn draw_indexed_triangles(&mut self, indices: &[u32]) {
        self.commands.push(DrawCommand::DrawIndexed { index_count: indices.len() });
    }

    fn push_transform(&mut self) {
        self.stack_depth += 1;
        self.commands.push(DrawCommand::PushTransform);
    }

    fn pop_transform(&mut self) {
        if self.stack_depth == 0 {
            tracing::error!("Transform stack underflow");
        } else {
            self.stack_depth -= 1;
        }
        self.commands.push(DrawCommand::PopTransform);
    }

    fn multiply_transform(&mut self, m: &Matrix4) {
        self.commands.push(DrawCommand::MultiplyTransform(*m));
    }

    fn draw_bounding_box(&mut self, aabb: &Aabb, _color: Color) {
        self.commands.push(DrawCommand::BoundingBox(*aabb));
    }

    fn draw_axis(&mut self) {
        self.commands.push(DrawCommand::Axis);
    }

    fn draw_line(&mut self, from: &Vector3, to: &Vector3, _color: Color) {
        self.commands.push(DrawCommand::Line { from: *from, to: *to });
    }

    fn draw_frustum(&mut self, _frustum: &Frustum, _color: Color) {
        self.commands.push(DrawCommand::Frustum);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_depth_tracking() {
        let mut recorder = CommandRecorder::new();
        recorder.push_transform();
        recorder.push_transform();
        assert_eq!(recorder.stack_depth(), 2);

        recorder.pop_transform();
        recorder.pop_transform();
        recorder.pop_transform();
        assert_eq!(recorder.stack_depth(), 0);
    }

    #[test]
    fn test_stream_tracking() {
        let mut recorder = CommandRecorder::new();
        recorder.enable_stream(VertexStream::Position, &[0.0; 9]);
        recorder.enable_stream(VertexStream::Normal, &[0.0; 9]);
        recorder.disable_stream(VertexStream::Position);

        assert_eq!(recorder.enabled_streams(), &[VertexStream::Normal]);
        assert_eq!(
            recorder.commands()[0],
            DrawCommand::EnableStream { stream: VertexStream::Position, len: 9 }
        );
    }
}
