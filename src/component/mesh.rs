//! Mesh 组件
//!
//! 持有从导入记录复制来的顶点、法线、纹理坐标和索引缓冲，以及可选的骨骼数据。
//! 顶点保存两份：`vertices` 是当前（可能已蒙皮的）位置，`bind_pose` 是未变形的参考姿态。

use super::{Component, ComponentType, ComponentUpdate};
use crate::core::error::{MeshLoadError, Result};
use crate::editor::Inspector;
use crate::import::{SceneMesh, VertexWeight};
use crate::math::{matrix, Aabb, Matrix4, Vector3};
use crate::renderer::{Renderer, VertexStream};
use crate::scene::GameObjectId;

/// 骨骼
#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    pub name: String,
    /// 名称解析出的场景节点，模型整棵树建好后才会填入
    pub target: Option<GameObjectId>,
    /// 逆绑定矩阵（网格空间到骨骼空间）
    pub inverse_bind: Matrix4,
    pub weights: Vec<VertexWeight>,
}

/// Mesh 组件
#[derive(Debug, Clone, Default)]
pub struct ComponentMesh {
    name: String,
    vertices: Vec<[f32; 3]>,
    bind_pose: Vec<[f32; 3]>,
    normals: Option<Vec<[f32; 3]>>,
    tex_coords: Option<Vec<[f32; 2]>>,
    indices: Vec<u32>,
    bones: Vec<Bone>,
    bbox: Aabb,
}

impl ComponentMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从导入记录加载几何数据
    ///
    /// 任何数量不一致、非三角形面或越界索引都会返回 [`MeshLoadError::ValidationError`]，
    /// 失败时组件保持原状。
    pub fn load(&mut self, mesh: &SceneMesh) -> Result<()> {
        let num_vertices = mesh.num_vertices();
        let invalid = |msg: String| MeshLoadError::ValidationError(format!("'{}': {}", mesh.name, msg));

        if let Some(normals) = &mesh.normals {
            if normals.len() != num_vertices {
                return Err(invalid(format!(
                    "{} normals for {} vertices",
                    normals.len(),
                    num_vertices
                ))
                .into());
            }
        }

        if let Some(tex_coords) = &mesh.tex_coords {
            if tex_coords.len() != num_vertices {
                return Err(invalid(format!(
                    "{} texture coordinates for {} vertices",
                    tex_coords.len(),
                    num_vertices
                ))
                .into());
            }
        }

        let mut indices = Vec::with_capacity(mesh.faces.len() * 3);
        for (face_idx, face) in mesh.faces.iter().enumerate() {
            if face.indices.len() != 3 {
                return Err(invalid(format!(
                    "face {} has {} indices, expected a triangle",
                    face_idx,
                    face.indices.len()
                ))
                .into());
            }
            if let Some(&index) = face.indices.iter().find(|&&i| i as usize >= num_vertices) {
                return Err(invalid(format!(
                    "face {} references vertex {} of {}",
                    face_idx, index, num_vertices
                ))
                .into());
            }
            indices.extend_from_slice(&face.indices);
        }

        let mut bones = Vec::with_capacity(mesh.bones.len());
        for scene_bone in &mesh.bones {
            if let Some(weight) = scene_bone
                .weights
                .iter()
                .find(|w| w.vertex_id as usize >= num_vertices)
            {
                return Err(invalid(format!(
                    "bone '{}' weights vertex {} of {}",
                    scene_bone.name, weight.vertex_id, num_vertices
                ))
                .into());
            }

            let (position, rotation, scale) = matrix::decompose(&scene_bone.offset_matrix);
            bones.push(Bone {
                name: scene_bone.name.clone(),
                target: None,
                inverse_bind: matrix::compose(&position, &rotation, &scale),
                weights: scene_bone.weights.clone(),
            });
        }

        self.name = mesh.name.clone();
        self.vertices = mesh.vertices.clone();
        self.bind_pose = mesh.vertices.clone();
        self.normals = mesh.normals.clone();
        self.tex_coords = mesh.tex_coords.clone();
        self.indices = indices;
        self.bones = bones;
        self.bbox = Aabb::from_points(&self.vertices);

        tracing::debug!(
            mesh = %self.name,
            vertices = num_vertices,
            indices = self.indices.len(),
            bones = self.bones.len(),
            "Mesh loaded"
        );

        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_indices(&self) -> usize {
        self.indices.len()
    }

    pub fn vertices(&self) -> &[[f32; 3]] {
        &self.vertices
    }

    pub fn bind_pose(&self) -> &[[f32; 3]] {
        &self.bind_pose
    }

    pub fn normals(&self) -> Option<&[[f32; 3]]> {
        self.normals.as_deref()
    }

    pub fn tex_coords(&self) -> Option<&[[f32; 2]]> {
        self.tex_coords.as_deref()
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    pub fn has_bones(&self) -> bool {
        !self.bones.is_empty()
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn bones_mut(&mut self) -> &mut [Bone] {
        &mut self.bones
    }

    /// 按骨骼动画矩阵对顶点做蒙皮
    ///
    /// `palette[i]` 是第 i 根骨骼的动画矩阵（网格空间），
    /// 顶点 = Σ weight · (animation · inverse_bind · bind_vertex)。
    /// 未解析骨骼（`None` 或缺项）的权重按绑定姿态计入，
    /// 没有任何有效骨骼影响的顶点因此保持绑定姿态；完成后重新计算包围盒。
    pub fn skin(&mut self, palette: &[Option<Matrix4>]) {
        if self.bones.is_empty() {
            return;
        }

        let mut deformed = vec![Vector3::zeros(); self.bind_pose.len()];
        let mut influenced = vec![false; self.bind_pose.len()];

        for (b, bone) in self.bones.iter().enumerate() {
            let skin_matrix = palette
                .get(b)
                .copied()
                .flatten()
                .map(|animation| animation * bone.inverse_bind);

            for w in &bone.weights {
                let i = w.vertex_id as usize;
                let bind = Vector3::from(self.bind_pose[i]);
                deformed[i] += match &skin_matrix {
                    Some(m) => matrix::transform_point(m, &bind) * w.weight,
                    None => bind * w.weight,
                };
                influenced[i] |= skin_matrix.is_some();
            }
        }

        for (i, vertex) in self.vertices.iter_mut().enumerate() {
            *vertex = if influenced[i] {
                deformed[i].into()
            } else {
                self.bind_pose[i]
            };
        }

        self.bbox = Aabb::from_points(&self.vertices);
    }
}

impl Component for ComponentMesh {
    fn component_type(&self) -> ComponentType {
        ComponentType::Mesh
    }

    fn on_update(&mut self, ctx: &ComponentUpdate<'_>) -> bool {
        if let Some(palette) = ctx.bone_palette {
            self.skin(palette);
        }
        true
    }

    /// 启用的顶点流在绘制后按相反顺序逐一禁用
    fn on_draw(&self, renderer: &mut dyn Renderer) -> bool {
        let mut enabled = Vec::with_capacity(3);

        renderer.enable_stream(VertexStream::Position, bytemuck::cast_slice(self.vertices.as_slice()));
        enabled.push(VertexStream::Position);

        if let Some(normals) = &self.normals {
            renderer.enable_stream(VertexStream::Normal, bytemuck::cast_slice(normals.as_slice()));
            enabled.push(VertexStream::Normal);
        }

        if let Some(tex_coords) = &self.tex_coords {
            renderer.enable_stream(VertexStream::TexCoord, bytemuck::cast_slice(tex_coords.as_slice()));
            enabled.push(VertexStream::TexCoord);
        }

        renderer.draw_indexed_triangles(&self.indices);

        for stream in enabled.into_iter().rev() {
            renderer.disable_stream(stream);
        }

        true
    }

    fn on_editor(&mut self, inspector: &mut dyn Inspector) -> bool {
        inspector.text(&self.name);
        inspector.text(&format!("Vertices: {}", self.num_vertices()));
        inspector.text(&format!("Triangles: {}", self.num_indices() / 3));
        if self.has_bones() {
            inspector.text(&format!("Bones: {}", self.bones.len()));
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::{Face, SceneBone};
    use crate::renderer::{CommandRecorder, DrawCommand};

    fn assert_vertex(actual: [f32; 3], expected: [f32; 3]) {
        let d = Vector3::from(actual) - Vector3::from(expected);
        assert!(d.norm() < 1e-5, "{:?} != {:?}", actual, expected);
    }

    fn quad() -> SceneMesh {
        SceneMesh {
            name: "Quad".into(),
            vertices: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [1.0, 1.0, 0.0],
            ],
            faces: vec![Face::triangle(0, 1, 2), Face::triangle(1, 2, 3)],
            ..Default::default()
        }
    }

    fn unit_cube() -> SceneMesh {
        let mut vertices = Vec::new();
        for x in [0.0, 1.0] {
            for y in [0.0, 1.0] {
                for z in [0.0, 1.0] {
                    vertices.push([x, y, z]);
                }
            }
        }
        SceneMesh {
            name: "Cube".into(),
            vertices,
            ..Default::default()
        }
    }

    #[test]
    fn test_faces_flatten_to_index_buffer() {
        let mut mesh = ComponentMesh::new();
        mesh.load(&quad()).unwrap();

        assert_eq!(mesh.indices(), &[0, 1, 2, 1, 2, 3]);
        assert_eq!(mesh.num_indices(), 6);
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.vertices(), mesh.bind_pose());
    }

    #[test]
    fn test_unit_cube_bounding_box() {
        let mut mesh = ComponentMesh::new();
        mesh.load(&unit_cube()).unwrap();

        let bbox = mesh.bounding_box();
        assert_eq!(bbox.min, Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(bbox.max, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_validation_failures() {
        let mut normals_mismatch = quad();
        normals_mismatch.normals = Some(vec![[0.0, 0.0, 1.0]; 3]);

        let mut quad_face = quad();
        quad_face.faces.push(Face { indices: vec![0, 1, 2, 3] });

        let mut out_of_range = quad();
        out_of_range.faces.push(Face::triangle(0, 1, 4));

        let mut bad_weight = quad();
        bad_weight.bones.push(SceneBone {
            name: "Bone".into(),
            offset_matrix: Matrix4::identity(),
            weights: vec![VertexWeight { vertex_id: 9, weight: 1.0 }],
        });

        for record in [normals_mismatch, quad_face, out_of_range, bad_weight] {
            let mut mesh = ComponentMesh::new();
            let result = mesh.load(&record);
            assert!(matches!(
                result,
                Err(crate::core::HearthError::MeshLoading(MeshLoadError::ValidationError(_)))
            ));
            assert_eq!(mesh.num_vertices(), 0);
        }
    }

    #[test]
    fn test_draw_streams_are_symmetric() {
        let mut record = quad();
        record.normals = Some(vec![[0.0, 0.0, 1.0]; 4]);
        let mut mesh = ComponentMesh::new();
        mesh.load(&record).unwrap();

        let mut recorder = CommandRecorder::new();
        assert!(mesh.on_draw(&mut recorder));

        assert_eq!(
            recorder.commands(),
            &[
                DrawCommand::EnableStream { stream: VertexStream::Position, len: 12 },
                DrawCommand::EnableStream { stream: VertexStream::Normal, len: 12 },
                DrawCommand::DrawIndexed { index_count: 6 },
                DrawCommand::DisableStream(VertexStream::Normal),
                DrawCommand::DisableStream(VertexStream::Position),
            ]
        );
        assert!(recorder.enabled_streams().is_empty());
    }

    #[test]
    fn test_skinning_follows_bone() {
        let mut record = quad();
        // 骨骼位于 (0,1,0)，影响顶点 2 和 3
        record.bones.push(SceneBone {
            name: "Bone".into(),
            offset_matrix: Matrix4::new_translation(&Vector3::new(0.0, -1.0, 0.0)),
            weights: vec![
                VertexWeight { vertex_id: 2, weight: 1.0 },
                VertexWeight { vertex_id: 3, weight: 1.0 },
            ],
        });
        let mut mesh = ComponentMesh::new();
        mesh.load(&record).unwrap();

        // 绑定姿态下动画矩阵等于绑定矩阵的逆，顶点不动
        let bind = Matrix4::new_translation(&Vector3::new(0.0, 1.0, 0.0));
        mesh.skin(&[Some(bind)]);
        for (v, b) in mesh.vertices().iter().zip(mesh.bind_pose()) {
            assert_vertex(*v, *b);
        }

        // 骨骼上移 1，受影响的顶点跟着上移，其余顶点保持绑定姿态
        let moved = Matrix4::new_translation(&Vector3::new(0.0, 2.0, 0.0));
        mesh.skin(&[Some(moved)]);
        assert_eq!(mesh.vertices()[0], [0.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices()[1], [1.0, 0.0, 0.0]);
        assert_vertex(mesh.vertices()[2], [0.0, 2.0, 0.0]);
        assert_vertex(mesh.vertices()[3], [1.0, 2.0, 0.0]);
        assert!((mesh.bounding_box().max.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_unresolved_bone_keeps_bind_pose() {
        let mut record = quad();
        record.bones.push(SceneBone {
            name: "Missing".into(),
            offset_matrix: Matrix4::identity(),
            weights: vec![VertexWeight { vertex_id: 0, weight: 1.0 }],
        });
        let mut mesh = ComponentMesh::new();
        mesh.load(&record).unwrap();

        mesh.skin(&[None]);
        assert_eq!(mesh.vertices(), mesh.bind_pose());
    }

    #[test]
    fn test_unresolved_bone_share_stays_at_bind_pose() {
        let mut record = quad();
        for name in ["Resolved", "Missing"] {
            record.bones.push(SceneBone {
                name: name.into(),
                offset_matrix: Matrix4::identity(),
                weights: vec![VertexWeight { vertex_id: 2, weight: 0.5 }],
            });
        }
        let mut mesh = ComponentMesh::new();
        mesh.load(&record).unwrap();

        // 静止姿态下顶点不被拉向原点
        mesh.skin(&[Some(Matrix4::identity()), None]);
        assert_vertex(mesh.vertices()[2], [0.0, 1.0, 0.0]);

        // 有效骨骼上移 2，顶点只跟随一半权重
        mesh.skin(&[Some(Matrix4::new_translation(&Vector3::new(0.0, 2.0, 0.0))), None]);
        assert_vertex(mesh.vertices()[2], [0.0, 2.0, 0.0]);

        // 调色板短于骨骼列表时缺项同样视为未解析
        mesh.skin(&[Some(Matrix4::identity())]);
        assert_vertex(mesh.vertices()[2], [0.0, 1.0, 0.0]);
    }
}
