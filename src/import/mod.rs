/// 场景导入记录模块
///
/// 外部导入器（FBX/OBJ/...）把文件解析成这里定义的只读记录，
/// 场景图只消费这些记录，不关心底层文件格式。
///
/// # 架构设计
///
/// ```text
/// 文件 (OBJ/...)
///     ↓
/// SceneImporter (ObjImporter)
///     ↓
/// ImportedScene（节点层级 + 网格 + 材质 + 动画）
///     ↓
/// Scene::load_model（GameObject 树 + 组件）
/// ```

use std::collections::HashMap;
use std::path::Path;

use crate::animation::AnimationClip;
use crate::core::error::{HearthError, MeshLoadError, Result};
use crate::math::{Matrix4, Quaternion, Vector3};

pub mod obj;

pub use obj::ObjImporter;

/// 一个三角形面（导入器应已三角化，但仍允许携带任意数量的索引以便校验）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    pub indices: Vec<u32>,
}

impl Face {
    pub fn triangle(a: u32, b: u32, c: u32) -> Self {
        Self { indices: vec![a, b, c] }
    }
}

/// 骨骼对单个顶点的影响
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexWeight {
    pub vertex_id: u32,
    pub weight: f32,
}

/// 导入的骨骼记录
#[derive(Debug, Clone)]
pub struct SceneBone {
    /// 对应场景节点的名称
    pub name: String,
    /// 网格空间到骨骼空间的偏移矩阵（逆绑定矩阵）
    pub offset_matrix: Matrix4,
    pub weights: Vec<VertexWeight>,
}

/// 导入的网格记录
#[derive(Debug, Clone, Default)]
pub struct SceneMesh {
    pub name: String,
    pub vertices: Vec<[f32; 3]>,
    pub normals: Option<Vec<[f32; 3]>>,
    /// 第 0 套纹理坐标
    pub tex_coords: Option<Vec<[f32; 2]>>,
    pub faces: Vec<Face>,
    pub bones: Vec<SceneBone>,
    /// 在场景材质表中的索引
    pub material_index: usize,
}

impl SceneMesh {
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    pub fn has_tex_coords(&self) -> bool {
        self.tex_coords.is_some()
    }

    pub fn has_bones(&self) -> bool {
        !self.bones.is_empty()
    }
}

/// 材质属性键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKey {
    ColorAmbient,
    ColorDiffuse,
    ColorSpecular,
    Shininess,
    ShininessStrength,
}

/// 材质属性值
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialValue {
    Color([f32; 4]),
    Float(f32),
}

/// 纹理类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    Diffuse,
    Specular,
    Normal,
}

/// 导入的材质记录，属性按键查询
#[derive(Debug, Clone, Default)]
pub struct SceneMaterial {
    pub name: String,
    properties: HashMap<MaterialKey, MaterialValue>,
    textures: HashMap<TextureKind, Vec<String>>,
}

impl SceneMaterial {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_color(mut self, key: MaterialKey, rgba: [f32; 4]) -> Self {
        self.properties.insert(key, MaterialValue::Color(rgba));
        self
    }

    pub fn with_float(mut self, key: MaterialKey, value: f32) -> Self {
        self.properties.insert(key, MaterialValue::Float(value));
        self
    }

    pub fn with_texture(mut self, kind: TextureKind, path: impl Into<String>) -> Self {
        self.textures.entry(kind).or_default().push(path.into());
        self
    }

    /// 颜色属性；类型不匹配时视为缺失
    pub fn get_color(&self, key: MaterialKey) -> Option<[f32; 4]> {
        match self.properties.get(&key) {
            Some(MaterialValue::Color(c)) => Some(*c),
            _ => None,
        }
    }

    /// 浮点属性；类型不匹配时视为缺失
    pub fn get_float(&self, key: MaterialKey) -> Option<f32> {
        match self.properties.get(&key) {
            Some(MaterialValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn texture_count(&self, kind: TextureKind) -> usize {
        self.textures.get(&kind).map_or(0, Vec::len)
    }

    pub fn texture(&self, kind: TextureKind, index: usize) -> Option<&str> {
        self.textures.get(&kind)?.get(index).map(String::as_str)
    }
}

/// 导入的场景节点
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub position: Vector3,
    pub rotation: Quaternion,
    pub scale: Vector3,
    /// 引用 `ImportedScene::meshes` 的索引
    pub meshes: Vec<usize>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Vector3::zeros(),
            rotation: Quaternion::identity(),
            scale: Vector3::repeat(1.0),
            meshes: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// 导入器输出
#[derive(Debug, Clone)]
pub struct ImportedScene {
    pub root: SceneNode,
    pub meshes: Vec<SceneMesh>,
    pub materials: Vec<SceneMaterial>,
    /// 文件里自带的动画片段
    pub animations: Vec<AnimationClip>,
}

/// 场景导入器 trait
///
/// 加载器应该是无状态的，返回 CPU 侧的记录，不涉及 GPU 资源。
pub trait SceneImporter {
    fn import_file(path: &Path) -> Result<ImportedScene>;

    /// 支持的扩展名（小写，不含点号）
    fn supported_extensions() -> &'static [&'static str];
}

/// 根据文件扩展名选择合适的导入器
pub fn import_scene(path: &Path) -> Result<ImportedScene> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| {
            HearthError::MeshLoading(MeshLoadError::UnsupportedFormat(format!(
                "Cannot determine file extension of {}",
                path.display()
            )))
        })?;

    if ObjImporter::supported_extensions().contains(&extension.as_str()) {
        ObjImporter::import_file(path)
    } else {
        Err(MeshLoadError::UnsupportedFormat(format!(".{}", extension)).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_queries() {
        let material = SceneMaterial::new("Skin")
            .with_color(MaterialKey::ColorDiffuse, [0.5, 0.25, 1.0, 1.0])
            .with_float(MaterialKey::Shininess, 0.5)
            .with_texture(TextureKind::Diffuse, "skin.png");

        assert_eq!(material.get_color(MaterialKey::ColorDiffuse), Some([0.5, 0.25, 1.0, 1.0]));
        assert_eq!(material.get_float(MaterialKey::Shininess), Some(0.5));
        assert_eq!(material.get_float(MaterialKey::ColorDiffuse), None);
        assert_eq!(material.get_color(MaterialKey::ColorAmbient), None);
        assert_eq!(material.texture_count(TextureKind::Diffuse), 1);
        assert_eq!(material.texture(TextureKind::Diffuse, 0), Some("skin.png"));
        assert_eq!(material.texture(TextureKind::Normal, 0), None);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = import_scene(Path::new("model.fbx"));
        assert!(matches!(
            result,
            Err(HearthError::MeshLoading(MeshLoadError::UnsupportedFormat(_)))
        ));
    }
}
