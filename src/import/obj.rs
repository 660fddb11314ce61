/// OBJ 文件导入器
///
/// 使用 tobj crate 解析 Wavefront OBJ，每个 OBJ 对象成为根节点下的一个子节点，
/// MTL 材质转换为按键查询的 [`SceneMaterial`]。
use super::{
    Face, ImportedScene, MaterialKey, SceneImporter, SceneMaterial, SceneMesh, SceneNode,
    TextureKind,
};
use crate::core::error::{MeshLoadError, Result};
use std::path::Path;

/// OBJ 中 `Ns` 的取值上限，用于归一化到 0..1
const OBJ_MAX_SHININESS: f32 = 1000.0;

/// OBJ 格式导入器
///
/// - 自动三角化
/// - 单一索引（位置/法线/UV 共用一套索引）
/// - UV 坐标翻转（V轴：1.0 - v）
pub struct ObjImporter;

impl SceneImporter for ObjImporter {
    fn import_file(path: &Path) -> Result<ImportedScene> {
        if !path.exists() {
            return Err(MeshLoadError::FileNotFound(path.to_path_buf()).into());
        }

        let load_options = tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        };

        let (models, materials) = tobj::load_obj(path, &load_options)
            .map_err(|e| MeshLoadError::ParseError(format!("tobj failed: {}", e)))?;

        if models.is_empty() {
            return Err(MeshLoadError::ValidationError("OBJ file contains no objects".to_string()).into());
        }

        let mut materials: Vec<SceneMaterial> = match materials {
            Ok(materials) => materials.iter().map(convert_material).collect(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to load MTL, using default material");
                Vec::new()
            }
        };
        if materials.is_empty() {
            materials.push(SceneMaterial::new("Default"));
        }

        let root_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Unnamed");
        let mut root = SceneNode::new(root_name);
        let mut meshes = Vec::with_capacity(models.len());

        for (mesh_idx, model) in models.iter().enumerate() {
            let mesh = convert_mesh(model, materials.len())?;

            let mut node = SceneNode::new(if model.name.is_empty() {
                format!("{}_{}", root_name, mesh_idx)
            } else {
                model.name.clone()
            });
            node.meshes.push(mesh_idx);
            root.children.push(node);
            meshes.push(mesh);
        }

        tracing::info!(
            path = %path.display(),
            meshes = meshes.len(),
            materials = materials.len(),
            "OBJ file imported"
        );

        Ok(ImportedScene {
            root,
            meshes,
            materials,
            animations: Vec::new(),
        })
    }

    fn supported_extensions() -> &'static [&'static str] {
        &["obj"]
    }
}

fn convert_mesh(model: &tobj::Model, material_count: usize) -> Result<SceneMesh> {
    let mesh = &model.mesh;

    if mesh.positions.len() % 3 != 0 {
        return Err(MeshLoadError::ValidationError(format!(
            "Incomplete position data in '{}': {} floats",
            model.name,
            mesh.positions.len()
        ))
        .into());
    }

    let vertices: Vec<[f32; 3]> = mesh
        .positions
        .chunks_exact(3)
        .map(|p| [p[0], p[1], p[2]])
        .collect();

    let normals = (!mesh.normals.is_empty()).then(|| {
        mesh.normals
            .chunks_exact(3)
            .map(|n| [n[0], n[1], n[2]])
            .collect()
    });

    let tex_coords = (!mesh.texcoords.is_empty()).then(|| {
        mesh.texcoords
            .chunks_exact(2)
            .map(|t| [t[0], 1.0 - t[1]])
            .collect()
    });

    let faces = mesh
        .indices
        .chunks(3)
        .map(|f| Face { indices: f.to_vec() })
        .collect();

    let material_index = mesh
        .material_id
        .filter(|id| *id < material_count)
        .unwrap_or(0);

    Ok(SceneMesh {
        name: model.name.clone(),
        vertices,
        normals,
        tex_coords,
        faces,
        bones: Vec::new(),
        material_index,
    })
}

fn convert_material(material: &tobj::Material) -> SceneMaterial {
    let mut out = SceneMaterial::new(material.name.clone());
    let alpha = material.dissolve.unwrap_or(1.0);

    let colors = [
        (MaterialKey::ColorAmbient, material.ambient),
        (MaterialKey::ColorDiffuse, material.diffuse),
        (MaterialKey::ColorSpecular, material.specular),
    ];
    for (key, color) in colors {
        if let Some([r, g, b]) = color {
            out = out.with_color(key, [r, g, b, alpha]);
        }
    }

    if let Some(ns) = material.shininess {
        out = out.with_float(MaterialKey::Shininess, (ns / OBJ_MAX_SHININESS).clamp(0.0, 1.0));
    }

    if let Some(texture) = &material.diffuse_texture {
        out = out.with_texture(TextureKind::Diffuse, texture.clone());
    }
    if let Some(texture) = &material.specular_texture {
        out = out.with_texture(TextureKind::Specular, texture.clone());
    }
    if let Some(texture) = &material.normal_texture {
        out = out.with_texture(TextureKind::Normal, texture.clone());
    }

    out
}
