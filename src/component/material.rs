//! Material 组件
//!
//! 固定管线材质参数和一张漫反射纹理。

use std::path::{Path, PathBuf};

use super::{Component, ComponentType};
use crate::editor::Inspector;
use crate::import::{MaterialKey, SceneMaterial, TextureKind};
use crate::math::Color;
use crate::renderer::{MaterialParams, Renderer, TextureHandle, TextureLoader};

/// 导入器给出的 shininess 在 0..1 之间，固定管线使用 0..128
const SHININESS_SCALE: f32 = 128.0;

/// Material 组件
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentMaterial {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub shininess: f32,
    texture: TextureHandle,
    texture_path: Option<PathBuf>,
}

impl ComponentMaterial {
    pub fn new() -> Self {
        Self {
            ambient: Color::WHITE,
            diffuse: Color::WHITE,
            specular: Color::WHITE,
            shininess: 0.0,
            texture: TextureHandle::NONE,
            texture_path: None,
        }
    }

    /// 从导入的材质记录加载
    ///
    /// 缺失的颜色保持白色，缺失的 shininess 保持 0。
    /// 漫反射纹理路径相对于模型所在目录解析；加载失败时以无纹理方式绘制。
    pub fn load(&mut self, material: &SceneMaterial, folder: &Path, textures: &mut dyn TextureLoader) {
        if let Some(c) = material.get_color(MaterialKey::ColorAmbient) {
            self.ambient = Color::from_array(c);
        }
        if let Some(c) = material.get_color(MaterialKey::ColorDiffuse) {
            self.diffuse = Color::from_array(c);
        }
        if let Some(c) = material.get_color(MaterialKey::ColorSpecular) {
            self.specular = Color::from_array(c);
        }

        if let Some(shininess) = material.get_float(MaterialKey::Shininess) {
            self.shininess = shininess * SHININESS_SCALE;
        }

        if let Some(strength) = material.get_float(MaterialKey::ShininessStrength) {
            self.specular = self.specular.scaled_rgb(strength);
        }

        if let Some(file) = material.texture(TextureKind::Diffuse, 0) {
            let path = folder.join(file);
            match textures.load_texture(&path) {
                Some(handle) => {
                    self.texture = handle;
                    self.texture_path = Some(path);
                }
                None => {
                    crate::engine_warn!(
                        material = %material.name,
                        path = %path.display(),
                        "Diffuse texture could not be loaded, drawing untextured"
                    );
                }
            }
        }
    }

    pub fn texture(&self) -> TextureHandle {
        self.texture
    }

    pub fn texture_path(&self) -> Option<&Path> {
        self.texture_path.as_deref()
    }

    pub fn params(&self) -> MaterialParams {
        MaterialParams {
            ambient: self.ambient,
            diffuse: self.diffuse,
            specular: self.specular,
            shininess: self.shininess,
        }
    }
}

impl Default for ComponentMaterial {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for ComponentMaterial {
    fn component_type(&self) -> ComponentType {
        ComponentType::Material
    }

    fn on_draw(&self, renderer: &mut dyn Renderer) -> bool {
        renderer.set_material(&self.params());
        renderer.bind_texture(self.texture);
        true
    }

    fn on_editor(&mut self, inspector: &mut dyn Inspector) -> bool {
        let mut changed = false;

        for (label, color) in [
            ("Ambient", &mut self.ambient),
            ("Diffuse", &mut self.diffuse),
            ("Specular", &mut self.specular),
        ] {
            let mut rgba = color.to_array();
            if inspector.drag_float4(label, &mut rgba, 0.01, 0.0, 1.0) {
                *color = Color::from_array(rgba);
                changed = true;
            }
        }

        changed |= inspector.drag_float("Shininess", &mut self.shininess, 0.5, 0.0, SHININESS_SCALE);

        if let Some(path) = &self.texture_path {
            inspector.text(&path.display().to_string());
        }

        changed
    }
}
