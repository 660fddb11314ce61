//! 纹理句柄注册表
//!
//! 为磁盘上存在的纹理文件分配句柄，同一路径只分配一次。
//! 真正的图像解码和上传由图形后端负责，这里只管理路径到句柄的映射。

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{TextureHandle, TextureLoader};

#[derive(Debug)]
pub struct TextureRegistry {
    handles: HashMap<PathBuf, TextureHandle>,
    next: u32,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self {
            handles: HashMap::new(),
            next: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn handle_for(&self, path: &Path) -> Option<TextureHandle> {
        self.handles.get(path).copied()
    }
}

impl Default for TextureRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureLoader for TextureRegistry {
    fn load_texture(&mut self, path: &Path) -> Option<TextureHandle> {
        if let Some(handle) = self.handles.get(path) {
            return Some(*handle);
        }

        if !path.is_file() {
            tracing::warn!(path = %path.display(), "Texture file not found");
            return None;
        }

        let handle = TextureHandle(self.next);
        self.next += 1;
        self.handles.insert(path.to_path_buf(), handle);
        tracing::debug!(path = %path.display(), handle = handle.0, "Texture registered");
        Some(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_none() {
        let mut registry = TextureRegistry::new();
        assert!(registry.load_texture(Path::new("missing/diffuse.png")).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_same_path_same_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diffuse.png");
        std::fs::write(&path, b"png").unwrap();

        let mut registry = TextureRegistry::new();
        let first = registry.load_texture(&path).unwrap();
        let second = registry.load_texture(&path).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, TextureHandle(1));
        assert_eq!(registry.len(), 1);
    }
}
