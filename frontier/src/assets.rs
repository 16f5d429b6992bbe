use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::AssetPaths;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Opaque handle used to reference textures known to the asset manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub(crate) u32);

/// What the core needs to know about a loaded texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureInfo {
    pub width: u32,
    pub height: u32,
}

/// Reads texture files. The renderer owns the pixels; the core only needs to
/// know the file is usable.
pub trait AssetLoader {
    fn load_texture(&mut self, path: &Path) -> Result<TextureInfo, AssetError>;
}

/// Loader that checks image files with the `image` crate.
#[derive(Debug, Default)]
pub struct ImageLoader;

impl AssetLoader for ImageLoader {
    fn load_texture(&mut self, path: &Path) -> Result<TextureInfo, AssetError> {
        if !path.is_file() {
            return Err(AssetError::NotFound(path.to_path_buf()));
        }
        let (width, height) = image::image_dimensions(path).map_err(|source| AssetError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(TextureInfo { width, height })
    }
}

/// Caches loaded textures by path.
pub struct AssetManager {
    textures: HashMap<PathBuf, TextureHandle>,
    next_handle: u32,
}

impl AssetManager {
    /// Create a new asset manager with no cached assets.
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
            next_handle: 0,
        }
    }

    /// Load a texture from a file path, caching it if already loaded.
    pub fn load_texture(
        &mut self,
        loader: &mut dyn AssetLoader,
        path: impl AsRef<Path>,
    ) -> Result<TextureHandle, AssetError> {
        let path = path.as_ref();
        if let Some(handle) = self.textures.get(path) {
            return Ok(*handle);
        }

        let info = loader.load_texture(path)?;
        let handle = TextureHandle(self.next_handle);
        self.next_handle += 1;
        log::debug!(
            "loaded texture {} ({}x{}) as {:?}",
            path.display(),
            info.width,
            info.height,
            handle
        );
        self.textures.insert(path.to_path_buf(), handle);
        Ok(handle)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl Default for AssetManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Textures every view needs, loaded once at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Textures {
    pub menu_background: TextureHandle,
    pub end_background: TextureHandle,
    pub camera_sprite: TextureHandle,
}

impl Textures {
    /// Load all startup textures. Any failure is fatal for the caller.
    pub fn load(
        assets: &mut AssetManager,
        loader: &mut dyn AssetLoader,
        paths: &AssetPaths,
    ) -> Result<Self, AssetError> {
        Ok(Self {
            menu_background: assets.load_texture(loader, paths.resolve(&paths.menu_background))?,
            end_background: assets.load_texture(loader, paths.resolve(&paths.end_background))?,
            camera_sprite: assets.load_texture(loader, paths.resolve(&paths.camera_sprite))?,
        })
    }
}
