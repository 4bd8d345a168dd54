//! Texture loading for control skins and sector icons.
//!
//! Widgets ask a `TextureLoader` for an image at a target pixel size and get
//! back a shared RGBA bitmap, or `None` when the file is missing or can't be
//! decoded. A missing texture never breaks rendering: callers fall back to
//! flat shape fills.

use image::{GenericImageView, RgbaImage};
use image::imageops::FilterType;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Decoded RGBA8 bitmap.
pub type Texture = RgbaImage;

/// Source of decoded textures.
pub trait TextureLoader {
    /// Load `path` scaled to `width × height` pixels. A zero dimension keeps
    /// the image's native size.
    fn load_texture(&self, path: &str, width: u32, height: u32) -> Option<Arc<Texture>>;
}

// ─── File-backed loader ──────────────────────────────────────────────────

type CacheKey = (String, u32, u32);

/// Loads PNG files relative to a control pack's assets directory.
///
/// Results are cached per (path, size), misses included, so a broken path is
/// only reported once.
pub struct ImageTextureLoader {
    assets_dir: PathBuf,
    filter: FilterType,
    cache: RefCell<HashMap<CacheKey, Option<Arc<Texture>>>>,
}

impl ImageTextureLoader {
    pub fn new(assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            assets_dir: assets_dir.into(),
            filter: FilterType::Triangle,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    pub fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }

    /// Point at a different pack. Drops everything cached for the old one.
    pub fn set_assets_dir(&mut self, assets_dir: impl Into<PathBuf>) {
        self.assets_dir = assets_dir.into();
        self.cache.get_mut().clear();
    }

    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
    }

    fn decode(&self, path: &str, width: u32, height: u32) -> Result<Texture, String> {
        let full = self.assets_dir.join(path);
        let img = image::open(&full).map_err(|e| format!("{}: {e}", full.display()))?;
        if width == 0 || height == 0 || img.dimensions() == (width, height) {
            return Ok(img.to_rgba8());
        }
        Ok(img.resize_exact(width, height, self.filter).to_rgba8())
    }
}

impl TextureLoader for ImageTextureLoader {
    fn load_texture(&self, path: &str, width: u32, height: u32) -> Option<Arc<Texture>> {
        if path.is_empty() {
            return None;
        }
        let key = (path.to_string(), width, height);
        if let Some(hit) = self.cache.borrow().get(&key) {
            return hit.clone();
        }
        let loaded = match self.decode(path, width, height) {
            Ok(tex) => Some(Arc::new(tex)),
            Err(e) => {
                log::warn!("texture load failed: {e}");
                None
            }
        };
        self.cache.borrow_mut().insert(key, loaded.clone());
        loaded
    }
}

// ─── In-memory loader ────────────────────────────────────────────────────

/// Textures registered by path, for hosts that decode assets themselves.
/// Resampled copies are kept per (path, size) until the path is replaced.
#[derive(Default)]
pub struct MemoryTextures {
    textures: HashMap<String, Arc<Texture>>,
    scaled: RefCell<HashMap<CacheKey, Arc<Texture>>>,
}

impl MemoryTextures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: &str, texture: Texture) {
        self.scaled.get_mut().retain(|(p, _, _), _| p != path);
        self.textures.insert(path.to_string(), Arc::new(texture));
    }
}

impl TextureLoader for MemoryTextures {
    fn load_texture(&self, path: &str, width: u32, height: u32) -> Option<Arc<Texture>> {
        let tex = self.textures.get(path)?;
        if width == 0 || height == 0 || tex.dimensions() == (width, height) {
            return Some(Arc::clone(tex));
        }
        let key = (path.to_string(), width, height);
        if let Some(hit) = self.scaled.borrow().get(&key) {
            return Some(Arc::clone(hit));
        }
        let resized = Arc::new(image::imageops::resize(
            &**tex,
            width,
            height,
            FilterType::Nearest,
        ));
        self.scaled.borrow_mut().insert(key, Arc::clone(&resized));
        Some(resized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use pretty_assertions::assert_eq;

    #[test]
    fn memory_textures_resample_on_request() {
        let mut textures = MemoryTextures::new();
        textures.insert("skin.png", RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255])));

        let native = textures.load_texture("skin.png", 0, 0).unwrap();
        assert_eq!(native.dimensions(), (4, 4));
        let scaled = textures.load_texture("skin.png", 8, 2).unwrap();
        assert_eq!(scaled.dimensions(), (8, 2));
        assert_eq!(scaled.get_pixel(7, 1).0, [255, 0, 0, 255]);
        assert!(textures.load_texture("other.png", 4, 4).is_none());
    }

    #[test]
    fn memory_textures_reuse_resampled_copies() {
        let mut textures = MemoryTextures::new();
        textures.insert("skin.png", RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255])));

        let first = textures.load_texture("skin.png", 8, 8).unwrap();
        let again = textures.load_texture("skin.png", 8, 8).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(textures.scaled.borrow().len(), 1);

        // Replacing the source drops stale copies.
        textures.insert("skin.png", RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255])));
        assert!(textures.scaled.borrow().is_empty());
        let fresh = textures.load_texture("skin.png", 8, 8).unwrap();
        assert_eq!(fresh.get_pixel(0, 0).0, [0, 0, 255, 255]);
    }

    #[test]
    fn missing_file_is_cached_as_miss() {
        let loader = ImageTextureLoader::new("/nonexistent-pack/assets");
        assert!(loader.load_texture("button.png", 16, 16).is_none());
        assert_eq!(loader.cache.borrow().len(), 1);
        assert!(loader.load_texture("button.png", 16, 16).is_none());
        assert_eq!(loader.cache.borrow().len(), 1);
        assert!(loader.load_texture("", 16, 16).is_none());
    }
}
