use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use image::RgbaImage;
use log::{debug, warn};

use crate::error::{Error, Result};

// ── AssetSource ───────────────────────────────────────────────────────────────

/// Produces decoded RGBA images by asset name (file stem, no extension).
pub trait AssetSource {
    fn load_image(&self, name: &str) -> Result<RgbaImage>;
}

/// Copy the `w × h` region at `(x, y)` out of `image`.
///
/// The region is clipped to the image bounds.
pub fn slice(image: &RgbaImage, x: u32, y: u32, w: u32, h: u32) -> RgbaImage {
    image::imageops::crop_imm(image, x, y, w, h).to_image()
}

// ── DirAssets ─────────────────────────────────────────────────────────────────

/// PNG files found under a directory, indexed by file stem.
///
/// Only the index is built up front; images are decoded when requested.
#[derive(Debug, Clone, Default)]
pub struct DirAssets {
    files: HashMap<String, PathBuf>,
}

impl DirAssets {
    /// Scan `root` recursively for `.png` files.
    ///
    /// Duplicate stems are resolved in favour of the first file seen; later
    /// ones are skipped with a warning.
    pub fn scan(root: impl AsRef<Path>) -> Self {
        let mut files = HashMap::new();
        let mut seen: HashSet<String> = HashSet::new();

        for entry in walkdir::WalkDir::new(root.as_ref())
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("png") {
                continue;
            }
            let name = match path.file_stem().and_then(|s| s.to_str()) {
                Some(n) if !n.is_empty() => n.to_string(),
                _ => continue,
            };
            if !seen.insert(name.clone()) {
                warn!("assets: duplicate name '{name}' from {path:?}; skipping");
                continue;
            }
            files.insert(name, path.to_path_buf());
        }

        debug!("assets: indexed {} png files under {:?}", files.len(), root.as_ref());
        Self { files }
    }

    pub fn path_of(&self, name: &str) -> Option<&Path> {
        self.files.get(name).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl AssetSource for DirAssets {
    fn load_image(&self, name: &str) -> Result<RgbaImage> {
        let path = self
            .files
            .get(name)
            .ok_or_else(|| Error::MissingAsset { name: name.to_string() })?;
        let img = image::open(path)
            .map_err(|source| Error::ImageDecode { name: name.to_string(), source })?;
        Ok(img.to_rgba8())
    }
}

// ── MemoryAssets ──────────────────────────────────────────────────────────────

/// Images held in memory, for tests and procedurally generated sheets.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    images: HashMap<String, RgbaImage>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, image: RgbaImage) {
        self.images.insert(name.into(), image);
    }

    pub fn with(mut self, name: impl Into<String>, image: RgbaImage) -> Self {
        self.insert(name, image);
        self
    }
}

impl AssetSource for MemoryAssets {
    fn load_image(&self, name: &str) -> Result<RgbaImage> {
        self.images
            .get(name)
            .cloned()
            .ok_or_else(|| Error::MissingAsset { name: name.to_string() })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
