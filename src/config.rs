use std::path::Path;
use std::time::Duration;

use glam::UVec2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ── RenderConfig ──────────────────────────────────────────────────────────────

/// Renderer configuration snapshot.
///
/// - **tile** dimensions are the pixel size of one terrain tile; corner and
///   border fragments are exactly half of it on each axis, so both must be even.
/// - **view** dimensions are the fixed size of the frame handed to the game loop.
/// - **padding** is the tile margin kept around the view inside the active area.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Tile width in pixels.
    pub tile_width: u32,
    /// Tile height in pixels.
    pub tile_height: u32,
    /// Output frame width in pixels.
    pub view_width: u32,
    /// Output frame height in pixels.
    pub view_height: u32,
    /// Active-area margin around the view, in tiles.
    pub tile_padding: u32,
    /// How long each frame of an animated tile stays on screen.
    pub animation_frame_ms: u64,
}

impl Default for RenderConfig {
    /// 68 × 56 tiles, an 800 × 480 view and 15 tiles of padding.
    fn default() -> Self {
        Self {
            tile_width:         68,
            tile_height:        56,
            view_width:         800,
            view_height:        480,
            tile_padding:       15,
            animation_frame_ms: 1000,
        }
    }
}

impl RenderConfig {
    /// Parse a config from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read and validate a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
        let config = Self::from_json_str(&text)
            .map_err(|source| Error::Json { path: path.to_path_buf(), source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tile_width == 0 || self.tile_height == 0 {
            return Err(Error::InvalidConfig("tile dimensions must be non-zero".into()));
        }
        if self.tile_width % 2 != 0 || self.tile_height % 2 != 0 {
            return Err(Error::InvalidConfig(format!(
                "tile dimensions must be even to split into corners, got {}x{}",
                self.tile_width, self.tile_height
            )));
        }
        if self.view_width == 0 || self.view_height == 0 {
            return Err(Error::InvalidConfig("view dimensions must be non-zero".into()));
        }
        if self.animation_frame_ms == 0 {
            return Err(Error::InvalidConfig("animation_frame_ms must be non-zero".into()));
        }
        Ok(())
    }

    pub fn tile_size(&self) -> UVec2 {
        UVec2::new(self.tile_width, self.tile_height)
    }

    /// Corner / border fragment size (half a tile on each axis).
    pub fn subtile_size(&self) -> UVec2 {
        self.tile_size() / 2
    }

    pub fn view_size(&self) -> UVec2 {
        UVec2::new(self.view_width, self.view_height)
    }

    /// Number of tiles needed to cover the view, rounded up.
    pub fn view_tiles(&self) -> UVec2 {
        UVec2::new(
            self.view_width.div_ceil(self.tile_width.max(1)),
            self.view_height.div_ceil(self.tile_height.max(1)),
        )
    }

    /// Active-area size in tiles: `view_tiles + 2 · padding` on each axis.
    pub fn active_area_size(&self) -> UVec2 {
        self.view_tiles() + UVec2::splat(2 * self.tile_padding)
    }

    pub fn animation_frame(&self) -> Duration {
        Duration::from_millis(self.animation_frame_ms)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
