use std::collections::HashMap;
use std::collections::hash_map::Entry;

use glam::UVec2;
use image::RgbaImage;
use log::debug;

use super::assets::{AssetSource, slice};
use crate::error::{Error, Result};
use crate::tiles::{MAX_VARIANTS, TileType};

// ── Sprite addressing ─────────────────────────────────────────────────────────

/// Quadrant of a tile cell that a corner sub-image covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quadrant {
    UpperLeft = 0,
    UpperRight = 1,
    LowerLeft = 2,
    LowerRight = 3,
}

/// Which neighbours of the covered quadrant are also overlapped.
///
/// Named after the two-bit `XY` suffix of the sheet slots: `00` is the
/// rounded outer corner, `01` a horizontal border run, `10` a vertical
/// border run and `11` the inner corner where a border meets a tile that
/// is not overlapped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CornerPattern {
    Convex = 0,
    Horizontal = 1,
    Vertical = 2,
    Concave = 3,
}

/// One sub-image of a tile sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sprite {
    /// Full-size main tile; the index selects a variant or animation frame.
    Main(u8),
    /// Half-size fragment drawn over a lower-priority neighbour.
    Corner(Quadrant, CornerPattern),
}

/// Sheet slot of each corner sub-image, in subtile units, indexed
/// `[quadrant][pattern]`.
const CORNER_SLOTS: [[(u32, u32); 4]; 4] = [
    [(3, 3), (1, 3), (3, 1), (1, 1)], // upper left
    [(0, 3), (2, 3), (0, 1), (2, 1)], // upper right
    [(3, 0), (1, 0), (3, 2), (1, 2)], // lower left
    [(0, 0), (2, 0), (0, 2), (2, 2)], // lower right
];

/// Sheet slot of each main variant, in tile units.
const MAIN_SLOTS: [(u32, u32); MAX_VARIANTS as usize] = [(2, 0), (3, 0), (2, 1), (3, 1)];

// ── TileImageSet ──────────────────────────────────────────────────────────────

/// All sub-images of one tile type, cut from a `4·tw × 2·th` sheet.
///
/// The left half of the sheet is a 4×4 grid of half-size corner images, the
/// right half holds the four main variants in a 2×2 grid.
#[derive(Clone, Debug)]
pub struct TileImageSet {
    main: [RgbaImage; MAX_VARIANTS as usize],
    corners: [[RgbaImage; 4]; 4],
}

impl TileImageSet {
    /// Required sheet size for a given tile size.
    pub fn sheet_size(tile: UVec2) -> UVec2 {
        UVec2::new(tile.x * 4, tile.y * 2)
    }

    /// Slice a tile sheet. `name` is only used for error reporting.
    pub fn from_sheet(name: &str, sheet: &RgbaImage, tile: UVec2) -> Result<Self> {
        let need = Self::sheet_size(tile);
        if sheet.width() < need.x || sheet.height() < need.y {
            return Err(Error::MalformedSheet {
                name: name.to_string(),
                expected: (need.x, need.y),
                actual: sheet.dimensions(),
            });
        }

        let sub = tile / 2;
        let main = MAIN_SLOTS.map(|(col, row)| slice(sheet, col * tile.x, row * tile.y, tile.x, tile.y));
        let corners = CORNER_SLOTS.map(|slots| {
            slots.map(|(col, row)| slice(sheet, col * sub.x, row * sub.y, sub.x, sub.y))
        });
        Ok(Self { main, corners })
    }

    /// Main tile for `variant`; indices past the last variant wrap around.
    pub fn main(&self, variant: u8) -> &RgbaImage {
        &self.main[variant as usize % self.main.len()]
    }

    pub fn corner(&self, quadrant: Quadrant, pattern: CornerPattern) -> &RgbaImage {
        &self.corners[quadrant as usize][pattern as usize]
    }

    pub fn sprite(&self, sprite: Sprite) -> &RgbaImage {
        match sprite {
            Sprite::Main(variant) => self.main(variant),
            Sprite::Corner(q, p) => self.corner(q, p),
        }
    }
}

// ── TileImageCache ────────────────────────────────────────────────────────────

/// Lazily loaded, never evicted tile image sets keyed by asset name.
///
/// Tile type ids are only unique within one catalog, so the sheet name is the
/// key; worlds attached one after another share sheets only by name.
pub struct TileImageCache {
    assets: Box<dyn AssetSource>,
    tile_size: UVec2,
    sets: HashMap<String, TileImageSet>,
}

impl TileImageCache {
    pub fn new(assets: Box<dyn AssetSource>, tile_size: UVec2) -> Self {
        Self { assets, tile_size, sets: HashMap::new() }
    }

    pub fn tile_size(&self) -> UVec2 {
        self.tile_size
    }

    /// Image set for `tile`, loading and slicing its sheet on first request.
    ///
    /// A missing or undersized sheet is an error for that tile type; nothing
    /// is cached, so a later call retries the load.
    pub fn get(&mut self, tile: &TileType) -> Result<&TileImageSet> {
        match self.sets.entry(tile.asset_name()) {
            Entry::Occupied(entry) => Ok(&*entry.into_mut()),
            Entry::Vacant(entry) => {
                let sheet = self.assets.load_image(entry.key())?;
                let set = TileImageSet::from_sheet(entry.key(), &sheet, self.tile_size)?;
                debug!("tile images: loaded '{}' for tile id {}", entry.key(), tile.id().0);
                Ok(&*entry.insert(set))
            }
        }
    }

    /// Already-loaded image set for `tile`, without touching the asset source.
    pub fn cached(&self, tile: &TileType) -> Option<&TileImageSet> {
        self.sets.get(&tile.asset_name())
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

impl std::fmt::Debug for TileImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileImageCache")
            .field("tile_size", &self.tile_size)
            .field("loaded", &self.sets.len())
            .finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
