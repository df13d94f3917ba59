use image::{Rgba, RgbaImage};

use crate::terrain::{Cell, TerrainGrid};
use crate::tiles::TileTypeId;

/// One palette entry: pixels of `color` become `tile` with `variant`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaletteEntry {
    pub color: Rgba<u8>,
    pub tile: TileTypeId,
    pub variant: u8,
}

impl PaletteEntry {
    pub const fn new(color: Rgba<u8>, tile: TileTypeId, variant: u8) -> Self {
        Self { color, tile, variant }
    }
}

/// Build terrain from a bitmap where each pixel is one tile.
///
/// Colours are matched exactly (alpha included) against `palette`, first
/// match wins. Pixels with no palette entry become empty cells.
pub fn terrain_from_bitmap(image: &RgbaImage, palette: &[PaletteEntry]) -> TerrainGrid {
    let mut grid = TerrainGrid::new(image.width(), image.height());
    for (x, y, pixel) in image.enumerate_pixels() {
        if let Some(entry) = palette.iter().find(|e| e.color == *pixel) {
            grid.set(x, y, Cell::new(entry.tile, entry.variant));
        }
    }
    grid
}

// ── Tests ──────────────────────────────────────────────────────────────────────
