use serde::{Deserialize, Serialize};

use crate::geometry::{TileRect, clamp_index};
use crate::tiles::{TileCatalog, TileTypeId};

/// Index into a world's object lists (the props standing on a tile).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectListId(pub u32);

/// One terrain cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    /// Tile type, `None` for an empty cell.
    pub tile: Option<TileTypeId>,
    /// Main-tile variant (or animation phase offset) in `0..variants`.
    pub variant: u8,
    /// Props occupying this tile, if any.
    pub objects: Option<ObjectListId>,
}

impl Cell {
    pub const fn new(tile: TileTypeId, variant: u8) -> Self {
        Self { tile: Some(tile), variant, objects: None }
    }
}

/// Dense row-major grid of terrain cells.
///
/// Reads take signed coordinates and saturate to the nearest edge cell, so a
/// tile at the border behaves as if it extended infinitely outwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TerrainGrid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl TerrainGrid {
    /// Grid of empty cells.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    /// Grid with every cell set to `cell`.
    pub fn filled(width: u32, height: u32, cell: Cell) -> Self {
        Self {
            width,
            height,
            cells: vec![cell; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Overwrite a cell. Out-of-bounds writes are ignored and return `false`.
    pub fn set(&mut self, x: u32, y: u32, cell: Cell) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let i = self.index(x, y);
        self.cells[i] = cell;
        true
    }

    /// Mutable access to an in-bounds cell.
    pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y);
        self.cells.get_mut(i)
    }

    /// Cell at `(x, y)`, clamped into the grid. An empty grid yields the
    /// default (empty) cell.
    pub fn cell(&self, x: i32, y: i32) -> Cell {
        if self.is_empty() {
            return Cell::default();
        }
        let i = self.index(clamp_index(x, self.width), clamp_index(y, self.height));
        self.cells[i]
    }

    pub fn tile_at(&self, x: i32, y: i32) -> Option<TileTypeId> {
        self.cell(x, y).tile
    }

    pub fn variant_at(&self, x: i32, y: i32) -> u8 {
        self.cell(x, y).variant
    }

    pub fn objects_at(&self, x: i32, y: i32) -> Option<ObjectListId> {
        self.cell(x, y).objects
    }

    /// Priority of the (clamped) cell at `(x, y)`.
    pub fn priority_at(&self, x: i32, y: i32, catalog: &TileCatalog) -> i32 {
        catalog.priority_of(self.tile_at(x, y))
    }

    /// Copy of the sub-rectangle `rect`. Parts of `rect` outside this grid
    /// read the clamped edge cells.
    pub fn slice(&self, rect: TileRect) -> TerrainGrid {
        let mut cells = Vec::with_capacity(rect.width as usize * rect.height as usize);
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                cells.push(self.cell(x as i32, y as i32));
            }
        }
        TerrainGrid { width: rect.width, height: rect.height, cells }
    }

    /// Iterate cells in row-major order as `(x, y, cell)`.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, &Cell)> + '_ {
        let w = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| (i as u32 % w, i as u32 / w, c))
    }
}

impl std::fmt::Display for TerrainGrid {
    /// One line per row, each cell as `id (variant)` or `N (variant)`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let c = self.cells[self.index(x, y)];
                match c.tile {
                    Some(id) => write!(f, "{} ({}) ", id.0, c.variant)?,
                    None => write!(f, "N ({}) ", c.variant)?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
