use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::geometry::SignedRect;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PropTypeId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PropInstanceId(pub u32);

// ── PropType ──────────────────────────────────────────────────────────────────

/// Template for placed objects (trees, rocks, furniture).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropType {
    /// Used to build the prop's image name.
    pub name: String,
    /// Shadow image id, if the prop casts one.
    #[serde(default)]
    pub shadow: Option<u32>,
    /// Footprint width in tiles.
    pub width: u32,
    /// Footprint height in tiles.
    pub height: u32,
    #[serde(default)]
    pub walkable: bool,
    #[serde(default = "yes")]
    pub flyable: bool,
    #[serde(default)]
    pub swimmable: bool,
    #[serde(default = "one")]
    pub frames: u32,
    #[serde(default = "unit_speed")]
    pub animation_speed: f32,
    /// Drawn above actors when true, below otherwise.
    #[serde(default = "yes")]
    pub foreground: bool,
    /// Row-major `width × height` occupancy, row 0 is the top row. An empty
    /// mask means the whole footprint is occupied.
    #[serde(default)]
    pub mask: Vec<bool>,
}

fn yes() -> bool {
    true
}

fn one() -> u32 {
    1
}

fn unit_speed() -> f32 {
    1.0
}

impl PropType {
    /// Solid, fully occupied prop of the given footprint.
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            shadow: None,
            width,
            height,
            walkable: false,
            flyable: true,
            swimmable: false,
            frames: 1,
            animation_speed: 1.0,
            foreground: true,
            mask: Vec::new(),
        }
    }

    pub fn with_mask(mut self, mask: Vec<bool>) -> Self {
        self.mask = mask;
        self
    }

    /// Whether footprint tile `(col, row)` is occupied (row 0 = top).
    pub fn occupies(&self, col: u32, row: u32) -> bool {
        if col >= self.width || row >= self.height {
            return false;
        }
        if self.mask.is_empty() {
            return true;
        }
        self.mask
            .get((row * self.width + col) as usize)
            .copied()
            .unwrap_or(false)
    }
}

// ── PropInstance ──────────────────────────────────────────────────────────────

/// A prop placed in the world, anchored at its lower-left tile.
#[derive(Clone, Debug, PartialEq)]
pub struct PropInstance {
    pub id: PropInstanceId,
    pub prop_type: PropTypeId,
    /// Lower-left anchor tile.
    pub position: IVec2,
}

impl PropInstance {
    /// Tiles covered by the prop's bounding rectangle. The anchor is the
    /// bottom row, so the rectangle extends `height - 1` rows upwards.
    pub fn footprint(&self, ty: &PropType) -> SignedRect {
        let top = self.position.y - ty.height as i32 + 1;
        SignedRect::new(self.position.x, top, ty.width, ty.height)
    }

    /// World tiles actually occupied according to the mask.
    pub fn occupied_tiles<'a>(&self, ty: &'a PropType) -> impl Iterator<Item = IVec2> + 'a {
        let rect = self.footprint(ty);
        (0..ty.height).flat_map(move |row| {
            (0..ty.width)
                .filter(move |&col| ty.occupies(col, row))
                .map(move |col| IVec2::new(rect.x + col as i32, rect.y + row as i32))
        })
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
