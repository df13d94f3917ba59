// =============================================================================
// GEOMETRY.RS — Tile-space rectangles and clamping
//
// The active area, prop footprints and grid slices are all axis-aligned
// rectangles in tile coordinates. Out-of-range lookups saturate rather than
// wrap, so everything here clamps.
// =============================================================================

use glam::{IVec2, UVec2};
use serde::{Deserialize, Serialize};

/// Clamp `value` into `[minimum, maximum]`.
///
/// Unlike `Ord::clamp` this never panics: when `maximum < minimum` the
/// result is `minimum`.
#[inline]
pub fn saturate(value: i64, minimum: i64, maximum: i64) -> i64 {
    value.min(maximum).max(minimum)
}

/// Clamp a signed coordinate into `0..len`. `len` must be non-zero.
#[inline]
pub fn clamp_index(value: i32, len: u32) -> u32 {
    saturate(value as i64, 0, len as i64 - 1) as u32
}

// =============================================================================
// TILE RECT
// =============================================================================

/// Axis-aligned rectangle in tile coordinates, `x`/`y` being the top-left tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl TileRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn origin(&self) -> UVec2 {
        UVec2::new(self.x, self.y)
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    /// One past the right-most column.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// One past the bottom-most row.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x as i32
            && y >= self.y as i32
            && (x as i64) < self.right() as i64
            && (y as i64) < self.bottom() as i64
    }

    /// True when the two rectangles share at least one tile.
    pub fn intersects(&self, other: &SignedRect) -> bool {
        let (ax0, ay0) = (self.x as i64, self.y as i64);
        let (ax1, ay1) = (self.right() as i64, self.bottom() as i64);
        let (bx0, by0) = (other.x as i64, other.y as i64);
        let (bx1, by1) = (bx0 + other.width as i64, by0 + other.height as i64);
        !self.is_empty()
            && other.width > 0
            && other.height > 0
            && ax0 < bx1
            && bx0 < ax1
            && ay0 < by1
            && by0 < ay1
    }

    /// Shrink and shift the rectangle so it lies entirely inside a
    /// `bounds`-sized area anchored at the origin.
    ///
    /// The size is capped at `bounds` first, then the origin is pulled back
    /// so the far edge does not overhang.
    pub fn clamped_to(&self, bounds: UVec2) -> TileRect {
        let width = self.width.min(bounds.x);
        let height = self.height.min(bounds.y);
        TileRect {
            x: self.x.min(bounds.x - width),
            y: self.y.min(bounds.y - height),
            width,
            height,
        }
    }
}

/// Rectangle with a signed origin, for footprints that may hang off the map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SignedRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl SignedRect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn origin(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
