use glam::{I64Vec2, IVec2, UVec2};

use crate::config::RenderConfig;
use crate::geometry::{TileRect, saturate};

/// Tracks the pixel scroll position and decides where the active area goes.
///
/// The scroll position is the world-space pixel of the view's top-left
/// corner. It is not quantised to tiles and may be negative; the active area
/// is always quantised and always inside the world.
#[derive(Clone, Debug)]
pub struct ViewportController {
    /// World-space pixel position of the view's top-left corner.
    view_top_left: IVec2,
    tile: IVec2,
    view_tiles: UVec2,
    padding: u32,
    active_size: UVec2,
}

impl ViewportController {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            view_top_left: IVec2::ZERO,
            tile: config.tile_size().max(UVec2::ONE).as_ivec2(),
            view_tiles: config.view_tiles(),
            padding: config.tile_padding,
            active_size: config.active_area_size(),
        }
    }

    pub fn view_top_left(&self) -> IVec2 {
        self.view_top_left
    }

    pub fn set_view_top_left(&mut self, position: IVec2) {
        self.view_top_left = position;
    }

    /// World tile under the view's top-left pixel (floored, also for negatives).
    pub fn view_tile_origin(&self) -> IVec2 {
        IVec2::new(
            self.view_top_left.x.div_euclid(self.tile.x),
            self.view_top_left.y.div_euclid(self.tile.y),
        )
    }

    /// Whether the view has reached an edge of `active` that still has world
    /// beyond it.
    ///
    /// The top-left view tile touching (or passing) the near edge, or the
    /// far edge of the view tiles touching the far edge, triggers a shift.
    /// Edges flush with the world boundary never do.
    pub fn needs_shift(&self, active: TileRect, world: UVec2) -> bool {
        let tile = self.view_tile_origin().as_i64vec2();
        let view = self.view_tiles.as_i64vec2();
        let (x, y) = (active.x as i64, active.y as i64);
        let (right, bottom) = (active.right() as i64, active.bottom() as i64);

        (x > 0 && tile.x <= x)
            || (y > 0 && tile.y <= y)
            || (right < world.x as i64 && tile.x + view.x >= right)
            || (bottom < world.y as i64 && tile.y + view.y >= bottom)
    }

    /// Active area centred on the current view with `padding` tiles of slack
    /// before it, clamped into a `world`-sized map.
    ///
    /// On an axis where the world is smaller than the configured active size
    /// the area spans the whole world from 0.
    pub fn active_area_for(&self, world: UVec2) -> TileRect {
        let size = self.active_size.min(world);
        let tile = self.view_tile_origin();
        let place = |tile: i32, world: u32, size: u32| {
            saturate(tile as i64 - self.padding as i64, 0, (world - size) as i64) as u32
        };
        TileRect::new(
            place(tile.x, world.x, size.x),
            place(tile.y, world.y, size.y),
            size.x,
            size.y,
        )
    }

    /// Scroll position relative to the top-left pixel of `active`.
    ///
    /// Computed in `i64`; scroll positions near the `i32` limits overflow
    /// in `i32`.
    pub fn relative_offset(&self, active: TileRect) -> I64Vec2 {
        self.view_top_left.as_i64vec2() - active.origin().as_i64vec2() * self.tile.as_i64vec2()
    }

    /// [`relative_offset`](Self::relative_offset) split into whole tiles and
    /// the pixel remainder inside the tile, the remainder being `0..tile`.
    pub fn relative_tiles(&self, active: TileRect) -> (I64Vec2, I64Vec2) {
        let offset = self.relative_offset(active);
        let tile = self.tile.as_i64vec2();
        let tiles = I64Vec2::new(offset.x.div_euclid(tile.x), offset.y.div_euclid(tile.y));
        (tiles, offset - tiles * tile)
    }

    /// View size in whole tiles (rounded up).
    pub fn view_tiles(&self) -> UVec2 {
        self.view_tiles
    }

    pub fn tile_size(&self) -> UVec2 {
        self.tile.as_uvec2()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> RenderConfig {
        // 10×10 tiles, 40×30 view = 4×3 view tiles, padding 2 → 8×7 active area.
        RenderConfig {
            tile_width: 10,
            tile_height: 10,
            view_width: 40,
            view_height: 30,
            tile_padding: 2,
            ..RenderConfig::default()
        }
    }

    #[test]
    fn tile_origin_floors_negative_positions() {
        let mut v = ViewportController::new(&small_config());
        v.set_view_top_left(IVec2::new(-1, 19));
        assert_eq!(v.view_tile_origin(), IVec2::new(-1, 1));
    }

    #[test]
    fn active_area_leads_view_by_padding() {
        let mut v = ViewportController::new(&small_config());
        v.set_view_top_left(IVec2::new(105, 55));
        let area = v.active_area_for(UVec2::new(100, 100));
        assert_eq!(area, TileRect::new(8, 3, 8, 7));
    }

    #[test]
    fn active_area_clamped_at_far_edge() {
        let mut v = ViewportController::new(&small_config());
        v.set_view_top_left(IVec2::new(10_000, 10_000));
        let area = v.active_area_for(UVec2::new(20, 20));
        assert_eq!(area, TileRect::new(12, 13, 8, 7));
    }

    #[test]
    fn small_world_spans_whole_axis() {
        let mut v = ViewportController::new(&small_config());
        v.set_view_top_left(IVec2::new(50, 50));
        let area = v.active_area_for(UVec2::new(5, 30));
        assert_eq!((area.x, area.width), (0, 5));
        assert_eq!(area.height, 7);
    }

    #[test]
    fn flush_edges_never_trigger() {
        let v = ViewportController::new(&small_config());
        let area = TileRect::new(0, 0, 8, 7);
        assert!(!v.needs_shift(area, UVec2::new(8, 7)));
        assert!(!v.needs_shift(area, UVec2::new(100, 100)));
    }

    #[test]
    fn far_edge_triggers_when_view_reaches_it() {
        let mut v = ViewportController::new(&small_config());
        let area = TileRect::new(0, 0, 8, 7);
        let world = UVec2::new(100, 100);
        // View tiles 3..7 end one short of the area's right edge (8).
        v.set_view_top_left(IVec2::new(39, 0));
        assert!(!v.needs_shift(area, world));
        // View tiles 4..8 touch it.
        v.set_view_top_left(IVec2::new(40, 0));
        assert!(v.needs_shift(area, world));
    }

    #[test]
    fn relative_tiles_split_remainder() {
        let mut v = ViewportController::new(&small_config());
        v.set_view_top_left(IVec2::new(57, 23));
        let (tiles, rem) = v.relative_tiles(TileRect::new(2, 1, 8, 7));
        assert_eq!(tiles, I64Vec2::new(3, 1));
        assert_eq!(rem, I64Vec2::new(7, 3));
    }

    #[test]
    fn relative_offset_survives_extreme_positions() {
        let mut v = ViewportController::new(&small_config());
        v.set_view_top_left(IVec2::new(i32::MIN, i32::MAX));
        let area = TileRect::new(12, 13, 8, 7);
        let offset = v.relative_offset(area);
        assert_eq!(offset, I64Vec2::new(i32::MIN as i64 - 120, i32::MAX as i64 - 130));

        let (tiles, rem) = v.relative_tiles(area);
        assert_eq!(tiles * 10 + rem, offset);
        assert!(rem.x >= 0 && rem.x < 10 && rem.y >= 0 && rem.y < 10);
    }
}
