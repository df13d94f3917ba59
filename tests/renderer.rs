use std::time::Duration;

use glam::UVec2;
use image::{Rgba, RgbaImage};
use tessera::geometry::TileRect;
use tessera::renderer::tile_images::TileImageSet;
use tessera::{
    Cell, Error, MemoryAssets, RenderConfig, TerrainGrid, TileCatalog, TileDef, World,
    WorldRenderer,
};

const GRASS: Rgba<u8> = Rgba([30, 160, 40, 255]);
const WAVE_A: Rgba<u8> = Rgba([0, 90, 200, 255]);
const WAVE_B: Rgba<u8> = Rgba([0, 200, 240, 255]);

// ── Helpers ───────────────────────────────────────────────────────────────

/// 10×10 tiles, 40×30 view (4×3 tiles), padding 2: an 8×7 active area.
fn config() -> RenderConfig {
    RenderConfig {
        tile_width: 10,
        tile_height: 10,
        view_width: 40,
        view_height: 30,
        tile_padding: 2,
        animation_frame_ms: 500,
    }
}

fn tile() -> UVec2 {
    config().tile_size()
}

/// Water sheet whose first two main variants are flat colours.
fn water_sheet() -> RgbaImage {
    let t = tile();
    let size = TileImageSet::sheet_size(t);
    RgbaImage::from_fn(size.x, size.y, |x, y| {
        if y >= t.y {
            Rgba([0, 0, 0, 0])
        } else if (2 * t.x..3 * t.x).contains(&x) {
            WAVE_A
        } else if x >= 3 * t.x {
            WAVE_B
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

fn assets() -> MemoryAssets {
    let size = TileImageSet::sheet_size(tile());
    MemoryAssets::new()
        .with("tile_grass", RgbaImage::from_pixel(size.x, size.y, GRASS))
        .with("tile_water", water_sheet())
}

/// Grass world with a single animated water tile at (1,1).
fn meadow(width: u32, height: u32) -> World {
    let mut catalog = TileCatalog::new();
    let grass = catalog.register(TileDef::new("grass", 1)).unwrap();
    let water = catalog.register(TileDef::new("water", 9).animated(2)).unwrap();
    let mut terrain = TerrainGrid::filled(width, height, Cell::new(grass, 0));
    terrain.set(1, 1, Cell::new(water, 0));
    World::new(catalog, terrain)
}

fn renderer_with(world: World) -> WorldRenderer {
    let mut renderer = WorldRenderer::new(config(), assets()).unwrap();
    renderer.attach_world(world).unwrap();
    renderer
}

fn assert_inside_world(renderer: &WorldRenderer) {
    let world = renderer.world().unwrap();
    let area = world.active_area();
    assert!(area.right() <= world.width(), "{area:?} overhangs {}", world.width());
    assert!(area.bottom() <= world.height(), "{area:?} overhangs {}", world.height());
}

// ── Active area ───────────────────────────────────────────────────────────

#[test]
fn attaching_places_and_composites_the_active_area() {
    let renderer = renderer_with(meadow(30, 30));
    let world = renderer.world().unwrap();
    assert_eq!(world.active_area(), TileRect::new(0, 0, 8, 7));
    assert_eq!(renderer.recompose_count(), 1);
    assert_eq!(renderer.composite().unwrap().dimensions(), (80, 70));
}

#[test]
fn active_area_never_leaves_the_world() {
    let mut renderer = renderer_with(meadow(30, 25));
    let positions = [
        (0, 0),
        (-500, -500),
        (55, 0),
        (120, 80),
        (299, 249),
        (1_000, 1_000),
        (250, -3),
        (17, 201),
    ];
    for (x, y) in positions {
        renderer.set_scroll_position(x, y).unwrap();
        assert_inside_world(&renderer);
    }
}

#[test]
fn scrolling_to_the_area_edge_recomposites() {
    let mut renderer = renderer_with(meadow(30, 30));
    // View tiles 0..4 stay clear of the area's right edge at 8.
    assert!(!renderer.set_scroll_position(39, 0).unwrap());
    assert_eq!(renderer.recompose_count(), 1);

    // View tile 4 puts the view's far edge on column 8.
    assert!(renderer.set_scroll_position(40, 0).unwrap());
    assert_eq!(renderer.recompose_count(), 2);
    assert_eq!(renderer.world().unwrap().active_area(), TileRect::new(2, 0, 8, 7));
}

#[test]
fn settled_scroll_position_does_not_recomposite() {
    let mut renderer = renderer_with(meadow(30, 30));
    assert!(renderer.set_scroll_position(100, 100).unwrap());
    let area = renderer.world().unwrap().active_area();
    assert_eq!(area, TileRect::new(8, 8, 8, 7));

    // The view now sits `padding` tiles inside the area.
    assert!(!renderer.set_scroll_position(100, 100).unwrap());
    assert!(!renderer.set_scroll_position(105, 104).unwrap());
    assert_eq!(renderer.recompose_count(), 2);
}

#[test]
fn scrolling_back_onto_a_settled_near_edge_recomposites() {
    let mut renderer = renderer_with(meadow(30, 30));
    assert!(renderer.set_scroll_position(100, 100).unwrap());
    assert_eq!(renderer.world().unwrap().active_area(), TileRect::new(8, 8, 8, 7));

    // View tile (8,8) sits on the area's near edge, and there is world before it.
    assert!(renderer.set_scroll_position(80, 80).unwrap());
    assert_eq!(renderer.world().unwrap().active_area(), TileRect::new(6, 6, 8, 7));
    assert_eq!(renderer.recompose_count(), 3);
}

#[test]
fn scrolling_to_a_flush_origin_does_not_recomposite() {
    let mut renderer = renderer_with(meadow(30, 30));
    let area = renderer.world().unwrap().active_area();
    let origin = area.origin() * tile();
    assert!(!renderer.set_scroll_position(origin.x as i32, origin.y as i32).unwrap());
    assert_eq!(renderer.recompose_count(), 1);
}

#[test]
fn small_world_clamps_the_active_area() {
    let mut renderer = renderer_with(meadow(5, 30));
    let area = renderer.world().unwrap().active_area();
    assert_eq!((area.x, area.width), (0, 5));
    assert_eq!(area.height, 7);

    // The narrow axis never triggers; the tall one still does.
    assert!(!renderer.set_scroll_position(40, 0).unwrap());
    assert!(renderer.set_scroll_position(0, 60).unwrap());
    let area = renderer.world().unwrap().active_area();
    assert_eq!((area.x, area.width), (0, 5));
    assert_inside_world(&renderer);
}

#[test]
fn extreme_scroll_positions_still_render() {
    let mut renderer = renderer_with(meadow(30, 25));
    let positions = [
        (i32::MIN, 0),
        (0, i32::MIN),
        (i32::MAX, i32::MIN),
        (i32::MIN, i32::MAX),
        (i32::MAX, i32::MAX),
        (i32::MIN, i32::MIN),
    ];
    for (x, y) in positions {
        renderer.set_scroll_position(x, y).unwrap();
        assert_inside_world(&renderer);
        let frame = renderer.render_frame_at(Duration::ZERO).unwrap().unwrap();
        assert_eq!(frame.dimensions(), (40, 30));
    }
}

// ── Failures ──────────────────────────────────────────────────────────────

/// World whose only tile type is `mud`, for which no sheet exists.
fn mud_world() -> World {
    let mut catalog = TileCatalog::new();
    let mud = catalog.register(TileDef::new("mud", 1)).unwrap();
    World::new(catalog, TerrainGrid::filled(20, 20, Cell::new(mud, 0)))
}

#[test]
fn second_world_loads_its_own_sheets() {
    let mut renderer = renderer_with(meadow(30, 30));
    // `mud` has the same tile id as the first world's `grass`.
    let err = renderer.attach_world(mud_world()).unwrap_err();
    assert!(matches!(err, Error::MissingAsset { ref name } if name == "tile_mud"), "{err:?}");
}

#[test]
fn failed_attach_keeps_the_previous_world() {
    let mut renderer = renderer_with(meadow(30, 30));
    assert!(renderer.attach_world(mud_world()).is_err());

    let world = renderer.world().unwrap();
    assert!(world.catalog().by_name("grass").is_some());
    assert!(world.catalog().by_name("mud").is_none());
    assert_eq!(renderer.recompose_count(), 1);
    let frame = renderer.render_frame_at(Duration::ZERO).unwrap().unwrap();
    assert_eq!(*frame.get_pixel(25, 15), GRASS);
}

#[test]
fn failed_recomposite_is_retried() {
    // Grass everywhere and one rock, without a sheet, outside the first area.
    let mut catalog = TileCatalog::new();
    let grass = catalog.register(TileDef::new("grass", 1)).unwrap();
    let rock = catalog.register(TileDef::new("rock", 3)).unwrap();
    let mut terrain = TerrainGrid::filled(30, 30, Cell::new(grass, 0));
    terrain.set(20, 20, Cell::new(rock, 0));
    let mut renderer = renderer_with(World::new(catalog, terrain));

    let err = renderer.set_scroll_position(200, 200).unwrap_err();
    assert!(matches!(err, Error::MissingAsset { ref name } if name == "tile_rock"));
    assert!(renderer.composite().is_none());

    // Same position again: the area has already moved, but nothing was composited.
    assert!(renderer.set_scroll_position(200, 200).is_err());
    assert!(renderer.render_frame_at(Duration::ZERO).is_err());

    // Away from the rock the composite comes back.
    assert!(renderer.set_scroll_position(0, 0).unwrap());
    assert_eq!(renderer.world().unwrap().active_area(), TileRect::new(0, 0, 8, 7));
    let frame = renderer.render_frame_at(Duration::ZERO).unwrap().unwrap();
    assert_eq!(*frame.get_pixel(5, 5), GRASS);
}

// ── Frames ────────────────────────────────────────────────────────────────

#[test]
fn no_world_no_frame() {
    let mut renderer = WorldRenderer::new(config(), assets()).unwrap();
    assert!(renderer.render_frame().unwrap().is_none());
    assert!(!renderer.set_scroll_position(10, 10).unwrap());

    let mut renderer = renderer_with(meadow(10, 10));
    assert!(renderer.detach_world().is_some());
    assert!(renderer.render_frame_at(Duration::ZERO).unwrap().is_none());
}

#[test]
fn frame_has_the_view_size() {
    let mut renderer = renderer_with(meadow(30, 30));
    let frame = renderer.render_frame().unwrap().unwrap();
    assert_eq!(frame.dimensions(), (40, 30));
}

#[test]
fn animated_tiles_cycle_under_the_static_terrain() {
    let mut renderer = renderer_with(meadow(30, 30));

    let frame = renderer.render_frame_at(Duration::ZERO).unwrap().unwrap();
    assert_eq!(*frame.get_pixel(15, 15), WAVE_A);
    assert_eq!(*frame.get_pixel(25, 15), GRASS);

    let frame = renderer.render_frame_at(Duration::from_millis(500)).unwrap().unwrap();
    assert_eq!(*frame.get_pixel(15, 15), WAVE_B);

    let frame = renderer.render_frame_at(Duration::from_millis(1000)).unwrap().unwrap();
    assert_eq!(*frame.get_pixel(15, 15), WAVE_A);
}

#[test]
fn frame_follows_sub_tile_scrolling() {
    let mut renderer = renderer_with(meadow(30, 30));
    assert!(!renderer.set_scroll_position(5, 3).unwrap());
    let frame = renderer.render_frame_at(Duration::ZERO).unwrap().unwrap();
    // World pixel (15, 15) now shows at (10, 12).
    assert_eq!(*frame.get_pixel(10, 12), WAVE_A);
    assert_eq!(*frame.get_pixel(2, 2), GRASS);
}

#[test]
fn invalid_config_is_rejected() {
    let config = RenderConfig { tile_width: 9, ..config() };
    assert!(WorldRenderer::new(config, MemoryAssets::new()).is_err());
}
