//! # Pan Example
//!
//! Scrolls diagonally across a world and writes every few frames as PNG.
//!
//! Concepts shown:
//!   · `WorldRenderer::attach_world`     — slice and composite the first active area
//!   · `set_scroll_position(x, y)`       — move the view; returns true on recomposition
//!   · `render_frame_at(elapsed)`        — animated tiles plus the static composite
//!
//! Usage:
//!   cargo run --example pan                         — procedural island, in-memory sheets
//!   cargo run --example pan -- MAP ASSETS [OUT]     — JSON map, directory of `tile_*.png` sheets
//!
//! Frames go to `OUT` (default `pan_frames/`). Set `RUST_LOG=info` to see
//! active-area changes.

use std::path::PathBuf;

use image::{Rgba, RgbaImage};
use tessera::renderer::tile_images::TileImageSet;
use tessera::{
    AssetSource, Cell, DirAssets, MapDescription, MemoryAssets, RenderConfig, TerrainGrid,
    TileCatalog, TileDef, World, WorldRenderer,
};

// ── Procedural world ──────────────────────────────────────────────────────────

const WORLD_W: u32 = 120;
const WORLD_H: u32 = 90;

/// Sheet where every fragment and variant is a flat colour, darker per variant.
fn flat_sheet(config: &RenderConfig, color: [u8; 3]) -> RgbaImage {
    let tile = config.tile_size();
    let size = TileImageSet::sheet_size(tile);
    RgbaImage::from_fn(size.x, size.y, |x, y| {
        let shade = if x >= 2 * tile.x { (x / tile.x - 2 + 2 * (y / tile.y)) as u8 * 12 } else { 0 };
        Rgba([
            color[0].saturating_sub(shade),
            color[1].saturating_sub(shade),
            color[2].saturating_sub(shade),
            255,
        ])
    })
}

/// Sand island in animated water with grass and rock patches.
fn island(config: &RenderConfig) -> tessera::Result<(World, MemoryAssets)> {
    let mut catalog = TileCatalog::new();
    let water = catalog.register(TileDef::new("water", 0).animated(4).traversal(false, true, true))?;
    let sand = catalog.register(TileDef::new("sand", 1).variants(4))?;
    let grass = catalog.register(TileDef::new("grass", 2).variants(4))?;
    let rock = catalog.register(TileDef::new("rock", 3).traversal(false, true, false))?;

    let (cx, cy) = (WORLD_W as f32 / 2.0, WORLD_H as f32 / 2.0);
    let mut terrain = TerrainGrid::new(WORLD_W, WORLD_H);
    for y in 0..WORLD_H {
        for x in 0..WORLD_W {
            let (dx, dy) = ((x as f32 - cx) / cx, (y as f32 - cy) / cy);
            let d = (dx * dx + dy * dy).sqrt() + ((x * 7 + y * 13) % 5) as f32 * 0.02;
            let variant = ((x * 31 + y * 17) % 4) as u8;
            let cell = match d {
                d if d > 0.9 => Cell::new(water, variant),
                d if d > 0.75 => Cell::new(sand, variant),
                _ if (x / 6 + y / 5) % 7 == 0 => Cell::new(rock, 0),
                _ => Cell::new(grass, variant),
            };
            terrain.set(x, y, cell);
        }
    }

    let assets = MemoryAssets::new()
        .with("tile_water", flat_sheet(config, [40, 90, 200]))
        .with("tile_sand", flat_sheet(config, [220, 200, 140]))
        .with("tile_grass", flat_sheet(config, [70, 160, 60]))
        .with("tile_rock", flat_sheet(config, [120, 115, 110]));
    Ok((World::new(catalog, terrain), assets))
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn run(
    config: RenderConfig,
    world: World,
    assets: impl AssetSource + 'static,
    out: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(&out)?;
    let tile = config.tile_size();
    let view = config.view_size();
    let max_x = (world.width() * tile.x).saturating_sub(view.x) as i32;
    let max_y = (world.height() * tile.y).saturating_sub(view.y) as i32;
    let frame_period = config.animation_frame();

    let mut renderer = WorldRenderer::new(config, assets)?;
    renderer.attach_world(world)?;

    let steps = 240;
    for step in 0..=steps {
        let x = max_x * step / steps;
        let y = max_y * step / steps;
        if renderer.set_scroll_position(x, y)? {
            println!("step {step:>3}: active area moved, {} recompositions", renderer.recompose_count());
        }
        let elapsed = frame_period * step as u32 / 4;
        if step % 20 == 0 {
            if let Some(frame) = renderer.render_frame_at(elapsed)? {
                let path = out.join(format!("frame_{step:03}.png"));
                frame.save(&path)?;
                println!("wrote {}", path.display());
            }
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = RenderConfig::default();

    match args.as_slice() {
        [map, assets, rest @ ..] => {
            let out = rest.first().map_or_else(|| PathBuf::from("pan_frames"), PathBuf::from);
            let world = MapDescription::from_json_file(map)?.into_world()?;
            println!("{world}");
            run(config, world, DirAssets::scan(assets), out)
        }
        [] => {
            let (world, assets) = island(&config)?;
            run(config, world, assets, PathBuf::from("pan_frames"))
        }
        _ => {
            eprintln!("usage: pan [MAP ASSETS [OUT]]");
            std::process::exit(2);
        }
    }
}
