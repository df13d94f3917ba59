// ── Terrain compositor ────────────────────────────────────────────────────────
//
// Flattens every static tile of a grid into one image. Tiles are drawn in
// ascending priority layers (painter's algorithm). After its main image, a
// tile spills half-size fragments into lower-priority neighbours: a rounded
// corner into a diagonal neighbour when it outranks all three cells around
// that corner, and two border halves into an edge neighbour it outranks.
// Each border half picks the run or the inner-corner image depending on
// whether the diagonal neighbour next to it is outranked as well. Ties never
// spill.
//
// A fragment always uses the sub-image of the quadrant it covers inside the
// neighbour cell, so the rules are the same in all four directions.

use std::collections::{BTreeSet, HashSet};
use std::time::Instant;

use glam::{IVec2, UVec2};
use image::RgbaImage;
use log::debug;

use super::tile_images::{CornerPattern, Quadrant, Sprite, TileImageCache};
use crate::error::Result;
use crate::terrain::TerrainGrid;
use crate::tiles::{TileCatalog, TileTypeId};

/// Edge of a tile cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Up,
    Left,
    Right,
    Down,
}

/// What a planned blit represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    Main,
    /// Rounded corner spilled into the diagonal neighbour at this corner of the tile.
    Corner(Quadrant),
    /// One half of a border spilled into the neighbour on this side.
    Edge(Side),
}

/// One planned draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Blit {
    pub tile: TileTypeId,
    /// Grid cell that owns the fragment.
    pub cell: UVec2,
    pub sprite: Sprite,
    pub kind: FragmentKind,
    /// Top-left pixel in the composite; may be negative at the grid edge.
    pub position: IVec2,
}

// ── Stitching rules ───────────────────────────────────────────────────────────

/// Corner of the tile, diagonal neighbour offset, and the covered quadrant
/// of that neighbour. Order matches the drawing order.
const CORNERS: [(Quadrant, IVec2, Quadrant); 4] = [
    (Quadrant::UpperLeft, IVec2::new(-1, -1), Quadrant::LowerRight),
    (Quadrant::UpperRight, IVec2::new(1, -1), Quadrant::LowerLeft),
    (Quadrant::LowerRight, IVec2::new(1, 1), Quadrant::UpperLeft),
    (Quadrant::LowerLeft, IVec2::new(-1, 1), Quadrant::UpperRight),
];

/// Border half: the diagonal neighbour deciding run vs. inner corner, and
/// the covered quadrant of the edge neighbour.
type Half = (IVec2, Quadrant);

/// Side, edge neighbour offset, run pattern, and its two halves.
const EDGES: [(Side, IVec2, CornerPattern, [Half; 2]); 4] = [
    (
        Side::Up,
        IVec2::new(0, -1),
        CornerPattern::Horizontal,
        [(IVec2::new(-1, -1), Quadrant::LowerLeft), (IVec2::new(1, -1), Quadrant::LowerRight)],
    ),
    (
        Side::Left,
        IVec2::new(-1, 0),
        CornerPattern::Vertical,
        [(IVec2::new(-1, -1), Quadrant::UpperRight), (IVec2::new(-1, 1), Quadrant::LowerRight)],
    ),
    (
        Side::Right,
        IVec2::new(1, 0),
        CornerPattern::Vertical,
        [(IVec2::new(1, -1), Quadrant::UpperLeft), (IVec2::new(1, 1), Quadrant::LowerLeft)],
    ),
    (
        Side::Down,
        IVec2::new(0, 1),
        CornerPattern::Horizontal,
        [(IVec2::new(-1, 1), Quadrant::UpperLeft), (IVec2::new(1, 1), Quadrant::UpperRight)],
    ),
];

/// Pixel offset of a quadrant inside a cell.
fn quadrant_offset(quadrant: Quadrant, sub: IVec2) -> IVec2 {
    match quadrant {
        Quadrant::UpperLeft => IVec2::ZERO,
        Quadrant::UpperRight => IVec2::new(sub.x, 0),
        Quadrant::LowerLeft => IVec2::new(0, sub.y),
        Quadrant::LowerRight => sub,
    }
}

// ── Planning ──────────────────────────────────────────────────────────────────

/// Distinct priorities of the static tiles in `grid`, ascending.
///
/// Animated tiles and empty cells do not contribute.
pub fn priority_layers(grid: &TerrainGrid, catalog: &TileCatalog) -> Vec<i32> {
    grid.iter()
        .filter_map(|(_, _, cell)| cell.tile.and_then(|id| catalog.get(id)))
        .filter(|ty| !ty.animated())
        .map(|ty| ty.priority())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Every draw needed to composite `grid`, in drawing order.
///
/// Pure: no images are touched, so the plan can be inspected on its own.
/// Neighbour lookups saturate at the grid edge.
pub fn plan_composite(grid: &TerrainGrid, catalog: &TileCatalog, tile: UVec2) -> Vec<Blit> {
    let tile = tile.as_ivec2();
    let sub = tile / 2;
    let mut plan = Vec::new();

    for layer in priority_layers(grid, catalog) {
        for (x, y, cell) in grid.iter() {
            let Some(ty) = cell.tile.and_then(|id| catalog.get(id)) else {
                continue;
            };
            if ty.animated() || ty.priority() != layer {
                continue;
            }

            let at = IVec2::new(x as i32, y as i32);
            let origin = at * tile;
            let outranks = |d: IVec2| layer > grid.priority_at(at.x + d.x, at.y + d.y, catalog);
            let mut push = |sprite, kind, position| {
                plan.push(Blit { tile: ty.id(), cell: UVec2::new(x, y), sprite, kind, position });
            };

            push(Sprite::Main(cell.variant), FragmentKind::Main, origin);

            for (corner, diag, covered) in CORNERS {
                let spill = outranks(diag)
                    && outranks(IVec2::new(diag.x, 0))
                    && outranks(IVec2::new(0, diag.y));
                if spill {
                    push(
                        Sprite::Corner(covered, CornerPattern::Convex),
                        FragmentKind::Corner(corner),
                        origin + diag * tile + quadrant_offset(covered, sub),
                    );
                }
            }

            for (side, neighbour, run, halves) in EDGES {
                if !outranks(neighbour) {
                    continue;
                }
                for (diag, covered) in halves {
                    let pattern = if outranks(diag) { run } else { CornerPattern::Concave };
                    push(
                        Sprite::Corner(covered, pattern),
                        FragmentKind::Edge(side),
                        origin + neighbour * tile + quadrant_offset(covered, sub),
                    );
                }
            }
        }
    }

    plan
}

// ── Compositing ───────────────────────────────────────────────────────────────

/// Render the static terrain of `grid` into a transparent image of
/// `grid size × tile size` pixels.
///
/// Image sets are loaded through `cache` as needed; a tile type whose sheet
/// fails to load aborts the composite with that error. Identical inputs
/// always produce identical pixels.
pub fn composite(
    grid: &TerrainGrid,
    catalog: &TileCatalog,
    cache: &mut TileImageCache,
) -> Result<RgbaImage> {
    let started = Instant::now();
    let tile = cache.tile_size();
    let plan = plan_composite(grid, catalog, tile);

    let mut loaded = HashSet::new();
    for blit in &plan {
        if loaded.insert(blit.tile) {
            if let Some(ty) = catalog.get(blit.tile) {
                cache.get(ty)?;
            }
        }
    }

    let mut image = RgbaImage::new(grid.width() * tile.x, grid.height() * tile.y);
    for blit in &plan {
        let Some(set) = catalog.get(blit.tile).and_then(|ty| cache.cached(ty)) else {
            continue;
        };
        image::imageops::overlay(
            &mut image,
            set.sprite(blit.sprite),
            blit.position.x as i64,
            blit.position.y as i64,
        );
    }

    debug!(
        "compositor: {}x{} tiles, {} blits in {:?}",
        grid.width(),
        grid.height(),
        plan.len(),
        started.elapsed()
    );
    Ok(image)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::Cell;
    use crate::tiles::TileDef;

    #[test]
    fn layers_skip_animated_and_empty() {
        let mut catalog = TileCatalog::new();
        let grass = catalog.register(TileDef::new("grass", 2)).unwrap();
        let water = catalog.register(TileDef::new("water", 9).animated(4)).unwrap();
        let sand = catalog.register(TileDef::new("sand", -1)).unwrap();
        let mut grid = TerrainGrid::new(4, 1);
        grid.set(0, 0, Cell::new(grass, 0));
        grid.set(1, 0, Cell::new(water, 0));
        grid.set(2, 0, Cell::new(sand, 0));
        assert_eq!(priority_layers(&grid, &catalog), vec![-1, 2]);
    }

    #[test]
    fn one_row_grid_spills_vertical_runs_to_the_left() {
        // [low][high]: the high tile spills left only; both diagonals are the
        // clamped low tile itself on a one-row grid, so they are outranked.
        let mut catalog = TileCatalog::new();
        let low = catalog.register(TileDef::new("low", 1)).unwrap();
        let high = catalog.register(TileDef::new("high", 2)).unwrap();
        let mut grid = TerrainGrid::new(2, 1);
        grid.set(0, 0, Cell::new(low, 0));
        grid.set(1, 0, Cell::new(high, 0));

        let plan = plan_composite(&grid, &catalog, UVec2::new(8, 8));
        let edges: Vec<_> = plan
            .iter()
            .filter(|b| b.tile == high && matches!(b.kind, FragmentKind::Edge(_)))
            .collect();
        assert_eq!(edges.len(), 2);
        assert!(edges.iter().all(|b| b.kind == FragmentKind::Edge(Side::Left)));
        assert_eq!(edges[0].sprite, Sprite::Corner(Quadrant::UpperRight, CornerPattern::Vertical));
        assert_eq!(edges[0].position, IVec2::new(4, 0));
        assert_eq!(edges[1].position, IVec2::new(4, 4));
    }
}
