use tessera::geometry::TileRect;
use tessera::tiles::DEFAULT_PRIORITY;
use tessera::{Cell, TerrainGrid, TileCatalog, TileDef};

fn striped() -> (TileCatalog, TerrainGrid) {
    let mut catalog = TileCatalog::new();
    let grass = catalog.register(TileDef::new("grass", 2).variants(4)).unwrap();
    let sand = catalog.register(TileDef::new("sand", 1)).unwrap();
    let mut grid = TerrainGrid::new(4, 3);
    for y in 0..3 {
        for x in 0..4 {
            let cell = if x % 2 == 0 { Cell::new(grass, y as u8) } else { Cell::new(sand, 0) };
            grid.set(x, y, cell);
        }
    }
    (catalog, grid)
}

#[test]
fn out_of_bounds_reads_clamp_to_the_edge() {
    let (_, grid) = striped();
    assert_eq!(grid.cell(-5, 2), grid.cell(0, 2));
    assert_eq!(grid.cell(2, -1), grid.cell(2, 0));
    assert_eq!(grid.cell(100, 100), grid.cell(3, 2));
    assert_eq!(grid.cell(i32::MIN, i32::MAX), grid.cell(0, 2));
}

#[test]
fn priorities_follow_the_clamped_cell() {
    let (catalog, grid) = striped();
    assert_eq!(grid.priority_at(0, 0, &catalog), 2);
    assert_eq!(grid.priority_at(1, 0, &catalog), 1);
    assert_eq!(grid.priority_at(9, 0, &catalog), 1);

    let empty = TerrainGrid::new(2, 2);
    assert_eq!(empty.priority_at(0, 0, &catalog), DEFAULT_PRIORITY);
}

#[test]
fn slice_copies_the_window() {
    let (_, grid) = striped();
    let part = grid.slice(TileRect::new(1, 1, 2, 2));
    assert_eq!((part.width(), part.height()), (2, 2));
    assert_eq!(part.cell(1, 0), grid.cell(2, 1));
    assert_eq!(part.variant_at(1, 1), 2);
}

#[test]
fn display_shows_one_row_per_line() {
    let (_, grid) = striped();
    assert_eq!(grid.to_string().lines().count(), 3);
}
