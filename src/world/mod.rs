pub mod bitmap;
pub mod map;
pub mod props;

use std::collections::BTreeMap;

use glam::{IVec2, UVec2};
use log::info;

use crate::error::{Error, Result};
use crate::geometry::TileRect;
use crate::terrain::{ObjectListId, TerrainGrid};
use crate::tiles::{TileCatalog, TileType};

pub use bitmap::terrain_from_bitmap;
pub use map::MapDescription;
pub use props::{PropInstance, PropInstanceId, PropType, PropTypeId};

/// Movement modes checked by [`World::can_traverse`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Traversal {
    Walk,
    Fly,
    Swim,
}

// ── World ───────────────────────────────────────────────────────────────────

/// The full game map plus the currently loaded active area.
///
/// The whole terrain is kept in memory; the active area is a copied slice of
/// it that the renderer composites. Props are owned here by id and reference
/// their [`PropType`] by id.
#[derive(Debug)]
pub struct World {
    catalog: TileCatalog,
    terrain: TerrainGrid,
    prop_types: Vec<PropType>,
    props: BTreeMap<PropInstanceId, PropInstance>,
    object_lists: Vec<Vec<PropInstanceId>>,
    active_area: TileRect,
    area: TerrainGrid,
    reslices: u64,
}

impl World {
    /// World with no active area loaded yet.
    pub fn new(catalog: TileCatalog, terrain: TerrainGrid) -> Self {
        Self {
            catalog,
            terrain,
            prop_types: Vec::new(),
            props: BTreeMap::new(),
            object_lists: Vec::new(),
            active_area: TileRect::default(),
            area: TerrainGrid::default(),
            reslices: 0,
        }
    }

    pub fn catalog(&self) -> &TileCatalog {
        &self.catalog
    }

    /// Full-map terrain.
    pub fn terrain(&self) -> &TerrainGrid {
        &self.terrain
    }

    /// World width in tiles.
    pub fn width(&self) -> u32 {
        self.terrain.width()
    }

    /// World height in tiles.
    pub fn height(&self) -> u32 {
        self.terrain.height()
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width(), self.height())
    }

    /// Tile type at `(x, y)` of the full map, clamped to the nearest edge.
    pub fn tile_type_at(&self, x: i32, y: i32) -> Option<&TileType> {
        self.terrain.tile_at(x, y).and_then(|id| self.catalog.get(id))
    }

    /// Variant at `(x, y)` of the full map, clamped to the nearest edge.
    pub fn variant_at(&self, x: i32, y: i32) -> u8 {
        self.terrain.variant_at(x, y)
    }

    // ── Props ───────────────────────────────────────────────────────────────

    pub fn add_prop_type(&mut self, prop_type: PropType) -> PropTypeId {
        self.prop_types.push(prop_type);
        PropTypeId(self.prop_types.len() as u32 - 1)
    }

    pub fn prop_type(&self, id: PropTypeId) -> Option<&PropType> {
        self.prop_types.get(id.0 as usize)
    }

    pub fn prop(&self, id: PropInstanceId) -> Option<&PropInstance> {
        self.props.get(&id)
    }

    pub fn props(&self) -> impl Iterator<Item = &PropInstance> {
        self.props.values()
    }

    /// Place a prop with its lower-left tile at `position` and register it in
    /// the object list of every in-bounds tile its mask occupies.
    ///
    /// Re-using an id replaces the instance in the lookup table; object lists
    /// written for the old instance are left as they are.
    pub fn place_prop(
        &mut self,
        id: PropInstanceId,
        prop_type: PropTypeId,
        position: IVec2,
    ) -> Result<PropInstanceId> {
        let ty = self
            .prop_types
            .get(prop_type.0 as usize)
            .ok_or(Error::UnknownPropType(prop_type.0))?;
        let instance = PropInstance { id, prop_type, position };
        let tiles: Vec<IVec2> = instance.occupied_tiles(ty).collect();

        for tile in tiles {
            if tile.x < 0 || tile.y < 0 {
                continue;
            }
            let next_list = ObjectListId(self.object_lists.len() as u32);
            let Some(cell) = self.terrain.get_mut(tile.x as u32, tile.y as u32) else {
                continue;
            };
            let list = *cell.objects.get_or_insert(next_list);
            if list == next_list {
                self.object_lists.push(Vec::new());
            }
            self.object_lists[list.0 as usize].push(id);
        }

        self.props.insert(id, instance);
        Ok(id)
    }

    /// Props listed in an object list, in placement order.
    pub fn object_list(&self, id: ObjectListId) -> &[PropInstanceId] {
        self.object_lists
            .get(id.0 as usize)
            .map_or(&[], Vec::as_slice)
    }

    /// Props standing on tile `(x, y)` (clamped).
    pub fn props_at(&self, x: i32, y: i32) -> impl Iterator<Item = &PropInstance> {
        let ids = self
            .terrain
            .objects_at(x, y)
            .map_or(&[][..], |list| self.object_list(list));
        ids.iter().filter_map(|id| self.props.get(id))
    }

    /// Whether an actor moving by `mode` may enter tile `(x, y)`.
    ///
    /// The tile's own flag must allow it and every prop on the tile must too.
    /// Tiles outside the map are never traversable.
    pub fn can_traverse(&self, x: i32, y: i32, mode: Traversal) -> bool {
        if x < 0 || y < 0 || x as u32 >= self.width() || y as u32 >= self.height() {
            return false;
        }
        let Some(tile) = self.tile_type_at(x, y) else {
            return false;
        };
        let tile_ok = match mode {
            Traversal::Walk => tile.steppable(),
            Traversal::Fly => tile.flyable(),
            Traversal::Swim => tile.swimmable(),
        };
        tile_ok
            && self.props_at(x, y).all(|p| {
                self.prop_type(p.prop_type).is_none_or(|ty| match mode {
                    Traversal::Walk => ty.walkable,
                    Traversal::Fly => ty.flyable,
                    Traversal::Swim => ty.swimmable,
                })
            })
    }

    // ── Active area ─────────────────────────────────────────────────────────

    pub fn active_area(&self) -> TileRect {
        self.active_area
    }

    /// Terrain of the active area, indexed relative to its origin.
    pub fn area(&self) -> &TerrainGrid {
        &self.area
    }

    /// Number of times the active slice has been rebuilt.
    pub fn reslice_count(&self) -> u64 {
        self.reslices
    }

    /// Move the active area to `rect` and rebuild the active terrain slice.
    ///
    /// `rect` is clamped to lie inside the world. The slice is always rebuilt,
    /// even when `rect` equals the current area.
    pub fn set_active_area(&mut self, rect: TileRect) {
        let rect = rect.clamped_to(self.size());
        self.active_area = rect;
        self.area = self.terrain.slice(rect);
        self.reslices += 1;
        info!(
            "active area set to [{}, {}] {}x{} ({} props)",
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            self.active_area_props().len()
        );
    }

    /// Props whose footprint overlaps the active area, even partially.
    pub fn active_area_props(&self) -> Vec<&PropInstance> {
        self.props
            .values()
            .filter(|p| {
                self.prop_type(p.prop_type)
                    .is_some_and(|ty| self.active_area.intersects(&p.footprint(ty)))
            })
            .collect()
    }
}

impl std::fmt::Display for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "world {}x{}", self.width(), self.height())?;
        writeln!(f, "tiles:")?;
        for tile in self.catalog.iter() {
            writeln!(f, "  {tile}")?;
        }
        writeln!(f, "prop types: {}", self.prop_types.len())?;
        writeln!(f, "prop instances: {}", self.props.len())?;
        let a = self.active_area;
        writeln!(f, "active area: [{}, {}] {}x{}", a.x, a.y, a.width, a.height)?;
        write!(f, "{}", self.area)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::Cell;
    use crate::tiles::TileDef;

    fn meadow(w: u32, h: u32) -> World {
        let mut catalog = TileCatalog::new();
        let grass = catalog.register(TileDef::new("grass", 1)).unwrap();
        World::new(catalog, TerrainGrid::filled(w, h, Cell::new(grass, 0)))
    }

    #[test]
    fn shared_tile_gets_one_object_list() {
        let mut world = meadow(4, 4);
        let rock = world.add_prop_type(PropType::new("rock", 1, 1));
        world.place_prop(PropInstanceId(1), rock, IVec2::new(2, 2)).unwrap();
        world.place_prop(PropInstanceId(2), rock, IVec2::new(2, 2)).unwrap();
        let list = world.terrain().objects_at(2, 2).unwrap();
        assert_eq!(world.object_list(list), &[PropInstanceId(1), PropInstanceId(2)]);
    }

    #[test]
    fn unknown_prop_type_is_an_error() {
        let mut world = meadow(2, 2);
        let err = world.place_prop(PropInstanceId(0), PropTypeId(9), IVec2::ZERO);
        assert!(matches!(err, Err(Error::UnknownPropType(9))));
    }

    #[test]
    fn solid_prop_blocks_walking_but_not_flying() {
        let mut world = meadow(3, 3);
        let wall = world.add_prop_type(PropType::new("wall", 1, 1));
        world.place_prop(PropInstanceId(0), wall, IVec2::new(1, 1)).unwrap();
        assert!(!world.can_traverse(1, 1, Traversal::Walk));
        assert!(world.can_traverse(1, 1, Traversal::Fly));
        assert!(world.can_traverse(0, 0, Traversal::Walk));
        assert!(!world.can_traverse(-1, 0, Traversal::Walk));
    }
}
