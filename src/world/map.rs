// ── Map description ───────────────────────────────────────────────────────────
//
// JSON document describing tile types, prop types, placed props and the
// terrain layout. Keys used inside the file are the author's own numbering;
// the loader maps them onto catalog-assigned ids.
//
// ```json
// {
//   "tiles":      [{ "key": 0, "name": "grass", "priority": 1, "variants": 4 }],
//   "prop_types": [{ "key": 0, "name": "tree", "width": 1, "height": 2 }],
//   "props":      [{ "id": 0, "prop_type": 0, "x": 3, "y": 5 }],
//   "terrain":    { "width": 2, "height": 1, "rows": [[[0, 0], [null, 0]]] }
// }
// ```

use std::collections::HashMap;
use std::path::Path;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::{PropInstanceId, PropType, PropTypeId, World};
use crate::error::{Error, Result};
use crate::terrain::{Cell, TerrainGrid};
use crate::tiles::{TileCatalog, TileDef, TileTypeId};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyedTile {
    pub key: u32,
    #[serde(flatten)]
    pub def: TileDef,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyedPropType {
    pub key: u32,
    #[serde(flatten)]
    pub prop: PropType,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropPlacement {
    pub id: u32,
    pub prop_type: u32,
    /// Lower-left anchor tile.
    pub x: i32,
    pub y: i32,
}

/// Terrain layout: `rows[y][x] = [tile_key or null, variant]`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TerrainLayout {
    pub width: u32,
    pub height: u32,
    pub rows: Vec<Vec<(Option<u32>, u8)>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MapDescription {
    #[serde(default)]
    pub tiles: Vec<KeyedTile>,
    #[serde(default)]
    pub prop_types: Vec<KeyedPropType>,
    #[serde(default)]
    pub props: Vec<PropPlacement>,
    pub terrain: TerrainLayout,
}

impl MapDescription {
    pub fn from_json_str(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
        Self::from_json_str(&text).map_err(|source| Error::Json { path: path.to_path_buf(), source })
    }

    /// Build the world: register tiles, fill the terrain, place props.
    ///
    /// Fails on unknown tile / prop keys, a terrain whose rows disagree with
    /// the declared size, or a variant outside its tile's variant count.
    pub fn into_world(self) -> Result<World> {
        let mut catalog = TileCatalog::new();
        let mut tile_ids: HashMap<u32, TileTypeId> = HashMap::new();
        for tile in self.tiles {
            let id = catalog.register(tile.def)?;
            tile_ids.insert(tile.key, id);
        }

        let layout = self.terrain;
        let expected = (layout.width, layout.height);
        if layout.rows.len() != layout.height as usize {
            return Err(Error::TerrainSize {
                expected,
                actual: (layout.rows.first().map_or(0, |r| r.len() as u32), layout.rows.len() as u32),
            });
        }

        let mut terrain = TerrainGrid::new(layout.width, layout.height);
        for (y, row) in layout.rows.iter().enumerate() {
            if row.len() != layout.width as usize {
                return Err(Error::TerrainSize {
                    expected,
                    actual: (row.len() as u32, layout.rows.len() as u32),
                });
            }
            for (x, &(key, variant)) in row.iter().enumerate() {
                let (x, y) = (x as u32, y as u32);
                let tile = match key {
                    Some(key) => Some(*tile_ids.get(&key).ok_or(Error::UnknownTileKey(key))?),
                    None => None,
                };
                if let Some(ty) = tile.and_then(|id| catalog.get(id)) {
                    if variant >= ty.variants() {
                        return Err(Error::VariantOutOfRange { x, y, variant, variants: ty.variants() });
                    }
                }
                terrain.set(x, y, Cell { tile, variant, objects: None });
            }
        }

        let mut world = World::new(catalog, terrain);

        let mut prop_ids: HashMap<u32, PropTypeId> = HashMap::new();
        for keyed in self.prop_types {
            let id = world.add_prop_type(keyed.prop);
            prop_ids.insert(keyed.key, id);
        }
        for placement in self.props {
            let ty = *prop_ids
                .get(&placement.prop_type)
                .ok_or(Error::UnknownPropType(placement.prop_type))?;
            world.place_prop(
                PropInstanceId(placement.id),
                ty,
                IVec2::new(placement.x, placement.y),
            )?;
        }

        Ok(world)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
