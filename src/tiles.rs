use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Priority used wherever a tile reference is absent (empty cell, unknown id).
pub const DEFAULT_PRIORITY: i32 = 0;

/// Upper bound on main-tile variants / animation frames per tile type.
pub const MAX_VARIANTS: u8 = 4;

/// Catalog-assigned tile type identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileTypeId(pub u16);

// ── TileDef ───────────────────────────────────────────────────────────────────

/// Declarative tile type description, as read from a map file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileDef {
    /// Asset name without prefix or extension, e.g. `"grass"`.
    pub name: String,
    /// Higher priority overlaps lower priority at shared borders.
    pub priority: i32,
    /// Main-tile variants, or animation frames when `animated`. In `1..=4`.
    #[serde(default = "one")]
    pub variants: u8,
    #[serde(default)]
    pub animated: bool,
    #[serde(default = "yes")]
    pub steppable: bool,
    #[serde(default = "yes")]
    pub flyable: bool,
    #[serde(default)]
    pub swimmable: bool,
}

fn one() -> u8 {
    1
}

fn yes() -> bool {
    true
}

impl TileDef {
    /// Static, steppable, single-variant tile.
    pub fn new(name: impl Into<String>, priority: i32) -> Self {
        Self {
            name: name.into(),
            priority,
            variants: 1,
            animated: false,
            steppable: true,
            flyable: true,
            swimmable: false,
        }
    }

    pub fn variants(mut self, variants: u8) -> Self {
        self.variants = variants;
        self
    }

    /// Mark as animated with `frames` animation frames.
    pub fn animated(mut self, frames: u8) -> Self {
        self.animated = true;
        self.variants = frames;
        self
    }

    pub fn traversal(mut self, steppable: bool, flyable: bool, swimmable: bool) -> Self {
        self.steppable = steppable;
        self.flyable = flyable;
        self.swimmable = swimmable;
        self
    }
}

// ── TileType ──────────────────────────────────────────────────────────────────

/// A registered tile type. Immutable once the catalog hands it out.
#[derive(Clone, Debug, PartialEq)]
pub struct TileType {
    id: TileTypeId,
    def: TileDef,
}

impl TileType {
    pub fn id(&self) -> TileTypeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn priority(&self) -> i32 {
        self.def.priority
    }

    pub fn variants(&self) -> u8 {
        self.def.variants
    }

    /// Animated tiles are never pre-baked into the composite.
    pub fn animated(&self) -> bool {
        self.def.animated
    }

    pub fn steppable(&self) -> bool {
        self.def.steppable
    }

    pub fn flyable(&self) -> bool {
        self.def.flyable
    }

    pub fn swimmable(&self) -> bool {
        self.def.swimmable
    }

    /// Name of the backing tile sheet in the asset source.
    pub fn asset_name(&self) -> String {
        format!("tile_{}", self.def.name)
    }
}

impl std::fmt::Display for TileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "tile '{}' ({}), priority {}, step/fly/swim {}{}{}",
            self.def.name,
            self.id.0,
            self.def.priority,
            self.def.steppable as u8,
            self.def.flyable as u8,
            self.def.swimmable as u8,
        )
    }
}

// ── TileCatalog ───────────────────────────────────────────────────────────────

/// Registry of every tile type known to a world. Ids are dense and assigned in
/// registration order, so lookup is a plain index.
#[derive(Clone, Debug, Default)]
pub struct TileCatalog {
    types: Vec<TileType>,
}

impl TileCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, def: TileDef) -> Result<TileTypeId> {
        if def.variants == 0 || def.variants > MAX_VARIANTS {
            return Err(Error::InvalidTileType {
                name: def.name,
                reason: format!("variant count must be in 1..={MAX_VARIANTS}, got {}", def.variants),
            });
        }
        let index = u16::try_from(self.types.len()).map_err(|_| Error::InvalidTileType {
            name: def.name.clone(),
            reason: "catalog is full".into(),
        })?;
        let id = TileTypeId(index);
        self.types.push(TileType { id, def });
        Ok(id)
    }

    pub fn get(&self, id: TileTypeId) -> Option<&TileType> {
        self.types.get(id.0 as usize)
    }

    pub fn by_name(&self, name: &str) -> Option<&TileType> {
        self.types.iter().find(|t| t.name() == name)
    }

    /// Priority of an optional tile reference, `DEFAULT_PRIORITY` when absent.
    pub fn priority_of(&self, id: Option<TileTypeId>) -> i32 {
        id.and_then(|id| self.get(id))
            .map_or(DEFAULT_PRIORITY, TileType::priority)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TileType> {
        self.types.iter()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic() {
        let mut c = TileCatalog::new();
        let a = c.register(TileDef::new("grass", 1)).unwrap();
        let b = c.register(TileDef::new("road", 2)).unwrap();
        assert_eq!(a, TileTypeId(0));
        assert_eq!(b, TileTypeId(1));
        assert_eq!(c.get(b).unwrap().name(), "road");
    }

    #[test]
    fn variant_count_out_of_range_rejected() {
        let mut c = TileCatalog::new();
        assert!(c.register(TileDef::new("x", 0).variants(0)).is_err());
        assert!(c.register(TileDef::new("x", 0).variants(5)).is_err());
        assert!(c.is_empty());
    }

    #[test]
    fn absent_reference_has_default_priority() {
        let mut c = TileCatalog::new();
        let id = c.register(TileDef::new("rock", 7)).unwrap();
        assert_eq!(c.priority_of(Some(id)), 7);
        assert_eq!(c.priority_of(None), DEFAULT_PRIORITY);
        assert_eq!(c.priority_of(Some(TileTypeId(99))), DEFAULT_PRIORITY);
    }

    #[test]
    fn def_defaults_from_json() {
        let def: TileDef = serde_json::from_str(r#"{ "name": "water", "priority": 3 }"#).unwrap();
        assert_eq!(def.variants, 1);
        assert!(def.steppable && def.flyable && !def.swimmable && !def.animated);
    }
}
