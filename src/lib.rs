pub mod config;
pub mod error;
pub mod geometry;
pub mod renderer;
pub mod terrain;
pub mod tiles;
pub mod world;

pub use config::RenderConfig;
pub use error::{Error, Result};
pub use renderer::WorldRenderer;
pub use renderer::assets::{AssetSource, DirAssets, MemoryAssets};
pub use terrain::{Cell, TerrainGrid};
pub use tiles::{TileCatalog, TileDef, TileType, TileTypeId};
pub use world::{MapDescription, World};
