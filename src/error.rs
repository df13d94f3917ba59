use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The asset source has no image registered under `name`.
    #[error("asset '{name}' not found")]
    MissingAsset { name: String },

    #[error("failed to decode asset '{name}': {source}")]
    ImageDecode {
        name: String,
        #[source]
        source: image::ImageError,
    },

    /// A tile sheet is smaller than the fixed `4·tile_w × 2·tile_h` layout.
    #[error("tile sheet '{name}' is {}x{}, expected at least {}x{}", actual.0, actual.1, expected.0, expected.1)]
    MalformedSheet {
        name: String,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid json in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid tile type '{name}': {reason}")]
    InvalidTileType { name: String, reason: String },

    #[error("invalid render config: {0}")]
    InvalidConfig(String),

    #[error("map references unknown tile key {0}")]
    UnknownTileKey(u32),

    #[error("map references unknown prop type {0}")]
    UnknownPropType(u32),

    #[error("variant {variant} at [{x},{y}] is out of range for a tile with {variants} variant(s)")]
    VariantOutOfRange {
        x: u32,
        y: u32,
        variant: u8,
        variants: u8,
    },

    #[error("terrain is {}x{}, expected {}x{}", actual.0, actual.1, expected.0, expected.1)]
    TerrainSize {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

pub type Result<T> = std::result::Result<T, Error>;
