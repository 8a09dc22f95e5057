//! Level file formats for potato_map_editor
//!
//! A [`LevelData`](potato_map_core::LevelData) can be stored two ways:
//!
//! - **JSON document** ([`encode_json`] / [`decode_json`]): one nested document
//!   that keeps every field, including door key types.
//! - **Table archive** ([`LevelArchive`]): four CSV tables (`level_info.csv`,
//!   `wall_map.csv`, `floor_map.csv`, `entities.csv`) meant to be bundled into a
//!   single download. Door key types are not stored in this format.
//!
//! Both decoders clear the destination level first and degrade malformed cells
//! to empty instead of failing.
//!
//! # Example
//!
//! ```rust,ignore
//! use potato_map_core::{Cell, Layer, LevelData};
//! use potato_map_io::{decode_json, encode_json, LevelArchive};
//!
//! let mut level = LevelData::new();
//! level.set_cell(2, 2, Cell::wall(4), Layer::Wall);
//!
//! let json = encode_json(&level)?;
//! let archive = LevelArchive::encode(&level)?;
//!
//! let mut loaded = LevelData::new();
//! decode_json(&json, &mut loaded)?;
//! archive.decode_into(&mut loaded);
//! ```

mod archive;
mod json;
mod loader;
mod tables;

pub use archive::{LevelArchive, ENTITIES_FILE, FLOOR_MAP_FILE, LEVEL_INFO_FILE, WALL_MAP_FILE};
pub use json::{decode_json, encode_json};
pub use loader::{
    load_level, load_level_from_bytes, load_level_from_reader, load_level_from_str, save_level,
    LevelFormat,
};
pub use tables::{
    channels_to_color, color_to_channels, decode_entities, decode_level_info, decode_map,
    encode_entities, encode_level_info, encode_map,
};

use thiserror::Error;

/// Error type for level load/save failures
#[derive(Debug, Error)]
pub enum LevelFormatError {
    #[error("Failed to read or write level files: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to write CSV table: {0}")]
    Csv(#[from] csv::Error),
    #[error("Unsupported level format: {0}")]
    UnsupportedFormat(String),
    #[error("Invalid level data: {0}")]
    InvalidFormat(String),
}
