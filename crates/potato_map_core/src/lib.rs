//! Core data structures for potato_map_editor
//!
//! This crate provides the fundamental types for representing a tile-grid level:
//! - `LevelData` - A complete level with a wall layer, a floor layer and entities
//! - `Cell` - The content of one grid cell (empty, wall or door)
//! - `Grid` - A fixed-size row-major grid of cells
//! - `EntityRecord` - Placed entities with floating point positions
//! - `Color` - RGB level colors that cross the boundary as `#rrggbb`
//! - `flood_fill` - 4-connected region fill over one layer

mod cell;
mod color;
mod entity;
mod fill;
mod layer;
mod level;

pub use cell::{Cell, KeyType, TextureId};
pub use color::{Color, ColorParseError};
pub use entity::{EntityRecord, ENEMY_ENTITY_CLASS};
pub use fill::{flood_fill, CellChange};
pub use layer::{Grid, Layer};
pub use level::{LevelData, SpawnPoint, GRID_HEIGHT, GRID_WIDTH};
