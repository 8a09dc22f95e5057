//! potato_map - Levels for the Potato raycaster
//!
//! Convenience crate re-exporting the level model, and with the default
//! `io` feature the JSON and table archive formats. Enable `editor` for the
//! editing session.
//!
//! ```rust,ignore
//! use potato_map::prelude::*;
//!
//! let mut level = load_level(Path::new("e1m1.json"))?;
//! flood_fill(&mut level, 4, 4, Layer::Floor, Cell::wall(9));
//! save_level(&level, Path::new("e1m1"))?;
//! ```

pub use potato_map_core;

#[cfg(feature = "io")]
pub use potato_map_io;

#[cfg(feature = "editor")]
pub use potato_map_editor;

pub mod prelude {
    pub use potato_map_core::{
        flood_fill, Cell, CellChange, Color, EntityRecord, Grid, KeyType, Layer, LevelData,
        SpawnPoint, TextureId, GRID_HEIGHT, GRID_WIDTH,
    };

    #[cfg(feature = "io")]
    pub use potato_map_io::{
        decode_json, encode_json, load_level, save_level, LevelArchive, LevelFormat,
        LevelFormatError,
    };

    #[cfg(feature = "editor")]
    pub use potato_map_editor::{ClickOutcome, EditError, EditorSession, EditorTool};
}
