//! potato_map_editor - Level editing for the Potato raycaster
//!
//! This crate provides everything above the level document except pixels:
//! - `EditorSession` - tools, layers, palette selections and pointer handling
//! - Undo/redo through the `commands` module
//! - Door texture catalog and an ordered draw list for front ends
//! - Persistent `EditorPreferences`
//! - The `potato_map_editor` command-line tool
//!
//! # Usage
//!
//! ```rust,ignore
//! use potato_map_editor::{EditorSession, EditorTool};
//!
//! let mut session = EditorSession::new();
//! session.select_texture(6)?;
//! session.pointer_down(40.0, 40.0)?;
//! session.pointer_move(72.0, 40.0)?;
//! session.pointer_up();
//! std::fs::write("level.json", session.save_json()?)?;
//! ```

pub mod commands;
pub mod preferences;
mod session;
mod summary;
mod tool;
pub mod view;

// Re-export the level crates
pub use potato_map_core;
pub use potato_map_io;

pub use session::{ClickOutcome, EditError, EditorSession};
pub use summary::LevelSummary;
pub use tool::{EditorTool, EntityChoice};
pub use view::{DoorTexture, DrawItem, DOOR_TEXTURES};

/// Canvas size of one grid cell in pixels
pub const CELL_SIZE: f64 = 32.0;

/// Opacity of the layer that is not being edited
pub const INACTIVE_LAYER_ALPHA: f32 = 0.3;

/// Convert a canvas pixel position to the grid cell containing it
pub fn canvas_to_grid(px: f64, py: f64) -> (i32, i32) {
    ((px / CELL_SIZE).floor() as i32, (py / CELL_SIZE).floor() as i32)
}

/// Top-left canvas pixel of grid cell `(x, y)`
pub fn grid_to_canvas(x: i32, y: i32) -> (f64, f64) {
    (f64::from(x) * CELL_SIZE, f64::from(y) * CELL_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_grid_conversion() {
        assert_eq!(canvas_to_grid(0.0, 31.9), (0, 0));
        assert_eq!(canvas_to_grid(32.0, 65.0), (1, 2));
        assert_eq!(canvas_to_grid(-1.0, 5.0), (-1, 0));
        assert_eq!(grid_to_canvas(3, 4), (96.0, 128.0));
    }
}
