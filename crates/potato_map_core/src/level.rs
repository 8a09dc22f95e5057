//! The level document: two layers of cells plus level-wide properties

use crate::{Cell, Color, EntityRecord, Grid, Layer, TextureId};
use serde::{Deserialize, Serialize};

/// Fixed grid width of every level
pub const GRID_WIDTH: u32 = 32;
/// Fixed grid height of every level
pub const GRID_HEIGHT: u32 = 32;

/// Player spawn position in grid cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub x: i32,
    pub y: i32,
}

impl SpawnPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A complete level
///
/// The document is mutated in place by the editor and reset with
/// [`LevelData::clear`]; it is never shared between owners.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelData {
    pub width: u32,
    pub height: u32,
    pub wall_map: Grid,
    pub floor_map: Grid,
    pub floor_color: Color,
    pub ceiling_color: Color,
    pub fog_color: Color,
    pub floor_texture_id: Option<TextureId>,
    pub ceiling_texture_id: Option<TextureId>,
    pub spawn_point: Option<SpawnPoint>,
    /// Entities in insertion order
    pub entities: Vec<EntityRecord>,
}

impl Default for LevelData {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelData {
    /// Create an empty level of the fixed grid size
    pub fn new() -> Self {
        Self {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            wall_map: Grid::new(GRID_WIDTH, GRID_HEIGHT),
            floor_map: Grid::new(GRID_WIDTH, GRID_HEIGHT),
            floor_color: Color::FLOOR,
            ceiling_color: Color::CEILING,
            fog_color: Color::FOG,
            floor_texture_id: None,
            ceiling_texture_id: None,
            spawn_point: None,
            entities: Vec::new(),
        }
    }

    /// Reset to the empty state, keeping the grid allocations
    pub fn clear(&mut self) {
        self.width = GRID_WIDTH;
        self.height = GRID_HEIGHT;
        self.wall_map.clear();
        self.floor_map.clear();
        self.floor_color = Color::FLOOR;
        self.ceiling_color = Color::CEILING;
        self.fog_color = Color::FOG;
        self.floor_texture_id = None;
        self.ceiling_texture_id = None;
        self.spawn_point = None;
        self.entities.clear();
    }

    /// Get the grid behind a layer
    pub fn layer(&self, layer: Layer) -> &Grid {
        match layer {
            Layer::Wall => &self.wall_map,
            Layer::Floor => &self.floor_map,
        }
    }

    pub fn layer_mut(&mut self, layer: Layer) -> &mut Grid {
        match layer {
            Layer::Wall => &mut self.wall_map,
            Layer::Floor => &mut self.floor_map,
        }
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.wall_map.in_bounds(x, y)
    }

    /// Get a cell, `Empty` when out of range
    pub fn get_cell(&self, x: i32, y: i32, layer: Layer) -> Cell {
        self.layer(layer).get(x, y)
    }

    /// Set a cell; out-of-range writes are dropped
    pub fn set_cell(&mut self, x: i32, y: i32, cell: Cell, layer: Layer) {
        self.layer_mut(layer).set(x, y, cell);
    }

    /// Append an entity
    pub fn add_entity(&mut self, entity: EntityRecord) {
        self.entities.push(entity);
    }

    /// Entities whose floored position is the cell `(x, y)`
    pub fn entities_at(&self, x: i32, y: i32) -> impl Iterator<Item = &EntityRecord> {
        self.entities.iter().filter(move |e| e.is_in_cell(x, y))
    }

    /// Remove every entity in the cell `(x, y)`, returning them in order
    pub fn remove_entities_at(&mut self, x: i32, y: i32) -> Vec<EntityRecord> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entities)
            .into_iter()
            .partition(|e| e.is_in_cell(x, y));
        self.entities = kept;
        removed
    }

    /// Replace the spawn point; `None` clears it
    pub fn set_spawn_point(&mut self, point: Option<SpawnPoint>) {
        self.spawn_point = point;
    }

    pub fn is_spawn_point(&self, x: i32, y: i32) -> bool {
        self.spawn_point == Some(SpawnPoint::new(x, y))
    }

    /// Number of non-empty cells on a layer
    pub fn wall_count(&self, layer: Layer) -> usize {
        self.layer(layer).count(Cell::is_wall)
    }

    /// Number of doors on the wall layer
    pub fn door_count(&self) -> usize {
        self.wall_map.count(Cell::is_door)
    }
}
