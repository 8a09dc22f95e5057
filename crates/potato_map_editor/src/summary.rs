//! Level summary for the command-line `info` report

use potato_map_core::{Color, Layer, LevelData, SpawnPoint, TextureId};
use serde::Serialize;
use std::collections::BTreeMap;

/// Counts and settings of a level, printed by `potato_map_editor info`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelSummary {
    pub width: u32,
    pub height: u32,
    pub wall_cells: usize,
    pub floor_cells: usize,
    pub doors: usize,
    pub entities: usize,
    /// Entity count per class name
    pub entity_classes: BTreeMap<String, usize>,
    pub spawn_point: Option<SpawnPoint>,
    pub floor_color: Color,
    pub ceiling_color: Color,
    pub fog_color: Color,
    pub floor_texture_id: Option<TextureId>,
    pub ceiling_texture_id: Option<TextureId>,
}

impl LevelSummary {
    pub fn of(level: &LevelData) -> Self {
        let mut entity_classes = BTreeMap::new();
        for entity in &level.entities {
            *entity_classes.entry(entity.class_name.clone()).or_insert(0) += 1;
        }

        Self {
            width: level.width,
            height: level.height,
            wall_cells: level.wall_count(Layer::Wall),
            floor_cells: level.wall_count(Layer::Floor),
            doors: level.door_count(),
            entities: level.entities.len(),
            entity_classes,
            spawn_point: level.spawn_point,
            floor_color: level.floor_color,
            ceiling_color: level.ceiling_color,
            fog_color: level.fog_color,
            floor_texture_id: level.floor_texture_id,
            ceiling_texture_id: level.ceiling_texture_id,
        }
    }
}
