//! JSON document format
//!
//! ```json
//! {
//!   "width": 32,
//!   "height": 32,
//!   "wallMap": [[null, {"type": "wall", "textureId": 3, "x": 1, "y": 0}, ...], ...],
//!   "floorMap": [...],
//!   "floorColor": "#646464",
//!   "ceilingColor": "#87cefa",
//!   "fogColor": "#87cefa",
//!   "floorTextureId": null,
//!   "ceilingTextureId": 2,
//!   "spawnPoint": {"x": 4, "y": 5},
//!   "entities": [{"className": "...", "x": 3.5, "y": 4.5, "enemyType": "grunt"}]
//! }
//! ```

use potato_map_core::{
    Cell, Color, EntityRecord, Grid, KeyType, Layer, LevelData, SpawnPoint, TextureId,
    GRID_HEIGHT, GRID_WIDTH,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::warn;

use crate::LevelFormatError;

/// Serialized form of a non-empty cell; empty cells are `null`
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum CellDocument {
    Wall {
        #[serde(rename = "textureId")]
        texture_id: TextureId,
        x: u32,
        y: u32,
    },
    Door {
        #[serde(rename = "textureId")]
        texture_id: TextureId,
        #[serde(rename = "keyType")]
        key_type: u8,
        x: u32,
        y: u32,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LevelDocument<'a> {
    width: u32,
    height: u32,
    wall_map: Vec<Vec<Option<CellDocument>>>,
    floor_map: Vec<Vec<Option<CellDocument>>>,
    floor_color: Color,
    ceiling_color: Color,
    fog_color: Color,
    floor_texture_id: Option<TextureId>,
    ceiling_texture_id: Option<TextureId>,
    spawn_point: Option<SpawnPoint>,
    entities: &'a [EntityRecord],
}

/// Incoming document. Every field stays untyped so a single field of the
/// wrong shape degrades to its default without rejecting the file.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct LevelDocumentIn {
    wall_map: JsonValue,
    floor_map: JsonValue,
    floor_color: JsonValue,
    ceiling_color: JsonValue,
    fog_color: JsonValue,
    floor_texture_id: JsonValue,
    ceiling_texture_id: JsonValue,
    spawn_point: JsonValue,
    entities: JsonValue,
}

/// Encode a level as a pretty-printed JSON document.
///
/// `width`/`height` are always written as the fixed grid size.
pub fn encode_json(level: &LevelData) -> Result<String, LevelFormatError> {
    let document = LevelDocument {
        width: GRID_WIDTH,
        height: GRID_HEIGHT,
        wall_map: encode_grid(&level.wall_map),
        floor_map: encode_grid(&level.floor_map),
        floor_color: level.floor_color,
        ceiling_color: level.ceiling_color,
        fog_color: level.fog_color,
        floor_texture_id: level.floor_texture_id,
        ceiling_texture_id: level.ceiling_texture_id,
        spawn_point: level.spawn_point,
        entities: &level.entities,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

fn encode_grid(grid: &Grid) -> Vec<Vec<Option<CellDocument>>> {
    grid.rows()
        .enumerate()
        .map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(|(x, cell)| encode_cell(*cell, x as u32, y as u32))
                .collect()
        })
        .collect()
}

fn encode_cell(cell: Cell, x: u32, y: u32) -> Option<CellDocument> {
    match cell {
        Cell::Empty => None,
        Cell::Wall { texture_id } => Some(CellDocument::Wall { texture_id, x, y }),
        Cell::Door {
            texture_id,
            key_type,
        } => Some(CellDocument::Door {
            texture_id,
            key_type: key_type.code(),
            x,
            y,
        }),
    }
}

/// Decode a JSON document into `level`.
///
/// The text is parsed before anything is touched; on a parse error `level` is
/// left as it was. Otherwise `level` is cleared and then populated. A field of
/// the wrong shape is logged and keeps its default, malformed cells and map
/// rows decode to empty, and malformed entities are skipped.
pub fn decode_json(text: &str, level: &mut LevelData) -> Result<(), LevelFormatError> {
    let document: LevelDocumentIn = serde_json::from_str(text)?;
    apply_document(&document, level);
    Ok(())
}

fn apply_document(document: &LevelDocumentIn, level: &mut LevelData) {
    level.clear();

    level.floor_color = decode_color(&document.floor_color, Color::FLOOR, "floorColor");
    level.ceiling_color = decode_color(&document.ceiling_color, Color::CEILING, "ceilingColor");
    level.fog_color = decode_color(&document.fog_color, Color::FOG, "fogColor");
    level.floor_texture_id = decode_texture_id(&document.floor_texture_id, "floorTextureId");
    level.ceiling_texture_id = decode_texture_id(&document.ceiling_texture_id, "ceilingTextureId");
    level.spawn_point = decode_spawn_point(&document.spawn_point);

    decode_grid(&document.wall_map, level, Layer::Wall);
    decode_grid(&document.floor_map, level, Layer::Floor);

    level.entities = decode_entities(&document.entities);
}

fn decode_color(value: &JsonValue, default: Color, field: &str) -> Color {
    match value {
        JsonValue::Null => default,
        JsonValue::String(hex) => Color::from_hex(hex).unwrap_or_else(|e| {
            warn!("Invalid {} in level document: {}", field, e);
            default
        }),
        other => {
            warn!("Invalid {} in level document: {}", field, other);
            default
        }
    }
}

fn decode_texture_id(value: &JsonValue, field: &str) -> Option<TextureId> {
    if value.is_null() {
        return None;
    }
    let id = value.as_i64().and_then(texture_id_from);
    if id.is_none() {
        warn!("Invalid {} in level document: {}", field, value);
    }
    id
}

fn texture_id_from(value: i64) -> Option<TextureId> {
    TextureId::try_from(value).ok().filter(|id| *id >= 1)
}

fn decode_spawn_point(value: &JsonValue) -> Option<SpawnPoint> {
    if value.is_null() {
        return None;
    }
    SpawnPoint::deserialize(value)
        .map_err(|e| warn!("Invalid spawnPoint in level document: {}", e))
        .ok()
}

fn decode_entities(value: &JsonValue) -> Vec<EntityRecord> {
    let items = match value {
        JsonValue::Null => return Vec::new(),
        JsonValue::Array(items) => items,
        other => {
            warn!("Invalid entities in level document: {}", other);
            return Vec::new();
        }
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| {
            EntityRecord::deserialize(item)
                .map_err(|e| warn!("Skipping invalid entity {}: {}", idx, e))
                .ok()
        })
        .collect()
}

fn decode_grid(value: &JsonValue, level: &mut LevelData, layer: Layer) {
    let rows = match value {
        JsonValue::Null => return,
        JsonValue::Array(rows) => rows,
        other => {
            warn!("Invalid map for {} in level document: {}", layer.name(), other);
            return;
        }
    };

    let grid = level.layer_mut(layer);
    let (width, height) = (grid.width() as usize, grid.height() as usize);

    for (y, row) in rows.iter().take(height).enumerate() {
        let Some(cells) = row.as_array() else {
            if !row.is_null() {
                warn!("Invalid row {} on {}: {}", y, layer.name(), row);
            }
            continue;
        };
        for (x, value) in cells.iter().take(width).enumerate() {
            let cell = decode_cell(value, layer).unwrap_or_else(|| {
                warn!("Invalid cell at ({}, {}) on {}: {}", x, y, layer.name(), value);
                Cell::Empty
            });
            grid.set(x as i32, y as i32, cell);
        }
    }
}

/// Decode one cell. `None` means the value is malformed.
fn decode_cell(value: &JsonValue, layer: Layer) -> Option<Cell> {
    if value.is_null() {
        return Some(Cell::Empty);
    }

    let texture_id = value
        .get("textureId")
        .and_then(JsonValue::as_i64)
        .and_then(texture_id_from)?;

    match value.get("type").and_then(JsonValue::as_str)? {
        "wall" => Some(Cell::wall(texture_id)),
        "door" if layer.allows_doors() => {
            let key_type = value
                .get("keyType")
                .and_then(JsonValue::as_i64)
                .and_then(KeyType::from_code)
                .unwrap_or_default();
            Some(Cell::door(texture_id, key_type))
        }
        // Doors are only legal on the wall layer
        "door" => Some(Cell::wall(texture_id)),
        _ => None,
    }
}
