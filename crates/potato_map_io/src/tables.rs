//! CSV tables for the level archive
//!
//! - `level_info`: `key,value` rows; colors use three channel columns
//! - map tables: one row per grid row, `0` empty, `<id>` wall, `D|<id>` door
//! - `entities`: `class,x,y,enemyType`
//!
//! Decoding never fails. A cell or field that cannot be read is logged and
//! treated as absent.
//!
//! The tables hold less than the JSON document: door key types are not
//! written, and an `enemyType` of `Some("")` reads back as `None`.

use potato_map_core::{
    Cell, Color, EntityRecord, Grid, KeyType, Layer, LevelData, SpawnPoint, TextureId,
    GRID_HEIGHT, GRID_WIDTH,
};
use tracing::{debug, warn};

use crate::LevelFormatError;

const LEVEL_INFO_HEADER: [&str; 2] = ["key", "value"];
const ENTITIES_HEADER: [&str; 4] = ["class", "x", "y", "enemyType"];

/// Texture used for a bare `D` door marker
const DEFAULT_DOOR_TEXTURE: TextureId = 1;

/// Split a `#rrggbb` color into its three channels
pub fn color_to_channels(hex: &str) -> Option<[u8; 3]> {
    Color::from_hex(hex).ok().map(|c| c.channels())
}

/// Join three channels into a lowercase `#rrggbb` string
pub fn channels_to_color(r: u8, g: u8, b: u8) -> String {
    Color::rgb(r, g, b).to_hex()
}

// ─── Encoding ────────────────────────────────────────────────────────────────

fn write_table<I, R>(records: I) -> Result<String, LevelFormatError>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for record in records {
        writer.write_record(record)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| LevelFormatError::InvalidFormat(e.to_string()))
}

/// Encode the `level_info` table
pub fn encode_level_info(level: &LevelData) -> Result<String, LevelFormatError> {
    let optional_id = |id: Option<TextureId>| id.map(|id| id.to_string()).unwrap_or_default();
    let color_row = |key: &str, color: Color| {
        let [r, g, b] = color.channels();
        vec![key.to_string(), r.to_string(), g.to_string(), b.to_string()]
    };

    let mut rows = vec![
        LEVEL_INFO_HEADER.map(String::from).to_vec(),
        vec!["width".to_string(), GRID_WIDTH.to_string()],
        vec!["height".to_string(), GRID_HEIGHT.to_string()],
        vec!["floorTextureId".to_string(), optional_id(level.floor_texture_id)],
        vec!["ceilingTextureId".to_string(), optional_id(level.ceiling_texture_id)],
        color_row("floorColor", level.floor_color),
        color_row("ceilingColor", level.ceiling_color),
        color_row("fogColor", level.fog_color),
    ];
    if let Some(spawn) = level.spawn_point {
        rows.push(vec!["spawnX".to_string(), spawn.x.to_string()]);
        rows.push(vec!["spawnY".to_string(), spawn.y.to_string()]);
    }

    write_table(rows)
}

/// Encode one layer as a map table. Door key types are not written.
pub fn encode_map(grid: &Grid) -> Result<String, LevelFormatError> {
    write_table(grid.rows().map(|row| row.iter().map(encode_map_cell)))
}

fn encode_map_cell(cell: &Cell) -> String {
    match cell {
        Cell::Empty => "0".to_string(),
        Cell::Wall { texture_id } => texture_id.to_string(),
        Cell::Door { texture_id, .. } => format!("D|{}", texture_id),
    }
}

/// Encode the `entities` table
pub fn encode_entities(entities: &[EntityRecord]) -> Result<String, LevelFormatError> {
    let header = ENTITIES_HEADER.map(String::from).to_vec();
    let rows = entities.iter().map(|entity| {
        vec![
            entity.class_name.clone(),
            entity.x.to_string(),
            entity.y.to_string(),
            entity.enemy_type.clone().unwrap_or_default(),
        ]
    });
    write_table(std::iter::once(header).chain(rows))
}

// ─── Decoding ────────────────────────────────────────────────────────────────

fn reader(text: &str, has_headers: bool) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .from_reader(text.as_bytes())
}

/// Apply a `level_info` table to `level`.
///
/// The first row is a header. `width`/`height` rows are ignored since the
/// grid size is fixed. Colors need all three channels; spawn coordinates
/// default to 0 when only one of `spawnX`/`spawnY` is present.
pub fn decode_level_info(text: &str, level: &mut LevelData) {
    for record in reader(text, true).records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping unreadable level_info row: {}", e);
                continue;
            }
        };
        if record.len() < 2 {
            continue;
        }

        let value = record[1].trim();
        match record[0].trim() {
            "floorTextureId" => level.floor_texture_id = decode_optional_id("floorTextureId", value),
            "ceilingTextureId" => {
                level.ceiling_texture_id = decode_optional_id("ceilingTextureId", value)
            }
            "floorColor" => decode_color_row(&record, &mut level.floor_color),
            "ceilingColor" => decode_color_row(&record, &mut level.ceiling_color),
            "fogColor" => decode_color_row(&record, &mut level.fog_color),
            "spawnX" => match value.parse::<i32>() {
                Ok(x) => level.spawn_point.get_or_insert(SpawnPoint::new(0, 0)).x = x,
                Err(_) => warn!("Invalid spawnX value: {:?}", value),
            },
            "spawnY" => match value.parse::<i32>() {
                Ok(y) => level.spawn_point.get_or_insert(SpawnPoint::new(0, 0)).y = y,
                Err(_) => warn!("Invalid spawnY value: {:?}", value),
            },
            "width" | "height" => {}
            other => debug!("Ignoring unknown level_info key: {}", other),
        }
    }
}

fn decode_optional_id(key: &str, value: &str) -> Option<TextureId> {
    if value.is_empty() {
        return None;
    }
    let id = parse_texture_id(value);
    if id.is_none() {
        warn!("Invalid {} value: {:?}", key, value);
    }
    id
}

fn decode_color_row(record: &csv::StringRecord, color: &mut Color) {
    let key = &record[0];
    if record.len() < 4 {
        warn!("{} needs three channel columns, got {}", key, record.len() - 1);
        return;
    }
    let channel = |idx: usize| record[idx].trim().parse::<i64>().ok();
    match (channel(1), channel(2), channel(3)) {
        (Some(r), Some(g), Some(b)) => *color = Color::from_channels_clamped(r, g, b),
        _ => warn!("Invalid channels for {}: {:?}", key, record),
    }
}

fn parse_texture_id(value: &str) -> Option<TextureId> {
    value.trim().parse::<TextureId>().ok().filter(|id| *id >= 1)
}

/// Apply a map table to one layer of `level`.
///
/// Line `y` of the text is grid row `y`; blank lines leave their row untouched.
/// Rows and columns beyond the grid are ignored; short rows leave the rest of
/// the row untouched. Doors come back with no key, and doors on the floor
/// layer come back as plain walls.
pub fn decode_map(text: &str, level: &mut LevelData, layer: Layer) {
    let grid = level.layer_mut(layer);
    let (width, height) = (grid.width() as usize, grid.height() as usize);

    for (y, line) in text.lines().take(height).enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record = match reader(line, false).records().next() {
            Some(Ok(record)) => record,
            Some(Err(e)) => {
                warn!("Skipping unreadable {} row {}: {}", layer.name(), y, e);
                continue;
            }
            None => continue,
        };

        for (x, raw) in record.iter().take(width).enumerate() {
            let cell = match decode_map_cell(raw) {
                Some(cell) if layer.allows_doors() => cell,
                Some(cell) => cell.without_door(),
                None => {
                    warn!("Invalid cell value {:?} at ({}, {}) on {}", raw, x, y, layer.name());
                    Cell::Empty
                }
            };
            grid.set(x as i32, y as i32, cell);
        }
    }
}

/// Decode one map cell. `None` means the value is malformed.
fn decode_map_cell(raw: &str) -> Option<Cell> {
    let raw = raw.trim();
    if raw == "0" {
        return Some(Cell::Empty);
    }
    match raw.strip_prefix('D') {
        Some("") => Some(Cell::door(DEFAULT_DOOR_TEXTURE, KeyType::None)),
        Some(rest) => {
            let texture_id = parse_texture_id(rest.strip_prefix('|')?)?;
            Some(Cell::door(texture_id, KeyType::None))
        }
        None => parse_texture_id(raw).map(Cell::wall),
    }
}

/// Append the rows of an `entities` table to `level`.
///
/// The first row is a header. Rows with fewer than three columns or with
/// unreadable coordinates are skipped; an empty `enemyType` means none.
pub fn decode_entities(text: &str, level: &mut LevelData) {
    for record in reader(text, true).records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping unreadable entities row: {}", e);
                continue;
            }
        };
        if record.len() < 3 {
            continue;
        }

        let (Ok(x), Ok(y)) = (record[1].trim().parse::<f64>(), record[2].trim().parse::<f64>())
        else {
            warn!("Skipping entity with invalid position: {:?}", record);
            continue;
        };

        let enemy_type = record
            .get(3)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        level.add_entity(EntityRecord {
            class_name: record[0].to_string(),
            x,
            y,
            enemy_type,
        });
    }
}
