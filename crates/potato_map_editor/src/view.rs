//! Draw list and texture catalog for front ends
//!
//! The session never draws. It produces a flat, ordered list of
//! [`DrawItem`]s in grid coordinates; a renderer multiplies by
//! [`CELL_SIZE`](crate::CELL_SIZE) and paints them in order.

use potato_map_core::{Cell, Color, KeyType, Layer, LevelData, TextureId};

use crate::INACTIVE_LAYER_ALPHA;

/// Regular wall textures
pub const WALL_TEXTURE_IDS: [TextureId; 4] = [6, 7, 10, 11];
/// Banner and flag walls
pub const BANNER_WALL_IDS: [TextureId; 2] = [4, 8];
/// Floor textures
pub const FLOOR_TEXTURE_IDS: [TextureId; 4] = [9, 10, 12, 13];

/// A door sprite sheet offered by the door texture picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorTexture {
    pub id: TextureId,
    pub name: &'static str,
}

/// Door textures in picker order
pub const DOOR_TEXTURES: [DoorTexture; 3] = [
    DoorTexture {
        id: 1,
        name: "Dirty Door",
    },
    DoorTexture {
        id: 2,
        name: "Metal Door",
    },
    DoorTexture {
        id: 3,
        name: "Wood Door",
    },
];

/// Look up a door texture by id
pub fn door_texture(id: TextureId) -> Option<&'static DoorTexture> {
    DOOR_TEXTURES.iter().find(|door| door.id == id)
}

/// Texture ids suggested for painting on `layer`
pub fn suggested_textures(layer: Layer) -> Vec<TextureId> {
    match layer {
        Layer::Wall => WALL_TEXTURE_IDS
            .iter()
            .chain(BANNER_WALL_IDS.iter())
            .copied()
            .collect(),
        Layer::Floor => FLOOR_TEXTURE_IDS.to_vec(),
    }
}

/// One thing to paint, in paint order
#[derive(Debug, Clone, PartialEq)]
pub enum DrawItem {
    /// A textured wall or floor tile
    Tile {
        x: u32,
        y: u32,
        texture_id: TextureId,
        alpha: f32,
        active: bool,
    },
    /// A door, filled with its key color then overlaid with its texture
    Door {
        x: u32,
        y: u32,
        texture_id: TextureId,
        key_type: KeyType,
        tint: Color,
        alpha: f32,
        active: bool,
    },
    /// The player spawn marker
    Spawn { x: i32, y: i32 },
    /// An entity marker drawn in the cell containing the entity
    Entity {
        cell_x: i32,
        cell_y: i32,
        label: String,
        position: (f64, f64),
    },
}

/// Short label for an entity marker: the last dotted segment of the class,
/// with `:<enemy_type>` appended when present
pub fn entity_label(class_name: &str, enemy_type: Option<&str>) -> String {
    let short = class_name.rsplit('.').next().unwrap_or(class_name);
    match enemy_type {
        Some(enemy_type) => format!("{}:{}", short, enemy_type),
        None => short.to_string(),
    }
}

fn door_tint(key_type: KeyType) -> Color {
    Color::from_hex(key_type.door_color()).unwrap_or(Color::rgb(150, 150, 150))
}

fn push_layer(items: &mut Vec<DrawItem>, level: &LevelData, layer: Layer, active: bool) {
    let alpha = if active { 1.0 } else { INACTIVE_LAYER_ALPHA };
    for (x, y, cell) in level.layer(layer).iter() {
        match cell {
            Cell::Empty => {}
            Cell::Wall { texture_id } => items.push(DrawItem::Tile {
                x,
                y,
                texture_id,
                alpha,
                active,
            }),
            Cell::Door {
                texture_id,
                key_type,
            } => items.push(DrawItem::Door {
                x,
                y,
                texture_id,
                key_type,
                tint: door_tint(key_type),
                alpha,
                active,
            }),
        }
    }
}

/// Build the draw list for `level` with `active_layer` on top
///
/// Order: inactive layer, active layer, spawn marker, entity markers.
pub fn draw_list(level: &LevelData, active_layer: Layer) -> Vec<DrawItem> {
    let mut items = Vec::new();
    push_layer(&mut items, level, active_layer.other(), false);
    push_layer(&mut items, level, active_layer, true);

    if let Some(spawn) = level.spawn_point {
        items.push(DrawItem::Spawn {
            x: spawn.x,
            y: spawn.y,
        });
    }

    items.extend(level.entities.iter().map(|entity| DrawItem::Entity {
        cell_x: entity.x.floor() as i32,
        cell_y: entity.y.floor() as i32,
        label: entity_label(&entity.class_name, entity.enemy_type.as_deref()),
        position: (entity.x, entity.y),
    }));

    items
}
