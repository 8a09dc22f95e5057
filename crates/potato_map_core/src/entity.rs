//! Entity records for placed objects in the level

use serde::{Deserialize, Serialize};

/// Class name of the enemy entity kind, the only kind that uses `enemy_type`
pub const ENEMY_ENTITY_CLASS: &str = "potato.entities.EnemyEntity";

/// An entity placed in the level
///
/// Positions are in grid units and not snapped to the grid; the placement
/// tool puts entities at cell centers (`x + 0.5`, `y + 0.5`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRecord {
    /// Dotted class name (e.g. "potato.entities.HealthPack")
    pub class_name: String,
    pub x: f64,
    pub y: f64,
    /// Enemy variant, only meaningful for [`ENEMY_ENTITY_CLASS`]
    #[serde(default)]
    pub enemy_type: Option<String>,
}

impl EntityRecord {
    /// Create a new entity record
    pub fn new(class_name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            class_name: class_name.into(),
            x,
            y,
            enemy_type: None,
        }
    }

    /// Create an enemy entity of the given variant
    pub fn enemy(enemy_type: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            class_name: ENEMY_ENTITY_CLASS.to_string(),
            x,
            y,
            enemy_type: Some(enemy_type.into()),
        }
    }

    /// Check if this is the enemy entity kind
    pub fn is_enemy(&self) -> bool {
        self.class_name == ENEMY_ENTITY_CLASS
    }

    /// Whether the floored position of this entity is the grid cell `(x, y)`
    pub fn is_in_cell(&self, x: i32, y: i32) -> bool {
        self.x.floor() == f64::from(x) && self.y.floor() == f64::from(y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enemy_entity() {
        let entity = EntityRecord::enemy("grunt", 3.5, 4.5);

        assert!(entity.is_enemy());
        assert_eq!(entity.enemy_type.as_deref(), Some("grunt"));
        assert!(entity.is_in_cell(3, 4));
        assert!(!entity.is_in_cell(4, 4));
    }

    #[test]
    fn test_negative_positions_floor_down() {
        let entity = EntityRecord::new("potato.entities.Torch", -0.5, 0.25);
        assert!(entity.is_in_cell(-1, 0));
        assert!(!entity.is_in_cell(0, 0));
    }

    #[test]
    fn test_json_field_names() {
        let entity = EntityRecord::new("potato.entities.Key", 1.5, 2.5);
        let json = serde_json::to_value(&entity).unwrap();

        assert_eq!(json["className"], "potato.entities.Key");
        assert_eq!(json["x"], 1.5);
        assert!(json["enemyType"].is_null());
    }
}
