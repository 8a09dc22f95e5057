//! Tool and entity selection

use potato_map_core::{EntityRecord, ENEMY_ENTITY_CLASS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Available editor tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EditorTool {
    #[default]
    Draw,
    Erase,
    PlaceSpawn,
    PlaceEntity,
    PlaceDoor,
    Fill,
}

impl EditorTool {
    pub const ALL: [EditorTool; 6] = [
        EditorTool::Draw,
        EditorTool::Erase,
        EditorTool::PlaceSpawn,
        EditorTool::PlaceEntity,
        EditorTool::PlaceDoor,
        EditorTool::Fill,
    ];

    /// Mode name shown in the status line
    pub fn mode_name(&self) -> &'static str {
        match self {
            EditorTool::Draw => "DRAWING",
            EditorTool::Erase => "ERASING",
            EditorTool::PlaceSpawn => "PLACING_SPAWN",
            EditorTool::PlaceEntity => "PLACING_ENTITY",
            EditorTool::PlaceDoor => "PLACING_DOOR",
            EditorTool::Fill => "FILLING",
        }
    }

    /// Returns true if dragging repeats this tool on each entered cell
    pub fn supports_drag(&self) -> bool {
        !matches!(self, EditorTool::PlaceDoor)
    }
}

impl fmt::Display for EditorTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mode_name())
    }
}

/// Entity to place with [`EditorTool::PlaceEntity`]
///
/// Parsed from palette values of the form `"<class>"` or
/// `"potato.entities.EnemyEntity:<enemy_type>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityChoice {
    pub class_name: String,
    pub enemy_type: Option<String>,
}

impl EntityChoice {
    /// Parse a palette value. Returns `None` for an empty value.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        let choice = match value
            .strip_prefix(ENEMY_ENTITY_CLASS)
            .and_then(|rest| rest.strip_prefix(':'))
        {
            Some(enemy_type) => EntityChoice {
                class_name: ENEMY_ENTITY_CLASS.to_string(),
                enemy_type: Some(enemy_type.to_string()).filter(|t| !t.is_empty()),
            },
            None => EntityChoice {
                class_name: value.to_string(),
                enemy_type: None,
            },
        };
        Some(choice)
    }

    /// Build the record placed at the center of cell `(x, y)`
    pub fn to_record(&self, x: i32, y: i32) -> EntityRecord {
        EntityRecord {
            class_name: self.class_name.clone(),
            x: x as f64 + 0.5,
            y: y as f64 + 0.5,
            enemy_type: self.enemy_type.clone(),
        }
    }
}

impl fmt::Display for EntityChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.enemy_type {
            Some(enemy_type) => write!(f, "{}:{}", self.class_name, enemy_type),
            None => f.write_str(&self.class_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_names() {
        let names: Vec<_> = EditorTool::ALL.iter().map(|t| t.mode_name()).collect();
        assert_eq!(
            names,
            ["DRAWING", "ERASING", "PLACING_SPAWN", "PLACING_ENTITY", "PLACING_DOOR", "FILLING"]
        );
    }

    #[test]
    fn test_parse_plain_class() {
        let choice = EntityChoice::parse("potato.entities.Key").unwrap();

        assert_eq!(choice.class_name, "potato.entities.Key");
        assert_eq!(choice.enemy_type, None);
        assert_eq!(choice.to_string(), "potato.entities.Key");
    }

    #[test]
    fn test_parse_enemy_choice() {
        let choice = EntityChoice::parse("potato.entities.EnemyEntity:grunt").unwrap();

        assert_eq!(choice.class_name, ENEMY_ENTITY_CLASS);
        assert_eq!(choice.enemy_type.as_deref(), Some("grunt"));
        assert_eq!(choice.to_record(3, 4), EntityRecord::enemy("grunt", 3.5, 4.5));
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(EntityChoice::parse(""), None);
        assert_eq!(EntityChoice::parse("   "), None);
    }
}
