//! Cell contents for the wall and floor layers
//!
//! This module provides the tagged variants stored at each grid coordinate:
//! - `Cell` - Empty, Wall or Door
//! - `KeyType` - Lock requirement on a door (None, Red, Blue, Green)

/// Texture handle used by walls, doors and the ambient floor/ceiling slots.
///
/// Valid ids start at 1. `0` is reserved for "empty" in the map tables.
pub type TextureId = u32;

/// Lock requirement on a door
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyType {
    /// Opens without a key
    #[default]
    None,
    Red,
    Blue,
    Green,
}

impl KeyType {
    /// All key types in code order
    pub const ALL: [KeyType; 4] = [KeyType::None, KeyType::Red, KeyType::Blue, KeyType::Green];

    /// Numeric code used on the wire (None=0, Red=1, Blue=2, Green=3)
    pub fn code(&self) -> u8 {
        match self {
            KeyType::None => 0,
            KeyType::Red => 1,
            KeyType::Blue => 2,
            KeyType::Green => 3,
        }
    }

    /// Look up a key type from its wire code
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(KeyType::None),
            1 => Some(KeyType::Red),
            2 => Some(KeyType::Blue),
            3 => Some(KeyType::Green),
            _ => None,
        }
    }

    /// Get the display name of this key type
    pub fn name(&self) -> &'static str {
        match self {
            KeyType::None => "None",
            KeyType::Red => "Red",
            KeyType::Blue => "Blue",
            KeyType::Green => "Green",
        }
    }

    /// Tint used when drawing a door with this key requirement
    pub fn door_color(&self) -> &'static str {
        match self {
            KeyType::None => "#969696",
            KeyType::Red => "#c83232",
            KeyType::Blue => "#3232c8",
            KeyType::Green => "#32c832",
        }
    }
}

/// Content of a single grid cell on one layer
///
/// A `Door` is a specialized wall: it carries the same texture id plus a key
/// requirement. Only the wall layer may legally hold doors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Wall {
        texture_id: TextureId,
    },
    Door {
        texture_id: TextureId,
        key_type: KeyType,
    },
}

impl Cell {
    /// Create a plain wall cell
    pub fn wall(texture_id: TextureId) -> Self {
        Cell::Wall { texture_id }
    }

    /// Create a door cell
    pub fn door(texture_id: TextureId, key_type: KeyType) -> Self {
        Cell::Door {
            texture_id,
            key_type,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// True for walls and doors alike
    pub fn is_wall(&self) -> bool {
        !self.is_empty()
    }

    pub fn is_door(&self) -> bool {
        matches!(self, Cell::Door { .. })
    }

    /// Texture of a wall or door, `None` for empty cells.
    ///
    /// This is also the cell's identity for region fill: empty matches only
    /// empty, walls and doors match by texture id alone.
    pub fn texture_id(&self) -> Option<TextureId> {
        match self {
            Cell::Empty => None,
            Cell::Wall { texture_id } | Cell::Door { texture_id, .. } => Some(*texture_id),
        }
    }

    /// Key requirement if this is a door
    pub fn key_type(&self) -> Option<KeyType> {
        match self {
            Cell::Door { key_type, .. } => Some(*key_type),
            _ => None,
        }
    }

    /// Whether two cells belong to the same fill region
    pub fn fill_matches(&self, other: &Cell) -> bool {
        self.texture_id() == other.texture_id()
    }

    /// Turn a door into a plain wall with the same texture, dropping its key.
    ///
    /// Used when a door shows up somewhere only walls are allowed.
    pub fn without_door(self) -> Self {
        match self {
            Cell::Door { texture_id, .. } => Cell::Wall { texture_id },
            other => other,
        }
    }

    /// Get the display name of this cell kind
    pub fn name(&self) -> &'static str {
        match self {
            Cell::Empty => "Empty",
            Cell::Wall { .. } => "Wall",
            Cell::Door { .. } => "Door",
        }
    }
}
