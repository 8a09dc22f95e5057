//! Command pattern for undo/redo

use potato_map_core::{
    Cell, CellChange, Color, EntityRecord, Layer, LevelData, SpawnPoint, TextureId,
};
use std::collections::HashMap;

/// A command that can be undone/redone
pub trait Command: Send + Sync {
    /// Execute the command (do/redo)
    fn execute(&self, level: &mut LevelData);
    /// Undo the command
    fn undo(&self, level: &mut LevelData);
    /// Get a description of the command
    fn description(&self) -> &str;
}

/// Command for batch cell changes on one layer (painting strokes, fills, etc.)
pub struct BatchCellCommand {
    pub layer: Layer,
    /// Changes: (x, y) -> (old_cell, new_cell)
    pub changes: HashMap<(u32, u32), (Cell, Cell)>,
    description: String,
}

impl BatchCellCommand {
    /// Create a new batch cell command
    pub fn new(
        layer: Layer,
        changes: HashMap<(u32, u32), (Cell, Cell)>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            layer,
            changes,
            description: description.into(),
        }
    }

    /// Create from an ordered list of applied changes.
    ///
    /// A cell touched more than once keeps its first `before` and last `after`;
    /// cells that end up unchanged are dropped.
    pub fn from_changes(
        layer: Layer,
        applied: impl IntoIterator<Item = CellChange>,
        description: impl Into<String>,
    ) -> Self {
        let mut changes: HashMap<(u32, u32), (Cell, Cell)> = HashMap::new();
        for change in applied {
            changes
                .entry((change.x, change.y))
                .and_modify(|(_, after)| *after = change.after)
                .or_insert((change.before, change.after));
        }
        changes.retain(|_, (before, after)| before != after);
        Self::new(layer, changes, description)
    }
}

impl Command for BatchCellCommand {
    fn execute(&self, level: &mut LevelData) {
        let grid = level.layer_mut(self.layer);
        for ((x, y), (_, new_cell)) in &self.changes {
            grid.set(*x as i32, *y as i32, *new_cell);
        }
    }

    fn undo(&self, level: &mut LevelData) {
        let grid = level.layer_mut(self.layer);
        for ((x, y), (old_cell, _)) in &self.changes {
            grid.set(*x as i32, *y as i32, *old_cell);
        }
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Command replacing the whole entity list
///
/// Entities have no identity beyond their position in the list, so the
/// before/after lists are stored whole.
pub struct EntitiesCommand {
    pub before: Vec<EntityRecord>,
    pub after: Vec<EntityRecord>,
    description: String,
}

impl EntitiesCommand {
    pub fn new(
        before: Vec<EntityRecord>,
        after: Vec<EntityRecord>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            before,
            after,
            description: description.into(),
        }
    }
}

impl Command for EntitiesCommand {
    fn execute(&self, level: &mut LevelData) {
        level.entities = self.after.clone();
    }

    fn undo(&self, level: &mut LevelData) {
        level.entities = self.before.clone();
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Command for moving or clearing the spawn point
pub struct SpawnCommand {
    pub old_spawn: Option<SpawnPoint>,
    pub new_spawn: Option<SpawnPoint>,
}

impl SpawnCommand {
    pub fn new(old_spawn: Option<SpawnPoint>, new_spawn: Option<SpawnPoint>) -> Self {
        Self {
            old_spawn,
            new_spawn,
        }
    }
}

impl Command for SpawnCommand {
    fn execute(&self, level: &mut LevelData) {
        level.set_spawn_point(self.new_spawn);
    }

    fn undo(&self, level: &mut LevelData) {
        level.set_spawn_point(self.old_spawn);
    }

    fn description(&self) -> &str {
        if self.new_spawn.is_some() {
            "Place Spawn"
        } else {
            "Clear Spawn"
        }
    }
}

/// A single level-wide property value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelProperty {
    FloorColor(Color),
    CeilingColor(Color),
    FogColor(Color),
    FloorTexture(Option<TextureId>),
    CeilingTexture(Option<TextureId>),
}

impl LevelProperty {
    /// Read the current value of the same property from `level`
    pub fn current(&self, level: &LevelData) -> Self {
        match self {
            LevelProperty::FloorColor(_) => LevelProperty::FloorColor(level.floor_color),
            LevelProperty::CeilingColor(_) => LevelProperty::CeilingColor(level.ceiling_color),
            LevelProperty::FogColor(_) => LevelProperty::FogColor(level.fog_color),
            LevelProperty::FloorTexture(_) => LevelProperty::FloorTexture(level.floor_texture_id),
            LevelProperty::CeilingTexture(_) => {
                LevelProperty::CeilingTexture(level.ceiling_texture_id)
            }
        }
    }

    fn apply(&self, level: &mut LevelData) {
        match *self {
            LevelProperty::FloorColor(color) => level.floor_color = color,
            LevelProperty::CeilingColor(color) => level.ceiling_color = color,
            LevelProperty::FogColor(color) => level.fog_color = color,
            LevelProperty::FloorTexture(id) => level.floor_texture_id = id,
            LevelProperty::CeilingTexture(id) => level.ceiling_texture_id = id,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            LevelProperty::FloorColor(_) => "Set Floor Color",
            LevelProperty::CeilingColor(_) => "Set Ceiling Color",
            LevelProperty::FogColor(_) => "Set Fog Color",
            LevelProperty::FloorTexture(_) => "Set Floor Texture",
            LevelProperty::CeilingTexture(_) => "Set Ceiling Texture",
        }
    }
}

/// Command for changing a level property
pub struct PropertyCommand {
    pub old_value: LevelProperty,
    pub new_value: LevelProperty,
}

impl PropertyCommand {
    /// Capture the current value from `level` as the undo state
    pub fn capture(level: &LevelData, new_value: LevelProperty) -> Self {
        Self {
            old_value: new_value.current(level),
            new_value,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.old_value == self.new_value
    }
}

impl Command for PropertyCommand {
    fn execute(&self, level: &mut LevelData) {
        self.new_value.apply(level);
    }

    fn undo(&self, level: &mut LevelData) {
        self.old_value.apply(level);
    }

    fn description(&self) -> &str {
        self.new_value.label()
    }
}

/// Several commands undone and redone as one step
pub struct CompositeCommand {
    commands: Vec<Box<dyn Command>>,
    description: String,
}

impl CompositeCommand {
    pub fn new(commands: Vec<Box<dyn Command>>, description: impl Into<String>) -> Self {
        Self {
            commands,
            description: description.into(),
        }
    }
}

impl Command for CompositeCommand {
    fn execute(&self, level: &mut LevelData) {
        for command in &self.commands {
            command.execute(level);
        }
    }

    fn undo(&self, level: &mut LevelData) {
        for command in self.commands.iter().rev() {
            command.undo(level);
        }
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Stores command history for undo/redo
#[derive(Default)]
pub struct CommandHistory {
    /// Stack of commands that have been executed
    undo_stack: Vec<Box<dyn Command>>,
    /// Stack of commands that have been undone
    redo_stack: Vec<Box<dyn Command>>,
}

impl CommandHistory {
    /// Execute a command and add it to history
    pub fn execute(&mut self, command: Box<dyn Command>, level: &mut LevelData) {
        command.execute(level);
        self.undo_stack.push(command);
        self.redo_stack.clear(); // Clear redo stack on new command
    }

    /// Undo the last command. Returns `false` if there was nothing to undo.
    pub fn undo(&mut self, level: &mut LevelData) -> bool {
        match self.undo_stack.pop() {
            Some(command) => {
                command.undo(level);
                self.redo_stack.push(command);
                true
            }
            None => false,
        }
    }

    /// Redo the last undone command. Returns `false` if there was nothing to redo.
    pub fn redo(&mut self, level: &mut LevelData) -> bool {
        match self.redo_stack.pop() {
            Some(command) => {
                command.execute(level);
                self.undo_stack.push(command);
                true
            }
            None => false,
        }
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get description of command to undo
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|c| c.description())
    }

    /// Get description of command to redo
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|c| c.description())
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Push a command directly onto the undo stack without executing it.
    /// Use this when the changes have already been applied (e.g., fills).
    pub fn push_undo(&mut self, command: Box<dyn Command>) {
        self.undo_stack.push(command);
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use potato_map_core::KeyType;

    fn change(x: u32, y: u32, before: Cell, after: Cell) -> CellChange {
        CellChange {
            x,
            y,
            before,
            after,
        }
    }

    #[test]
    fn test_batch_merges_repeated_cells() {
        let command = BatchCellCommand::from_changes(
            Layer::Wall,
            [
                change(1, 1, Cell::Empty, Cell::wall(2)),
                change(1, 1, Cell::wall(2), Cell::wall(3)),
                change(2, 2, Cell::Empty, Cell::wall(2)),
                change(2, 2, Cell::wall(2), Cell::Empty),
            ],
            "Draw",
        );

        assert_eq!(command.changes.len(), 1);
        assert_eq!(command.changes[&(1, 1)], (Cell::Empty, Cell::wall(3)));
    }

    #[test]
    fn test_history_undo_redo() {
        let mut level = LevelData::new();
        let mut history = CommandHistory::default();
        let door = Cell::door(2, KeyType::Blue);

        history.execute(
            Box::new(BatchCellCommand::from_changes(
                Layer::Wall,
                [change(4, 4, Cell::Empty, door)],
                "Place Door",
            )),
            &mut level,
        );
        assert_eq!(level.get_cell(4, 4, Layer::Wall), door);
        assert_eq!(history.undo_description(), Some("Place Door"));

        assert!(history.undo(&mut level));
        assert_eq!(level.get_cell(4, 4, Layer::Wall), Cell::Empty);
        assert!(!history.can_undo());
        assert!(history.can_redo());
        assert_eq!(history.undo_description(), None);
        assert_eq!(history.redo_description(), Some("Place Door"));

        assert!(history.redo(&mut level));
        assert_eq!(level.get_cell(4, 4, Layer::Wall), door);
        assert!(!history.redo(&mut level));
    }

    #[test]
    fn test_new_command_clears_redo() {
        let mut level = LevelData::new();
        let mut history = CommandHistory::default();
        let spawn = Some(SpawnPoint::new(1, 2));

        history.execute(Box::new(SpawnCommand::new(None, spawn)), &mut level);
        history.undo(&mut level);
        history.push_undo(Box::new(SpawnCommand::new(None, None)));

        assert!(!history.can_redo());
        assert_eq!(history.undo_description(), Some("Clear Spawn"));
    }

    #[test]
    fn test_composite_undoes_in_reverse() {
        let mut level = LevelData::new();
        level.add_entity(EntityRecord::new("potato.entities.Key", 3.5, 3.5));
        level.set_cell(3, 3, Cell::wall(5), Layer::Floor);
        level.set_spawn_point(Some(SpawnPoint::new(3, 3)));
        let original = level.clone();

        let composite = CompositeCommand::new(
            vec![
                Box::new(BatchCellCommand::from_changes(
                    Layer::Floor,
                    [change(3, 3, Cell::wall(5), Cell::Empty)],
                    "Erase",
                )),
                Box::new(EntitiesCommand::new(level.entities.clone(), Vec::new(), "Erase")),
                Box::new(SpawnCommand::new(level.spawn_point, None)),
            ],
            "Erase",
        );
        composite.execute(&mut level);
        assert_eq!(level.wall_count(Layer::Floor), 0);
        assert!(level.entities.is_empty());
        assert_eq!(level.spawn_point, None);

        composite.undo(&mut level);
        assert_eq!(level, original);
    }

    #[test]
    fn test_property_command() {
        let mut level = LevelData::new();
        let command =
            PropertyCommand::capture(&level, LevelProperty::FogColor(Color::rgb(1, 2, 3)));
        assert!(!command.is_noop());
        assert_eq!(command.description(), "Set Fog Color");

        command.execute(&mut level);
        assert_eq!(level.fog_color, Color::rgb(1, 2, 3));
        command.undo(&mut level);
        assert_eq!(level.fog_color, Color::FOG);

        let same = PropertyCommand::capture(&level, LevelProperty::FloorTexture(None));
        assert!(same.is_noop());
    }
}
