//! Undo/redo command system

mod command;

pub use command::{
    BatchCellCommand, Command, CommandHistory, CompositeCommand, EntitiesCommand, LevelProperty,
    PropertyCommand, SpawnCommand,
};
