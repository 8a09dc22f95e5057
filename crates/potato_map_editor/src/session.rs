//! The editing session
//!
//! [`EditorSession`] owns one level and everything a front end needs to edit
//! it: the active tool and layer, palette selections, the in-progress drag
//! and the undo history. Front ends forward pointer events in canvas pixels
//! and repaint from [`EditorSession::draw_list`].

use potato_map_core::{
    flood_fill, Cell, CellChange, Color, ColorParseError, KeyType, Layer, LevelData, SpawnPoint,
    TextureId,
};
use potato_map_io::{decode_json, encode_json, LevelArchive, LevelFormat, LevelFormatError};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::commands::{
    BatchCellCommand, Command, CommandHistory, CompositeCommand, EntitiesCommand, LevelProperty,
    PropertyCommand, SpawnCommand,
};
use crate::preferences::EditorPreferences;
use crate::view::{draw_list, DrawItem};
use crate::{canvas_to_grid, EditorTool, EntityChoice};

/// Edits the session refuses to make
#[derive(Debug, Error)]
pub enum EditError {
    #[error("Doors can only be placed in the wall layer")]
    DoorOnFloorLayer,
    #[error("There is already a door at ({x}, {y})")]
    DoorAlreadyPresent { x: i32, y: i32 },
    #[error("No door at ({x}, {y})")]
    NoDoorAt { x: i32, y: i32 },
    #[error("Position ({x}, {y}) is outside the grid")]
    OutOfBounds { x: i32, y: i32 },
    #[error("Texture id must be at least 1, got {0}")]
    InvalidTexture(TextureId),
    #[error("Invalid color: {0}")]
    Color(#[from] ColorParseError),
    #[error(transparent)]
    Format(#[from] LevelFormatError),
}

/// Result of applying the active tool to one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The level changed
    Applied,
    /// The tool ran but there was nothing to change
    Unchanged,
    /// The position is outside the grid, or the tool does not apply there
    Ignored,
    /// A door may go here; pick a texture and call [`EditorSession::place_door`]
    DoorTextureRequested { x: i32, y: i32 },
}

/// An in-progress pointer drag
struct Stroke {
    tool: EditorTool,
    last_cell: (i32, i32),
    commands: Vec<Box<dyn Command>>,
}

/// Editing state for a single level
pub struct EditorSession {
    level: LevelData,
    layer: Layer,
    tool: EditorTool,
    selected_texture: TextureId,
    selected_entity: Option<EntityChoice>,
    cursor: Option<(i32, i32)>,
    stroke: Option<Stroke>,
    history: CommandHistory,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    /// Create a session with an empty level
    pub fn new() -> Self {
        Self::with_level(LevelData::new())
    }

    /// Create a session editing `level`
    pub fn with_level(level: LevelData) -> Self {
        Self {
            level,
            layer: Layer::default(),
            tool: EditorTool::default(),
            selected_texture: 1,
            selected_entity: None,
            cursor: None,
            stroke: None,
            history: CommandHistory::default(),
        }
    }

    /// Create a session using the default tool, layer and texture from `preferences`
    pub fn from_preferences(preferences: &EditorPreferences) -> Self {
        let mut session = Self::new();
        session.tool = preferences.default_tool;
        session.layer = preferences.default_layer;
        if preferences.default_texture >= 1 {
            session.selected_texture = preferences.default_texture;
        }
        session
    }

    pub fn level(&self) -> &LevelData {
        &self.level
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn tool(&self) -> EditorTool {
        self.tool
    }

    pub fn selected_texture(&self) -> TextureId {
        self.selected_texture
    }

    pub fn selected_entity(&self) -> Option<&EntityChoice> {
        self.selected_entity.as_ref()
    }

    /// Grid cell last seen under the pointer
    pub fn cursor(&self) -> Option<(i32, i32)> {
        self.cursor
    }

    pub fn is_dragging(&self) -> bool {
        self.stroke.is_some()
    }

    // ─── Tool and palette selection ──────────────────────────────────────────

    /// Activate `tool`, or return to [`EditorTool::Draw`] if it is already active
    pub fn toggle_tool(&mut self, tool: EditorTool) -> EditorTool {
        self.tool = if self.tool == tool {
            EditorTool::Draw
        } else {
            tool
        };
        debug!("Active tool: {}", self.tool);
        self.tool
    }

    pub fn set_layer(&mut self, layer: Layer) {
        self.layer = layer;
    }

    /// Select the texture used by Draw and Fill. The active tool is kept.
    pub fn select_texture(&mut self, texture_id: TextureId) -> Result<(), EditError> {
        if texture_id == 0 {
            return Err(EditError::InvalidTexture(texture_id));
        }
        self.selected_texture = texture_id;
        Ok(())
    }

    /// Select the entity to place from a palette value; an empty value clears it
    pub fn select_entity(&mut self, value: &str) -> Option<&EntityChoice> {
        self.selected_entity = EntityChoice::parse(value);
        self.selected_entity.as_ref()
    }

    // ─── Tool application ────────────────────────────────────────────────────

    /// Apply the active tool at grid cell `(x, y)`
    pub fn click_cell(&mut self, x: i32, y: i32) -> Result<ClickOutcome, EditError> {
        if !self.level.in_bounds(x, y) {
            return Ok(ClickOutcome::Ignored);
        }

        let outcome = match self.tool {
            EditorTool::Draw => self.paint_cell(x, y, Cell::wall(self.selected_texture), "Draw"),
            EditorTool::Erase => self.erase_cell(x, y),
            EditorTool::PlaceSpawn => self.place_spawn(x, y),
            EditorTool::PlaceEntity => self.place_entity(x, y),
            EditorTool::PlaceDoor => return self.request_door(x, y),
            EditorTool::Fill => self.fill_from(x, y),
        };
        Ok(outcome)
    }

    fn paint_cell(&mut self, x: i32, y: i32, cell: Cell, description: &str) -> ClickOutcome {
        let before = self.level.get_cell(x, y, self.layer);
        if before == cell {
            return ClickOutcome::Unchanged;
        }
        self.apply(Box::new(cell_command(self.layer, x, y, before, cell, description)));
        ClickOutcome::Applied
    }

    fn erase_cell(&mut self, x: i32, y: i32) -> ClickOutcome {
        let mut commands: Vec<Box<dyn Command>> = Vec::new();

        let before = self.level.get_cell(x, y, self.layer);
        if !before.is_empty() {
            commands.push(Box::new(cell_command(self.layer, x, y, before, Cell::Empty, "Erase")));
        }

        if self.level.entities_at(x, y).next().is_some() {
            let remaining = self
                .level
                .entities
                .iter()
                .filter(|entity| !entity.is_in_cell(x, y))
                .cloned()
                .collect();
            commands.push(Box::new(EntitiesCommand::new(
                self.level.entities.clone(),
                remaining,
                "Remove Entities",
            )));
        }

        if self.level.is_spawn_point(x, y) {
            commands.push(Box::new(SpawnCommand::new(self.level.spawn_point, None)));
        }

        match commands.len() {
            0 => ClickOutcome::Unchanged,
            1 => {
                let command = commands.remove(0);
                self.apply(command);
                ClickOutcome::Applied
            }
            _ => {
                self.apply(Box::new(CompositeCommand::new(commands, "Erase")));
                ClickOutcome::Applied
            }
        }
    }

    fn place_spawn(&mut self, x: i32, y: i32) -> ClickOutcome {
        let spawn = Some(SpawnPoint::new(x, y));
        if self.level.spawn_point == spawn {
            return ClickOutcome::Unchanged;
        }
        self.apply(Box::new(SpawnCommand::new(self.level.spawn_point, spawn)));
        ClickOutcome::Applied
    }

    fn place_entity(&mut self, x: i32, y: i32) -> ClickOutcome {
        let Some(choice) = &self.selected_entity else {
            return ClickOutcome::Unchanged;
        };
        let mut after = self.level.entities.clone();
        after.push(choice.to_record(x, y));
        self.apply(Box::new(EntitiesCommand::new(
            self.level.entities.clone(),
            after,
            "Place Entity",
        )));
        ClickOutcome::Applied
    }

    fn request_door(&mut self, x: i32, y: i32) -> Result<ClickOutcome, EditError> {
        if !self.layer.allows_doors() {
            return Err(EditError::DoorOnFloorLayer);
        }
        if self.level.get_cell(x, y, Layer::Wall).is_door() {
            return Err(EditError::DoorAlreadyPresent { x, y });
        }
        Ok(ClickOutcome::DoorTextureRequested { x, y })
    }

    fn fill_from(&mut self, x: i32, y: i32) -> ClickOutcome {
        let applied = flood_fill(
            &mut self.level,
            x,
            y,
            self.layer,
            Cell::wall(self.selected_texture),
        );
        if applied.is_empty() {
            return ClickOutcome::Unchanged;
        }
        debug!("Filled {} cells on {}", applied.len(), self.layer.name());
        let command = BatchCellCommand::from_changes(self.layer, applied, "Fill");
        self.record_applied(Box::new(command));
        ClickOutcome::Applied
    }

    // ─── Doors ───────────────────────────────────────────────────────────────

    /// Place a keyless door on the wall layer
    pub fn place_door(&mut self, x: i32, y: i32, texture_id: TextureId) -> Result<(), EditError> {
        if !self.level.in_bounds(x, y) {
            return Err(EditError::OutOfBounds { x, y });
        }
        if texture_id == 0 {
            return Err(EditError::InvalidTexture(texture_id));
        }
        let before = self.level.get_cell(x, y, Layer::Wall);
        if before.is_door() {
            return Err(EditError::DoorAlreadyPresent { x, y });
        }

        self.apply_wall_change(x, y, before, Cell::door(texture_id, KeyType::None), "Place Door");
        Ok(())
    }

    /// Change the key requirement of the door at `(x, y)`
    pub fn set_door_key_type(&mut self, x: i32, y: i32, key_type: KeyType) -> Result<(), EditError> {
        if !self.level.in_bounds(x, y) {
            return Err(EditError::OutOfBounds { x, y });
        }
        let before = self.level.get_cell(x, y, Layer::Wall);
        let Cell::Door {
            texture_id,
            key_type: current,
        } = before
        else {
            return Err(EditError::NoDoorAt { x, y });
        };
        if current != key_type {
            self.apply_wall_change(x, y, before, Cell::door(texture_id, key_type), "Set Door Key");
        }
        Ok(())
    }

    fn apply_wall_change(&mut self, x: i32, y: i32, before: Cell, after: Cell, description: &str) {
        self.apply(Box::new(cell_command(Layer::Wall, x, y, before, after, description)));
    }

    // ─── Pointer handling ────────────────────────────────────────────────────

    /// Press at canvas pixel `(px, py)`: apply the tool and start a drag
    pub fn pointer_down(&mut self, px: f64, py: f64) -> Result<ClickOutcome, EditError> {
        self.finish_stroke();
        let (x, y) = canvas_to_grid(px, py);
        self.cursor = Some((x, y));
        self.stroke = Some(Stroke {
            tool: self.tool,
            last_cell: (x, y),
            commands: Vec::new(),
        });
        self.click_cell(x, y)
    }

    /// Move to canvas pixel `(px, py)`; while dragging, apply the tool on
    /// each newly entered cell
    pub fn pointer_move(&mut self, px: f64, py: f64) -> Result<ClickOutcome, EditError> {
        let (x, y) = canvas_to_grid(px, py);
        self.cursor = Some((x, y));

        let Some(stroke) = &mut self.stroke else {
            return Ok(ClickOutcome::Ignored);
        };
        if stroke.last_cell == (x, y) || !stroke.tool.supports_drag() {
            return Ok(ClickOutcome::Ignored);
        }
        stroke.last_cell = (x, y);
        self.click_cell(x, y)
    }

    /// Release: the drag becomes a single undo step
    pub fn pointer_up(&mut self) {
        self.finish_stroke();
    }

    /// Pointer left the canvas: same as release
    pub fn pointer_leave(&mut self) {
        self.finish_stroke();
        self.cursor = None;
    }

    fn finish_stroke(&mut self) {
        let Some(mut stroke) = self.stroke.take() else {
            return;
        };
        match stroke.commands.len() {
            0 => {}
            1 => self.history.push_undo(stroke.commands.remove(0)),
            n => {
                debug!("Recorded {} edits as one {} stroke", n, stroke.tool);
                let description = stroke
                    .commands
                    .first()
                    .map(|c| c.description().to_string())
                    .unwrap_or_default();
                self.history
                    .push_undo(Box::new(CompositeCommand::new(stroke.commands, description)));
            }
        }
    }

    /// Execute `command` and record it
    fn apply(&mut self, command: Box<dyn Command>) {
        command.execute(&mut self.level);
        self.record_applied(command);
    }

    /// Record a command whose changes are already in the level
    fn record_applied(&mut self, command: Box<dyn Command>) {
        match &mut self.stroke {
            Some(stroke) => stroke.commands.push(command),
            None => self.history.push_undo(command),
        }
    }

    // ─── Level properties ────────────────────────────────────────────────────

    pub fn set_floor_color(&mut self, hex: &str) -> Result<(), EditError> {
        let color = Color::from_hex(hex)?;
        self.set_property(LevelProperty::FloorColor(color));
        Ok(())
    }

    pub fn set_ceiling_color(&mut self, hex: &str) -> Result<(), EditError> {
        let color = Color::from_hex(hex)?;
        self.set_property(LevelProperty::CeilingColor(color));
        Ok(())
    }

    pub fn set_fog_color(&mut self, hex: &str) -> Result<(), EditError> {
        let color = Color::from_hex(hex)?;
        self.set_property(LevelProperty::FogColor(color));
        Ok(())
    }

    /// Set or clear (`None`) the floor texture
    pub fn set_floor_texture(&mut self, texture_id: Option<TextureId>) -> Result<(), EditError> {
        check_texture(texture_id)?;
        self.set_property(LevelProperty::FloorTexture(texture_id));
        Ok(())
    }

    /// Set or clear (`None`) the ceiling texture
    pub fn set_ceiling_texture(&mut self, texture_id: Option<TextureId>) -> Result<(), EditError> {
        check_texture(texture_id)?;
        self.set_property(LevelProperty::CeilingTexture(texture_id));
        Ok(())
    }

    fn set_property(&mut self, value: LevelProperty) {
        self.finish_stroke();
        let command = PropertyCommand::capture(&self.level, value);
        if !command.is_noop() {
            self.history.execute(Box::new(command), &mut self.level);
        }
    }

    // ─── Level lifecycle ─────────────────────────────────────────────────────

    /// Discard the level and start from an empty one
    pub fn new_level(&mut self) {
        self.replace_level(LevelData::new());
        info!("Started a new level");
    }

    /// Replace the level with one decoded from a JSON document.
    /// On error the current level is kept.
    pub fn load_json(&mut self, json: &str) -> Result<(), EditError> {
        let mut level = LevelData::new();
        decode_json(json, &mut level)?;
        self.replace_level(level);
        Ok(())
    }

    /// Replace the level with the contents of a table archive
    pub fn load_archive(&mut self, archive: &LevelArchive) {
        self.replace_level(archive.to_level());
    }

    /// Replace the level with one loaded from disk
    pub fn load_path(&mut self, path: &Path) -> Result<(), EditError> {
        let level = potato_map_io::load_level(path)?;
        self.replace_level(level);
        Ok(())
    }

    pub fn save_json(&self) -> Result<String, EditError> {
        Ok(encode_json(&self.level)?)
    }

    pub fn save_archive(&self) -> Result<LevelArchive, EditError> {
        Ok(LevelArchive::encode(&self.level)?)
    }

    /// Save to disk, choosing the format from `path`
    pub fn save_path(&self, path: &Path) -> Result<LevelFormat, EditError> {
        Ok(potato_map_io::save_level(&self.level, path)?)
    }

    fn replace_level(&mut self, level: LevelData) {
        self.stroke = None;
        self.level = level;
        self.history.clear();
    }

    // ─── Undo/redo ───────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.finish_stroke();
        self.history.undo(&mut self.level)
    }

    pub fn redo(&mut self) -> bool {
        self.finish_stroke();
        self.history.redo(&mut self.level)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo() || self.stroke.as_ref().is_some_and(|s| !s.commands.is_empty())
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    // ─── Presentation ────────────────────────────────────────────────────────

    /// Status bar text for the pointer at grid `cursor` (`0, 0` when unknown)
    pub fn status_line(&self, cursor: Option<(i32, i32)>) -> String {
        let (x, y) = cursor.unwrap_or((0, 0));
        let spawn = match self.level.spawn_point {
            Some(spawn) => format!("Spawn: ({}, {})", spawn.x, spawn.y),
            None => "No spawn set".to_string(),
        };
        format!(
            "Position: {}, {} | Layer: {} | Selected Texture: {} | Mode: {} | {} | Entities: {}",
            x,
            y,
            self.layer.name(),
            self.selected_texture,
            self.tool.mode_name(),
            spawn,
            self.level.entities.len()
        )
    }

    /// Paint order for the current level with the active layer on top
    pub fn draw_list(&self) -> Vec<DrawItem> {
        draw_list(&self.level, self.layer)
    }
}

/// Single-cell change; callers have already checked `(x, y)` is in range
fn cell_command(
    layer: Layer,
    x: i32,
    y: i32,
    before: Cell,
    after: Cell,
    description: &str,
) -> BatchCellCommand {
    let change = CellChange {
        x: x as u32,
        y: y as u32,
        before,
        after,
    };
    BatchCellCommand::from_changes(layer, [change], description)
}

fn check_texture(texture_id: Option<TextureId>) -> Result<(), EditError> {
    match texture_id {
        Some(0) => Err(EditError::InvalidTexture(0)),
        _ => Ok(()),
    }
}
