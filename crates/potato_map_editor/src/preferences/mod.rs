//! Editor preferences and persistent settings
//!
//! Manages user preferences stored in platform-specific config directories:
//! - Windows: %APPDATA%/potato/potato_map_editor/config/
//! - Linux: ~/.config/potato_map_editor/
//! - macOS: ~/Library/Application Support/io.github.potato.potato_map_editor/

use directories::ProjectDirs;
use potato_map_core::{Layer, TextureId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::EditorTool;

/// Maximum number of recent files to track
pub const MAX_RECENT_FILES: usize = 10;

const PREFERENCES_FILE: &str = "preferences.toml";

/// Failure reading or writing the preferences file
#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("No config directory available on this platform")]
    NoConfigDir,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid preferences file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Editor preferences that persist across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorPreferences {
    /// Version for future migrations
    pub version: u32,

    // Tool defaults for new sessions
    pub default_tool: EditorTool,
    pub default_layer: Layer,
    pub default_texture: TextureId,

    // Startup behavior
    pub auto_open_last_file: bool,

    // Recent Files
    pub recent_files: Vec<RecentFile>,
}

/// A recent level entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentFile {
    pub path: String,
    pub name: String,
    pub last_opened: u64, // Unix timestamp
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            version: 1,
            default_tool: EditorTool::Draw,
            default_layer: Layer::Wall,
            default_texture: 1,
            auto_open_last_file: false,
            recent_files: Vec::new(),
        }
    }
}

impl EditorPreferences {
    /// Path of the preferences file in the platform config directory
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("io.github", "potato", "potato_map_editor")
            .map(|dirs| dirs.config_dir().join(PREFERENCES_FILE))
    }

    /// Load preferences from the config directory, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            warn!("No config directory available, using default preferences");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(preferences) => preferences,
            Err(e) => {
                warn!("Failed to load preferences from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save preferences to the config directory
    pub fn save(&self) -> Result<(), PreferencesError> {
        let path = Self::config_path().ok_or(PreferencesError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Load preferences from a specific file
    pub fn load_from(path: &Path) -> Result<Self, PreferencesError> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Save preferences to a specific file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), PreferencesError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        info!("Saved preferences to {}", path.display());
        Ok(())
    }

    /// Add a level to the recent files list
    pub fn add_recent_file(&mut self, path: &Path) {
        use std::time::{SystemTime, UNIX_EPOCH};

        let path_str = path.to_string_lossy().to_string();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| path_str.clone());

        // Remove if already exists (will re-add at front)
        self.recent_files.retain(|f| f.path != path_str);

        self.recent_files.insert(
            0,
            RecentFile {
                path: path_str,
                name,
                last_opened: SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or(0),
            },
        );

        self.recent_files.truncate(MAX_RECENT_FILES);
    }

    /// Remove a level from the recent list (e.g., if it no longer exists)
    pub fn remove_recent_file(&mut self, path: &str) {
        self.recent_files.retain(|f| f.path != path);
    }

    /// Get the most recently opened level
    pub fn last_file(&self) -> Option<&RecentFile> {
        self.recent_files.first()
    }

    /// Clear all recent files
    pub fn clear_recent_files(&mut self) {
        self.recent_files.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_files_move_to_front() {
        let mut preferences = EditorPreferences::default();

        preferences.add_recent_file(Path::new("levels/a.json"));
        preferences.add_recent_file(Path::new("levels/b"));
        preferences.add_recent_file(Path::new("levels/a.json"));

        let names: Vec<_> = preferences.recent_files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(preferences.last_file().map(|f| f.path.as_str()), Some("levels/a.json"));

        preferences.remove_recent_file("levels/a.json");
        assert_eq!(preferences.last_file().map(|f| f.name.as_str()), Some("b"));
        preferences.clear_recent_files();
        assert!(preferences.last_file().is_none());
    }

    #[test]
    fn test_recent_files_are_capped() {
        let mut preferences = EditorPreferences::default();
        for i in 0..(MAX_RECENT_FILES + 5) {
            preferences.add_recent_file(Path::new(&format!("level{}.json", i)));
        }

        assert_eq!(preferences.recent_files.len(), MAX_RECENT_FILES);
        assert_eq!(preferences.recent_files[0].name, format!("level{}", MAX_RECENT_FILES + 4));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(PREFERENCES_FILE);
        let mut preferences = EditorPreferences::default();
        preferences.default_tool = EditorTool::PlaceEntity;
        preferences.default_layer = Layer::Floor;
        preferences.auto_open_last_file = true;
        preferences.add_recent_file(Path::new("e1m1.json"));

        preferences.save_to(&path).unwrap();

        assert_eq!(EditorPreferences::load_from(&path).unwrap(), preferences);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let preferences: EditorPreferences = toml::from_str("default_texture = 7\n").unwrap();

        assert_eq!(preferences.default_texture, 7);
        assert_eq!(preferences.default_tool, EditorTool::Draw);
        assert!(preferences.recent_files.is_empty());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE);
        std::fs::write(&path, "default_tool = 3").unwrap();

        assert!(matches!(
            EditorPreferences::load_from(&path),
            Err(PreferencesError::Parse(_))
        ));
    }
}
