//! Loading and saving levels on disk
//!
//! The format is picked from the path: `*.json` files hold the JSON document,
//! directories (or extension-less paths when saving) hold the table archive.
//!
//! # Example
//!
//! ```rust,ignore
//! use potato_map_io::{load_level, save_level};
//!
//! let level = load_level(Path::new("levels/e1m1.json"))?;
//! save_level(&level, Path::new("levels/e1m1"))?; // writes the four CSV tables
//! ```

use potato_map_core::LevelData;
use std::path::Path;
use tracing::info;

use crate::{decode_json, encode_json, LevelArchive, LevelFormatError};

/// On-disk representation of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelFormat {
    /// Single JSON document
    Json,
    /// Directory of four CSV tables
    Archive,
}

impl LevelFormat {
    /// Pick the format for `path`, or `None` if it is neither
    pub fn from_path(path: &Path) -> Option<Self> {
        if path.is_dir() {
            return Some(LevelFormat::Archive);
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Some(LevelFormat::Json),
            None => Some(LevelFormat::Archive),
            Some(_) => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LevelFormat::Json => "JSON document",
            LevelFormat::Archive => "table archive",
        }
    }
}

fn format_for(path: &Path) -> Result<LevelFormat, LevelFormatError> {
    LevelFormat::from_path(path)
        .ok_or_else(|| LevelFormatError::UnsupportedFormat(path.display().to_string()))
}

/// Load a level from a `.json` file or an archive directory
pub fn load_level(path: &Path) -> Result<LevelData, LevelFormatError> {
    let level = match format_for(path)? {
        LevelFormat::Json => load_level_from_str(&std::fs::read_to_string(path)?)?,
        LevelFormat::Archive => LevelArchive::read_dir(path)?.to_level(),
    };
    info!("Loaded level from {}", path.display());
    Ok(level)
}

/// Save a level, choosing the format from `path`
pub fn save_level(level: &LevelData, path: &Path) -> Result<LevelFormat, LevelFormatError> {
    let format = format_for(path)?;
    match format {
        LevelFormat::Json => {
            std::fs::write(path, encode_json(level)?)?;
            info!("Saved level to {}", path.display());
        }
        LevelFormat::Archive => LevelArchive::encode(level)?.write_dir(path)?,
    }
    Ok(format)
}

/// Load a level from a JSON string
pub fn load_level_from_str(json: &str) -> Result<LevelData, LevelFormatError> {
    let mut level = LevelData::new();
    decode_json(json, &mut level)?;
    Ok(level)
}

/// Load a level from JSON bytes
pub fn load_level_from_bytes(bytes: &[u8]) -> Result<LevelData, LevelFormatError> {
    let text =
        std::str::from_utf8(bytes).map_err(|e| LevelFormatError::InvalidFormat(e.to_string()))?;
    load_level_from_str(text)
}

/// Load a level from a reader producing JSON
pub fn load_level_from_reader<R: std::io::Read>(
    mut reader: R,
) -> Result<LevelData, LevelFormatError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    load_level_from_str(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use potato_map_core::{Cell, KeyType, Layer};

    #[test]
    fn test_format_from_path() {
        let dir = tempfile::tempdir().unwrap();

        assert_eq!(LevelFormat::from_path(dir.path()), Some(LevelFormat::Archive));
        assert_eq!(LevelFormat::from_path(Path::new("a/level.JSON")), Some(LevelFormat::Json));
        assert_eq!(LevelFormat::from_path(Path::new("a/level")), Some(LevelFormat::Archive));
        assert_eq!(LevelFormat::from_path(Path::new("a/level.zip")), None);
    }

    #[test]
    fn test_save_and_load_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let mut level = LevelData::new();
        level.set_cell(3, 4, Cell::door(2, KeyType::Blue), Layer::Wall);

        let json_path = dir.path().join("level.json");
        assert_eq!(save_level(&level, &json_path).unwrap(), LevelFormat::Json);
        assert_eq!(load_level(&json_path).unwrap(), level);

        let archive_path = dir.path().join("level");
        assert_eq!(save_level(&level, &archive_path).unwrap(), LevelFormat::Archive);
        let loaded = load_level(&archive_path).unwrap();
        assert_eq!(loaded.get_cell(3, 4, Layer::Wall), Cell::door(2, KeyType::None));
    }

    #[test]
    fn test_unsupported_extension() {
        let result = save_level(&LevelData::new(), Path::new("level.zip"));
        assert!(matches!(result, Err(LevelFormatError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_load_from_bytes_and_reader() {
        let json = encode_json(&LevelData::new()).unwrap();

        assert_eq!(load_level_from_bytes(json.as_bytes()).unwrap(), LevelData::new());
        assert_eq!(load_level_from_reader(json.as_bytes()).unwrap(), LevelData::new());
        assert!(matches!(
            load_level_from_bytes(&[0xff, 0xfe]),
            Err(LevelFormatError::InvalidFormat(_))
        ));
    }
}
