//! The four-table level archive
//!
//! Packaging the tables into a single download (zip or otherwise) is left to
//! the caller; this module only produces and consumes the named text blobs,
//! plus a plain directory layout for tools that work on disk.

use potato_map_core::{Layer, LevelData};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

use crate::tables::{
    decode_entities, decode_level_info, decode_map, encode_entities, encode_level_info,
    encode_map,
};
use crate::LevelFormatError;

pub const LEVEL_INFO_FILE: &str = "level_info.csv";
pub const WALL_MAP_FILE: &str = "wall_map.csv";
pub const FLOOR_MAP_FILE: &str = "floor_map.csv";
pub const ENTITIES_FILE: &str = "entities.csv";

/// A level stored as four CSV tables
///
/// Each table is optional; a missing table decodes as "not present" and the
/// matching part of the level keeps its defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelArchive {
    pub level_info: Option<String>,
    pub wall_map: Option<String>,
    pub floor_map: Option<String>,
    pub entities: Option<String>,
}

impl LevelArchive {
    /// All table file names, in archive order
    pub const FILE_NAMES: [&'static str; 4] =
        [LEVEL_INFO_FILE, WALL_MAP_FILE, FLOOR_MAP_FILE, ENTITIES_FILE];

    /// Encode every table of `level`
    pub fn encode(level: &LevelData) -> Result<Self, LevelFormatError> {
        Ok(Self {
            level_info: Some(encode_level_info(level)?),
            wall_map: Some(encode_map(&level.wall_map)?),
            floor_map: Some(encode_map(&level.floor_map)?),
            entities: Some(encode_entities(&level.entities)?),
        })
    }

    /// Clear `level` and populate it from the tables present
    pub fn decode_into(&self, level: &mut LevelData) {
        level.clear();

        if let Some(text) = &self.level_info {
            decode_level_info(text, level);
        }
        if let Some(text) = &self.wall_map {
            decode_map(text, level, Layer::Wall);
        }
        if let Some(text) = &self.floor_map {
            decode_map(text, level, Layer::Floor);
        }
        if let Some(text) = &self.entities {
            decode_entities(text, level);
        }
    }

    /// Decode into a fresh level
    pub fn to_level(&self) -> LevelData {
        let mut level = LevelData::new();
        self.decode_into(&mut level);
        level
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut Option<String>> {
        match name {
            LEVEL_INFO_FILE => Some(&mut self.level_info),
            WALL_MAP_FILE => Some(&mut self.wall_map),
            FLOOR_MAP_FILE => Some(&mut self.floor_map),
            ENTITIES_FILE => Some(&mut self.entities),
            _ => None,
        }
    }

    /// Get a table by file name
    pub fn get(&self, name: &str) -> Option<&str> {
        match name {
            LEVEL_INFO_FILE => self.level_info.as_deref(),
            WALL_MAP_FILE => self.wall_map.as_deref(),
            FLOOR_MAP_FILE => self.floor_map.as_deref(),
            ENTITIES_FILE => self.entities.as_deref(),
            _ => None,
        }
    }

    /// Store a table by file name. Returns `false` for names outside the archive.
    pub fn insert(&mut self, name: &str, text: String) -> bool {
        match self.slot_mut(name) {
            Some(slot) => {
                *slot = Some(text);
                true
            }
            None => {
                debug!("Ignoring unknown archive entry: {}", name);
                false
            }
        }
    }

    /// Iterate the tables that are present as `(file name, text)`
    pub fn files(&self) -> impl Iterator<Item = (&'static str, &str)> {
        Self::FILE_NAMES
            .into_iter()
            .filter_map(move |name| self.get(name).map(|text| (name, text)))
    }

    /// Write each present table into `dir`, creating it if needed
    pub fn write_dir(&self, dir: &Path) -> Result<(), LevelFormatError> {
        std::fs::create_dir_all(dir)?;
        for (name, text) in self.files() {
            std::fs::write(dir.join(name), text)?;
        }
        info!("Wrote level archive to {}", dir.display());
        Ok(())
    }

    /// Read the tables from `dir`; missing files are treated as absent tables
    pub fn read_dir(dir: &Path) -> Result<Self, LevelFormatError> {
        if !dir.is_dir() {
            return Err(LevelFormatError::UnsupportedFormat(format!(
                "{} is not a level archive directory",
                dir.display()
            )));
        }

        let mut archive = Self::default();
        for name in Self::FILE_NAMES {
            match std::fs::read_to_string(dir.join(name)) {
                Ok(text) => {
                    archive.insert(name, text);
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!("Archive {} has no {}", dir.display(), name);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(archive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use potato_map_core::{Cell, Color, EntityRecord, KeyType, SpawnPoint};
    use proptest::prelude::*;

    #[test]
    fn test_encode_fills_every_table() {
        let archive = LevelArchive::encode(&LevelData::new()).unwrap();

        let names: Vec<_> = archive.files().map(|(name, _)| name).collect();
        assert_eq!(names, LevelArchive::FILE_NAMES);
        assert_eq!(archive.get(WALL_MAP_FILE).unwrap().lines().count(), 32);
        assert_eq!(archive.get(ENTITIES_FILE), Some("class,x,y,enemyType\n"));
    }

    #[test]
    fn test_door_key_is_lost() {
        let mut level = LevelData::new();
        level.set_cell(2, 2, Cell::door(4, KeyType::Red), Layer::Wall);

        let loaded = LevelArchive::encode(&level).unwrap().to_level();

        assert_eq!(loaded.get_cell(2, 2, Layer::Wall), Cell::door(4, KeyType::None));
    }

    #[test]
    fn test_missing_tables_default() {
        let mut archive = LevelArchive::default();
        assert!(archive.insert(WALL_MAP_FILE, "3,0,3\n".to_string()));
        assert!(!archive.insert("readme.txt", "hello".to_string()));

        let mut level = LevelData::new();
        level.add_entity(EntityRecord::new("stale", 0.5, 0.5));
        level.fog_color = Color::rgb(0, 0, 0);
        archive.decode_into(&mut level);

        assert_eq!(level.get_cell(0, 0, Layer::Wall), Cell::wall(3));
        assert_eq!(level.get_cell(2, 0, Layer::Wall), Cell::wall(3));
        assert!(level.entities.is_empty());
        assert_eq!(level.fog_color, Color::FOG);
    }

    #[test]
    fn test_directory_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("level");
        let mut level = LevelData::new();
        level.set_cell(1, 1, Cell::wall(2), Layer::Floor);
        level.set_spawn_point(Some(SpawnPoint::new(1, 1)));

        LevelArchive::encode(&level).unwrap().write_dir(&target).unwrap();
        std::fs::remove_file(target.join(ENTITIES_FILE)).unwrap();
        let archive = LevelArchive::read_dir(&target).unwrap();

        assert!(archive.entities.is_none());
        assert_eq!(archive.to_level(), level);
    }

    #[test]
    fn test_read_dir_rejects_files() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(
            LevelArchive::read_dir(file.path()),
            Err(LevelFormatError::UnsupportedFormat(_))
        ));
    }

    fn any_cell(allow_doors: bool) -> BoxedStrategy<Cell> {
        let walls = prop_oneof![Just(Cell::Empty), (1u32..500).prop_map(Cell::wall)];
        if allow_doors {
            prop_oneof![walls, (1u32..500).prop_map(|t| Cell::door(t, KeyType::None))].boxed()
        } else {
            walls.boxed()
        }
    }

    prop_compose! {
        fn any_level()(
            walls in proptest::collection::vec(any_cell(true), 1024),
            floors in proptest::collection::vec(any_cell(false), 1024),
            colors in proptest::array::uniform9(any::<u8>()),
            floor_texture in proptest::option::of(1u32..64),
            spawn in proptest::option::of((-4i32..40, -4i32..40)),
            entities in proptest::collection::vec(
                ("[a-z]{1,6}(\\.[A-Za-z]{1,8}){0,2}", -1000.0f64..1000.0, -1000.0f64..1000.0,
                 proptest::option::of("[a-z]{1,8}")),
                0..8,
            ),
        ) -> LevelData {
            let mut level = LevelData::new();
            for (idx, (wall, floor)) in walls.into_iter().zip(floors).enumerate() {
                let (x, y) = ((idx % 32) as i32, (idx / 32) as i32);
                level.set_cell(x, y, wall, Layer::Wall);
                level.set_cell(x, y, floor, Layer::Floor);
            }
            level.floor_color = Color::rgb(colors[0], colors[1], colors[2]);
            level.ceiling_color = Color::rgb(colors[3], colors[4], colors[5]);
            level.fog_color = Color::rgb(colors[6], colors[7], colors[8]);
            level.floor_texture_id = floor_texture;
            level.spawn_point = spawn.map(|(x, y)| SpawnPoint::new(x, y));
            level.entities = entities
                .into_iter()
                .map(|(class_name, x, y, enemy_type)| EntityRecord { class_name, x, y, enemy_type })
                .collect();
            level
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_archive_round_trip(level in any_level()) {
            let archive = LevelArchive::encode(&level).unwrap();
            prop_assert_eq!(archive.to_level(), level);
        }
    }
}
