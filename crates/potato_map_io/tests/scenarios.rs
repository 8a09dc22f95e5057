use potato_map_core::{flood_fill, Cell, EntityRecord, KeyType, Layer, LevelData, SpawnPoint};
use potato_map_io::{decode_json, encode_json, LevelArchive, ENTITIES_FILE};

#[test]
fn fill_single_wall_then_save_both_ways() {
    let mut level = LevelData::new();
    level.set_cell(5, 5, Cell::wall(3), Layer::Wall);

    flood_fill(&mut level, 5, 5, Layer::Wall, Cell::wall(7));

    let from_json = potato_map_io::load_level_from_str(&encode_json(&level).unwrap()).unwrap();
    let from_archive = LevelArchive::encode(&level).unwrap().to_level();
    for loaded in [from_json, from_archive] {
        assert_eq!(loaded.get_cell(5, 5, Layer::Wall), Cell::wall(7));
        assert_eq!(loaded.wall_count(Layer::Wall), 1);
    }
}

#[test]
fn keyed_door_survives_json_but_not_archive() {
    let mut level = LevelData::new();
    level.set_cell(2, 2, Cell::door(4, KeyType::Red), Layer::Wall);

    let mut from_json = LevelData::new();
    decode_json(&encode_json(&level).unwrap(), &mut from_json).unwrap();
    let from_archive = LevelArchive::encode(&level).unwrap().to_level();

    assert_eq!(from_json.get_cell(2, 2, Layer::Wall), Cell::door(4, KeyType::Red));
    assert_eq!(from_archive.get_cell(2, 2, Layer::Wall), Cell::door(4, KeyType::None));
}

#[test]
fn enemy_entity_round_trips_through_entities_table() {
    let mut level = LevelData::new();
    let enemy = EntityRecord {
        class_name: "potato.entities.EnemyEntity".to_string(),
        x: 3.5,
        y: 4.5,
        enemy_type: Some("grunt".to_string()),
    };
    level.add_entity(enemy.clone());

    let archive = LevelArchive::encode(&level).unwrap();
    let mut only_entities = LevelArchive::default();
    only_entities.insert(ENTITIES_FILE, archive.entities.clone().unwrap());

    assert_eq!(only_entities.to_level().entities, vec![enemy]);
}

#[test]
fn converting_between_formats_keeps_unkeyed_levels() {
    let mut level = LevelData::new();
    for x in 0..32 {
        level.set_cell(x, 0, Cell::wall(6), Layer::Wall);
        level.set_cell(x, 31, Cell::wall(6), Layer::Wall);
    }
    level.set_cell(10, 0, Cell::door(2, KeyType::None), Layer::Wall);
    flood_fill(&mut level, 4, 4, Layer::Floor, Cell::wall(9));
    level.floor_texture_id = Some(9);
    level.ceiling_texture_id = Some(13);
    level.set_spawn_point(Some(SpawnPoint::new(16, 16)));
    level.add_entity(EntityRecord::enemy("guard", 8.5, 8.5));
    level.add_entity(EntityRecord::new("potato.entities.Treasure", 20.5, 3.5));

    // JSON -> archive -> JSON
    let json = encode_json(&level).unwrap();
    let via_json = potato_map_io::load_level_from_str(&json).unwrap();
    let via_archive = LevelArchive::encode(&via_json).unwrap().to_level();

    assert_eq!(via_archive, level);
    assert_eq!(encode_json(&via_archive).unwrap(), json);
}

#[test]
fn decoding_always_starts_from_a_clear_level() {
    let mut level = LevelData::new();
    level.set_cell(0, 0, Cell::wall(1), Layer::Floor);
    level.add_entity(EntityRecord::new("stale", 0.5, 0.5));

    decode_json("{}", &mut level).unwrap();
    assert_eq!(level, LevelData::new());

    level.set_cell(0, 0, Cell::wall(1), Layer::Floor);
    LevelArchive::default().decode_into(&mut level);
    assert_eq!(level, LevelData::new());
}
