use proptest::prelude::*;
use std::collections::HashSet;
use tw_core::{Axial, Edge, EntityId, Terrain, TileColor};
use tw_map::{Connectivity, MapBuilder, MapError, PathRef, Tile, WalkOptions};

fn e(n: u8) -> Edge {
    Edge::new(n).unwrap()
}

#[test]
fn lay_moves_tokens_and_borders() {
    let mut builder = MapBuilder::new();
    let printed = Tile::new("city", TileColor::Yellow)
        .with_city(1, 20)
        .with_paths(&["c0-e0"])
        .unwrap()
        .with_border(e(0), Some(40), Some(Terrain::Water));
    let hex = builder.add_hex("B2", Axial::new(0, 0), printed);
    builder.add_blank_hex("B4", Axial::new(0, 1));
    let green = builder.add_tile(
        Tile::new("14", TileColor::Green)
            .with_city(2, 30)
            .with_paths(&["c0-e0", "c0-e3"])
            .unwrap(),
    );
    let mut map = builder.build().unwrap();
    let corp = EntityId::from_index(0);
    let token = map.place_token(corp, hex, 0).unwrap();
    let old = map.hex(hex).unwrap().tile();
    let version = map.version();

    map.update_tile_lists(green, old).unwrap();
    map.lay(hex, green).unwrap();

    assert!(map.version() > version);
    let tile = map.hex_tile(hex).unwrap();
    assert_eq!(tile.id, green);
    assert_eq!(tile.cities[0].tokens, vec![token]);
    assert_eq!(tile.borders.len(), 1);
    assert!(map.tile(old).unwrap().hex().is_none());
    assert_eq!(map.token(token).unwrap().location.unwrap().hex, hex);
    // Preprinted tiles do not go back into the supply
    assert!(!map.is_available(old));
    assert!(!map.is_available(green));
}

#[test]
fn unlimited_tiles_are_replenished() {
    let mut builder = MapBuilder::new();
    let hex = builder.add_blank_hex("C3", Axial::new(0, 0));
    let tile = builder.add_tile(
        Tile::new("X", TileColor::Yellow)
            .with_paths(&["e0-e3"])
            .unwrap()
            .unlimited(),
    );
    let mut map = builder.build().unwrap();
    let old = map.hex(hex).unwrap().tile();

    map.update_tile_lists(tile, old).unwrap();
    map.lay(hex, tile).unwrap();

    assert_eq!(map.pool().len(), 1);
    assert_eq!(map.available_tile_named("X").map(|id| id != tile), Some(true));
}

#[test]
fn shared_border_removed_on_both_sides() {
    let mut builder = MapBuilder::new();
    let a = builder.add_hex(
        "D1",
        Axial::new(0, 0),
        Tile::blank().with_border(e(0), Some(20), Some(Terrain::Mountain)),
    );
    let b = builder.add_hex(
        "D3",
        Axial::new(0, 1),
        Tile::blank().with_border(e(3), Some(20), Some(Terrain::Mountain)),
    );
    let mut map = builder.build().unwrap();

    let removed = map.remove_shared_border(a, e(0)).unwrap();
    assert_eq!(removed.map(|border| border.cost), Some(Some(20)));
    assert!(map.hex_tile(a).unwrap().borders.is_empty());
    assert!(map.hex_tile(b).unwrap().borders.is_empty());
    assert_eq!(map.remove_shared_border(a, e(0)).unwrap(), None);
}

#[test]
fn full_foreign_city_blocks_the_walk() {
    let mut builder = MapBuilder::new();
    let home = builder.add_hex(
        "E1",
        Axial::new(0, 0),
        Tile::new("home", TileColor::Yellow)
            .with_city(1, 20)
            .with_paths(&["c0-e0"])
            .unwrap(),
    );
    let middle = builder.add_hex(
        "E3",
        Axial::new(0, 1),
        Tile::new("57", TileColor::Yellow)
            .with_city(1, 20)
            .with_paths(&["e3-c0", "c0-e0"])
            .unwrap(),
    );
    let far = builder.add_hex(
        "E5",
        Axial::new(0, 2),
        Tile::new("9", TileColor::Yellow)
            .with_paths(&["e3-e0"])
            .unwrap(),
    );
    let mut map = builder.build().unwrap();
    let us = EntityId::from_index(0);
    let them = EntityId::from_index(1);
    map.place_token(us, home, 0).unwrap();

    let open = Connectivity::compute(&map, us, WalkOptions::default());
    assert!(open.is_reachable(far));

    map.place_token(them, middle, 0).unwrap();
    let blocked = Connectivity::compute(&map, us, WalkOptions::default());
    assert!(blocked.is_path_connected(PathRef { hex: middle, index: 0 }));
    assert!(!blocked.is_reachable(far));

    let ignoring = Connectivity::compute(
        &map,
        us,
        WalkOptions {
            skip_track: None,
            ignore_tokens: true,
        },
    );
    assert!(ignoring.is_reachable(far));
}

#[test]
fn cannot_overfill_a_city() {
    let mut builder = MapBuilder::new();
    let hex = builder.add_hex(
        "F1",
        Axial::new(0, 0),
        Tile::new("city", TileColor::Yellow).with_city(1, 20),
    );
    let mut map = builder.build().unwrap();
    map.place_token(EntityId::from_index(0), hex, 0).unwrap();
    assert!(matches!(
        map.place_token(EntityId::from_index(1), hex, 0),
        Err(MapError::CityFull { .. })
    ));
    assert!(matches!(
        map.place_token(EntityId::from_index(1), hex, 4),
        Err(MapError::NoSuchCity { .. })
    ));
}

#[test]
fn removing_a_token_frees_the_slot() {
    let mut builder = MapBuilder::new();
    let hex = builder.add_hex(
        "G1",
        Axial::new(0, 0),
        Tile::new("city", TileColor::Yellow).with_city(1, 20),
    );
    let mut map = builder.build().unwrap();
    let corp = EntityId::from_index(0);
    let token = map.place_token(corp, hex, 0).unwrap();
    map.remove_token(token).unwrap();

    assert!(!map.token(token).unwrap().is_placed());
    assert!(map.hex_tile(hex).unwrap().cities[0].tokens.is_empty());
    // The unplaced token is reused
    assert_eq!(map.place_token(corp, hex, 0).unwrap(), token);
}

const SUPPLY: [&str; 3] = ["9", "8", "7"];

fn supply_map() -> tw_map::Map {
    let mut builder = MapBuilder::new();
    for r in 0..4 {
        builder.add_blank_hex(format!("H{r}"), Axial::new(0, r));
    }
    builder.add_tiles(Tile::new("9", TileColor::Yellow), 3);
    builder.add_tiles(Tile::new("8", TileColor::Yellow), 2);
    builder.add_tile(Tile::new("7", TileColor::Yellow).unlimited());
    builder.build().unwrap()
}

proptest! {
    /// Every tile is on one hex or in the supply, never both.
    #[test]
    fn laid_tiles_leave_the_supply(
        moves in proptest::collection::vec((0usize..4, 0usize..3), 1..20)
    ) {
        let mut map = supply_map();
        let copies_of_9 = 3;

        for (row, pick) in moves {
            let Some(tile) = map.available_tile_named(SUPPLY[pick]) else {
                continue;
            };
            let hex = map.hexes()[row].id;
            let old = map.hex(hex).unwrap().tile();
            map.update_tile_lists(tile, old).unwrap();
            map.lay(hex, tile).unwrap();

            let pool: HashSet<_> = map.pool().iter().copied().collect();
            prop_assert_eq!(pool.len(), map.pool().len());
            for id in &pool {
                prop_assert!(map.tile(*id).unwrap().hex().is_none());
            }
            for hex in map.hexes() {
                prop_assert_eq!(map.tile(hex.tile()).unwrap().hex(), Some(hex.id));
            }
            let loose = map
                .tiles()
                .iter()
                .filter(|t| !t.preprinted && t.hex().is_none())
                .count();
            prop_assert_eq!(loose, pool.len());
            let nines = map.tiles().iter().filter(|t| t.name == "9").count();
            prop_assert_eq!(nines, copies_of_9);
            prop_assert!(map.available_tile_named("7").is_some());
        }
    }
}
