#![allow(dead_code)]

use tw_core::{Axial, EntityId, HexId, TileColor, TileId};
use tw_engine::{BaseRules, Entities, Entity, GameState, LayTileAction, RoundState, Rules};
use tw_map::{MapBuilder, Tile};

pub const START_CASH: i64 = 200;

pub fn city(name: &str, color: TileColor, paths: &[&str]) -> Tile {
    Tile::new(name, color)
        .with_city(1, 20)
        .with_paths(paths)
        .unwrap()
}

pub fn track(name: &str, color: TileColor, paths: &[&str]) -> Tile {
    Tile::new(name, color).with_paths(paths).unwrap()
}

/// A column of hexes `H0`..`H{len-1}` running along edge 0.
/// `H0` holds the home city, with track leaving through edge 0.
pub fn column(len: i32) -> MapBuilder {
    let mut builder = MapBuilder::new();
    builder.add_hex(
        "H0",
        Axial::new(0, 0),
        city("home", TileColor::Yellow, &["c0-e0"]).preprinted(),
    );
    for r in 1..len {
        builder.add_blank_hex(format!("H{r}"), Axial::new(0, r));
    }
    builder
}

pub struct Fixture {
    pub state: GameState,
    pub round: RoundState,
    pub player: EntityId,
    pub corp: EntityId,
}

impl Fixture {
    /// A player owning one corporation with a station on `H0`.
    /// `extra` registers more entities (companies and such).
    pub fn new(builder: MapBuilder, extra: impl FnOnce(&mut Entities, EntityId, EntityId)) -> Self {
        Self::with_rules(builder, &BaseRules::default(), extra)
    }

    pub fn with_rules<R: Rules + ?Sized>(
        builder: MapBuilder,
        rules: &R,
        extra: impl FnOnce(&mut Entities, EntityId, EntityId),
    ) -> Self {
        let mut map = builder.build().unwrap();
        let mut entities = Entities::new();
        let player = entities.add(Entity::player("Ann").with_cash(START_CASH));
        let home = map.hex_by_name("H0").map(|h| h.id);
        let mut corp = Entity::corporation("GSWR", "Great Southern").with_cash(START_CASH);
        if let Some(home) = home {
            corp = corp.with_home(home);
        }
        let corp = entities.add(corp.with_owner(player));
        extra(&mut entities, player, corp);
        if let Some(home) = home {
            map.place_token(corp, home, 0).unwrap();
        }

        let mut state = GameState::new(map, entities, rules);
        state.bank.cash = 10_000;
        state.current_entity = Some(corp);
        Self {
            state,
            round: RoundState::new(),
            player,
            corp,
        }
    }

    pub fn simple(len: i32, tiles: Vec<Tile>) -> Self {
        let mut builder = column(len);
        for tile in tiles {
            builder.add_tile(tile);
        }
        Self::new(builder, |_, _, _| {})
    }

    pub fn hex(&self, name: &str) -> HexId {
        self.state.map.hex_by_name(name).unwrap().id
    }

    pub fn tile(&self, name: &str) -> TileId {
        self.state.map.available_tile_named(name).unwrap()
    }

    pub fn sym(&self, sym: &str) -> EntityId {
        self.state.entities.by_sym(sym).unwrap().id
    }

    pub fn action(&self, entity: EntityId, hex: &str, tile: &str, rotation: u8) -> LayTileAction {
        LayTileAction::new(entity, self.hex(hex), self.tile(tile), rotation)
    }

    pub fn cash(&self, entity: EntityId) -> i64 {
        self.state.entity(entity).unwrap().cash
    }

    pub fn tile_on(&self, hex: &str) -> &Tile {
        self.state.map.hex_tile(self.hex(hex)).unwrap()
    }
}

/// `H1` with all six neighbors: `H0` (home) on edge 3, `H2` on edge 0, and
/// `N1`, `N2`, `N4`, `N5` on the remaining edges.
pub fn flower(center: Tile) -> MapBuilder {
    let mut builder = MapBuilder::new();
    builder.add_hex(
        "H0",
        Axial::new(0, 0),
        city("home", TileColor::Yellow, &["c0-e0"]),
    );
    builder.add_hex("H1", Axial::new(0, 1), center);
    builder.add_blank_hex("H2", Axial::new(0, 2));
    builder.add_blank_hex("N1", Axial::new(-1, 2));
    builder.add_blank_hex("N2", Axial::new(-1, 1));
    builder.add_blank_hex("N4", Axial::new(1, 0));
    builder.add_blank_hex("N5", Axial::new(1, 1));
    builder
}
