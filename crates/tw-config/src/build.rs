//! Turning a validated scenario into a playable game.

use std::collections::HashMap;
use std::str::FromStr;

use tw_core::{Axial, CurrencyFormat, Edge, EntityId, HexId, TwError, TwResult};
use tw_engine::games::{G1817Rules, IrelandRules};
use tw_engine::{
    Ability, AbilityKind, BaseRules, Entities, Entity, GameState, Phase, Rules, TeleportAbility,
    TileDiscountAbility, TileIncomeAbility, TileLayAbility, TrackRestriction,
};
use tw_map::{Map, MapBuilder, Tile};

use crate::schema::{AbilityDef, AbilityKindDef, ActionDef, EntityDef, Scenario, TileDef, Variant};

/// Runtime state built from a scenario, ready for its actions to be replayed.
pub struct LoadedScenario {
    pub name: String,
    pub state: GameState,
    pub rules: Box<dyn Rules>,
    pub actions: Vec<ActionDef>,
}

impl std::fmt::Debug for LoadedScenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedScenario")
            .field("name", &self.name)
            .field("hexes", &self.state.map.hexes().len())
            .field("entities", &self.state.entities.len())
            .field("actions", &self.actions.len())
            .finish()
    }
}

pub fn build_rules(scenario: &Scenario) -> TwResult<Box<dyn Rules>> {
    let restriction = scenario
        .track_restriction
        .as_deref()
        .map(TrackRestriction::from_str)
        .transpose()?;
    let lays = (!scenario.tile_lays.is_empty()).then(|| scenario.tile_lays.clone());

    let rules: Box<dyn Rules> = match scenario.variant {
        Variant::Base => {
            let mut rules = BaseRules::default();
            if let Some(lays) = lays {
                rules.tile_lays = lays;
            }
            if let Some(policy) = restriction {
                rules.track_restriction = policy;
            }
            Box::new(rules)
        }
        Variant::Ireland => {
            let mut rules = IrelandRules::default();
            if let Some(lays) = lays {
                rules.tile_lays = lays;
            }
            if let Some(policy) = restriction {
                rules.track_restriction = policy;
            }
            Box::new(rules)
        }
        Variant::G1817 => {
            let mut rules = G1817Rules::default();
            if let Some(lays) = lays {
                rules.base.tile_lays = lays;
            }
            if let Some(policy) = restriction {
                rules.base.track_restriction = policy;
            }
            Box::new(rules)
        }
    };
    Ok(rules)
}

pub fn build_tile(def: &TileDef) -> TwResult<Tile> {
    let specs: Vec<&str> = def.paths.iter().map(String::as_str).collect();
    let mut tile = Tile::new(def.name.as_str(), def.color).with_paths(&specs)?;
    for city in &def.cities {
        tile = tile.with_city(city.slots, city.revenue);
    }
    for &revenue in &def.towns {
        tile = tile.with_town(revenue);
    }
    for border in &def.borders {
        tile = tile.with_border(Edge::new(border.edge)?, border.cost, border.terrain);
    }
    for upgrade in &def.upgrades {
        tile = tile.with_upgrade(upgrade.cost, upgrade.terrain.clone());
    }
    if let Some(label) = &def.label {
        tile = tile.with_label(label.as_str());
    }
    if let Some(location) = &def.location_name {
        tile = tile.with_location_name(location.as_str());
    }
    if def.unlimited {
        tile = tile.unlimited();
    }
    if def.blocks_lay {
        tile = tile.blocks_lay();
    }
    Ok(tile)
}

fn build_map(scenario: &Scenario) -> TwResult<Map> {
    let mut builder = MapBuilder::new();
    for hex in &scenario.hexes {
        let tile = match &hex.tile {
            Some(def) => build_tile(def)?,
            None => Tile::blank(),
        };
        let id = builder.add_hex(hex.name.as_str(), Axial::new(hex.q, hex.r), tile);
        if let Some(location) = &hex.location_name {
            builder.set_location_name(id, location.as_str());
        }
        for marker in &hex.assignments {
            builder.assign(id, marker.as_str());
        }
    }
    for def in &scenario.tiles {
        let copies = if def.unlimited { 1 } else { def.count };
        builder.add_tiles(build_tile(def)?, copies);
    }
    Ok(builder.build()?)
}

pub fn build_ability(def: &AbilityDef) -> Ability {
    let kind = match &def.kind {
        AbilityKindDef::TileLay {
            hexes,
            tiles,
            free,
            discount,
            cost,
            reachable,
            consume_tile_lay,
        } => AbilityKind::TileLay(TileLayAbility {
            hexes: hexes.clone(),
            tiles: tiles.clone(),
            free: *free,
            discount: *discount,
            cost: *cost,
            reachable: *reachable,
            consume_tile_lay: *consume_tile_lay,
        }),
        AbilityKindDef::Teleport {
            hexes,
            tiles,
            free_tile_lay,
            cost,
        } => AbilityKind::Teleport(TeleportAbility {
            hexes: hexes.clone(),
            tiles: tiles.clone(),
            free_tile_lay: *free_tile_lay,
            cost: *cost,
        }),
        AbilityKindDef::BlocksHexes { hexes } => AbilityKind::BlocksHexes {
            hexes: hexes.clone(),
        },
        AbilityKindDef::TileDiscount {
            terrain,
            discount,
            hexes,
        } => AbilityKind::TileDiscount(TileDiscountAbility {
            terrain: *terrain,
            discount: *discount,
            hexes: hexes.clone(),
        }),
        AbilityKindDef::TileIncome {
            terrain,
            income,
            owner_only,
        } => AbilityKind::TileIncome(TileIncomeAbility {
            terrain: *terrain,
            income: *income,
            owner_only: *owner_only,
        }),
    };

    let mut ability = Ability::new(kind).with_when(def.when.iter().copied());
    if def.passive {
        ability = ability.passive();
    }
    if let Some(count) = def.count {
        ability = ability.with_count(count);
    }
    if def.closed_when_used_up {
        ability = ability.closed_when_used_up();
    }
    ability
}

fn lookup(ids: &HashMap<&str, EntityId>, sym: &str) -> TwResult<EntityId> {
    ids.get(sym).copied().ok_or_else(|| TwError::NotFound {
        what: "Entity",
        name: sym.to_string(),
    })
}

fn hex_named(map: &Map, name: &str) -> TwResult<HexId> {
    map.hex_by_name(name)
        .map(|h| h.id)
        .ok_or_else(|| TwError::NotFound {
            what: "Hex",
            name: name.to_string(),
        })
}

fn build_entities(scenario: &Scenario, map: &Map) -> TwResult<Entities> {
    let mut entities = Entities::new();
    let mut ids = HashMap::new();
    for def in &scenario.entities {
        let mut entity = match def {
            EntityDef::Player { name, cash } => Entity::player(name.as_str()).with_cash(*cash),
            EntityDef::Corporation {
                sym,
                name,
                cash,
                home,
                loans,
                ..
            } => {
                let mut corp = Entity::corporation(sym.as_str(), name.as_str()).with_cash(*cash);
                if let Some(home) = home {
                    corp = corp.with_home(hex_named(map, home)?);
                }
                corp.loans = *loans;
                corp
            }
            EntityDef::Company {
                sym,
                name,
                min_price,
                ..
            } => Entity::company(sym.as_str(), name.as_str(), *min_price),
        };
        for ability in def.abilities() {
            entity = entity.with_ability(build_ability(ability));
        }
        ids.insert(def.sym(), entities.add(entity));
    }

    // Owners may be declared after what they own
    for def in &scenario.entities {
        if let Some(owner) = def.owner() {
            let owner = lookup(&ids, owner)?;
            entities.get_mut(lookup(&ids, def.sym())?)?.owner = Some(owner);
        }
    }
    Ok(entities)
}

/// Build the map, entities and rules a scenario describes.
pub fn build(scenario: &Scenario) -> TwResult<LoadedScenario> {
    let rules = build_rules(scenario)?;
    let mut map = build_map(scenario)?;
    let entities = build_entities(scenario, &map)?;

    for token in &scenario.tokens {
        let owner = entities
            .by_sym(&token.entity)
            .map(|e| e.id)
            .ok_or_else(|| TwError::NotFound {
                what: "Entity",
                name: token.entity.clone(),
            })?;
        let hex = hex_named(&map, &token.hex)?;
        map.place_token(owner, hex, token.city)?;
    }

    let mut state = GameState::new(map, entities, rules.as_ref());
    state.currency = CurrencyFormat::new(scenario.currency.as_str())?;
    state.bank.cash = scenario.bank;
    state.phase = Phase {
        name: scenario.phase.name.clone(),
        tiles: scenario.phase.tiles.clone(),
        status: scenario.phase.status.clone(),
    };
    if let Some(current) = &scenario.current_entity {
        let id = state
            .entities
            .by_sym(current)
            .map(|e| e.id)
            .ok_or_else(|| TwError::NotFound {
                what: "Entity",
                name: current.clone(),
            })?;
        state.current_entity = Some(id);
    }

    tracing::info!(
        scenario = %scenario.name,
        variant = ?scenario.variant,
        hexes = state.map.hexes().len(),
        entities = state.entities.len(),
        "scenario built"
    );
    Ok(LoadedScenario {
        name: scenario.name.clone(),
        state,
        rules,
        actions: scenario.actions.clone(),
    })
}
