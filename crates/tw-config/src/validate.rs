//! Scenario validation logic.

use std::collections::HashSet;
use std::str::FromStr;

use tw_core::{CurrencyFormat, EDGE_COUNT};
use tw_engine::TrackRestriction;
use tw_map::Path;

use crate::schema::{ActionDef, EntityDef, LATEST_VERSION, Scenario, TileDef};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn missing(id: &str, context: &str) -> ValidationError {
    ValidationError::MissingReference {
        id: id.to_string(),
        context: context.to_string(),
    }
}

fn invalid(field: String, value: impl ToString, reason: impl ToString) -> ValidationError {
    ValidationError::InvalidValue {
        field,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }
    if let Err(err) = CurrencyFormat::new(scenario.currency.as_str()) {
        return Err(invalid("currency".to_string(), &scenario.currency, err));
    }
    if let Some(policy) = &scenario.track_restriction {
        if let Err(err) = TrackRestriction::from_str(policy) {
            return Err(invalid("track_restriction".to_string(), policy, err));
        }
    }

    let mut tile_names = HashSet::new();
    for tile in &scenario.tiles {
        validate_tile(tile, "tiles")?;
        tile_names.insert(tile.name.as_str());
    }

    let mut hex_names = HashSet::new();
    let mut coords = HashSet::new();
    for hex in &scenario.hexes {
        if !hex_names.insert(hex.name.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: hex.name.clone(),
                context: "hexes".to_string(),
            });
        }
        if !coords.insert((hex.q, hex.r)) {
            return Err(ValidationError::DuplicateId {
                id: format!("{},{}", hex.q, hex.r),
                context: format!("hex coordinates of {}", hex.name),
            });
        }
        if let Some(tile) = &hex.tile {
            validate_tile(tile, &format!("hexes[{}].tile", hex.name))?;
        }
    }

    let mut syms = HashSet::new();
    for entity in &scenario.entities {
        if !syms.insert(entity.sym()) {
            return Err(ValidationError::DuplicateId {
                id: entity.sym().to_string(),
                context: "entities".to_string(),
            });
        }
    }

    for entity in &scenario.entities {
        if let Some(owner) = entity.owner() {
            if !syms.contains(owner) {
                return Err(missing(owner, &format!("owner of {}", entity.sym())));
            }
        }
        if let EntityDef::Corporation {
            home: Some(home), ..
        } = entity
        {
            if !hex_names.contains(home.as_str()) {
                return Err(missing(home, &format!("home of {}", entity.sym())));
            }
        }
        for ability in entity.abilities() {
            for hex in ability.kind.hexes() {
                if !hex_names.contains(hex.as_str()) {
                    return Err(missing(hex, &format!("ability of {}", entity.sym())));
                }
            }
        }
    }

    for token in &scenario.tokens {
        if !syms.contains(token.entity.as_str()) {
            return Err(missing(&token.entity, "token entity"));
        }
        if !hex_names.contains(token.hex.as_str()) {
            return Err(missing(&token.hex, "token hex"));
        }
    }

    if let Some(current) = &scenario.current_entity {
        if !syms.contains(current.as_str()) {
            return Err(missing(current, "current_entity"));
        }
    }

    for (index, action) in scenario.actions.iter().enumerate() {
        let context = format!("actions[{index}]");
        match action {
            ActionDef::NewTurn { entity } => {
                if !syms.contains(entity.as_str()) {
                    return Err(missing(entity, &context));
                }
            }
            ActionDef::LayTile {
                entity,
                hex,
                tile,
                rotation,
                spender,
            } => {
                for sym in std::iter::once(entity).chain(spender) {
                    if !syms.contains(sym.as_str()) {
                        return Err(missing(sym, &context));
                    }
                }
                if !hex_names.contains(hex.as_str()) {
                    return Err(missing(hex, &context));
                }
                if !tile_names.contains(tile.as_str()) {
                    return Err(missing(tile, &context));
                }
                if *rotation >= EDGE_COUNT {
                    return Err(invalid(
                        format!("{context}.rotation"),
                        rotation,
                        "must be 0-5",
                    ));
                }
            }
        }
    }

    Ok(())
}

fn validate_tile(tile: &TileDef, context: &str) -> Result<(), ValidationError> {
    for spec in &tile.paths {
        if let Err(err) = Path::parse(spec) {
            return Err(invalid(format!("{context}[{}].paths", tile.name), spec, err));
        }
    }
    for border in &tile.borders {
        if border.edge >= EDGE_COUNT {
            return Err(invalid(
                format!("{context}[{}].borders", tile.name),
                border.edge,
                "edge must be 0-5",
            ));
        }
    }
    if tile.count == 0 && !tile.unlimited {
        return Err(invalid(
            format!("{context}[{}].count", tile.name),
            tile.count,
            "at least one copy is needed",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{HexDef, PhaseDef, TokenDef, Variant};
    use tw_core::TileColor;

    fn scenario() -> Scenario {
        Scenario {
            version: LATEST_VERSION,
            name: "test".to_string(),
            variant: Variant::Base,
            currency: "£{}".to_string(),
            track_restriction: None,
            tile_lays: Vec::new(),
            tiles: vec![TileDef {
                name: "9".to_string(),
                color: TileColor::Yellow,
                paths: vec!["e0-e3".to_string()],
                cities: Vec::new(),
                towns: Vec::new(),
                borders: Vec::new(),
                upgrades: Vec::new(),
                label: None,
                location_name: None,
                count: 2,
                unlimited: false,
                blocks_lay: false,
            }],
            hexes: vec![HexDef {
                name: "A1".to_string(),
                q: 0,
                r: 0,
                tile: None,
                location_name: None,
                assignments: Vec::new(),
            }],
            entities: vec![EntityDef::Player {
                name: "Ann".to_string(),
                cash: 100,
            }],
            tokens: Vec::new(),
            phase: PhaseDef::default(),
            bank: 1000,
            current_entity: None,
            actions: Vec::new(),
        }
    }

    #[test]
    fn minimal_scenario_is_valid() {
        validate_scenario(&scenario()).unwrap();
    }

    #[test]
    fn newer_versions_are_rejected() {
        let mut s = scenario();
        s.version = LATEST_VERSION + 1;
        assert_eq!(
            validate_scenario(&s),
            Err(ValidationError::UnsupportedVersion {
                version: LATEST_VERSION + 1
            })
        );
    }

    #[test]
    fn hexes_must_not_share_coordinates() {
        let mut s = scenario();
        let mut twin = s.hexes[0].clone();
        twin.name = "A3".to_string();
        s.hexes.push(twin);
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::DuplicateId { .. })
        ));
    }

    #[test]
    fn bad_paths_are_reported() {
        let mut s = scenario();
        s.tiles[0].paths.push("e0-x9".to_string());
        let err = validate_scenario(&s).unwrap_err();
        assert!(err.to_string().contains("tiles[9].paths"));
    }

    #[test]
    fn unknown_policy_is_invalid() {
        let mut s = scenario();
        s.track_restriction = Some("lenient".to_string());
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::InvalidValue { ref field, .. }) if field == "track_restriction"
        ));
    }

    #[test]
    fn tokens_need_known_entities() {
        let mut s = scenario();
        s.tokens.push(TokenDef {
            entity: "GSWR".to_string(),
            hex: "A1".to_string(),
            city: 0,
        });
        assert_eq!(
            validate_scenario(&s),
            Err(missing("GSWR", "token entity"))
        );
    }

    #[test]
    fn actions_need_known_tiles() {
        let mut s = scenario();
        s.actions.push(ActionDef::LayTile {
            entity: "Ann".to_string(),
            hex: "A1".to_string(),
            tile: "57".to_string(),
            rotation: 0,
            spender: None,
        });
        assert_eq!(validate_scenario(&s), Err(missing("57", "actions[0]")));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::schema::{EntityDef, HexDef, PhaseDef, Variant};
    use proptest::prelude::*;
    use tw_core::TileColor;

    fn with_lay(rotation: u8) -> Scenario {
        Scenario {
            version: LATEST_VERSION,
            name: "lay".to_string(),
            variant: Variant::Base,
            currency: "${}".to_string(),
            track_restriction: None,
            tile_lays: Vec::new(),
            tiles: vec![TileDef {
                name: "9".to_string(),
                color: TileColor::Yellow,
                paths: vec!["e0-e3".to_string()],
                cities: Vec::new(),
                towns: Vec::new(),
                borders: Vec::new(),
                upgrades: Vec::new(),
                label: None,
                location_name: None,
                count: 1,
                unlimited: false,
                blocks_lay: false,
            }],
            hexes: vec![HexDef {
                name: "A1".to_string(),
                q: 0,
                r: 0,
                tile: None,
                location_name: None,
                assignments: Vec::new(),
            }],
            entities: vec![EntityDef::Player {
                name: "Ann".to_string(),
                cash: 0,
            }],
            tokens: Vec::new(),
            phase: PhaseDef::default(),
            bank: 0,
            current_entity: None,
            actions: vec![ActionDef::LayTile {
                entity: "Ann".to_string(),
                hex: "A1".to_string(),
                tile: "9".to_string(),
                rotation,
                spender: None,
            }],
        }
    }

    proptest! {
        #[test]
        fn rotation_must_name_an_edge(rotation in any::<u8>()) {
            let result = validate_scenario(&with_lay(rotation));
            prop_assert_eq!(result.is_ok(), rotation < EDGE_COUNT);
        }
    }
}
