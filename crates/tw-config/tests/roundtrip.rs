use tw_config::schema::*;
use tw_config::{ScenarioError, build, load_json, load_yaml, save_json, save_yaml};
use tw_core::{TileColor, TwError};
use tw_engine::Rules;

fn scenario() -> Scenario {
    Scenario {
        version: LATEST_VERSION,
        name: "Round trip".to_string(),
        variant: Variant::G1817,
        currency: "${}".to_string(),
        track_restriction: Some("restrictive".to_string()),
        tile_lays: Vec::new(),
        tiles: vec![TileDef {
            name: "57".to_string(),
            color: TileColor::Yellow,
            paths: vec!["c0-e0".to_string(), "c0-e3".to_string()],
            cities: vec![CityDef {
                slots: 1,
                revenue: 20,
            }],
            towns: Vec::new(),
            borders: Vec::new(),
            upgrades: Vec::new(),
            label: None,
            location_name: None,
            count: 4,
            unlimited: false,
            blocks_lay: false,
        }],
        hexes: vec![
            HexDef {
                name: "F13".to_string(),
                q: 0,
                r: 0,
                tile: None,
                location_name: Some("Pittsburgh".to_string()),
                assignments: Vec::new(),
            },
            HexDef {
                name: "F15".to_string(),
                q: 0,
                r: 1,
                tile: None,
                location_name: None,
                assignments: vec!["mine".to_string()],
            },
        ],
        entities: vec![
            EntityDef::Player {
                name: "Ann".to_string(),
                cash: 500,
            },
            EntityDef::Company {
                sym: "PSM".to_string(),
                name: "Pittsburgh Steel Mill".to_string(),
                min_price: 20,
                owner: Some("Ann".to_string()),
                abilities: vec![AbilityDef {
                    when: vec![tw_engine::Timing::OwningCorpOrTurn],
                    passive: false,
                    count: Some(1),
                    closed_when_used_up: true,
                    kind: AbilityKindDef::TileLay {
                        hexes: vec!["F13".to_string()],
                        tiles: Vec::new(),
                        free: true,
                        discount: 0,
                        cost: 0,
                        reachable: false,
                        consume_tile_lay: false,
                    },
                }],
            },
        ],
        tokens: Vec::new(),
        phase: PhaseDef::default(),
        bank: 9000,
        current_entity: None,
        actions: Vec::new(),
    }
}

#[test]
fn roundtrip_yaml() {
    let original = scenario();
    let path = std::env::temp_dir().join("tw_config_roundtrip.yaml");

    save_yaml(&path, &original).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(original, loaded);
}

#[test]
fn roundtrip_json() {
    let original = scenario();
    let path = std::env::temp_dir().join("tw_config_roundtrip.json");

    save_json(&path, &original).unwrap();
    let loaded = load_json(&path).unwrap();

    assert_eq!(original, loaded);
}

#[test]
fn invalid_scenarios_are_not_saved() {
    let mut bad = scenario();
    bad.current_entity = Some("NYC".to_string());
    let path = std::env::temp_dir().join("tw_config_invalid.yaml");

    let err = save_yaml(&path, &bad).unwrap_err();
    assert!(matches!(err, ScenarioError::Validation(_)));
}

#[test]
fn built_game_matches_the_scenario() {
    let loaded = build(&scenario()).unwrap();
    let state = &loaded.state;

    assert_eq!(state.map.pool().len(), 4);
    assert_eq!(state.bank.cash, 9000);
    let f15 = state.map.hex_by_name("F15").unwrap();
    assert!(f15.is_assigned("mine"));
    let psm = state.entities.by_sym("PSM").unwrap();
    assert_eq!(psm.owner, state.entities.by_sym("Ann").map(|e| e.id));
    assert_eq!(psm.abilities[0].owner, psm.id);
    assert_eq!(psm.abilities[0].count, Some(1));
    assert_eq!(
        loaded.rules.track_restriction(),
        tw_engine::TrackRestriction::Restrictive
    );
}

#[test]
fn unknown_policy_is_a_config_error() {
    let mut bad = scenario();
    bad.track_restriction = Some("lenient".to_string());
    let err = tw_config::build::build_rules(&bad).err().unwrap();
    assert_eq!(
        err,
        TwError::config("track restriction policy 'lenient' not found")
    );
}
