//! Scenario schema definitions.

use serde::{Deserialize, Serialize};
use tw_core::{Money, Terrain, TileColor};
use tw_engine::{TileLay, Timing};

/// Newest scenario format this crate reads.
pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub variant: Variant,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Policy name; the variant's default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_restriction: Option<String>,
    /// Lay schedule; the variant's default when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tile_lays: Vec<TileLay>,
    #[serde(default)]
    pub tiles: Vec<TileDef>,
    #[serde(default)]
    pub hexes: Vec<HexDef>,
    #[serde(default)]
    pub entities: Vec<EntityDef>,
    #[serde(default)]
    pub tokens: Vec<TokenDef>,
    #[serde(default)]
    pub phase: PhaseDef,
    #[serde(default = "default_bank")]
    pub bank: Money,
    /// Symbol of the entity whose turn it is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_entity: Option<String>,
    #[serde(default)]
    pub actions: Vec<ActionDef>,
}

fn default_currency() -> String {
    "${}".to_string()
}

fn default_bank() -> Money {
    12_000
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    #[default]
    Base,
    Ireland,
    G1817,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TileDef {
    pub name: String,
    pub color: TileColor,
    /// Compact path notation, e.g. `e0-c0` or `e1-e4:narrow`.
    #[serde(default)]
    pub paths: Vec<String>,
    #[serde(default)]
    pub cities: Vec<CityDef>,
    /// Town revenues.
    #[serde(default)]
    pub towns: Vec<Money>,
    #[serde(default)]
    pub borders: Vec<BorderDef>,
    #[serde(default)]
    pub upgrades: Vec<UpgradeDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    /// Copies in the supply. Ignored for preprinted tiles.
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default)]
    pub unlimited: bool,
    #[serde(default)]
    pub blocks_lay: bool,
}

fn default_count() -> usize {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CityDef {
    #[serde(default = "default_slots")]
    pub slots: usize,
    pub revenue: Money,
}

fn default_slots() -> usize {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BorderDef {
    pub edge: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terrain: Option<Terrain>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpgradeDef {
    pub cost: Money,
    #[serde(default)]
    pub terrain: Vec<Terrain>,
}

/// A board hex at axial coordinates. Neighbors are derived from the coordinates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HexDef {
    pub name: String,
    pub q: i32,
    pub r: i32,
    /// Preprinted tile; a blank white hex when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile: Option<TileDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    /// Game-specific markers such as `mine`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assignments: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityDef {
    Player {
        name: String,
        #[serde(default)]
        cash: Money,
    },
    Corporation {
        sym: String,
        name: String,
        #[serde(default)]
        cash: Money,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        home: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        owner: Option<String>,
        #[serde(default)]
        loans: u32,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        abilities: Vec<AbilityDef>,
    },
    Company {
        sym: String,
        name: String,
        #[serde(default)]
        min_price: Money,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        owner: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        abilities: Vec<AbilityDef>,
    },
}

impl EntityDef {
    /// The symbol other definitions refer to this entity by.
    pub fn sym(&self) -> &str {
        match self {
            EntityDef::Player { name, .. } => name,
            EntityDef::Corporation { sym, .. } | EntityDef::Company { sym, .. } => sym,
        }
    }

    pub fn owner(&self) -> Option<&str> {
        match self {
            EntityDef::Player { .. } => None,
            EntityDef::Corporation { owner, .. } | EntityDef::Company { owner, .. } => {
                owner.as_deref()
            }
        }
    }

    pub fn abilities(&self) -> &[AbilityDef] {
        match self {
            EntityDef::Player { .. } => &[],
            EntityDef::Corporation { abilities, .. } | EntityDef::Company { abilities, .. } => {
                abilities
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AbilityDef {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub when: Vec<Timing>,
    #[serde(default)]
    pub passive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default)]
    pub closed_when_used_up: bool,
    #[serde(flatten)]
    pub kind: AbilityKindDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AbilityKindDef {
    TileLay {
        #[serde(default)]
        hexes: Vec<String>,
        #[serde(default)]
        tiles: Vec<String>,
        #[serde(default)]
        free: bool,
        #[serde(default)]
        discount: Money,
        #[serde(default)]
        cost: Money,
        #[serde(default)]
        reachable: bool,
        #[serde(default)]
        consume_tile_lay: bool,
    },
    Teleport {
        #[serde(default)]
        hexes: Vec<String>,
        #[serde(default)]
        tiles: Vec<String>,
        #[serde(default)]
        free_tile_lay: bool,
        #[serde(default)]
        cost: Money,
    },
    BlocksHexes {
        hexes: Vec<String>,
    },
    TileDiscount {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        terrain: Option<Terrain>,
        discount: Money,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hexes: Option<Vec<String>>,
    },
    TileIncome {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        terrain: Option<Terrain>,
        income: Money,
        #[serde(default)]
        owner_only: bool,
    },
}

impl AbilityKindDef {
    /// Hex names the ability refers to.
    pub fn hexes(&self) -> &[String] {
        match self {
            AbilityKindDef::TileLay { hexes, .. }
            | AbilityKindDef::Teleport { hexes, .. }
            | AbilityKindDef::BlocksHexes { hexes } => hexes,
            AbilityKindDef::TileDiscount { hexes, .. } => hexes.as_deref().unwrap_or_default(),
            AbilityKindDef::TileIncome { .. } => &[],
        }
    }
}

/// A station already on the map when the scenario starts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenDef {
    pub entity: String,
    pub hex: String,
    #[serde(default)]
    pub city: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhaseDef {
    pub name: String,
    pub tiles: Vec<TileColor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub status: Vec<String>,
}

impl Default for PhaseDef {
    fn default() -> Self {
        Self {
            name: "1".to_string(),
            tiles: vec![TileColor::Yellow],
            status: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionDef {
    /// Hand the turn to `entity` and reset the round.
    NewTurn { entity: String },
    LayTile {
        entity: String,
        hex: String,
        tile: String,
        #[serde(default)]
        rotation: u8,
        /// Entity paying for the lay when not the actor.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        spender: Option<String>,
    },
}
