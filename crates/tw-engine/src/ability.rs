//! Special powers held by companies and corporations.

use serde::{Deserialize, Serialize};
use tw_core::{EntityId, Money, Terrain};

/// Step windows an ability can be used in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timing {
    Any,
    Track,
    SpecialTrack,
    Token,
    /// During the owning corporation's turn, whatever the step.
    OwningCorpOrTurn,
}

/// Lay a tile on one of `hexes`, optionally restricted to `tiles`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TileLayAbility {
    pub hexes: Vec<String>,
    pub tiles: Vec<String>,
    pub free: bool,
    pub discount: Money,
    /// Surcharge added to the lay.
    pub cost: Money,
    /// The hex must be reachable by the payer's network.
    pub reachable: bool,
    pub consume_tile_lay: bool,
}

/// Lay a tile without a track connection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TeleportAbility {
    pub hexes: Vec<String>,
    pub tiles: Vec<String>,
    pub free_tile_lay: bool,
    pub cost: Money,
}

/// Reduce border or terrain costs of one terrain type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileDiscountAbility {
    pub terrain: Option<Terrain>,
    pub discount: Money,
    /// `None` applies everywhere.
    pub hexes: Option<Vec<String>>,
}

/// Pay the owner whenever a tile is laid, or only on one terrain type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileIncomeAbility {
    pub terrain: Option<Terrain>,
    pub income: Money,
    /// Only pays when the owner is the one building.
    pub owner_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbilityKind {
    TileLay(TileLayAbility),
    Teleport(TeleportAbility),
    BlocksHexes { hexes: Vec<String> },
    TileDiscount(TileDiscountAbility),
    TileIncome(TileIncomeAbility),
}

/// Discriminant of [`AbilityKind`], used to filter lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbilityType {
    TileLay,
    Teleport,
    BlocksHexes,
    TileDiscount,
    TileIncome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ability {
    /// Set when the holding entity is registered.
    pub owner: EntityId,
    /// Empty means usable at any time.
    pub when: Vec<Timing>,
    pub passive: bool,
    /// Remaining uses; `None` is unlimited.
    pub count: Option<u32>,
    pub closed_when_used_up: bool,
    pub kind: AbilityKind,
}

impl Ability {
    pub fn new(kind: AbilityKind) -> Self {
        Self {
            owner: EntityId::from_index(0),
            when: Vec::new(),
            passive: false,
            count: None,
            closed_when_used_up: false,
            kind,
        }
    }

    pub fn with_when(mut self, when: impl IntoIterator<Item = Timing>) -> Self {
        self.when = when.into_iter().collect();
        self
    }

    pub fn passive(mut self) -> Self {
        self.passive = true;
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn closed_when_used_up(mut self) -> Self {
        self.closed_when_used_up = true;
        self
    }

    pub fn ability_type(&self) -> AbilityType {
        match self.kind {
            AbilityKind::TileLay(_) => AbilityType::TileLay,
            AbilityKind::Teleport(_) => AbilityType::Teleport,
            AbilityKind::BlocksHexes { .. } => AbilityType::BlocksHexes,
            AbilityKind::TileDiscount(_) => AbilityType::TileDiscount,
            AbilityKind::TileIncome(_) => AbilityType::TileIncome,
        }
    }

    pub fn active_at(&self, time: Timing) -> bool {
        if self.when.is_empty() || self.when.contains(&Timing::Any) || self.when.contains(&time) {
            return true;
        }
        self.when.contains(&Timing::OwningCorpOrTurn)
            && matches!(time, Timing::Track | Timing::SpecialTrack | Timing::Token)
    }

    /// True when a lay of `tile_name` on `hex_name` is covered by this ability.
    /// Empty lists do not restrict.
    pub fn matches_lay(&self, hex_name: &str, tile_name: &str) -> bool {
        let (hexes, tiles) = match &self.kind {
            AbilityKind::TileLay(a) => (&a.hexes, &a.tiles),
            AbilityKind::Teleport(a) => (&a.hexes, &a.tiles),
            _ => return false,
        };
        (hexes.is_empty() || hexes.iter().any(|h| h == hex_name))
            && (tiles.is_empty() || tiles.iter().any(|t| t == tile_name))
    }

    pub fn is_used_up(&self) -> bool {
        self.count == Some(0)
    }

    /// Spend one use. Returns true when none are left.
    pub fn use_once(&mut self) -> bool {
        if let Some(count) = self.count.as_mut() {
            *count = count.saturating_sub(1);
        }
        self.is_used_up()
    }
}
