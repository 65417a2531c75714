//! tw-engine: tile-lay rules for trackway.
//!
//! Contains:
//! - entities (players, corporations, companies) and their abilities
//! - bank transfers and the game log
//! - round state and the per-turn lay schedule
//! - the `Rules` trait game variants implement
//! - the `Tracker`, which validates and applies tile lays
//! - game variants (`games`)

pub mod ability;
pub mod action;
pub mod bank;
pub mod entity;
pub mod games;
pub mod log;
pub mod restriction;
pub mod round;
pub mod rules;
pub mod schedule;
pub mod state;
pub mod tracker;

pub use ability::{
    Ability, AbilityKind, AbilityType, TeleportAbility, TileDiscountAbility, TileIncomeAbility,
    TileLayAbility, Timing,
};
pub use action::LayTileAction;
pub use bank::{Account, Bank};
pub use entity::{Entities, Entity, EntityKind};
pub use log::GameLog;
pub use restriction::{TrackRestriction, TrackUsage};
pub use round::{PendingToken, RoundState};
pub use rules::{BaseRules, Rules};
pub use schedule::{Condition, Entitlement, LayPermission, TileLay};
pub use state::{GameState, Phase};
pub use tracker::{Tracker, UpgradeOption};
