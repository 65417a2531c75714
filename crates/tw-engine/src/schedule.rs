//! The per-turn lay schedule: what the Nth tile lay of a turn may do.

use serde::{Deserialize, Serialize};
use tw_core::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Allowed only if no upgrade was made earlier this turn.
    NotIfUpgraded,
}

/// Either a flat yes/no or a condition on the turn so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayPermission {
    Always(bool),
    When(Condition),
}

impl LayPermission {
    pub fn resolve(self, upgraded_track: bool) -> bool {
        match self {
            LayPermission::Always(allowed) => allowed,
            LayPermission::When(Condition::NotIfUpgraded) => !upgraded_track,
        }
    }
}

impl From<bool> for LayPermission {
    fn from(allowed: bool) -> Self {
        LayPermission::Always(allowed)
    }
}

impl From<Condition> for LayPermission {
    fn from(condition: Condition) -> Self {
        LayPermission::When(condition)
    }
}

/// One entry of a game's lay schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileLay {
    pub lay: LayPermission,
    pub upgrade: LayPermission,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<Money>,
    /// Defaults to `cost`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upgrade_cost: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cannot_reuse_same_hex: Option<bool>,
}

impl TileLay {
    pub fn new(lay: impl Into<LayPermission>, upgrade: impl Into<LayPermission>) -> Self {
        Self {
            lay: lay.into(),
            upgrade: upgrade.into(),
            cost: None,
            upgrade_cost: None,
            cannot_reuse_same_hex: None,
        }
    }

    pub fn with_cost(mut self, cost: Money) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn with_upgrade_cost(mut self, cost: Money) -> Self {
        self.upgrade_cost = Some(cost);
        self
    }

    pub fn cannot_reuse_same_hex(mut self) -> Self {
        self.cannot_reuse_same_hex = Some(true);
        self
    }

    /// Fill in defaults and evaluate conditions against the turn so far.
    pub fn resolve(&self, upgraded_track: bool) -> Entitlement {
        let cost = self.cost.unwrap_or(0);
        Entitlement {
            lay: self.lay.resolve(upgraded_track),
            upgrade: self.upgrade.resolve(upgraded_track),
            cost,
            upgrade_cost: self.upgrade_cost.unwrap_or(cost),
            cannot_reuse_same_hex: self.cannot_reuse_same_hex.unwrap_or(false),
        }
    }
}

/// A resolved schedule entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Entitlement {
    pub lay: bool,
    pub upgrade: bool,
    pub cost: Money,
    pub upgrade_cost: Money,
    pub cannot_reuse_same_hex: bool,
}

/// One lay or upgrade per turn, free.
pub fn default_tile_lays() -> Vec<TileLay> {
    vec![TileLay::new(true, true)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upgrade_cost_follows_cost() {
        let lay = TileLay::new(Condition::NotIfUpgraded, false).with_cost(20);
        let e = lay.resolve(false);
        assert!(e.lay);
        assert!(!e.upgrade);
        assert_eq!(e.cost, 20);
        assert_eq!(e.upgrade_cost, 20);
        assert!(!e.cannot_reuse_same_hex);

        assert!(!lay.resolve(true).lay);
    }

    #[test]
    fn explicit_upgrade_cost() {
        let lay = TileLay::new(Condition::NotIfUpgraded, true)
            .with_cost(20)
            .with_upgrade_cost(30);
        let e = lay.resolve(true);
        assert!(!e.lay);
        assert!(e.upgrade);
        assert_eq!(e.upgrade_cost, 30);
    }

    #[test]
    fn permissions_deserialize_from_bool_or_condition() {
        let lay: TileLay =
            serde_json::from_str(r#"{"lay": "not_if_upgraded", "upgrade": false, "cost": 20}"#)
                .unwrap();
        assert_eq!(lay.lay, LayPermission::When(Condition::NotIfUpgraded));
        assert_eq!(lay.upgrade, LayPermission::Always(false));
        assert_eq!(lay.cost, Some(20));
        let bad = r#"{"lay": "sometimes", "upgrade": true}"#;
        assert!(serde_json::from_str::<TileLay>(bad).is_err());
    }
}
