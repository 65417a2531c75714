//! 18Ireland: broad and narrow gauge track.
//!
//! The station network runs on broad gauge only. Narrow gauge is reachable
//! from any node of that network and is not blocked by tokens.

use std::collections::BTreeSet;

use tw_core::{Edge, EntityId, HexId, Money, TileColor, Track};
use tw_map::{Hex, Tile};

use crate::restriction::TrackRestriction;
use crate::rules::{Rules, default_upgrade_cost, default_upgrades_to};
use crate::schedule::{Condition, TileLay};
use crate::state::GameState;

/// Corporations owning this company use the Dargan schedule.
pub const DARGAN_COMPANY: &str = "WDE";

/// Companies that lay regardless of connectivity.
pub const UNCONNECTED_LAY_COMPANIES: [&str; 3] = ["TIM", "DR", "TDR"];

/// Two lays, one of which may be an upgrade. The second costs 20.
pub fn ireland_tile_lays() -> Vec<TileLay> {
    vec![
        TileLay::new(true, true),
        TileLay::new(Condition::NotIfUpgraded, false).with_cost(20),
    ]
}

/// As the standard schedule, but the second lay may be an upgrade for 30.
pub fn dargan_tile_lays() -> Vec<TileLay> {
    vec![
        TileLay::new(true, true),
        TileLay::new(Condition::NotIfUpgraded, true)
            .with_cost(20)
            .with_upgrade_cost(30),
    ]
}

#[derive(Debug, Clone)]
pub struct IrelandRules {
    pub tile_lays: Vec<TileLay>,
    pub dargan_tile_lays: Vec<TileLay>,
    pub track_restriction: TrackRestriction,
}

impl Default for IrelandRules {
    fn default() -> Self {
        Self {
            tile_lays: ireland_tile_lays(),
            dargan_tile_lays: dargan_tile_lays(),
            track_restriction: TrackRestriction::SemiRestrictive,
        }
    }
}

/// A lay follows broad gauge rules when every new path is broad or was
/// already there.
pub fn tile_uses_broad_rules(old_tile: &Tile, tile: &Tile) -> bool {
    tile.paths().iter().all(|path| {
        path.track == Track::Broad || old_tile.paths().iter().any(|old| path.is_subset_of(old))
    })
}

impl IrelandRules {
    fn narrow_edges(
        &self,
        state: &GameState,
        operator: EntityId,
        hex: HexId,
    ) -> Option<BTreeSet<Edge>> {
        state
            .graph
            .gauge_network(&state.map, operator, Track::Narrow)
            .connected_edges(hex)
            .cloned()
    }
}

impl Rules for IrelandRules {
    fn tile_lays(&self, state: &GameState, operator: EntityId) -> Vec<TileLay> {
        let is_corporation = state.entity(operator).is_ok_and(|e| e.is_corporation());
        let owns_dargan = state
            .entities
            .companies_of(operator)
            .any(|c| c.sym == DARGAN_COMPANY);
        if is_corporation && owns_dargan {
            self.dargan_tile_lays.clone()
        } else {
            self.tile_lays.clone()
        }
    }

    fn track_restriction(&self) -> TrackRestriction {
        self.track_restriction
    }

    fn graph_skip_track(&self) -> Option<Track> {
        Some(Track::Narrow)
    }

    /// The Irish Mail may lay red over blue.
    fn upgrades_to(
        &self,
        _state: &GameState,
        from: &Tile,
        to: &Tile,
        special: bool,
        _selected_company: Option<EntityId>,
    ) -> bool {
        if special && from.color == TileColor::Blue && to.color == TileColor::Red {
            return true;
        }
        default_upgrades_to(from, to, false)
    }

    /// Narrow gauge hexes cost nothing to build.
    fn upgrade_cost(
        &self,
        state: &GameState,
        old_tile: &Tile,
        new_tile: &Tile,
        hex: &Hex,
        entity: EntityId,
    ) -> Money {
        if new_tile.paths().iter().all(|p| p.track == Track::Narrow) {
            return 0;
        }
        default_upgrade_cost(state, old_tile, hex, entity)
    }

    /// Broad and narrow connections both count when looking for a place to build.
    fn hex_neighbors(
        &self,
        state: &GameState,
        operator: EntityId,
        hex: HexId,
    ) -> Option<BTreeSet<Edge>> {
        let broad = state.connectivity(operator).connected_edges(hex).cloned();
        let narrow = self.narrow_edges(state, operator, hex);
        match (broad, narrow) {
            (Some(mut b), Some(n)) => {
                b.extend(n);
                Some(b)
            }
            (b, n) => b.or(n),
        }
    }

    fn legal_tile_rotation(
        &self,
        state: &GameState,
        entity: EntityId,
        hex: &Hex,
        tile: &Tile,
    ) -> bool {
        let Ok(actor) = state.entity(entity) else {
            return false;
        };
        let unconnected =
            actor.is_company() && UNCONNECTED_LAY_COMPANIES.contains(&actor.sym.as_str());
        if !unconnected {
            let Ok(operator) = state.operator_of(entity) else {
                return false;
            };
            let Ok(old_tile) = state.map.tile(hex.tile()) else {
                return false;
            };
            let broad = state.connectivity(operator).connected_edges(hex.id).is_some();
            let connected = if tile_uses_broad_rules(old_tile, tile) {
                broad
            } else {
                broad || self.narrow_edges(state, operator, hex.id).is_some()
            };
            if !connected {
                return false;
            }
        }

        // Every exit must match the gauge of the track it meets
        for dir in tile.exits() {
            let Some(connecting) = tile.paths().iter().find(|p| p.exits().any(|e| e == dir)) else {
                continue;
            };
            let Some(neighbor) = hex.neighbor(dir) else {
                continue;
            };
            let Ok(neighbor_tile) = state.map.hex_tile(neighbor) else {
                continue;
            };
            let facing = dir.invert();
            let neighboring = neighbor_tile.paths().iter().find(|p| p.exits().any(|e| e == facing));
            if neighboring.is_some_and(|np| !connecting.tracks_match(np)) {
                return false;
            }
        }
        true
    }
}
