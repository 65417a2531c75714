//! Game rules the tracker defers to.
//!
//! Every method has the behavior of a plain game; variants override what
//! they change.

use std::collections::BTreeSet;

use tw_core::{Edge, EntityId, HexId, Money, Terrain, TileColor, Track, TwResult};
use tw_map::{Hex, Tile};

use crate::ability::{Ability, AbilityKind};
use crate::action::LayTileAction;
use crate::restriction::TrackRestriction;
use crate::schedule::{TileLay, default_tile_lays};
use crate::state::GameState;

pub trait Rules {
    /// The lay schedule for an operator's turn.
    fn tile_lays(&self, state: &GameState, operator: EntityId) -> Vec<TileLay>;

    fn track_restriction(&self) -> TrackRestriction;

    /// Gauge the station network does not run over.
    fn graph_skip_track(&self) -> Option<Track> {
        None
    }

    /// `special` is set when a company lays through an ability.
    fn upgrades_to(
        &self,
        _state: &GameState,
        from: &Tile,
        to: &Tile,
        special: bool,
        _selected_company: Option<EntityId>,
    ) -> bool {
        default_upgrades_to(from, to, special)
    }

    /// Terrain cost of building over `old_tile`.
    fn upgrade_cost(
        &self,
        state: &GameState,
        old_tile: &Tile,
        _new_tile: &Tile,
        hex: &Hex,
        entity: EntityId,
    ) -> Money {
        default_upgrade_cost(state, old_tile, hex, entity)
    }

    fn tile_cost_with_discount(
        &self,
        _state: &GameState,
        _tile: &Tile,
        _hex: &Hex,
        _entity: EntityId,
        cost: Money,
    ) -> Money {
        cost
    }

    /// Edges of `hex` the operator's track reaches.
    fn hex_neighbors(
        &self,
        state: &GameState,
        operator: EntityId,
        hex: HexId,
    ) -> Option<BTreeSet<Edge>> {
        state.connectivity(operator).connected_edges(hex).cloned()
    }

    /// Game-specific rotation check, run before the generic ones.
    fn legal_tile_rotation(
        &self,
        _state: &GameState,
        _entity: EntityId,
        _hex: &Hex,
        _tile: &Tile,
    ) -> bool {
        true
    }

    fn hex_blocked_by_ability(
        &self,
        _state: &GameState,
        _entity: EntityId,
        ability: &Ability,
        hex: &Hex,
    ) -> bool {
        match &ability.kind {
            AbilityKind::BlocksHexes { hexes } => hexes.iter().any(|h| *h == hex.name),
            _ => false,
        }
    }

    fn buying_power(&self, state: &GameState, entity: EntityId) -> Money {
        state.entity(entity).map(|e| e.cash).unwrap_or(0)
    }

    /// Raise cash before `cost` is charged to `entity`.
    fn try_take_loan(
        &self,
        _state: &mut GameState,
        _entity: EntityId,
        _cost: Money,
    ) -> TwResult<()> {
        Ok(())
    }

    /// Companies `entity` could buy right now.
    fn purchasable_companies(&self, state: &GameState, _entity: EntityId) -> Vec<EntityId> {
        state
            .entities
            .iter()
            .filter(|c| c.is_company() && !c.closed)
            .filter(|c| {
                c.owner
                    .and_then(|o| state.entity(o).ok())
                    .is_some_and(|o| o.is_player())
            })
            .map(|c| c.id)
            .collect()
    }

    fn before_lay_tile(&self, _state: &GameState, _action: &LayTileAction) -> TwResult<()> {
        Ok(())
    }

    fn after_lay_tile(&self, _state: &mut GameState, _action: &LayTileAction) -> TwResult<()> {
        Ok(())
    }
}

/// Color steps up by one, existing track survives, and (unless `special`)
/// labels and town/city counts line up.
pub fn default_upgrades_to(from: &Tile, to: &Tile, special: bool) -> bool {
    if from.color.next() != Some(to.color) {
        return false;
    }
    if !from.paths_are_subset_of(to) {
        return false;
    }
    if special {
        return true;
    }
    if from.label != to.label {
        return false;
    }
    if from.towns.len() != to.towns.len() {
        return false;
    }
    // Labelled cities may merge
    if from.label.is_none() && from.cities.len() != to.cities.len() {
        return false;
    }
    !(from.color == TileColor::White
        && from.label.as_deref() == Some("OO")
        && from.cities.len() != to.cities.len())
}

/// Terrain costs of `old_tile`, less any matching tile discount the entity holds.
pub fn default_upgrade_cost(
    state: &GameState,
    old_tile: &Tile,
    hex: &Hex,
    entity: EntityId,
) -> Money {
    let discount = state.all_abilities(entity).into_iter().find_map(|a| match &a.kind {
        AbilityKind::TileDiscount(d)
            if d.hexes.as_ref().is_none_or(|hexes| hexes.contains(&hex.name)) =>
        {
            Some(d)
        }
        _ => None,
    });
    old_tile
        .upgrades
        .iter()
        .map(|upgrade| {
            let only = |t: Terrain| {
                !upgrade.terrains.is_empty() && upgrade.terrains.iter().all(|x| *x == t)
            };
            let off = match discount {
                Some(d) if d.terrain.is_some_and(&only) => d.discount,
                _ => 0,
            };
            if off > 0 {
                tracing::debug!(hex = %hex.name, discount = off, "terrain discount");
            }
            upgrade.cost - off
        })
        .sum()
}

/// A plain game: one schedule, one restriction policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseRules {
    pub tile_lays: Vec<TileLay>,
    pub track_restriction: TrackRestriction,
}

impl BaseRules {
    pub fn new(tile_lays: Vec<TileLay>, track_restriction: TrackRestriction) -> Self {
        Self {
            tile_lays,
            track_restriction,
        }
    }
}

impl Default for BaseRules {
    fn default() -> Self {
        Self::new(default_tile_lays(), TrackRestriction::default())
    }
}

impl Rules for BaseRules {
    fn tile_lays(&self, _state: &GameState, _operator: EntityId) -> Vec<TileLay> {
        self.tile_lays.clone()
    }

    fn track_restriction(&self) -> TrackRestriction {
        self.track_restriction
    }
}
