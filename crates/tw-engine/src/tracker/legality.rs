//! Rotation legality, blocked hexes and track-usage restrictions.

use std::collections::BTreeSet;

use tw_core::{Edge, EntityId, HexId, Money, TwError, TwResult};
use tw_map::{Connectivity, Hex, Map, PathRef, Tile, WalkOptions};

use super::Tracker;
use crate::ability::AbilityType;
use crate::entity::Entity;
use crate::restriction::TrackUsage;
use crate::rules::Rules;
use crate::state::GameState;

impl<R: Rules + ?Sized> Tracker<'_, R> {
    pub(super) fn check_blocked_hex(
        &self,
        state: &GameState,
        entity: EntityId,
        hex: &Hex,
    ) -> TwResult<()> {
        for (company, ability) in state.companies_with_ability(AbilityType::BlocksHexes) {
            if self.rules.hex_blocked_by_ability(state, entity, ability, hex) {
                return Err(TwError::illegal(format!(
                    "{} is blocked by {}",
                    hex.name, company.name
                )));
            }
        }
        Ok(())
    }

    /// Edges of `hex` the entity's network reaches. Companies use their owner's network.
    pub fn hex_neighbors(
        &self,
        state: &GameState,
        entity: EntityId,
        hex: HexId,
    ) -> Option<BTreeSet<Edge>> {
        let operator = state.operator_of(entity).ok()?;
        self.rules.hex_neighbors(state, operator, hex)
    }

    /// True when `tile`, in its current rotation, may replace the tile on `hex`.
    pub fn legal_tile_rotation(
        &self,
        state: &GameState,
        entity: EntityId,
        hex: &Hex,
        tile: &Tile,
    ) -> bool {
        self.rotation_is_legal(state, entity, hex, tile, false)
    }

    /// Teleports skip the game-specific check and the connection to the network.
    pub(super) fn rotation_is_legal(
        &self,
        state: &GameState,
        entity: EntityId,
        hex: &Hex,
        tile: &Tile,
        teleport: bool,
    ) -> bool {
        if !teleport && !self.rules.legal_tile_rotation(state, entity, hex, tile) {
            return false;
        }
        let Ok(old) = state.map.tile(hex.tile()) else {
            return false;
        };

        let old_ct = old.city_town_edges();
        let new_ct = tile.city_town_edges();
        let new_exits = tile.exits();

        if !new_exits.iter().all(|&e| hex.neighbor(e).is_some()) {
            return false;
        }
        if !teleport {
            let Some(connected) = self.hex_neighbors(state, entity, hex.id) else {
                return false;
            };
            if new_exits.is_disjoint(&connected) {
                return false;
            }
        }
        if !old
            .paths()
            .iter()
            .all(|old_path| tile.paths().iter().any(|p| old_path.is_subset_of(p)))
        {
            return false;
        }

        // New city groups touching no old group must come from added cities
        let extra_cities = new_ct.len().saturating_sub(old_ct.len());
        let fresh_groups = new_ct
            .iter()
            .filter(|new| old_ct.iter().all(|old| new.is_disjoint(old)))
            .count();
        if fresh_groups > extra_cities {
            return false;
        }

        // Each old city maps onto exactly one new city
        let multi_city_upgrade = new_ct.len() > 1 && old_ct.len() > 1;
        !multi_city_upgrade
            || old_ct
                .iter()
                .all(|old| new_ct.iter().filter(|new| old.is_subset(new)).count() == 1)
    }

    pub(super) fn check_track_restrictions(
        &self,
        state: &GameState,
        staged: &Map,
        entity: &Entity,
        hex: HexId,
        old_tile: &Tile,
    ) -> TwResult<()> {
        if state.loading || !entity.is_operator() {
            return Ok(());
        }
        let walk = WalkOptions {
            skip_track: state.graph.skip_track(),
            ignore_tokens: false,
        };
        let network = Connectivity::compute(staged, entity.id, walk);
        let new_tile = staged.hex_tile(hex)?;

        let old_paths = old_tile.paths();
        let mut usage = TrackUsage {
            used_new_track: old_paths.is_empty(),
            changed_city: false,
            new_tile_has_city: !new_tile.cities.is_empty(),
        };

        for (index, new_path) in new_tile.paths().iter().enumerate() {
            if !network.is_path_connected(PathRef { hex, index }) {
                continue;
            }
            let old_path = old_paths.iter().find(|p| new_path.is_subset_of(p));
            if old_path.is_none() {
                usage.used_new_track = true;
            }
            let old_revenues: Option<Vec<Money>> = old_path.map(|p| old_tile.path_revenues(p));
            let new_revenues = new_tile.path_revenues(new_path);
            if old_revenues.as_ref() != Some(&new_revenues) {
                usage.changed_city = true;
            }
        }

        tracing::trace!(
            policy = %self.rules.track_restriction(),
            used_new_track = usage.used_new_track,
            changed_city = usage.changed_city,
            "track restriction"
        );
        self.rules.track_restriction().check(usage)
    }
}
