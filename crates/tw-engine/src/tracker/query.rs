//! Read-only queries for presenting choices to a player.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;
use tw_core::{ALL_EDGES, Edge, EntityId, HexId, TileColor, TileId, TwResult};

use super::Tracker;
use crate::round::RoundState;
use crate::rules::Rules;
use crate::state::GameState;

/// A tile that can go on a hex, with the rotations that would be legal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpgradeOption {
    pub tile: TileId,
    pub name: String,
    pub rotations: Vec<u8>,
}

impl<R: Rules + ?Sized> Tracker<'_, R> {
    /// Available tiles of a color the phase allows that upgrade the hex's
    /// current tile. One per tile name.
    pub fn potential_tiles(&self, state: &GameState, hex: HexId) -> TwResult<Vec<TileId>> {
        let old = state.map.hex_tile(hex)?;
        let mut seen = HashSet::new();
        Ok(state
            .map
            .available_tiles()
            .filter(|t| state.phase.allows(t.color))
            .filter(|t| seen.insert(t.name.as_str()))
            .filter(|t| self.rules.upgrades_to(state, old, t, false, None))
            .filter(|t| !t.blocks_lay)
            .map(|t| t.id)
            .collect())
    }

    /// Rotations of `tile` that `entity` could legally lay on `hex`.
    pub fn legal_tile_rotations(
        &self,
        state: &GameState,
        entity: EntityId,
        hex: HexId,
        tile: TileId,
    ) -> TwResult<Vec<u8>> {
        let hex = state.map.hex(hex)?;
        let mut tile = state.map.tile(tile)?.clone();
        let mut legal = Vec::new();
        for rotation in ALL_EDGES.map(Edge::num) {
            tile.rotate(rotation);
            if self.legal_tile_rotation(state, entity, hex, &tile) {
                legal.push(rotation);
            }
        }
        Ok(legal)
    }

    /// Potential tiles with at least one legal rotation.
    pub fn upgradeable_tiles(
        &self,
        state: &GameState,
        entity: EntityId,
        hex: HexId,
    ) -> TwResult<Vec<UpgradeOption>> {
        let mut options = Vec::new();
        for tile in self.potential_tiles(state, hex)? {
            let rotations = self.legal_tile_rotations(state, entity, hex, tile)?;
            if rotations.is_empty() {
                continue;
            }
            options.push(UpgradeOption {
                tile,
                name: state.map.tile(tile)?.name.clone(),
                rotations,
            });
        }
        Ok(options)
    }

    /// Connected edges of `hex` if the next lay of the turn could use it.
    pub fn tracker_available_hex(
        &self,
        state: &GameState,
        round: &RoundState,
        entity: EntityId,
        hex: HexId,
    ) -> Option<BTreeSet<Edge>> {
        let connected = self.hex_neighbors(state, entity, hex)?;
        let lay = self.get_tile_lay(state, round, entity)?;
        let white = state.map.hex_tile(hex).ok()?.color == TileColor::White;

        if white && !lay.lay {
            return None;
        }
        let reused = lay.cannot_reuse_same_hex && round.laid_hexes.contains(&hex);
        if !white && (!lay.upgrade || reused) {
            return None;
        }
        Some(connected)
    }
}
