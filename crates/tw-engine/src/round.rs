//! Per-operating-round counters.

use serde::{Deserialize, Serialize};
use tw_core::{EntityId, HexId, TokenId};

/// A token knocked off the map by a lay; its owner must pick a new city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingToken {
    pub entity: EntityId,
    pub hexes: Vec<HexId>,
    pub token: TokenId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    pub num_laid_track: usize,
    pub upgraded_track: bool,
    pub laid_hexes: Vec<HexId>,
    #[serde(default)]
    pub pending_tokens: Vec<PendingToken>,
}

impl RoundState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start of a turn: the lay counters go back to zero.
    pub fn reset(&mut self) {
        self.num_laid_track = 0;
        self.upgraded_track = false;
        self.laid_hexes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_keeps_pending_tokens() {
        let mut round = RoundState {
            num_laid_track: 2,
            upgraded_track: true,
            laid_hexes: vec![HexId::from_index(1)],
            pending_tokens: vec![PendingToken {
                entity: EntityId::from_index(0),
                hexes: vec![HexId::from_index(1)],
                token: TokenId::from_index(0),
            }],
        };
        round.reset();
        assert_eq!(round.num_laid_track, 0);
        assert!(!round.upgraded_track);
        assert!(round.laid_hexes.is_empty());
        assert_eq!(round.pending_tokens.len(), 1);
    }

    #[test]
    fn json_shape() {
        let round = RoundState {
            num_laid_track: 1,
            upgraded_track: false,
            laid_hexes: vec![HexId::from_index(4)],
            pending_tokens: Vec::new(),
        };
        let json = serde_json::to_value(&round).unwrap();
        assert_eq!(json["num_laid_track"], 1);
        assert_eq!(
            json["laid_hexes"][0],
            serde_json::to_value(HexId::from_index(4)).unwrap()
        );
    }
}
