//! Player actions the tracker consumes.

use serde::{Deserialize, Serialize};
use tw_core::{EntityId, HexId, TileId};

/// Place `tile` on `hex` at `rotation` (0-5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayTileAction {
    pub entity: EntityId,
    pub hex: HexId,
    pub tile: TileId,
    pub rotation: u8,
}

impl LayTileAction {
    pub fn new(entity: EntityId, hex: HexId, tile: TileId, rotation: u8) -> Self {
        Self {
            entity,
            hex,
            tile,
            rotation,
        }
    }
}
