//! Map validation logic.

use std::collections::{HashMap, HashSet};
use tw_core::{Axial, TileId};

use crate::error::{MapError, MapResult};
use crate::hex::Hex;
use crate::tile::Tile;

/// Validate the map structure: unique names and coordinates, tile references, path ends.
pub(crate) fn validate_structure(hexes: &[Hex], tiles: &[Tile]) -> MapResult<()> {
    let mut names = HashSet::new();
    for hex in hexes {
        if !names.insert(hex.name.as_str()) {
            return Err(MapError::DuplicateHex {
                name: hex.name.clone(),
            });
        }
    }

    let mut coords: HashMap<Axial, &str> = HashMap::new();
    for hex in hexes {
        if let Some(first) = coords.insert(hex.coord, &hex.name) {
            return Err(MapError::DuplicateCoord {
                first: first.to_string(),
                second: hex.name.clone(),
                q: hex.coord.q(),
                r: hex.coord.r(),
            });
        }
    }

    // Each hex refers to an existing tile, and no tile sits on two hexes
    let mut placed: HashSet<TileId> = HashSet::new();
    for hex in hexes {
        let tile = tiles
            .get(hex.tile.slot())
            .ok_or(MapError::UnknownTile { tile: hex.tile })?;
        if !placed.insert(hex.tile) {
            return Err(MapError::TilePlacedTwice {
                tile: tile.name.clone(),
            });
        }
    }

    for tile in tiles {
        tile.check_nodes()?;
    }

    Ok(())
}
