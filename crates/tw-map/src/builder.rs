//! Incremental map builder.

use std::collections::HashMap;
use tw_core::{ALL_EDGES, Axial, HexId, TileId};

use crate::error::MapResult;
use crate::hex::Hex;
use crate::map::Map;
use crate::tile::Tile;
use crate::validate;

/// Builder for constructing a map incrementally.
///
/// Use `add_hex` and `add_tile` to describe the board and the tile supply,
/// then call `build()` to validate it and link neighbors.
#[derive(Debug, Default)]
pub struct MapBuilder {
    hexes: Vec<Hex>,
    tiles: Vec<Tile>,
    pool: Vec<TileId>,
}

impl MapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_tile(&mut self, mut tile: Tile) -> TileId {
        let id = TileId::from_index(self.tiles.len() as u32);
        tile.id = id;
        self.tiles.push(tile);
        id
    }

    /// Add one tile to the supply and return its ID.
    pub fn add_tile(&mut self, tile: Tile) -> TileId {
        let id = self.push_tile(tile);
        self.pool.push(id);
        id
    }

    /// Add `count` copies of a tile to the supply.
    pub fn add_tiles(&mut self, tile: Tile, count: usize) -> Vec<TileId> {
        (0..count).map(|_| self.add_tile(tile.clone())).collect()
    }

    /// Add a hex carrying a preprinted tile.
    pub fn add_hex(&mut self, name: impl Into<String>, coord: Axial, tile: Tile) -> HexId {
        let id = HexId::from_index(self.hexes.len() as u32);
        let mut tile = tile.preprinted();
        tile.hex = Some(id);
        let tile_id = self.push_tile(tile);
        self.hexes.push(Hex {
            id,
            name: name.into(),
            coord,
            location_name: None,
            tile: tile_id,
            neighbors: [None; 6],
            assignments: Vec::new(),
        });
        id
    }

    /// Add an empty white hex.
    pub fn add_blank_hex(&mut self, name: impl Into<String>, coord: Axial) -> HexId {
        self.add_hex(name, coord, Tile::blank())
    }

    pub fn set_location_name(&mut self, hex: HexId, location: impl Into<String>) {
        if let Some(h) = self.hexes.get_mut(hex.slot()) {
            h.location_name = Some(location.into());
        }
    }

    pub fn assign(&mut self, hex: HexId, marker: impl Into<String>) {
        if let Some(h) = self.hexes.get_mut(hex.slot()) {
            h.assignments.push(marker.into());
        }
    }

    /// Validate and link neighbors, returning the playable `Map`.
    pub fn build(mut self) -> MapResult<Map> {
        validate::validate_structure(&self.hexes, &self.tiles)?;

        let by_coord: HashMap<Axial, HexId> = self.hexes.iter().map(|h| (h.coord, h.id)).collect();
        for hex in &mut self.hexes {
            for edge in ALL_EDGES {
                hex.neighbors[edge.num() as usize] =
                    by_coord.get(&hex.coord.neighbor(edge)).copied();
            }
        }

        tracing::debug!(
            hexes = self.hexes.len(),
            tiles = self.tiles.len(),
            "map built"
        );

        Ok(Map {
            hexes: self.hexes,
            tiles: self.tiles,
            pool: self.pool,
            tokens: Vec::new(),
            version: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tw_core::{Edge, TileColor};

    #[test]
    fn builder_links_neighbors() {
        let mut builder = MapBuilder::new();
        let a = builder.add_blank_hex("A1", Axial::new(0, 0));
        let b = builder.add_blank_hex("A3", Axial::new(0, 1));
        let map = builder.build().unwrap();

        let e0 = Edge::new(0).unwrap();
        assert_eq!(map.hex(a).unwrap().neighbor(e0), Some(b));
        assert_eq!(map.hex(b).unwrap().neighbor(e0.invert()), Some(a));
        assert_eq!(map.hex(a).unwrap().neighbor_edges().count(), 1);
    }

    #[test]
    fn supply_and_preprinted_tiles() {
        let mut builder = MapBuilder::new();
        let hex = builder.add_blank_hex("B2", Axial::new(1, 1));
        let ids = builder.add_tiles(Tile::new("7", TileColor::Yellow), 3);
        let map = builder.build().unwrap();

        assert_eq!(ids.len(), 3);
        assert_eq!(map.pool().len(), 3);
        let printed = map.hex_tile(hex).unwrap();
        assert!(printed.preprinted);
        assert_eq!(printed.hex(), Some(hex));
        assert!(!map.is_available(printed.id));
    }
}
