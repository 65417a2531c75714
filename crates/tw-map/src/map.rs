//! The hex map, its tile catalog and station tokens.

use tw_core::{Edge, EntityId, HexId, TileId, TokenId};

use crate::error::{MapError, MapResult};
use crate::hex::{Hex, Token, TokenLocation};
use crate::tile::{Border, Tile};

/// Mutable map state.
///
/// Every change to track or tokens bumps `version`; connectivity caches key
/// their entries on it.
#[derive(Debug, Clone)]
pub struct Map {
    pub(crate) hexes: Vec<Hex>,
    /// Every tile known to the game, placed or not, indexed by `TileId`.
    pub(crate) tiles: Vec<Tile>,
    /// Tiles available to be laid.
    pub(crate) pool: Vec<TileId>,
    pub(crate) tokens: Vec<Token>,
    pub(crate) version: u64,
}

impl Map {
    pub fn hexes(&self) -> &[Hex] {
        &self.hexes
    }

    pub fn hex(&self, id: HexId) -> MapResult<&Hex> {
        self.hexes
            .get(id.slot())
            .ok_or(MapError::UnknownHex { hex: id })
    }

    pub fn hex_by_name(&self, name: &str) -> Option<&Hex> {
        self.hexes.iter().find(|h| h.name == name)
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, id: TileId) -> MapResult<&Tile> {
        self.tiles
            .get(id.slot())
            .ok_or(MapError::UnknownTile { tile: id })
    }

    fn tile_mut(&mut self, id: TileId) -> MapResult<&mut Tile> {
        self.tiles
            .get_mut(id.slot())
            .ok_or(MapError::UnknownTile { tile: id })
    }

    /// The tile currently on a hex.
    pub fn hex_tile(&self, hex: HexId) -> MapResult<&Tile> {
        self.tile(self.hex(hex)?.tile)
    }

    pub fn pool(&self) -> &[TileId] {
        &self.pool
    }

    pub fn is_available(&self, tile: TileId) -> bool {
        self.pool.contains(&tile)
    }

    pub fn available_tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.pool.iter().filter_map(|id| self.tiles.get(id.slot()))
    }

    /// First available tile with this name.
    pub fn available_tile_named(&self, name: &str) -> Option<TileId> {
        self.available_tiles().find(|t| t.name == name).map(|t| t.id)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    fn touch(&mut self) {
        self.version += 1;
    }

    pub fn neighbor(&self, hex: HexId, edge: Edge) -> Option<HexId> {
        self.hexes.get(hex.slot()).and_then(|h| h.neighbor(edge))
    }

    /// True when the track on `hex` leaves through the edge facing `other`.
    pub fn targeting(&self, hex: HexId, other: HexId) -> bool {
        let Ok(h) = self.hex(hex) else {
            return false;
        };
        let Some(edge) = h.direction_to(other) else {
            return false;
        };
        self.tile(h.tile)
            .map(|t| t.exits().contains(&edge))
            .unwrap_or(false)
    }

    pub fn assign(&mut self, hex: HexId, marker: impl Into<String>) -> MapResult<()> {
        let h = self
            .hexes
            .get_mut(hex.slot())
            .ok_or(MapError::UnknownHex { hex })?;
        h.assignments.push(marker.into());
        Ok(())
    }

    pub fn rotate_tile(&mut self, tile: TileId, rotation: u8) -> MapResult<()> {
        self.tile_mut(tile)?.rotate(rotation);
        Ok(())
    }

    /// Put a fresh copy of `template` into the pool.
    pub fn add_extra_tile(&mut self, template: TileId) -> MapResult<TileId> {
        let mut copy = self.tile(template)?.clone();
        let id = TileId::from_index(self.tiles.len() as u32);
        copy.id = id;
        copy.hex = None;
        copy.rotate(0);
        copy.borders.clear();
        for city in &mut copy.cities {
            city.tokens.clear();
        }
        self.tiles.push(copy);
        self.pool.push(id);
        Ok(id)
    }

    /// Catalog bookkeeping for `tile` replacing `old_tile`.
    pub fn update_tile_lists(&mut self, tile: TileId, old_tile: TileId) -> MapResult<()> {
        if self.tile(tile)?.unlimited {
            self.add_extra_tile(tile)?;
        }
        self.pool.retain(|&id| id != tile);
        if !self.tile(old_tile)?.preprinted {
            self.pool.push(old_tile);
        }
        Ok(())
    }

    /// Replace the tile on `hex`. Borders and station tokens move onto the new tile.
    pub fn lay(&mut self, hex: HexId, tile: TileId) -> MapResult<()> {
        let old_id = self.hex(hex)?.tile;
        if old_id == tile {
            return Ok(());
        }
        if self.tile(tile)?.hex.is_some() {
            return Err(MapError::TilePlacedTwice {
                tile: self.tile(tile)?.name.clone(),
            });
        }

        let old = self.tile_mut(old_id)?;
        let old_edges = old.node_edges();
        let borders = std::mem::take(&mut old.borders);
        let moved: Vec<Vec<TokenId>> = old
            .cities
            .iter_mut()
            .map(|c| std::mem::take(&mut c.tokens))
            .collect();
        old.hex = None;

        let new = self.tile_mut(tile)?;
        new.borders.extend(borders);
        new.hex = Some(hex);
        let new_edges = new.node_edges();
        let new_city_count = new.cities.len();

        let mut relocated = Vec::new();
        for (i, tokens) in moved.into_iter().enumerate() {
            if tokens.is_empty() {
                continue;
            }
            let old_city_edges = &old_edges[i];
            let target = (0..new_city_count)
                .find(|&j| !old_city_edges.is_empty() && old_city_edges.is_subset(&new_edges[j]))
                .or_else(|| (i < new_city_count).then_some(i))
                .or_else(|| (new_city_count > 0).then_some(0));
            relocated.push((target, tokens));
        }

        for (target, tokens) in relocated {
            if let Some(j) = target {
                self.tile_mut(tile)?.cities[j].tokens.extend(tokens.iter().copied());
            }
            for id in tokens {
                let token = self
                    .tokens
                    .get_mut(id.slot())
                    .ok_or(MapError::UnknownToken { token: id })?;
                token.location = target.map(|j| TokenLocation {
                    hex,
                    city: j as u8,
                });
            }
        }

        self.hexes[hex.slot()].tile = tile;
        self.touch();
        tracing::trace!(
            hex = %self.hexes[hex.slot()].name,
            tile = %tile,
            version = self.version,
            "tile laid"
        );
        Ok(())
    }

    /// Remove the border on `edge` of `hex`, and the matching border on the
    /// neighbor's side.
    pub fn remove_shared_border(&mut self, hex: HexId, edge: Edge) -> MapResult<Option<Border>> {
        let tile_id = self.hex(hex)?.tile;
        let tile = self.tile_mut(tile_id)?;
        let Some(pos) = tile.borders.iter().position(|b| b.edge == edge) else {
            return Ok(None);
        };
        let removed = tile.borders.remove(pos);

        if let Some(neighbor) = self.neighbor(hex, edge) {
            let neighbor_tile = self.hex(neighbor)?.tile;
            let inverted = edge.invert();
            self.tile_mut(neighbor_tile)?
                .borders
                .retain(|b| b.edge != inverted);
        }
        self.touch();
        Ok(Some(removed))
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token(&self, id: TokenId) -> MapResult<&Token> {
        self.tokens
            .get(id.slot())
            .ok_or(MapError::UnknownToken { token: id })
    }

    pub fn tokens_of(&self, owner: EntityId) -> impl Iterator<Item = &Token> + '_ {
        self.tokens.iter().filter(move |t| t.owner == owner)
    }

    /// Create an unplaced token for `owner`.
    pub fn add_token(&mut self, owner: EntityId) -> TokenId {
        let id = TokenId::from_index(self.tokens.len() as u32);
        self.tokens.push(Token {
            id,
            owner,
            location: None,
        });
        id
    }

    /// Place a token in a city. Uses an unplaced token of `owner` if one exists.
    pub fn place_token(&mut self, owner: EntityId, hex: HexId, city: u8) -> MapResult<TokenId> {
        let h = self.hex(hex)?;
        let hex_name = h.name.clone();
        let tile = self.tile(h.tile)?;
        let target = tile
            .cities
            .get(city as usize)
            .ok_or_else(|| MapError::NoSuchCity {
                hex: hex_name.clone(),
                city,
            })?;
        if target.is_full() {
            return Err(MapError::CityFull {
                hex: hex_name,
                city,
            });
        }

        let tile_id = h.tile;
        let id = match self
            .tokens
            .iter()
            .find(|t| t.owner == owner && !t.is_placed())
        {
            Some(t) => t.id,
            None => self.add_token(owner),
        };
        self.tile_mut(tile_id)?.cities[city as usize].tokens.push(id);
        self.tokens[id.slot()].location = Some(TokenLocation { hex, city });
        self.touch();
        Ok(id)
    }

    /// Take a token off the map; it stays owned but unplaced.
    pub fn remove_token(&mut self, id: TokenId) -> MapResult<()> {
        let location = self.token(id)?.location;
        if let Some(loc) = location {
            let tile_id = self.hex(loc.hex)?.tile;
            if let Some(city) = self.tile_mut(tile_id)?.cities.get_mut(loc.city as usize) {
                city.tokens.retain(|&t| t != id);
            }
            self.tokens[id.slot()].location = None;
            self.touch();
        }
        Ok(())
    }
}
