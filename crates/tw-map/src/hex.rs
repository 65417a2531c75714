//! Hexes and the tokens placed in their cities.

use tw_core::{ALL_EDGES, Axial, Edge, EntityId, HexId, TileId, TokenId};

/// A map cell. Hexes are created at setup and never destroyed; only the tile
/// they hold changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hex {
    pub id: HexId,
    /// Map coordinate name, e.g. `F13`.
    pub name: String,
    pub coord: Axial,
    pub location_name: Option<String>,
    pub(crate) tile: TileId,
    pub(crate) neighbors: [Option<HexId>; 6],
    pub(crate) assignments: Vec<String>,
}

impl Hex {
    pub fn tile(&self) -> TileId {
        self.tile
    }

    pub fn neighbor(&self, edge: Edge) -> Option<HexId> {
        self.neighbors[edge.num() as usize]
    }

    /// Edges that have a hex on the other side.
    pub fn neighbor_edges(&self) -> impl Iterator<Item = Edge> + '_ {
        ALL_EDGES
            .into_iter()
            .filter(|e| self.neighbors[e.num() as usize].is_some())
    }

    /// The edge facing `other`, if it is adjacent.
    pub fn direction_to(&self, other: HexId) -> Option<Edge> {
        ALL_EDGES
            .into_iter()
            .find(|e| self.neighbors[e.num() as usize] == Some(other))
    }

    /// Markers such as port, ship or mine tokens.
    pub fn assignments(&self) -> &[String] {
        &self.assignments
    }

    pub fn is_assigned(&self, marker: &str) -> bool {
        self.assignments.iter().any(|a| a == marker)
    }
}

/// Where a placed token sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenLocation {
    pub hex: HexId,
    pub city: u8,
}

/// A station marker owned by a corporation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub id: TokenId,
    pub owner: EntityId,
    pub location: Option<TokenLocation>,
}

impl Token {
    pub fn is_placed(&self) -> bool {
        self.location.is_some()
    }
}
