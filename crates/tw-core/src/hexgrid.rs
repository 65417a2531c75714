//! Hex grid geometry: the six tile edges and rotations, with axial
//! coordinates and neighbors from `hexx`.

use core::fmt;

use hexx::{EdgeDirection, Hex};

use crate::TwError;

/// Number of edges (and orientations) of a hex tile.
pub const EDGE_COUNT: u8 = 6;

/// One of the six sides of a hex, numbered 0..=5 clockwise.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct Edge(u8);

/// All six edges in numbering order.
pub const ALL_EDGES: [Edge; 6] = [Edge(0), Edge(1), Edge(2), Edge(3), Edge(4), Edge(5)];

impl Edge {
    pub fn new(n: u8) -> Result<Self, TwError> {
        if n < EDGE_COUNT {
            Ok(Self(n))
        } else {
            Err(TwError::config(format!("edge {n} out of range 0..=5")))
        }
    }

    pub fn num(self) -> u8 {
        self.0
    }

    /// The matching edge as seen from the neighbor across this edge.
    pub fn invert(self) -> Self {
        Self((self.0 + 3) % EDGE_COUNT)
    }

    /// The grid direction across this edge. Edges count clockwise from
    /// `(0, 1)`; hexx counts the same directions the other way from `(1, 0)`.
    pub fn direction(self) -> EdgeDirection {
        EdgeDirection::ALL_DIRECTIONS[(EDGE_COUNT - 1 - self.0) as usize]
    }

    /// Rotate clockwise by `rotation` steps.
    pub fn rotate(self, rotation: u8) -> Self {
        Self((self.0 + rotation % EDGE_COUNT) % EDGE_COUNT)
    }
}

impl TryFrom<u8> for Edge {
    type Error = TwError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Edge::new(n)
    }
}

impl From<Edge> for u8 {
    fn from(edge: Edge) -> u8 {
        edge.0
    }
}

impl fmt::Debug for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Edge({})", self.0)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Check a rotation value (0..=5).
pub fn validate_rotation(rotation: u8) -> Result<u8, TwError> {
    if rotation < EDGE_COUNT {
        Ok(rotation)
    } else {
        Err(TwError::illegal(format!("rotation {rotation} out of range 0..=5")))
    }
}

/// Axial hex coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Axial(Hex);

impl Axial {
    pub const fn new(q: i32, r: i32) -> Self {
        Self(Hex::new(q, r))
    }

    pub fn q(self) -> i32 {
        self.0.x
    }

    pub fn r(self) -> i32 {
        self.0.y
    }

    /// Coordinate of the neighbor across `edge`.
    pub fn neighbor(self, edge: Edge) -> Self {
        Self(self.0.neighbor(edge.direction()))
    }
}

impl From<Hex> for Axial {
    fn from(hex: Hex) -> Self {
        Self(hex)
    }
}

impl From<Axial> for Hex {
    fn from(coord: Axial) -> Self {
        coord.0
    }
}
