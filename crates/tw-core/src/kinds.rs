//! Small vocabulary enums shared by the map and the engine.

use core::fmt;

/// Tile color. White, yellow, green, brown and gray form the upgrade
/// progression; blue (water) and red (offboard) sit outside it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TileColor {
    White,
    Yellow,
    Green,
    Brown,
    Gray,
    Blue,
    Red,
}

impl TileColor {
    /// Position in the upgrade progression, `None` for off-progression colors.
    pub fn rank(self) -> Option<u8> {
        match self {
            TileColor::White => Some(0),
            TileColor::Yellow => Some(1),
            TileColor::Green => Some(2),
            TileColor::Brown => Some(3),
            TileColor::Gray => Some(4),
            TileColor::Blue | TileColor::Red => None,
        }
    }

    /// The color a tile of this color upgrades into.
    pub fn next(self) -> Option<TileColor> {
        match self {
            TileColor::White => Some(TileColor::Yellow),
            TileColor::Yellow => Some(TileColor::Green),
            TileColor::Green => Some(TileColor::Brown),
            TileColor::Brown => Some(TileColor::Gray),
            _ => None,
        }
    }
}

impl fmt::Display for TileColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TileColor::White => "white",
            TileColor::Yellow => "yellow",
            TileColor::Green => "green",
            TileColor::Brown => "brown",
            TileColor::Gray => "gray",
            TileColor::Blue => "blue",
            TileColor::Red => "red",
        };
        f.write_str(s)
    }
}

/// Track gauge of a path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Track {
    #[default]
    Broad,
    Narrow,
    Dual,
}

impl Track {
    /// Two pieces of track can be joined end to end.
    pub fn matches(self, other: Track) -> bool {
        self == other || self == Track::Dual || other == Track::Dual
    }

    /// Track of this gauge is still present when upgraded to `other`.
    pub fn fits_within(self, other: Track) -> bool {
        self == other || other == Track::Dual
    }

    /// The gauge a walk restricted to this gauge must skip.
    pub fn opposite(self) -> Option<Track> {
        match self {
            Track::Broad => Some(Track::Narrow),
            Track::Narrow => Some(Track::Broad),
            Track::Dual => None,
        }
    }
}

/// Terrain types found on tile upgrades and hex borders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Terrain {
    Mountain,
    Hill,
    Water,
    River,
    Lake,
    Swamp,
    Forest,
    Desert,
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Terrain::Mountain => "mountain",
            Terrain::Hill => "hill",
            Terrain::Water => "water",
            Terrain::River => "river",
            Terrain::Lake => "lake",
            Terrain::Swamp => "swamp",
            Terrain::Forest => "forest",
            Terrain::Desert => "desert",
        };
        f.write_str(s)
    }
}
