//! Map-specific error types.

use thiserror::Error;
use tw_core::{HexId, TileId, TokenId, TwError};

pub type MapResult<T> = Result<T, MapError>;

/// Map construction and mutation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    #[error("Unknown hex {hex}")]
    UnknownHex { hex: HexId },

    #[error("Unknown tile {tile}")]
    UnknownTile { tile: TileId },

    #[error("Unknown token {token}")]
    UnknownToken { token: TokenId },

    /// The tile is not in the pool of available tiles.
    #[error("Tile {name} is not available")]
    TileUnavailable { name: String },

    #[error("Invalid path '{spec}': {reason}")]
    InvalidPath { spec: String, reason: String },

    /// A path end refers to a city or town the tile does not have.
    #[error("Tile {tile} has a path to missing {end}")]
    MissingNode { tile: String, end: String },

    #[error("Duplicate hex {name}")]
    DuplicateHex { name: String },

    #[error("Hexes {first} and {second} share coordinate ({q}, {r})")]
    DuplicateCoord {
        first: String,
        second: String,
        q: i32,
        r: i32,
    },

    #[error("Tile {tile} is placed on more than one hex")]
    TilePlacedTwice { tile: String },

    #[error("No city {city} on hex {hex}")]
    NoSuchCity { hex: String, city: u8 },

    #[error("City {city} on hex {hex} has no free slot")]
    CityFull { hex: String, city: u8 },
}

impl From<MapError> for TwError {
    fn from(err: MapError) -> Self {
        match err {
            MapError::UnknownHex { hex } => TwError::NotFound {
                what: "Hex",
                name: hex.to_string(),
            },
            MapError::UnknownTile { tile } => TwError::NotFound {
                what: "Tile",
                name: tile.to_string(),
            },
            MapError::UnknownToken { token } => TwError::NotFound {
                what: "Token",
                name: token.to_string(),
            },
            MapError::TileUnavailable { .. }
            | MapError::NoSuchCity { .. }
            | MapError::CityFull { .. } => TwError::illegal(err.to_string()),
            MapError::InvalidPath { .. }
            | MapError::MissingNode { .. }
            | MapError::DuplicateHex { .. }
            | MapError::DuplicateCoord { .. } => TwError::config(err.to_string()),
            MapError::TilePlacedTwice { .. } => TwError::Invariant {
                what: "tile placed on more than one hex",
            },
        }
    }
}
