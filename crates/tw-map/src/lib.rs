//! tw-map: the shared hex map for trackway.
//!
//! Provides:
//! - Tile, path, city/town and border data structures
//! - Hexes, station tokens and the tile catalog (`Map`)
//! - Incremental map builder with validation
//! - Station-network connectivity, memoized by map version
//!
//! # Example
//!
//! ```
//! use tw_core::{Axial, TileColor};
//! use tw_map::{MapBuilder, Tile};
//!
//! let mut builder = MapBuilder::new();
//! let hex = builder.add_blank_hex("F13", Axial::new(0, 0));
//! builder.add_tile(Tile::new("7", TileColor::Yellow).with_paths(&["e0-e1"]).unwrap());
//! let map = builder.build().unwrap();
//!
//! assert_eq!(map.hexes().len(), 1);
//! assert_eq!(map.pool().len(), 1);
//! assert!(!map.hex_tile(hex).unwrap().has_paths());
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub mod hex;
pub mod map;
pub mod tile;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::MapBuilder;
pub use error::{MapError, MapResult};
pub use graph::{Connectivity, GraphCache, NodeRef, PathRef, WalkOptions};
pub use hex::{Hex, Token, TokenLocation};
pub use map::Map;
pub use tile::{Border, City, Path, PathEnd, TerrainUpgrade, Tile, Town};
