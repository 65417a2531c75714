//! tw-core: stable foundation for trackway.
//!
//! Contains:
//! - ids (stable compact IDs for hexes, tiles, entities, tokens)
//! - hexgrid (edges, rotations, axial neighbor offsets)
//! - kinds (tile colors, track gauges, terrain)
//! - money (amounts + currency formatting)
//! - error (shared error types)

pub mod error;
pub mod hexgrid;
pub mod ids;
pub mod kinds;
pub mod money;

// Re-exports: nice ergonomics for downstream crates
pub use error::{TwError, TwResult};
pub use hexgrid::*;
pub use ids::*;
pub use kinds::*;
pub use money::*;
