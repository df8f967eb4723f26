//! Procedural room-and-corridor dungeon layouts with constrained tile pattern stamping
//!
//! A [`algorithm::layout::LayoutGenerator`] scatters non-overlapping rooms,
//! joins them along a minimum spanning tree of corridors and rejects layouts
//! whose walkable area is poorly connected, retrying with successive seeds.
//! A [`algorithm::placement::PlacementEngine`] then stamps multi-cell
//! patterns onto the floor or wall cells of the finished grid under weight,
//! adjacency and count constraints. Passes are registered per layout in an
//! [`algorithm::registry::PlacerRegistry`] and run when the layout changes.

#![forbid(unsafe_code)]

/// Layout generation, connectivity validation and pattern placement
pub mod algorithm;
/// Input/output operations, configuration and error handling
pub mod io;
/// Seeded random selection
pub mod math;
/// Pattern stencils and placement constraints
pub mod patterns;
/// Geometry, grid model and cell masks
pub mod spatial;

pub use io::error::{DungeonError, Result};
