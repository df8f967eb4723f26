//! Spatial data structures for the dungeon grid
//!
//! This module contains:
//! - Integer geometry (points, rectangles, directions)
//! - The grid model with its id grids
//! - Bit-packed cell masks

/// Points, rectangles and compass directions
pub mod geometry;
/// Cell grid, room and corridor id grids, used-cell mask
pub mod grid;
/// Bit-packed boolean cell masks
pub mod mask;

pub use geometry::{Direction, Point, Rect};
pub use grid::{Cell, DungeonGrid, TargetKind};
pub use mask::CellMask;
