use bitvec::prelude::*;
use std::fmt;

use crate::spatial::geometry::Point;

/// Fixed-size boolean grid for used-cell and allowed-cell tracking
///
/// Stored row-major in a single bit vector. Out-of-bounds reads are `false`
/// and out-of-bounds writes are ignored, so callers can probe neighbours
/// without bounds checks.
#[derive(Clone, PartialEq, Eq)]
pub struct CellMask {
    bits: BitVec,
    width: usize,
    height: usize,
}

impl CellMask {
    /// Create a mask with every cell cleared
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            bits: bitvec![0; width * height],
            width,
            height,
        }
    }

    /// Mask width in cells
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Mask height in cells
    pub const fn height(&self) -> usize {
        self.height
    }

    fn index(&self, point: Point) -> Option<usize> {
        if point.x < 0 || point.y < 0 {
            return None;
        }
        let (x, y) = (point.x as usize, point.y as usize);
        (x < self.width && y < self.height).then_some(y * self.width + x)
    }

    /// Test a cell
    pub fn contains(&self, point: Point) -> bool {
        self.index(point)
            .and_then(|index| self.bits.get(index).as_deref().copied())
            .unwrap_or(false)
    }

    /// Set or clear a cell
    pub fn set(&mut self, point: Point, value: bool) {
        if let Some(index) = self.index(point) {
            self.bits.set(index, value);
        }
    }

    /// Set a cell, reporting whether it was previously clear
    pub fn insert(&mut self, point: Point) -> bool {
        match self.index(point) {
            Some(index) => !self.bits.replace(index, true),
            None => false,
        }
    }

    /// Clear every cell
    pub fn clear(&mut self) {
        self.bits.fill(false);
    }

    /// Count set cells
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Test if no cells are set
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Set cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.bits.iter_ones().map(|index| {
            Point::new((index % self.width) as i32, (index / self.width) as i32)
        })
    }
}

impl fmt::Debug for CellMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CellMask({}x{}, {} set)",
            self.width,
            self.height,
            self.count()
        )
    }
}
