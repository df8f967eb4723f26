//! Rectangular multi-cell stencils and the source interface that supplies them

use serde::{Deserialize, Serialize};

use crate::spatial::Point;

/// Immutable stencil of cells relative to its top-left origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    width: i32,
    height: i32,
    footprint: Vec<Point>,
}

impl Pattern {
    /// Build a pattern from explicit offsets
    ///
    /// Offsets outside `[0, width) × [0, height)` and duplicates are dropped;
    /// the footprint is kept in row-major order.
    pub fn new(width: i32, height: i32, cells: impl IntoIterator<Item = Point>) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let mut footprint: Vec<Point> = cells
            .into_iter()
            .filter(|cell| cell.x >= 0 && cell.y >= 0 && cell.x < width && cell.y < height)
            .collect();
        footprint.sort_unstable_by_key(|cell| (cell.y, cell.x));
        footprint.dedup();
        Self {
            width,
            height,
            footprint,
        }
    }

    /// Solid rectangle covering every cell of its bounding box
    pub fn rectangle(width: i32, height: i32) -> Self {
        let cells = (0..height.max(0))
            .flat_map(|y| (0..width.max(0)).map(move |x| Point::new(x, y)))
            .collect::<Vec<_>>();
        Self::new(width, height, cells)
    }

    /// Bounding box size `(width, height)`
    pub const fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Relative cell offsets
    pub fn footprint(&self) -> &[Point] {
        &self.footprint
    }

    /// Bounding box area
    pub const fn area(&self) -> i32 {
        self.width * self.height
    }

    /// Whether the pattern can ever be stamped
    pub fn is_stampable(&self) -> bool {
        !self.footprint.is_empty() && self.area() > 0
    }

    /// Absolute cells covered when stamped at `origin`
    pub fn cells_at(&self, origin: Point) -> impl Iterator<Item = Point> + '_ {
        self.footprint
            .iter()
            .map(move |cell| origin.offset(cell.x, cell.y))
    }
}

/// Supplier of patterns, typically backed by a tile atlas
pub trait PatternSource {
    /// Number of pattern slots
    fn pattern_count(&self) -> usize;

    /// Pattern at `index`, `None` for an empty slot
    fn pattern(&self, index: usize) -> Option<&Pattern>;
}

impl PatternSource for [Pattern] {
    fn pattern_count(&self) -> usize {
        self.len()
    }

    fn pattern(&self, index: usize) -> Option<&Pattern> {
        self.get(index)
    }
}

impl PatternSource for Vec<Pattern> {
    fn pattern_count(&self) -> usize {
        self.len()
    }

    fn pattern(&self, index: usize) -> Option<&Pattern> {
        self.get(index)
    }
}

impl PatternSource for [Option<Pattern>] {
    fn pattern_count(&self) -> usize {
        self.len()
    }

    fn pattern(&self, index: usize) -> Option<&Pattern> {
        self.get(index).and_then(Option::as_ref)
    }
}
