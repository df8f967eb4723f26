//! Target-area masks and placement candidate enumeration
//!
//! Candidates are checked against the static allowed mask only. Overlap with
//! cells stamped later in the same pass is re-checked when a candidate is
//! consumed, since occupancy changes as other patterns are placed.

use ndarray::Array2;

use crate::{
    math::random::RandomSelector,
    patterns::{Pattern, PatternConstraint},
    spatial::{Cell, CellMask, Direction, Point, Rect, TargetKind},
};

/// Bounding box of the target cells with its allowed masks
///
/// Masks are stored in box-local coordinates; the public methods take grid
/// coordinates.
#[derive(Debug, Clone)]
pub struct TargetArea {
    bounds: Rect,
    target_cells: usize,
    allowed_all: CellMask,
    allowed_free: Option<CellMask>,
}

impl TargetArea {
    /// Build masks for every cell of `kind`
    ///
    /// The free mask (target cells outside `used_cells` and `prior_occupied`)
    /// is only computed when `with_free` is set. Returns `None` when the grid
    /// holds no target cell.
    pub fn build(
        grid: &Array2<Cell>,
        kind: TargetKind,
        used_cells: Option<&CellMask>,
        prior_occupied: &[Point],
        with_free: bool,
    ) -> Option<Self> {
        let targets: Vec<Point> = grid
            .indexed_iter()
            .filter(|&(_, &cell)| kind.matches(cell))
            .map(|((y, x), _)| Point::new(x as i32, y as i32))
            .collect();

        let min_x = targets.iter().map(|p| p.x).min()?;
        let min_y = targets.iter().map(|p| p.y).min()?;
        let max_x = targets.iter().map(|p| p.x).max()?;
        let max_y = targets.iter().map(|p| p.y).max()?;
        let bounds = Rect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1);

        let (width, height) = (bounds.width as usize, bounds.height as usize);
        let mut allowed_all = CellMask::new(width, height);
        for &point in &targets {
            allowed_all.set(point.offset(-min_x, -min_y), true);
        }

        let allowed_free = with_free.then(|| {
            let mut free = allowed_all.clone();
            if let Some(used) = used_cells {
                for point in used.iter() {
                    free.set(point.offset(-min_x, -min_y), false);
                }
            }
            for point in prior_occupied {
                free.set(point.offset(-min_x, -min_y), false);
            }
            free
        });

        Some(Self {
            bounds,
            target_cells: targets.len(),
            allowed_all,
            allowed_free,
        })
    }

    /// Bounding box in grid coordinates
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Number of target cells
    pub const fn target_cells(&self) -> usize {
        self.target_cells
    }

    /// Whether the free mask was computed
    pub const fn has_free_mask(&self) -> bool {
        self.allowed_free.is_some()
    }

    fn local(&self, point: Point) -> Point {
        point.offset(-self.bounds.x, -self.bounds.y)
    }

    /// Whether a grid cell belongs to the target set
    pub fn is_target(&self, point: Point) -> bool {
        self.allowed_all.contains(self.local(point))
    }

    /// Whether a grid cell may be covered under the chosen mask
    ///
    /// Falls back to the full mask when free information was not computed.
    pub fn is_allowed(&self, point: Point, free_only: bool) -> bool {
        let local = self.local(point);
        match (&self.allowed_free, free_only) {
            (Some(free), true) => free.contains(local),
            _ => self.allowed_all.contains(local),
        }
    }

    /// Whether the neighbour of `point` in `direction` is outside the target set
    pub fn borders(&self, point: Point, direction: Direction) -> bool {
        !self.is_target(point.step(direction))
    }
}

/// Check the adjacency mask for a footprint stamped at `origin`
///
/// For each demanded direction, some footprint cell must border a non-target
/// cell; when required cells are configured, every one of them must.
pub fn satisfies_adjacency(
    area: &TargetArea,
    pattern: &Pattern,
    origin: Point,
    constraint: &PatternConstraint,
) -> bool {
    Direction::from_mask(constraint.adjacency).all(|direction| {
        if constraint.required_cells.is_empty() {
            pattern
                .cells_at(origin)
                .any(|cell| area.borders(cell, direction))
        } else {
            constraint
                .required_cells
                .iter()
                .all(|cell| area.borders(origin.offset(cell.x, cell.y), direction))
        }
    })
}

/// Whether every footprint cell at `origin` is allowed
pub fn footprint_allowed(area: &TargetArea, pattern: &Pattern, origin: Point, free_only: bool) -> bool {
    pattern
        .cells_at(origin)
        .all(|cell| area.is_allowed(cell, free_only))
}

/// Enumerate legal origins for one pattern, shuffled
///
/// Origins range over every position where the bounding box of the pattern
/// fits inside the target bounding box.
pub fn enumerate_candidates(
    area: &TargetArea,
    pattern: &Pattern,
    constraint: &PatternConstraint,
    free_only: bool,
    rng: &mut RandomSelector,
) -> Vec<Point> {
    if !pattern.is_stampable() || !constraint.is_enabled() {
        return Vec::new();
    }

    let bounds = area.bounds();
    let (pattern_width, pattern_height) = pattern.size();
    let mut candidates = Vec::new();

    for oy in 0..=(bounds.height - pattern_height) {
        for ox in 0..=(bounds.width - pattern_width) {
            let origin = Point::new(bounds.x + ox, bounds.y + oy);
            if footprint_allowed(area, pattern, origin, free_only)
                && satisfies_adjacency(area, pattern, origin, constraint)
            {
                candidates.push(origin);
            }
        }
    }

    rng.shuffle(&mut candidates);
    candidates
}
