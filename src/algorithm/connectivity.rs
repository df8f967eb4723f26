//! Flood-fill connectivity validation over walkable cells

use std::collections::VecDeque;

use crate::spatial::{Cell, CellMask, DungeonGrid, Point};

const ORTHOGONAL: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];
const DIAGONAL: [(i32, i32); 4] = [(-1, -1), (1, -1), (1, 1), (-1, 1)];

/// Reachability of walkable cells from the first floor cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectivityReport {
    /// Floor and door cells reached by the flood fill
    pub reachable: usize,
    /// All floor and door cells on the grid
    pub total: usize,
}

impl ConnectivityReport {
    /// Fraction of walkable cells reached; 0 for a grid without any
    pub const fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.reachable as f64 / self.total as f64
        }
    }

    /// Check the ratio against an acceptance threshold
    pub const fn meets(&self, threshold: f64) -> bool {
        self.total > 0 && self.ratio() >= threshold
    }
}

/// First floor cell in row-major scan order
pub fn first_floor_cell(grid: &DungeonGrid) -> Option<Point> {
    grid.cells
        .indexed_iter()
        .find(|&(_, &cell)| cell == Cell::Floor)
        .map(|((y, x), _)| Point::new(x as i32, y as i32))
}

/// Flood fill from the first floor cell and count what it reaches
pub fn measure_connectivity(grid: &DungeonGrid, diagonal: bool) -> ConnectivityReport {
    let total = grid.cells.iter().filter(|cell| cell.is_walkable()).count();
    let Some(start) = first_floor_cell(grid) else {
        return ConnectivityReport {
            reachable: 0,
            total,
        };
    };

    let mut visited = CellMask::new(grid.width(), grid.height());
    let mut queue = VecDeque::from([start]);
    visited.set(start, true);
    let mut reachable = 0;

    while let Some(point) = queue.pop_front() {
        reachable += 1;
        let diagonal_steps = if diagonal { DIAGONAL.len() } else { 0 };
        let neighbours = ORTHOGONAL
            .iter()
            .chain(DIAGONAL.iter().take(diagonal_steps));
        for &(dx, dy) in neighbours {
            let next = point.offset(dx, dy);
            if grid.cell(next).is_some_and(|cell| cell.is_walkable()) && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    ConnectivityReport { reachable, total }
}
