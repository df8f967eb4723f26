//! Corridor routing between room centers
//!
//! Rooms are joined by a greedy nearest-neighbour spanning tree over their
//! centers. Each tree edge becomes one corridor segment carved along an
//! L-shaped or diagonal path and widened by a square brush.

use log::trace;

use crate::{
    algorithm::layout::LayoutConfig,
    math::random::RandomSelector,
    spatial::{DungeonGrid, Point},
};

/// Path shape for one corridor segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorridorShape {
    /// Along the row first, then along the column
    HorizontalFirst,
    /// Along the column first, then along the row
    VerticalFirst,
    /// Step both axes together until one is aligned, then finish straight
    Diagonal,
}

/// One spanning-tree edge: `from` is already connected, `to` joins the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanningEdge {
    /// Index of the connected center
    pub from: usize,
    /// Index of the newly connected center
    pub to: usize,
}

/// Greedy nearest-neighbour spanning tree over `centers`
///
/// Starts from center 0 and repeatedly links the closest (Manhattan) pair
/// between the connected and unconnected sets; the first strict minimum in
/// index order wins ties. Produces exactly `centers.len() - 1` edges.
pub fn spanning_edges(centers: &[Point]) -> Vec<SpanningEdge> {
    if centers.len() < 2 {
        return Vec::new();
    }

    let mut used = vec![0_usize];
    let mut unused: Vec<usize> = (1..centers.len()).collect();
    let mut edges = Vec::with_capacity(centers.len() - 1);

    while !unused.is_empty() {
        let mut best: Option<(i32, usize, usize)> = None;
        for &from in &used {
            let Some(&a) = centers.get(from) else {
                continue;
            };
            for (slot, &to) in unused.iter().enumerate() {
                let Some(&b) = centers.get(to) else {
                    continue;
                };
                let distance = a.manhattan(b);
                if best.is_none_or(|(best_distance, _, _)| distance < best_distance) {
                    best = Some((distance, from, slot));
                }
            }
        }

        let Some((_, from, slot)) = best else {
            break;
        };
        let to = unused.swap_remove(slot);
        // Keep the unconnected list in index order so ties stay stable
        unused.sort_unstable();
        used.push(to);
        edges.push(SpanningEdge { from, to });
    }

    edges
}

/// Cells visited walking from `from` to `to`, both ends included
pub fn corridor_path(from: Point, to: Point, shape: CorridorShape) -> Vec<Point> {
    let mut path = vec![from];
    let mut current = from;

    let mut walk = |target: Point, step_x: bool, step_y: bool, path: &mut Vec<Point>| {
        while (step_x && current.x != target.x) || (step_y && current.y != target.y) {
            if step_x {
                current.x += (target.x - current.x).signum();
            }
            if step_y {
                current.y += (target.y - current.y).signum();
            }
            path.push(current);
        }
    };

    match shape {
        CorridorShape::HorizontalFirst => {
            walk(to, true, false, &mut path);
            walk(to, false, true, &mut path);
        }
        CorridorShape::VerticalFirst => {
            walk(to, false, true, &mut path);
            walk(to, true, false, &mut path);
        }
        CorridorShape::Diagonal => {
            walk(to, true, true, &mut path);
        }
    }

    path
}

/// Paint a `(2w+1)×(2w+1)` brush centered on every path cell
pub fn carve_path(grid: &mut DungeonGrid, path: &[Point], half_width: i32, corridor_id: i32) {
    let half_width = half_width.max(0);
    for &cell in path {
        for dy in -half_width..=half_width {
            for dx in -half_width..=half_width {
                grid.carve_corridor_cell(cell.offset(dx, dy), corridor_id);
            }
        }
    }
}

/// Resolve the brush half-width for the next segment
pub fn segment_width(config: &LayoutConfig, rng: &mut RandomSelector) -> i32 {
    if config.randomize_corridor_width() {
        let (min, max) = config.corridor_width_range();
        rng.range_inclusive(min, max)
    } else {
        config.corridor_width()
    }
}

/// Pick the path shape for the next segment
pub fn segment_shape(config: &LayoutConfig, rng: &mut RandomSelector) -> CorridorShape {
    if config.diagonal_corridors() {
        CorridorShape::Diagonal
    } else if rng.coin() {
        CorridorShape::HorizontalFirst
    } else {
        CorridorShape::VerticalFirst
    }
}

/// Connect every center, returning the number of segments carved
pub fn connect_rooms(
    grid: &mut DungeonGrid,
    centers: &[Point],
    config: &LayoutConfig,
    rng: &mut RandomSelector,
) -> usize {
    let edges = spanning_edges(centers);
    for (corridor_id, edge) in edges.iter().enumerate() {
        let (Some(&from), Some(&to)) = (centers.get(edge.from), centers.get(edge.to)) else {
            continue;
        };
        let width = segment_width(config, rng);
        let shape = segment_shape(config, rng);
        let path = corridor_path(from, to, shape);
        trace!(
            "corridor {corridor_id}: {from:?} -> {to:?} ({shape:?}, half-width {width}, {} cells)",
            path.len()
        );
        carve_path(grid, &path, width, corridor_id as i32);
    }
    edges.len()
}
