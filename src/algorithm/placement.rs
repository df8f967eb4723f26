//! Weighted iterative pattern placement over a target cell set
//!
//! The engine enumerates candidates per pattern, then repeatedly draws a
//! pattern by weight and pops one of its candidates until coverage and
//! minimum counts are satisfied, every pattern is exhausted, or the iteration
//! cap is reached. Shortfalls are reported on the result, never as errors.

use log::{debug, warn};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::{
    algorithm::candidates::{TargetArea, enumerate_candidates},
    io::{
        configuration::PLACEMENT_ITERATION_CAP,
        error::{DungeonError, Result},
    },
    math::random::RandomSelector,
    patterns::{ConstraintIndex, Override, PatternSource},
    spatial::{Cell, CellMask, Point, TargetKind},
};

/// Pass-wide placement flags
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementOptions {
    /// Cells the pass stamps onto
    pub target: TargetKind,
    /// Fraction of target cells to cover, clamped to `[0, 1]`
    pub coverage_ratio: f64,
    /// Reject candidates that overlap cells stamped earlier in the pass
    pub avoid_overlap: bool,
    /// Restrict candidates to free cells unless a pattern overrides it
    pub only_unoccupied: bool,
    /// Report stamped cells unless a pattern overrides it
    pub register_cells: bool,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            target: TargetKind::Floor,
            coverage_ratio: 0.0,
            avoid_overlap: true,
            only_unoccupied: false,
            register_cells: true,
        }
    }
}

/// Everything one placement pass reads
#[derive(Clone, Copy)]
pub struct PlacementRequest<'a> {
    /// Grid snapshot to stamp onto
    pub grid: &'a Array2<Cell>,
    /// Pattern supplier; `None` is a configuration error
    pub patterns: Option<&'a dyn PatternSource>,
    /// Per-pattern constraints
    pub constraints: &'a ConstraintIndex,
    /// Pass-wide flags
    pub options: PlacementOptions,
    /// Cells claimed by earlier passes
    pub used_cells: Option<&'a CellMask>,
    /// Cells already occupied outside this crate's bookkeeping
    pub prior_occupied: &'a [Point],
}

impl<'a> PlacementRequest<'a> {
    /// Request with default options and no prior occupancy
    pub fn new(
        grid: &'a Array2<Cell>,
        patterns: &'a dyn PatternSource,
        constraints: &'a ConstraintIndex,
    ) -> Self {
        Self {
            grid,
            patterns: Some(patterns),
            constraints,
            options: PlacementOptions::default(),
            used_cells: None,
            prior_occupied: &[],
        }
    }

    /// Replace the pass-wide flags
    #[must_use]
    pub const fn with_options(mut self, options: PlacementOptions) -> Self {
        self.options = options;
        self
    }

    /// Attach the used-cell mask of earlier passes
    #[must_use]
    pub const fn with_used_cells(mut self, used_cells: &'a CellMask) -> Self {
        self.used_cells = Some(used_cells);
        self
    }

    /// Attach externally occupied cells
    #[must_use]
    pub const fn with_prior_occupied(mut self, prior_occupied: &'a [Point]) -> Self {
        self.prior_occupied = prior_occupied;
        self
    }
}

/// One stamped pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    /// Pattern index
    pub pattern: usize,
    /// Grid position of the footprint origin
    pub origin: Point,
}

/// Outcome of a placement pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementResult {
    /// Cells reported to the caller (register flag resolved per pattern)
    pub stamped_cells: Vec<Point>,
    /// Every placement in stamping order
    pub placements: Vec<Placement>,
    /// Placements per pattern index
    pub placed_counts: Vec<usize>,
    /// Distinct target cells covered in this pass
    pub covered_cells: usize,
    /// Size of the target set
    pub target_cells: usize,
    /// Coverage goal `floor(target_cells × ratio)`
    pub target_coverage: usize,
    /// Selection iterations run
    pub iterations: usize,
    /// Whether the loop stopped at the iteration cap
    pub hit_iteration_cap: bool,
    /// Pattern indices that ended below their minimum count
    pub unmet_minimums: Vec<usize>,
    /// Always true for a pass that ran; shortfalls are listed separately
    pub success: bool,
}

impl PlacementResult {
    /// Whether coverage or minimum-count goals were missed
    pub fn shortfall(&self) -> bool {
        self.covered_cells < self.target_coverage
            || !self.unmet_minimums.is_empty()
            || self.hit_iteration_cap
    }
}

/// Coverage goal for a target set
pub fn target_coverage(target_cells: usize, coverage_ratio: f64) -> usize {
    let ratio = if coverage_ratio.is_nan() {
        0.0
    } else {
        coverage_ratio.clamp(0.0, 1.0)
    };
    (target_cells as f64 * ratio).floor() as usize
}

/// Seeded placement engine
#[derive(Debug, Clone)]
pub struct PlacementEngine {
    rng: RandomSelector,
}

impl PlacementEngine {
    /// Create an engine with a deterministic random source
    pub fn new(seed: u64) -> Self {
        Self {
            rng: RandomSelector::new(seed),
        }
    }

    /// Run one placement pass
    ///
    /// # Errors
    ///
    /// Returns [`DungeonError::MissingTileSource`] when the request carries no
    /// pattern source
    pub fn place(&mut self, request: &PlacementRequest<'_>) -> Result<PlacementResult> {
        let patterns = request.patterns.ok_or(DungeonError::MissingTileSource)?;
        let options = request.options;
        let pattern_count = patterns.pattern_count();

        let any_force_free = (0..pattern_count)
            .any(|index| request.constraints.get(index).unoccupied == Override::ForceOn);
        let with_free = options.only_unoccupied || any_force_free;

        let mut result = PlacementResult {
            placed_counts: vec![0; pattern_count],
            success: true,
            ..PlacementResult::default()
        };

        let Some(area) = TargetArea::build(
            request.grid,
            options.target,
            request.used_cells,
            request.prior_occupied,
            with_free,
        ) else {
            debug!("placement pass has no {:?} cells to target", options.target);
            return Ok(result);
        };

        result.target_cells = area.target_cells();
        result.target_coverage = target_coverage(area.target_cells(), options.coverage_ratio);

        let mut candidates: Vec<Vec<Point>> = (0..pattern_count)
            .map(|index| {
                let constraint = request.constraints.get(index);
                patterns.pattern(index).map_or_else(Vec::new, |pattern| {
                    let free_only = constraint.unoccupied.resolve(options.only_unoccupied);
                    enumerate_candidates(&area, pattern, constraint, free_only, &mut self.rng)
                })
            })
            .collect();

        debug!(
            "placement pass: {} target cells, goal {}, candidates per pattern {:?}",
            result.target_cells,
            result.target_coverage,
            candidates.iter().map(Vec::len).collect::<Vec<_>>()
        );

        let (rows, cols) = request.grid.dim();
        let mut occupancy = CellMask::new(cols, rows);
        let mut weights = vec![0.0; pattern_count];

        while result.iterations < PLACEMENT_ITERATION_CAP {
            let mut minimum_pending = false;
            for (index, weight) in weights.iter_mut().enumerate() {
                let constraint = request.constraints.get(index);
                let placed = result.placed_counts.get(index).copied().unwrap_or(0);
                let eligible = constraint.is_enabled()
                    && candidates.get(index).is_some_and(|list| !list.is_empty())
                    && !constraint.at_max(placed);
                *weight = if eligible { constraint.weight } else { 0.0 };
                minimum_pending |= eligible && constraint.below_min(placed);
            }

            if !minimum_pending && result.covered_cells >= result.target_coverage {
                break;
            }

            // Unmet minimums take priority over general coverage filling
            if minimum_pending {
                for (index, weight) in weights.iter_mut().enumerate() {
                    let placed = result.placed_counts.get(index).copied().unwrap_or(0);
                    if !request.constraints.get(index).below_min(placed) {
                        *weight = 0.0;
                    }
                }
            }

            let Some(index) = self.rng.weighted_choice(&weights) else {
                break;
            };
            result.iterations += 1;

            let Some(list) = candidates.get_mut(index) else {
                break;
            };
            let Some(slot) = self.rng.index(list.len()) else {
                continue;
            };
            let origin = list.swap_remove(slot);
            let Some(pattern) = patterns.pattern(index) else {
                continue;
            };

            if options.avoid_overlap && pattern.cells_at(origin).any(|cell| occupancy.contains(cell)) {
                continue;
            }

            let constraint = request.constraints.get(index);
            let register = constraint.register.resolve(options.register_cells);
            for cell in pattern.cells_at(origin) {
                if occupancy.insert(cell) {
                    result.covered_cells += 1;
                }
                if register {
                    result.stamped_cells.push(cell);
                }
            }
            if let Some(count) = result.placed_counts.get_mut(index) {
                *count += 1;
            }
            result.placements.push(Placement {
                pattern: index,
                origin,
            });
        }

        result.hit_iteration_cap = result.iterations >= PLACEMENT_ITERATION_CAP;
        result.unmet_minimums = (0..pattern_count)
            .filter(|&index| {
                let placed = result.placed_counts.get(index).copied().unwrap_or(0);
                request.constraints.get(index).below_min(placed)
            })
            .collect();

        if result.shortfall() {
            warn!(
                "placement shortfall: covered {}/{} cells, unmet minimums {:?}{}",
                result.covered_cells,
                result.target_coverage,
                result.unmet_minimums,
                if result.hit_iteration_cap {
                    ", iteration cap reached"
                } else {
                    ""
                }
            );
        } else {
            debug!(
                "placement pass complete: {} placements covering {} cells in {} iterations",
                result.placements.len(),
                result.covered_cells,
                result.iterations
            );
        }

        Ok(result)
    }
}
