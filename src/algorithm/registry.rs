//! Explicit registry of placement passes per layout instance
//!
//! The orchestrator owns one [`PlacerRegistry`] and feeds it layout events.
//! Each layout carries a [`RefreshMode`] so the registry can tell a manual
//! regeneration (run passes once, after the retry sequence concludes) from
//! steady-state updates (run passes on every layout update).

use log::{debug, info};
use std::collections::BTreeMap;

use crate::{
    algorithm::{
        layout::{GenerationReport, LayoutGenerator, LayoutObserver},
        placement::{PlacementEngine, PlacementOptions, PlacementRequest, PlacementResult},
        terrain::paint_terrain,
    },
    io::error::{DungeonError, Result},
    patterns::{ConstraintIndex, Pattern},
    spatial::{DungeonGrid, Point, Rect},
};

/// Identifier of a layout instance known to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayoutId(pub u32);

/// Identifier of a registered pass, unique per registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlacerId(u32);

/// What a pass writes
#[derive(Debug, Clone, PartialEq)]
pub enum PassKind {
    /// Stamp patterns under constraints
    Patterns {
        /// Pattern slots
        patterns: Vec<Pattern>,
        /// Per-pattern constraints
        constraints: ConstraintIndex,
    },
    /// Paint every target cell with one terrain
    Terrain {
        /// Terrain set index
        terrain_set: usize,
        /// Terrain index within the set
        terrain: usize,
        /// Terrains per set in the host catalog
        catalog: Vec<usize>,
    },
}

/// One placer: flags plus what it writes
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementPass {
    /// Label used in logs and exports
    pub name: String,
    /// Pass-wide flags
    pub options: PlacementOptions,
    /// Pattern or terrain payload
    pub kind: PassKind,
}

/// Result of running one pass
#[derive(Debug, Clone, PartialEq)]
pub struct PassOutcome {
    /// Pass that ran
    pub placer: PlacerId,
    /// Pass label
    pub name: String,
    /// Cells written and registered as used
    pub cells: Vec<Point>,
    /// Pattern placement details (pattern passes only)
    pub placement: Option<PlacementResult>,
}

/// Notification emitted by a layout generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutEvent {
    /// An attempt finished and its grid is readable
    LayoutUpdated,
    /// The retry sequence concluded
    GenerationFinished {
        /// Whether the final layout was accepted
        success: bool,
    },
}

/// How layout events are interpreted for one layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshMode {
    /// Every layout update runs the passes
    #[default]
    Steady,
    /// A manual regeneration is running; only its conclusion runs the passes
    ManualInProgress,
}

#[derive(Debug, Default)]
struct LayoutEntry {
    placers: Vec<(PlacerId, PlacementPass)>,
    mode: RefreshMode,
}

/// Observer that queues events for later dispatch
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<LayoutEvent>,
}

impl EventQueue {
    /// Take the queued events in arrival order
    pub fn drain(&mut self) -> Vec<LayoutEvent> {
        std::mem::take(&mut self.events)
    }
}

impl LayoutObserver for EventQueue {
    fn on_layout_updated(&mut self, _grid: &DungeonGrid, _rooms: &[Rect], _centers: &[Point]) {
        self.events.push(LayoutEvent::LayoutUpdated);
    }

    fn on_generation_finished(&mut self, success: bool) {
        self.events.push(LayoutEvent::GenerationFinished { success });
    }
}

/// Registry of placement passes keyed by layout
#[derive(Debug, Default)]
pub struct PlacerRegistry {
    layouts: BTreeMap<LayoutId, LayoutEntry>,
    next_placer: u32,
}

impl PlacerRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pass to a layout; passes run in registration order
    pub fn register(&mut self, layout: LayoutId, pass: PlacementPass) -> PlacerId {
        let id = PlacerId(self.next_placer);
        self.next_placer = self.next_placer.wrapping_add(1);
        self.layouts
            .entry(layout)
            .or_default()
            .placers
            .push((id, pass));
        id
    }

    /// Remove a pass, returning it if it was registered
    pub fn unregister(&mut self, layout: LayoutId, placer: PlacerId) -> Option<PlacementPass> {
        let entry = self.layouts.get_mut(&layout)?;
        let position = entry.placers.iter().position(|(id, _)| *id == placer)?;
        let (_, pass) = entry.placers.remove(position);
        if entry.placers.is_empty() && entry.mode == RefreshMode::Steady {
            self.layouts.remove(&layout);
        }
        Some(pass)
    }

    /// Number of passes registered for a layout
    pub fn placer_count(&self, layout: LayoutId) -> usize {
        self.layouts
            .get(&layout)
            .map_or(0, |entry| entry.placers.len())
    }

    /// Current refresh mode of a layout
    pub fn mode(&self, layout: LayoutId) -> RefreshMode {
        self.layouts
            .get(&layout)
            .map_or(RefreshMode::Steady, |entry| entry.mode)
    }

    /// Mark the start of a manual regeneration
    pub fn begin_manual(&mut self, layout: LayoutId) {
        self.layouts.entry(layout).or_default().mode = RefreshMode::ManualInProgress;
    }

    /// Run every pass of a layout against `grid`
    ///
    /// Each pass sees the used cells of the passes before it; its written
    /// cells are registered into the grid's used-cell mask afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`DungeonError::UnknownLayout`] for an unregistered layout and
    /// propagates configuration errors from individual passes
    pub fn run_all(
        &self,
        layout: LayoutId,
        grid: &mut DungeonGrid,
        seed: u64,
    ) -> Result<Vec<PassOutcome>> {
        let entry = self
            .layouts
            .get(&layout)
            .ok_or(DungeonError::UnknownLayout(layout.0))?;

        let mut outcomes = Vec::with_capacity(entry.placers.len());
        for (position, (placer, pass)) in entry.placers.iter().enumerate() {
            let outcome = run_pass(*placer, pass, grid, seed.wrapping_add(position as u64))?;
            grid.register_used_cells(&outcome.cells);
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    /// Interpret one event under the layout's refresh mode
    ///
    /// Returns the pass outcomes when the event triggered a run.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Self::run_all`]
    pub fn dispatch(
        &mut self,
        layout: LayoutId,
        event: LayoutEvent,
        grid: &mut DungeonGrid,
        seed: u64,
    ) -> Result<Option<Vec<PassOutcome>>> {
        let mode = self.mode(layout);
        match (mode, event) {
            (RefreshMode::ManualInProgress, LayoutEvent::LayoutUpdated)
            | (RefreshMode::Steady, LayoutEvent::GenerationFinished { .. }) => Ok(None),
            (RefreshMode::ManualInProgress, LayoutEvent::GenerationFinished { success }) => {
                if let Some(entry) = self.layouts.get_mut(&layout) {
                    entry.mode = RefreshMode::Steady;
                }
                if success && self.placer_count(layout) > 0 {
                    self.run_all(layout, grid, seed).map(Some)
                } else {
                    debug!("manual regeneration of layout {layout:?} ended without a run");
                    Ok(None)
                }
            }
            (RefreshMode::Steady, LayoutEvent::LayoutUpdated) => {
                if self.placer_count(layout) == 0 {
                    return Ok(None);
                }
                self.run_all(layout, grid, seed).map(Some)
            }
        }
    }

    /// Regenerate a layout manually and run its passes once on success
    ///
    /// # Errors
    ///
    /// Propagates generation and pass errors
    pub fn regenerate(
        &mut self,
        layout: LayoutId,
        generator: &mut LayoutGenerator,
        seed: u64,
    ) -> Result<(GenerationReport, Vec<PassOutcome>)> {
        self.begin_manual(layout);
        let mut queue = EventQueue::default();
        let report = match generator.generate_with(seed, &mut queue) {
            Ok(report) => report,
            Err(error) => {
                if let Some(entry) = self.layouts.get_mut(&layout) {
                    entry.mode = RefreshMode::Steady;
                }
                return Err(error);
            }
        };

        let mut outcomes = Vec::new();
        for event in queue.drain() {
            if let Some(ran) = self.dispatch(layout, event, generator.grid_mut(), seed)? {
                outcomes = ran;
            }
        }
        info!(
            "layout {layout:?} regenerated: success={}, {} pass(es) run",
            report.success,
            outcomes.len()
        );
        Ok((report, outcomes))
    }
}

fn run_pass(
    placer: PlacerId,
    pass: &PlacementPass,
    grid: &DungeonGrid,
    seed: u64,
) -> Result<PassOutcome> {
    match &pass.kind {
        PassKind::Patterns {
            patterns,
            constraints,
        } => {
            let request = PlacementRequest::new(&grid.cells, patterns, constraints)
                .with_options(pass.options)
                .with_used_cells(&grid.used_cells);
            let result = PlacementEngine::new(seed).place(&request)?;
            Ok(PassOutcome {
                placer,
                name: pass.name.clone(),
                cells: result.stamped_cells.clone(),
                placement: Some(result),
            })
        }
        PassKind::Terrain {
            terrain_set,
            terrain,
            catalog,
        } => {
            let paint = paint_terrain(
                &grid.cells,
                pass.options.target,
                Some(catalog),
                *terrain_set,
                *terrain,
                Some(&grid.used_cells),
                pass.options.only_unoccupied,
            )?;
            Ok(PassOutcome {
                placer,
                name: pass.name.clone(),
                cells: paint.cells,
                placement: None,
            })
        }
    }
}
