//! Chunked layout generation for cooperative schedulers
//!
//! A [`LayoutJob`] performs one bounded slice of work per [`LayoutJob::resume`]
//! and hands control back to the caller at fixed points: every
//! `rows_per_yield` grid rows during reset, every `max(1, room_count / 2)`
//! room attempts, after corridor routing and after validation. Any scheduler
//! (frame loop, task queue, plain loop) can drive it. Synchronous generation
//! is this same job driven to completion, so both produce identical layouts.
//!
//! The job holds the only strong reference to its generator's lease. Dropping
//! an unfinished job therefore releases the generator, and a job resumed
//! against any generator other than the one that issued it is cancelled.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::{
    algorithm::{
        connectivity::{ConnectivityReport, measure_connectivity},
        corridors::connect_rooms,
        layout::{
            AttemptFailure, GenerationReport, GenerationState, LayoutConfig, LayoutGenerator,
            LayoutObserver,
        },
        rooms::{min_rooms_required, room_attempt_budget, try_place_room},
    },
    math::random::RandomSelector,
    spatial::DungeonGrid,
};

/// Work phase a job is about to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    /// Resetting grid rows, starting at `next_row`
    ResetGrid {
        /// Next row to reset
        next_row: usize,
    },
    /// Placing rooms
    PlaceRooms {
        /// Attempts consumed so far
        attempts: usize,
    },
    /// Routing corridors between room centers
    ConnectRooms,
    /// Flood-fill validation
    Validate,
    /// Acting on the attempt's verdict
    Conclude,
    /// The job has reported its result
    Finished,
}

/// Result of one [`LayoutJob::resume`]
#[derive(Debug, Clone, PartialEq)]
pub enum JobStatus {
    /// More work remains; the phase that will run next
    Pending(JobPhase),
    /// The retry sequence concluded
    Done(GenerationReport),
    /// The owning generator was cancelled or replaced; nothing was emitted
    Cancelled,
}

/// Suspended state of one chunked generation
#[derive(Debug)]
pub struct LayoutJob {
    seed: u64,
    lease: Option<Arc<()>>,
    attempt: u32,
    attempt_budget: u32,
    room_yield_interval: usize,
    rows_per_yield: usize,
    phase: JobPhase,
    rng: RandomSelector,
    corridors: usize,
    connectivity: Option<ConnectivityReport>,
    failure: Option<AttemptFailure>,
}

impl LayoutJob {
    pub(crate) fn new(seed: u64, lease: Arc<()>, config: &LayoutConfig) -> Self {
        Self {
            seed,
            lease: Some(lease),
            attempt: 0,
            attempt_budget: config.attempt_budget(),
            room_yield_interval: (config.room_count() / 2).max(1),
            rows_per_yield: config.rows_per_yield(),
            phase: JobPhase::ResetGrid { next_row: 0 },
            rng: RandomSelector::new(seed),
            corridors: 0,
            connectivity: None,
            failure: None,
        }
    }

    /// Base seed of the run
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Zero-based index of the attempt in progress
    pub const fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Seed used by the attempt in progress
    pub const fn attempt_seed(&self) -> u64 {
        self.seed.wrapping_add(self.attempt as u64)
    }

    /// Phase that the next resume will run
    pub const fn phase(&self) -> JobPhase {
        self.phase
    }

    /// Run work until the next yield point
    ///
    /// Returns [`JobStatus::Cancelled`] without touching the generator when
    /// it did not issue this job or was cancelled since. A cancelled job
    /// stays finished.
    pub fn resume(
        &mut self,
        generator: &mut LayoutGenerator,
        observer: &mut dyn LayoutObserver,
    ) -> JobStatus {
        let owned = self
            .lease
            .as_ref()
            .is_some_and(|lease| generator.is_leased_to(lease));
        if !owned {
            self.phase = JobPhase::Finished;
            self.lease = None;
            return JobStatus::Cancelled;
        }

        match self.phase {
            JobPhase::ResetGrid { next_row } => self.reset_rows(generator, next_row),
            JobPhase::PlaceRooms { attempts } => self.place_rooms(generator, attempts, observer),
            JobPhase::ConnectRooms => {
                self.corridors = connect_rooms(
                    &mut generator.grid,
                    &generator.centers,
                    &generator.config,
                    &mut self.rng,
                );
                self.phase = JobPhase::Validate;
                JobStatus::Pending(self.phase)
            }
            JobPhase::Validate => self.validate(generator, observer),
            JobPhase::Conclude => self.conclude(generator, observer),
            JobPhase::Finished => JobStatus::Cancelled,
        }
    }

    fn begin_attempt(&mut self, generator: &mut LayoutGenerator) {
        let attempt_seed = self.attempt_seed();
        debug!(
            "layout attempt {}/{} with seed {attempt_seed}",
            self.attempt + 1,
            self.attempt_budget
        );
        self.rng = RandomSelector::new(attempt_seed);
        self.corridors = 0;
        self.connectivity = None;
        self.failure = None;
        generator.state = GenerationState::Generating {
            attempt: self.attempt,
        };
        generator.rooms.clear();
        generator.centers.clear();
        let (width, height) = (generator.config.width(), generator.config.height());
        if generator.grid.width() != width || generator.grid.height() != height {
            generator.grid = DungeonGrid::new(width, height);
        }
    }

    fn reset_rows(&mut self, generator: &mut LayoutGenerator, next_row: usize) -> JobStatus {
        if next_row == 0 {
            self.begin_attempt(generator);
        }

        let end = next_row + self.rows_per_yield;
        let mut row = next_row;
        while row < end && generator.grid.reset_row(row) {
            row += 1;
        }

        self.phase = if row >= generator.grid.height() {
            JobPhase::PlaceRooms { attempts: 0 }
        } else {
            JobPhase::ResetGrid { next_row: row }
        };
        JobStatus::Pending(self.phase)
    }

    fn place_rooms(
        &mut self,
        generator: &mut LayoutGenerator,
        attempts: usize,
        observer: &mut dyn LayoutObserver,
    ) -> JobStatus {
        let target = generator.config.room_count();
        let budget = room_attempt_budget(target);
        let chunk_end = attempts + self.room_yield_interval;
        let mut attempts = attempts;

        while attempts < chunk_end && attempts < budget && generator.rooms.len() < target {
            if let Some(room) = try_place_room(
                &mut generator.grid,
                &mut generator.rooms,
                &generator.config,
                &mut self.rng,
            ) {
                generator.centers.push(room.center());
            }
            attempts += 1;
        }

        if attempts < budget && generator.rooms.len() < target {
            self.phase = JobPhase::PlaceRooms { attempts };
            return JobStatus::Pending(self.phase);
        }

        let required = min_rooms_required(target);
        if generator.rooms.len() < required {
            self.failure = Some(AttemptFailure::TooFewRooms {
                placed: generator.rooms.len(),
                required,
            });
            debug!(
                "attempt {} placed {} of {required} required rooms",
                self.attempt + 1,
                generator.rooms.len()
            );
            notify_layout(observer, generator);
            return self.conclude(generator, observer);
        }

        self.phase = JobPhase::ConnectRooms;
        JobStatus::Pending(self.phase)
    }

    fn validate(
        &mut self,
        generator: &mut LayoutGenerator,
        observer: &mut dyn LayoutObserver,
    ) -> JobStatus {
        let connectivity =
            measure_connectivity(&generator.grid, generator.config.diagonal_connectivity());
        let threshold = generator.config.connectivity_threshold();
        self.connectivity = Some(connectivity);
        if !connectivity.meets(threshold) {
            self.failure = Some(AttemptFailure::Disconnected {
                connectivity,
                threshold,
            });
            debug!(
                "attempt {} reached {}/{} walkable cells (threshold {threshold})",
                self.attempt + 1,
                connectivity.reachable,
                connectivity.total
            );
        }
        notify_layout(observer, generator);
        self.phase = JobPhase::Conclude;
        JobStatus::Pending(self.phase)
    }

    fn conclude(
        &mut self,
        generator: &mut LayoutGenerator,
        observer: &mut dyn LayoutObserver,
    ) -> JobStatus {
        let success = self.failure.is_none();
        if !success && self.attempt + 1 < self.attempt_budget {
            self.attempt += 1;
            self.phase = JobPhase::ResetGrid { next_row: 0 };
            return JobStatus::Pending(self.phase);
        }

        let report = GenerationReport {
            success,
            seed: self.seed,
            attempts: self.attempt + 1,
            final_seed: self.attempt_seed(),
            rooms: generator.rooms.len(),
            corridors: self.corridors,
            connectivity: self.connectivity,
            failure: self.failure,
        };

        if success {
            info!(
                "layout generated with seed {} after {} attempt(s): {} rooms, {} corridors",
                report.final_seed, report.attempts, report.rooms, report.corridors
            );
            generator.state = GenerationState::Succeeded;
        } else {
            warn!(
                "layout generation failed after {} attempt(s) from seed {}: {:?}",
                report.attempts, self.seed, self.failure
            );
            generator.state = GenerationState::Failed;
        }

        self.lease = None;
        self.phase = JobPhase::Finished;
        observer.on_generation_finished(success);
        JobStatus::Done(report)
    }
}

fn notify_layout(observer: &mut dyn LayoutObserver, generator: &LayoutGenerator) {
    observer.on_layout_updated(&generator.grid, &generator.rooms, &generator.centers);
}
