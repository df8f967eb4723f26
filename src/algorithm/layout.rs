//! Layout generation: configuration, observer hooks and the retrying generator
//!
//! A [`LayoutGenerator`] owns the grid model for one layout instance. Each
//! call to [`LayoutGenerator::generate`] runs up to `max_retry` attempts, the
//! k-th seeded with `seed + k`, and leaves the last attempt's grid, rooms and
//! centers readable whether or not it succeeded.

use std::sync::{Arc, Weak};

use crate::{
    algorithm::{
        connectivity::ConnectivityReport,
        job::{JobStatus, LayoutJob},
    },
    io::{
        configuration::{
            DEFAULT_CONNECTIVITY_THRESHOLD, DEFAULT_HEIGHT, DEFAULT_MAX_RETRY, DEFAULT_PADDING,
            DEFAULT_ROOM_COUNT, DEFAULT_ROOM_SIZE_MAX, DEFAULT_ROOM_SIZE_MIN,
            DEFAULT_ROWS_PER_YIELD, DEFAULT_WIDTH,
        },
        error::{DungeonError, Result},
    },
    spatial::{DungeonGrid, Point, Rect},
};

/// Generation parameters
///
/// Fields are private so that every mutation goes through a setter; setters
/// clamp values and keep each `min ≤ max` pair ordered by moving the other
/// end of the range.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    width: usize,
    height: usize,
    room_count: usize,
    room_w_min: i32,
    room_w_max: i32,
    room_h_min: i32,
    room_h_max: i32,
    padding: i32,
    corridor_width: i32,
    corridor_width_min: i32,
    corridor_width_max: i32,
    randomize_corridor_width: bool,
    diagonal_corridors: bool,
    diagonal_connectivity: bool,
    connectivity_threshold: f64,
    max_retry: u32,
    rows_per_yield: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            room_count: DEFAULT_ROOM_COUNT,
            room_w_min: DEFAULT_ROOM_SIZE_MIN,
            room_w_max: DEFAULT_ROOM_SIZE_MAX,
            room_h_min: DEFAULT_ROOM_SIZE_MIN,
            room_h_max: DEFAULT_ROOM_SIZE_MAX,
            padding: DEFAULT_PADDING,
            corridor_width: 0,
            corridor_width_min: 0,
            corridor_width_max: 1,
            randomize_corridor_width: false,
            diagonal_corridors: false,
            diagonal_connectivity: false,
            connectivity_threshold: DEFAULT_CONNECTIVITY_THRESHOLD,
            max_retry: DEFAULT_MAX_RETRY,
            rows_per_yield: DEFAULT_ROWS_PER_YIELD,
        }
    }
}

impl LayoutConfig {
    /// Grid width in cells
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Requested number of rooms
    pub const fn room_count(&self) -> usize {
        self.room_count
    }

    /// Inclusive room width range
    pub const fn room_width_range(&self) -> (i32, i32) {
        (self.room_w_min, self.room_w_max)
    }

    /// Inclusive room height range
    pub const fn room_height_range(&self) -> (i32, i32) {
        (self.room_h_min, self.room_h_max)
    }

    /// Border margin kept free of rooms
    pub const fn padding(&self) -> i32 {
        self.padding
    }

    /// Fixed corridor half-width
    pub const fn corridor_width(&self) -> i32 {
        self.corridor_width
    }

    /// Inclusive per-segment corridor half-width range
    pub const fn corridor_width_range(&self) -> (i32, i32) {
        (self.corridor_width_min, self.corridor_width_max)
    }

    /// Whether each segment re-rolls its width
    pub const fn randomize_corridor_width(&self) -> bool {
        self.randomize_corridor_width
    }

    /// Whether corridors are carved diagonally instead of L-shaped
    pub const fn diagonal_corridors(&self) -> bool {
        self.diagonal_corridors
    }

    /// Whether the flood fill follows diagonal neighbours
    pub const fn diagonal_connectivity(&self) -> bool {
        self.diagonal_connectivity
    }

    /// Minimum reachable fraction of walkable cells
    pub const fn connectivity_threshold(&self) -> f64 {
        self.connectivity_threshold
    }

    /// Attempts per `generate` call
    pub const fn max_retry(&self) -> u32 {
        self.max_retry
    }

    /// Grid rows reset per chunk of a [`LayoutJob`]
    pub const fn rows_per_yield(&self) -> usize {
        self.rows_per_yield
    }

    /// Set grid dimensions (each at least 1)
    pub fn set_size(&mut self, width: usize, height: usize) -> &mut Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self
    }

    /// Set the requested room count
    pub const fn set_room_count(&mut self, room_count: usize) -> &mut Self {
        self.room_count = room_count;
        self
    }

    /// Set the smallest room width, raising the largest if needed
    pub fn set_room_w_min(&mut self, value: i32) -> &mut Self {
        self.room_w_min = value.max(1);
        self.room_w_max = self.room_w_max.max(self.room_w_min);
        self
    }

    /// Set the largest room width, lowering the smallest if needed
    pub fn set_room_w_max(&mut self, value: i32) -> &mut Self {
        self.room_w_max = value.max(1);
        self.room_w_min = self.room_w_min.min(self.room_w_max);
        self
    }

    /// Set the smallest room height, raising the largest if needed
    pub fn set_room_h_min(&mut self, value: i32) -> &mut Self {
        self.room_h_min = value.max(1);
        self.room_h_max = self.room_h_max.max(self.room_h_min);
        self
    }

    /// Set the largest room height, lowering the smallest if needed
    pub fn set_room_h_max(&mut self, value: i32) -> &mut Self {
        self.room_h_max = value.max(1);
        self.room_h_min = self.room_h_min.min(self.room_h_max);
        self
    }

    /// Set both room width bounds
    pub fn set_room_width(&mut self, min: i32, max: i32) -> &mut Self {
        self.set_room_w_min(min).set_room_w_max(max)
    }

    /// Set both room height bounds
    pub fn set_room_height(&mut self, min: i32, max: i32) -> &mut Self {
        self.set_room_h_min(min).set_room_h_max(max)
    }

    /// Set the border margin (at least 0)
    pub fn set_padding(&mut self, padding: i32) -> &mut Self {
        self.padding = padding.max(0);
        self
    }

    /// Set the fixed corridor half-width (negative clamps to 0)
    pub fn set_corridor_width(&mut self, width: i32) -> &mut Self {
        self.corridor_width = width.max(0);
        self
    }

    /// Set the smallest random corridor half-width, raising the largest if needed
    pub fn set_corridor_width_min(&mut self, value: i32) -> &mut Self {
        self.corridor_width_min = value.max(0);
        self.corridor_width_max = self.corridor_width_max.max(self.corridor_width_min);
        self
    }

    /// Set the largest random corridor half-width, lowering the smallest if needed
    pub fn set_corridor_width_max(&mut self, value: i32) -> &mut Self {
        self.corridor_width_max = value.max(0);
        self.corridor_width_min = self.corridor_width_min.min(self.corridor_width_max);
        self
    }

    /// Enable or disable per-segment width rolls
    pub const fn set_randomize_corridor_width(&mut self, enabled: bool) -> &mut Self {
        self.randomize_corridor_width = enabled;
        self
    }

    /// Enable or disable diagonal corridor paths
    pub const fn set_diagonal_corridors(&mut self, enabled: bool) -> &mut Self {
        self.diagonal_corridors = enabled;
        self
    }

    /// Enable or disable 8-neighbour connectivity
    pub const fn set_diagonal_connectivity(&mut self, enabled: bool) -> &mut Self {
        self.diagonal_connectivity = enabled;
        self
    }

    /// Set the connectivity threshold, clamped to `[0, 1]`
    pub fn set_connectivity_threshold(&mut self, threshold: f64) -> &mut Self {
        self.connectivity_threshold = if threshold.is_nan() {
            DEFAULT_CONNECTIVITY_THRESHOLD
        } else {
            threshold.clamp(0.0, 1.0)
        };
        self
    }

    /// Set the attempt budget
    pub const fn set_max_retry(&mut self, max_retry: u32) -> &mut Self {
        self.max_retry = max_retry;
        self
    }

    /// Set the rows reset per job chunk (at least 1)
    pub fn set_rows_per_yield(&mut self, rows: usize) -> &mut Self {
        self.rows_per_yield = rows.max(1);
        self
    }

    /// Attempts actually run per generation (at least one)
    pub fn attempt_budget(&self) -> u32 {
        self.max_retry.max(1)
    }
}

/// Notification hooks fired during generation
///
/// Both methods default to no-ops so observers only implement what they use.
pub trait LayoutObserver {
    /// Called after every attempt with its grid, rooms and centers
    fn on_layout_updated(&mut self, _grid: &DungeonGrid, _rooms: &[Rect], _centers: &[Point]) {}

    /// Called once when the retry sequence concludes
    fn on_generation_finished(&mut self, _success: bool) {}
}

impl LayoutObserver for () {}

/// Why a single attempt was rejected
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttemptFailure {
    /// Room placement ran out of attempts below the minimum
    TooFewRooms {
        /// Rooms actually placed
        placed: usize,
        /// Rooms required
        required: usize,
    },
    /// Flood fill reached too little of the walkable area
    Disconnected {
        /// Flood fill counts
        connectivity: ConnectivityReport,
        /// Threshold in force
        threshold: f64,
    },
}

/// Outcome of a full retry sequence
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    /// Whether the final attempt produced an accepted layout
    pub success: bool,
    /// Base seed passed to `generate`
    pub seed: u64,
    /// Attempts run
    pub attempts: u32,
    /// Seed of the last attempt (`seed + attempts - 1`)
    pub final_seed: u64,
    /// Rooms in the exposed layout
    pub rooms: usize,
    /// Corridor segments in the exposed layout
    pub corridors: usize,
    /// Flood fill counts of the last validated attempt
    pub connectivity: Option<ConnectivityReport>,
    /// Reason the last attempt was rejected, if it was
    pub failure: Option<AttemptFailure>,
}

/// Lifecycle of a layout instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationState {
    /// Nothing generated yet, or the last run was cancelled
    #[default]
    Idle,
    /// An attempt is running
    Generating {
        /// Zero-based attempt index
        attempt: u32,
    },
    /// The last run produced an accepted layout
    Succeeded,
    /// The last run exhausted its attempts
    Failed,
}

/// Room-and-corridor layout generator for one layout instance
///
/// At most one [`LayoutJob`] runs per instance. The job owns the lease the
/// generator points at, so dropping the job frees the instance and a job
/// only ever drives the generator that issued it.
#[derive(Debug, Default)]
pub struct LayoutGenerator {
    pub(crate) config: LayoutConfig,
    pub(crate) grid: DungeonGrid,
    pub(crate) rooms: Vec<Rect>,
    pub(crate) centers: Vec<Point>,
    pub(crate) state: GenerationState,
    pub(crate) lease: Weak<()>,
}

impl Clone for LayoutGenerator {
    /// The copy starts with no job attached
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            grid: self.grid.clone(),
            rooms: self.rooms.clone(),
            centers: self.centers.clone(),
            state: self.state(),
            lease: Weak::new(),
        }
    }
}

impl LayoutGenerator {
    /// Create a generator with an all-wall grid sized by `config`
    pub fn new(config: LayoutConfig) -> Self {
        let grid = DungeonGrid::new(config.width(), config.height());
        Self {
            config,
            grid,
            rooms: Vec::new(),
            centers: Vec::new(),
            state: GenerationState::Idle,
            lease: Weak::new(),
        }
    }

    /// Active configuration
    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Mutable configuration; changes apply from the next generation
    pub const fn config_mut(&mut self) -> &mut LayoutConfig {
        &mut self.config
    }

    /// Current grid model
    pub const fn grid(&self) -> &DungeonGrid {
        &self.grid
    }

    /// Current grid model, for registering used cells
    pub const fn grid_mut(&mut self) -> &mut DungeonGrid {
        &mut self.grid
    }

    /// Rooms of the exposed layout
    pub fn rooms(&self) -> &[Rect] {
        &self.rooms
    }

    /// Room centers, parallel to [`Self::rooms`]
    pub fn centers(&self) -> &[Point] {
        &self.centers
    }

    /// Lifecycle state
    ///
    /// A run whose job was dropped before concluding reads as `Idle`.
    pub fn state(&self) -> GenerationState {
        match self.state {
            GenerationState::Generating { .. } if !self.is_generating() => GenerationState::Idle,
            state => state,
        }
    }

    /// Whether a live job is attached to this instance
    pub fn is_generating(&self) -> bool {
        self.lease.strong_count() > 0
    }

    pub(crate) fn is_leased_to(&self, lease: &Arc<()>) -> bool {
        Weak::ptr_eq(&self.lease, &Arc::downgrade(lease))
    }

    /// Generate synchronously without notifications
    ///
    /// # Errors
    ///
    /// Returns [`DungeonError::GenerationInProgress`] if a chunked job is
    /// still running on this instance
    pub fn generate(&mut self, seed: u64) -> Result<GenerationReport> {
        self.generate_with(seed, &mut ())
    }

    /// Generate synchronously, reporting progress to `observer`
    ///
    /// # Errors
    ///
    /// Returns [`DungeonError::GenerationInProgress`] if a chunked job is
    /// still running on this instance
    pub fn generate_with(
        &mut self,
        seed: u64,
        observer: &mut dyn LayoutObserver,
    ) -> Result<GenerationReport> {
        let mut job = self.start_job(seed)?;
        loop {
            match job.resume(self, observer) {
                JobStatus::Pending(_) => {}
                JobStatus::Done(report) => return Ok(report),
                JobStatus::Cancelled => return Err(DungeonError::GenerationInProgress),
            }
        }
    }

    /// Begin a chunked generation driven by [`LayoutJob::resume`]
    ///
    /// # Errors
    ///
    /// Returns [`DungeonError::GenerationInProgress`] if another job is
    /// still running on this instance
    pub fn start_job(&mut self, seed: u64) -> Result<LayoutJob> {
        if self.is_generating() {
            return Err(DungeonError::GenerationInProgress);
        }
        let lease = Arc::new(());
        self.lease = Arc::downgrade(&lease);
        self.state = GenerationState::Generating { attempt: 0 };
        Ok(LayoutJob::new(seed, lease, &self.config))
    }

    /// Abandon any running job; it reports `Cancelled` on its next resume
    pub fn cancel(&mut self) {
        if self.is_generating() {
            self.state = GenerationState::Idle;
        }
        self.lease = Weak::new();
    }
}
