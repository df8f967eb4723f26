//! Generation constants and runtime configuration defaults

/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;

/// Default grid width in cells
pub const DEFAULT_WIDTH: usize = 64;
/// Default grid height in cells
pub const DEFAULT_HEIGHT: usize = 48;

/// Default number of rooms to place
pub const DEFAULT_ROOM_COUNT: usize = 8;
/// Default smallest room edge
pub const DEFAULT_ROOM_SIZE_MIN: i32 = 4;
/// Default largest room edge
pub const DEFAULT_ROOM_SIZE_MAX: i32 = 10;
/// Default margin kept clear along the grid border
pub const DEFAULT_PADDING: i32 = 1;

/// Room placement attempts granted per requested room
pub const ROOM_ATTEMPTS_PER_ROOM: usize = 30;

// A layout with fewer rooms than this is rejected regardless of room_count
/// Lower bound on the number of rooms an attempt must place
pub const MIN_ROOMS: usize = 3;

/// Default fraction of walkable cells that must be mutually reachable
pub const DEFAULT_CONNECTIVITY_THRESHOLD: f64 = 0.8;

/// Default number of generation attempts
pub const DEFAULT_MAX_RETRY: u32 = 10;

/// Grid rows reset between yields of a chunked generation job
pub const DEFAULT_ROWS_PER_YIELD: usize = 8;

// Safety limit on the weighted selection loop
/// Maximum selection iterations per placement pass
pub const PLACEMENT_ITERATION_CAP: usize = 100_000;

/// Default pattern weight when none is configured
pub const DEFAULT_PATTERN_WEIGHT: f64 = 1.0;

// Output settings
/// Pixels per grid cell in exported images
pub const DEFAULT_IMAGE_SCALE: u32 = 8;
/// Spinner refresh interval for chunked generation (milliseconds)
pub const PROGRESS_TICK_MS: u64 = 80;
