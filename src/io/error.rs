//! Error types for generation, placement and file operations

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for all crate operations
///
/// Shortfalls (too few rooms, unmet coverage) are not errors; they are
/// reported through status values on the respective reports.
#[derive(Debug, Error)]
pub enum DungeonError {
    /// Parameter validation failed
    #[error("Invalid parameter '{parameter}' = '{value}': {reason}")]
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Placement was requested without a pattern source
    #[error("No tile source configured for placement")]
    MissingTileSource,

    /// Terrain set or terrain index outside the catalog
    #[error("Terrain {terrain} in set {terrain_set} is out of range ({available} available)")]
    InvalidTerrain {
        /// Requested terrain set
        terrain_set: usize,
        /// Requested terrain within the set
        terrain: usize,
        /// Number of sets, or terrains in the set when the set exists
        available: usize,
    },

    /// A generation is already running on this layout instance
    #[error("Generation already in progress")]
    GenerationInProgress,

    /// Registry lookup for a layout that was never registered
    #[error("Unknown layout id {0}")]
    UnknownLayout(u32),

    /// General file system operation failure
    #[error("File system error during {operation} on '{}': {source}", path.display())]
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Settings file could not be parsed
    #[error("Invalid settings file '{}': {source}", path.display())]
    Settings {
        /// Path of the settings file
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Failed to save a rendered layout
    #[error("Failed to export image to '{}': {source}", path.display())]
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        #[source]
        source: image::ImageError,
    },
}

/// Convenience type alias for crate results
pub type Result<T> = std::result::Result<T, DungeonError>;

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> DungeonError {
    DungeonError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
