//! JSON settings files: layout parameters plus a list of placement passes

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{
    algorithm::{
        layout::LayoutConfig,
        placement::PlacementOptions,
        registry::{PassKind, PlacementPass},
    },
    io::error::{DungeonError, Result, invalid_parameter},
    patterns::{ConstraintIndex, Pattern, RawConstraints},
    spatial::Point,
};

/// Layout section; absent fields keep the generator defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Grid width in cells
    pub width: Option<usize>,
    /// Grid height in cells
    pub height: Option<usize>,
    /// Requested room count
    pub room_count: Option<usize>,
    /// Inclusive room width range `[min, max]`
    pub room_width: Option<[i32; 2]>,
    /// Inclusive room height range `[min, max]`
    pub room_height: Option<[i32; 2]>,
    /// Border margin
    pub padding: Option<i32>,
    /// Fixed corridor half-width
    pub corridor_width: Option<i32>,
    /// Random corridor half-width range `[min, max]`
    pub corridor_width_range: Option<[i32; 2]>,
    /// Re-roll the width per corridor segment
    pub randomize_corridor_width: Option<bool>,
    /// Carve diagonal corridors
    pub diagonal_corridors: Option<bool>,
    /// Flood fill through diagonal neighbours
    pub diagonal_connectivity: Option<bool>,
    /// Minimum reachable fraction of walkable cells
    pub connectivity_threshold: Option<f64>,
    /// Attempt budget
    pub max_retry: Option<u32>,
    /// Rows reset per chunk of a chunked job
    pub rows_per_yield: Option<usize>,
}

impl LayoutSettings {
    /// Apply every present field through the clamping setters
    pub fn apply(&self, config: &mut LayoutConfig) {
        if self.width.is_some() || self.height.is_some() {
            let width = self.width.unwrap_or_else(|| config.width());
            let height = self.height.unwrap_or_else(|| config.height());
            config.set_size(width, height);
        }
        if let Some(room_count) = self.room_count {
            config.set_room_count(room_count);
        }
        if let Some([min, max]) = self.room_width {
            config.set_room_width(min, max);
        }
        if let Some([min, max]) = self.room_height {
            config.set_room_height(min, max);
        }
        if let Some(padding) = self.padding {
            config.set_padding(padding);
        }
        if let Some(width) = self.corridor_width {
            config.set_corridor_width(width);
        }
        if let Some([min, max]) = self.corridor_width_range {
            config.set_corridor_width_min(min).set_corridor_width_max(max);
        }
        if let Some(enabled) = self.randomize_corridor_width {
            config.set_randomize_corridor_width(enabled);
        }
        if let Some(enabled) = self.diagonal_corridors {
            config.set_diagonal_corridors(enabled);
        }
        if let Some(enabled) = self.diagonal_connectivity {
            config.set_diagonal_connectivity(enabled);
        }
        if let Some(threshold) = self.connectivity_threshold {
            config.set_connectivity_threshold(threshold);
        }
        if let Some(max_retry) = self.max_retry {
            config.set_max_retry(max_retry);
        }
        if let Some(rows) = self.rows_per_yield {
            config.set_rows_per_yield(rows);
        }
    }
}

/// Inline pattern definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSettings {
    /// Bounding box width
    pub width: i32,
    /// Bounding box height
    pub height: i32,
    /// Footprint offsets `[x, y]`; a solid rectangle when absent
    #[serde(default)]
    pub cells: Option<Vec<[i32; 2]>>,
}

impl PatternSettings {
    /// Build the pattern
    ///
    /// # Errors
    ///
    /// Returns an invalid parameter error for a non-positive size
    pub fn to_pattern(&self) -> Result<Pattern> {
        if self.width <= 0 || self.height <= 0 {
            return Err(invalid_parameter(
                "pattern size",
                &format!("{}x{}", self.width, self.height),
                &"width and height must be positive",
            ));
        }
        Ok(match &self.cells {
            Some(cells) => Pattern::new(
                self.width,
                self.height,
                cells.iter().map(|&[x, y]| Point::new(x, y)),
            ),
            None => Pattern::rectangle(self.width, self.height),
        })
    }
}

/// Terrain payload of a pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainSettings {
    /// Terrain set index
    pub terrain_set: usize,
    /// Terrain index within the set
    pub terrain: usize,
    /// Terrains per set available to the host
    pub catalog: Vec<usize>,
}

/// One placement pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassSettings {
    /// Label for logs and exports
    pub name: String,
    /// Pass-wide flags
    #[serde(flatten)]
    pub options: PlacementOptions,
    /// Pattern slots, in index order
    pub patterns: Vec<PatternSettings>,
    /// Sparse per-pattern constraint maps
    pub constraints: RawConstraints,
    /// Terrain mode instead of patterns
    pub terrain: Option<TerrainSettings>,
}

impl PassSettings {
    /// Resolve into a registrable pass
    ///
    /// # Errors
    ///
    /// Returns an invalid parameter error when a pass mixes terrain and
    /// patterns or a pattern has a non-positive size
    pub fn to_pass(&self) -> Result<PlacementPass> {
        let kind = match &self.terrain {
            Some(_) if !self.patterns.is_empty() => {
                return Err(invalid_parameter(
                    "pass",
                    &self.name,
                    &"a pass either paints terrain or stamps patterns",
                ));
            }
            Some(terrain) => PassKind::Terrain {
                terrain_set: terrain.terrain_set,
                terrain: terrain.terrain,
                catalog: terrain.catalog.clone(),
            },
            None => {
                let patterns = self
                    .patterns
                    .iter()
                    .map(PatternSettings::to_pattern)
                    .collect::<Result<Vec<_>>>()?;
                let constraints = ConstraintIndex::from_raw(&self.constraints, &patterns);
                PassKind::Patterns {
                    patterns,
                    constraints,
                }
            }
        };
        Ok(PlacementPass {
            name: self.name.clone(),
            options: self.options,
            kind,
        })
    }
}

/// Top-level settings file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonSettings {
    /// Base seed; the command line wins when both are given
    pub seed: Option<u64>,
    /// Layout parameters
    pub layout: LayoutSettings,
    /// Placement passes in run order
    pub passes: Vec<PassSettings>,
}

impl DungeonSettings {
    /// Read and parse a settings file
    ///
    /// # Errors
    ///
    /// Returns [`DungeonError::FileSystem`] when the file cannot be read and
    /// [`DungeonError::Settings`] when it is not valid settings JSON
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| DungeonError::FileSystem {
            path: path.to_path_buf(),
            operation: "read settings",
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| DungeonError::Settings {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Layout configuration with the file's overrides applied
    pub fn layout_config(&self) -> LayoutConfig {
        let mut config = LayoutConfig::default();
        self.layout.apply(&mut config);
        config
    }

    /// Resolve every pass in order
    ///
    /// # Errors
    ///
    /// Propagates the first pass resolution error
    pub fn placement_passes(&self) -> Result<Vec<PlacementPass>> {
        self.passes.iter().map(PassSettings::to_pass).collect()
    }
}
