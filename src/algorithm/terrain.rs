//! Terrain painting mode: fill every target cell with one terrain instead of stamping patterns

use log::debug;
use ndarray::Array2;

use crate::{
    io::error::{DungeonError, Result},
    spatial::{Cell, CellMask, Point, TargetKind},
};

/// Terrain sets known to the host tile source
pub trait TerrainCatalog {
    /// Number of terrain sets
    fn terrain_set_count(&self) -> usize;

    /// Terrains in `terrain_set`; 0 for unknown sets
    fn terrain_count(&self, terrain_set: usize) -> usize;
}

/// Catalog described by the terrain count of each set
impl TerrainCatalog for [usize] {
    fn terrain_set_count(&self) -> usize {
        self.len()
    }

    fn terrain_count(&self, terrain_set: usize) -> usize {
        self.get(terrain_set).copied().unwrap_or(0)
    }
}

impl TerrainCatalog for Vec<usize> {
    fn terrain_set_count(&self) -> usize {
        self.as_slice().terrain_set_count()
    }

    fn terrain_count(&self, terrain_set: usize) -> usize {
        self.as_slice().terrain_count(terrain_set)
    }
}

/// Cells to paint with one terrain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerrainPaint {
    /// Terrain set index
    pub terrain_set: usize,
    /// Terrain index within the set
    pub terrain: usize,
    /// Target cells to paint, row-major
    pub cells: Vec<Point>,
}

/// Validate a terrain choice and collect the cells to paint
///
/// With `only_unoccupied`, cells in `used_cells` are skipped.
///
/// # Errors
///
/// Returns [`DungeonError::MissingTileSource`] without a catalog and
/// [`DungeonError::InvalidTerrain`] when the set or terrain index is out of range
pub fn paint_terrain(
    grid: &Array2<Cell>,
    target: TargetKind,
    catalog: Option<&dyn TerrainCatalog>,
    terrain_set: usize,
    terrain: usize,
    used_cells: Option<&CellMask>,
    only_unoccupied: bool,
) -> Result<TerrainPaint> {
    let catalog = catalog.ok_or(DungeonError::MissingTileSource)?;

    let set_count = catalog.terrain_set_count();
    if terrain_set >= set_count {
        return Err(DungeonError::InvalidTerrain {
            terrain_set,
            terrain,
            available: set_count,
        });
    }
    let terrain_count = catalog.terrain_count(terrain_set);
    if terrain >= terrain_count {
        return Err(DungeonError::InvalidTerrain {
            terrain_set,
            terrain,
            available: terrain_count,
        });
    }

    let cells: Vec<Point> = grid
        .indexed_iter()
        .filter(|&(_, &cell)| target.matches(cell))
        .map(|((y, x), _)| Point::new(x as i32, y as i32))
        .filter(|&point| {
            !only_unoccupied || !used_cells.is_some_and(|used| used.contains(point))
        })
        .collect();

    debug!(
        "terrain {terrain} of set {terrain_set}: {} {target:?} cells",
        cells.len()
    );

    Ok(TerrainPaint {
        terrain_set,
        terrain,
        cells,
    })
}
