//! Dungeon grid state: cell kinds, room and corridor id grids, used-cell mask
//!
//! All arrays share one `height × width` shape and are indexed `[y, x]`.
//! Generation rewrites the cell and id grids; placement passes only ever add to
//! the used-cell mask.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::spatial::geometry::{Point, Rect};
use crate::spatial::mask::CellMask;

/// Id stored in the room and corridor grids for untagged cells
pub const NO_ID: i32 = -1;

/// Kind of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    /// Solid rock
    #[default]
    Wall,
    /// Carved room or corridor floor
    Floor,
    /// Doorway; never produced by generation but walkable for placement
    Door,
}

impl Cell {
    /// Floor and door cells can be walked on
    pub const fn is_walkable(self) -> bool {
        matches!(self, Self::Floor | Self::Door)
    }

    /// Single-character rendering used by [`DungeonGrid::to_ascii`]
    pub const fn glyph(self) -> char {
        match self {
            Self::Wall => '#',
            Self::Floor => '.',
            Self::Door => '+',
        }
    }
}

/// Which cells a placement pass targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Wall cells
    Wall,
    /// Floor and door cells
    #[default]
    Floor,
}

impl TargetKind {
    /// Check whether a cell belongs to this target set
    pub const fn matches(self, cell: Cell) -> bool {
        match self {
            Self::Wall => matches!(cell, Cell::Wall),
            Self::Floor => cell.is_walkable(),
        }
    }
}

/// Complete grid model for one layout instance
#[derive(Debug, Clone)]
pub struct DungeonGrid {
    /// Cell kinds
    pub cells: Array2<Cell>,
    /// Owning room index per cell, or [`NO_ID`]
    pub room_ids: Array2<i32>,
    /// Carving corridor segment per cell, or [`NO_ID`]
    pub corridor_ids: Array2<i32>,
    /// Cells claimed by earlier placement passes
    pub used_cells: CellMask,
}

impl DungeonGrid {
    /// Create an all-wall grid
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: Array2::from_elem((height, width), Cell::Wall),
            room_ids: Array2::from_elem((height, width), NO_ID),
            corridor_ids: Array2::from_elem((height, width), NO_ID),
            used_cells: CellMask::new(width, height),
        }
    }

    /// Grid width in cells
    pub fn width(&self) -> usize {
        self.cells.ncols()
    }

    /// Grid height in cells
    pub fn height(&self) -> usize {
        self.cells.nrows()
    }

    /// Reset a single row; returns false once `row` is past the last row
    pub fn reset_row(&mut self, row: usize) -> bool {
        if row >= self.height() {
            return false;
        }
        self.cells.row_mut(row).fill(Cell::Wall);
        self.room_ids.row_mut(row).fill(NO_ID);
        self.corridor_ids.row_mut(row).fill(NO_ID);
        for x in 0..self.width() {
            self.used_cells.set(Point::new(x as i32, row as i32), false);
        }
        true
    }

    fn index(&self, point: Point) -> Option<[usize; 2]> {
        if point.x < 0 || point.y < 0 {
            return None;
        }
        let (x, y) = (point.x as usize, point.y as usize);
        (x < self.width() && y < self.height()).then_some([y, x])
    }

    /// Check whether a point lies on the grid
    pub fn in_bounds(&self, point: Point) -> bool {
        self.index(point).is_some()
    }

    /// Cell at a point, `None` off-grid
    pub fn cell(&self, point: Point) -> Option<Cell> {
        self.index(point)
            .and_then(|index| self.cells.get(index))
            .copied()
    }

    /// Overwrite a cell; off-grid writes are ignored
    pub fn set_cell(&mut self, point: Point, cell: Cell) {
        if let Some(value) = self.index(point).and_then(|index| self.cells.get_mut(index)) {
            *value = cell;
        }
    }

    /// Room id at a point, [`NO_ID`] off-grid
    pub fn room_id(&self, point: Point) -> i32 {
        self.index(point)
            .and_then(|index| self.room_ids.get(index))
            .copied()
            .unwrap_or(NO_ID)
    }

    /// Corridor id at a point, [`NO_ID`] off-grid
    pub fn corridor_id(&self, point: Point) -> i32 {
        self.index(point)
            .and_then(|index| self.corridor_ids.get(index))
            .copied()
            .unwrap_or(NO_ID)
    }

    /// Carve a room rectangle as floor tagged with `room_id`
    pub fn carve_room(&mut self, rect: &Rect, room_id: i32) {
        for point in rect.cells() {
            if let Some(index) = self.index(point) {
                if let Some(cell) = self.cells.get_mut(index) {
                    *cell = Cell::Floor;
                }
                if let Some(id) = self.room_ids.get_mut(index) {
                    *id = room_id;
                }
            }
        }
    }

    /// Paint a corridor cell; doors are kept, walls become floor
    pub fn carve_corridor_cell(&mut self, point: Point, corridor_id: i32) {
        let Some(index) = self.index(point) else {
            return;
        };
        if let Some(cell) = self.cells.get_mut(index) {
            if *cell == Cell::Wall {
                *cell = Cell::Floor;
            }
        }
        if let Some(id) = self.corridor_ids.get_mut(index) {
            *id = corridor_id;
        }
    }

    /// Read-only copy of the cell grid
    pub fn snapshot(&self) -> Array2<Cell> {
        self.cells.clone()
    }

    /// Cells matching `kind` that are not yet in the used-cell mask
    pub fn free_cells(&self, kind: TargetKind) -> Vec<Point> {
        self.cells
            .indexed_iter()
            .filter(|&(_, &cell)| kind.matches(cell))
            .map(|((y, x), _)| Point::new(x as i32, y as i32))
            .filter(|&point| !self.used_cells.contains(point))
            .collect()
    }

    /// Merge externally stamped cells into the used-cell mask
    pub fn register_used_cells(&mut self, cells: &[Point]) {
        for &point in cells {
            self.used_cells.set(point, true);
        }
    }

    /// Forget every used cell
    pub fn clear_used_cells(&mut self) {
        self.used_cells.clear();
    }

    /// Count cells of a given kind
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&value| value == cell).count()
    }

    /// Render as one text line per row
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width() + 1) * self.height());
        for row in self.cells.rows() {
            for &cell in row {
                out.push(cell.glyph());
            }
            out.push('\n');
        }
        out
    }
}

impl Default for DungeonGrid {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
