//! Layer selection and the fixed-size cell grid behind each layer

use crate::Cell;
use serde::{Deserialize, Serialize};

/// One of the two parallel grids composing a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Layer {
    /// Walls and doors
    #[default]
    Wall,
    /// Floor tiles
    Floor,
}

impl Layer {
    /// Get the display name of this layer
    pub fn name(&self) -> &'static str {
        match self {
            Layer::Wall => "Wall Layer",
            Layer::Floor => "Floor Layer",
        }
    }

    /// The layer that is not this one
    pub fn other(&self) -> Layer {
        match self {
            Layer::Wall => Layer::Floor,
            Layer::Floor => Layer::Wall,
        }
    }

    /// Whether doors may be placed on this layer
    pub fn allows_doors(&self) -> bool {
        matches!(self, Layer::Wall)
    }
}

/// A row-major grid of cells
///
/// Coordinates are signed so callers can pass raw pointer-derived positions;
/// anything outside `[0, width) x [0, height)` reads as `Empty` and ignores writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid with every cell empty
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Empty; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Flat index of `(x, y)`, or `None` when out of range
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y)
            .then(|| (y as u32 * self.width + x as u32) as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> Cell {
        self.index(x, y)
            .map(|idx| self.cells[idx])
            .unwrap_or(Cell::Empty)
    }

    /// Overwrite a cell. Returns the previous content, or `None` if out of range.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> Option<Cell> {
        let idx = self.index(x, y)?;
        Some(std::mem::replace(&mut self.cells[idx], cell))
    }

    /// Reset every cell to empty without reallocating
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// One row of cells, left to right; `None` when `y` is out of range
    pub fn row(&self, y: u32) -> Option<&[Cell]> {
        if y >= self.height {
            return None;
        }
        let start = (y * self.width) as usize;
        self.cells.get(start..start + self.width as usize)
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width.max(1) as usize)
    }

    /// Iterate `(x, y, cell)` for every cell in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, Cell)> + '_ {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, cell)| (idx as u32 % width, idx as u32 / width, *cell))
    }

    /// Count the cells matching a predicate
    pub fn count(&self, predicate: impl Fn(&Cell) -> bool) -> usize {
        self.cells.iter().filter(|c| predicate(c)).count()
    }
}
