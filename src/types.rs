//! Core data types for the bingo board.
//!
//! Cells are addressed by a row-major id: `id = col + row * size`. The grid is
//! stored as nested rows so it serializes to the same `grid[row][col]` shape
//! the page keeps in storage.

use serde::{Deserialize, Serialize};

/// Row-major cell identity, stable for the lifetime of a grid.
pub type CellId = usize;

/// Wall-clock milliseconds since the Unix epoch.
pub type Millis = u64;

/// Pack `(row, col)` into a cell id.
#[inline(always)]
pub fn cell_id(row: usize, col: usize, size: usize) -> CellId {
    col + row * size
}

/// Id of the center cell of an odd-sized board.
#[inline(always)]
pub fn midpoint(size: usize) -> CellId {
    (size * size - 1) / 2
}

/// One square on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub value: String,
    pub id: CellId,
}

/// A `size × size` board, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    /// Lay `values` out row-major. `values` must hold exactly `size * size` entries.
    pub fn from_values(values: Vec<String>, size: usize) -> Self {
        debug_assert_eq!(values.len(), size * size);
        let mut rows = Vec::with_capacity(size);
        let mut iter = values.into_iter();
        for row in 0..size {
            let mut cells = Vec::with_capacity(size);
            for col in 0..size {
                cells.push(Cell {
                    value: iter.next().unwrap_or_default(),
                    id: cell_id(row, col, size),
                });
            }
            rows.push(cells);
        }
        Self { rows }
    }

    #[inline(always)]
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    #[inline(always)]
    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.size() && col < self.size()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flatten()
    }

    /// True when the grid is square and every cell carries its row-major id.
    ///
    /// Grids restored from storage are checked with this before use.
    pub fn is_well_formed(&self) -> bool {
        let size = self.size();
        size > 0
            && self.rows.iter().enumerate().all(|(row, cells)| {
                cells.len() == size
                    && cells
                        .iter()
                        .enumerate()
                        .all(|(col, cell)| cell.id == cell_id(row, col, size))
            })
    }
}

/// Arrow-key navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Map a DOM `KeyboardEvent.key` value. Legacy Edge/IE names (`"Up"`) are accepted too.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "Up" => Some(Direction::Up),
            "ArrowDown" | "Down" => Some(Direction::Down),
            "ArrowLeft" | "Left" => Some(Direction::Left),
            "ArrowRight" | "Right" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Step `(row, col)` one cell, or `None` if that would leave a `size`-wide board.
    pub fn step(self, row: usize, col: usize, size: usize) -> Option<(usize, usize)> {
        match self {
            Direction::Up if row > 0 => Some((row - 1, col)),
            Direction::Down if row + 1 < size => Some((row + 1, col)),
            Direction::Left if col > 0 => Some((row, col - 1)),
            Direction::Right if col + 1 < size => Some((row, col + 1)),
            _ => None,
        }
    }
}
