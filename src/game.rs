//! Game state and its transitions.
//!
//! [`GameState`] is the whole per-board bundle. Every change goes through
//! [`GameState::apply`], which consumes the old state and an [`Event`] and
//! returns the new state. Anything impure (the clock, the shuffle) is resolved
//! by the caller and carried inside the event, so transitions replay exactly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{cell_id, midpoint, CellId, Direction, Grid, Millis};

/// Input to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Flip the cell at `(row, col)` and make it active. `at` is used as the
    /// end time if this toggle completes a line.
    Toggle { row: usize, col: usize, at: Millis },
    /// Make `(row, col)` active without touching the selection.
    Focus { row: usize, col: usize },
    /// Move the active cell one step, stopping at the edges.
    Move(Direction),
    /// Replace the board with a freshly generated `grid` started at `at`.
    Reset { grid: Grid, at: Millis },
    /// The current win has been handed to the leaderboard.
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub grid: Grid,
    pub size: usize,
    pub midpoint: CellId,
    /// Sparse: a missing id is unselected.
    pub selection: BTreeMap<CellId, bool>,
    pub active_cell: CellId,
    pub active_row: usize,
    pub active_col: usize,
    pub start_time: Millis,
    /// Zero until the first bingo on this board.
    pub end_time: Millis,
    pub bingo: bool,
    pub leaderboard_submitted: bool,
}

impl GameState {
    /// A fresh board: only the free cell selected, focus on the top-left cell.
    pub fn new(grid: Grid, at: Millis) -> Self {
        let size = grid.size();
        let mid = midpoint(size);
        Self {
            grid,
            size,
            midpoint: mid,
            selection: BTreeMap::from([(mid, true)]),
            active_cell: 0,
            active_row: 0,
            active_col: 0,
            start_time: at,
            end_time: 0,
            bingo: false,
            leaderboard_submitted: false,
        }
    }

    /// Consume the state and return it with `event` applied.
    pub fn apply(mut self, event: Event) -> Self {
        self.update(event);
        self
    }

    /// In-place form of [`GameState::apply`].
    pub fn update(&mut self, event: Event) {
        match event {
            Event::Toggle { row, col, at } => {
                let Some(id) = self.grid.get(row, col).map(|c| c.id) else {
                    log::debug!("ignoring toggle outside the board at ({}, {})", row, col);
                    return;
                };
                if id == self.midpoint {
                    return;
                }
                let selected = self.is_selected(id);
                self.selection.insert(id, !selected);
                self.set_active(row, col);

                if !self.bingo && self.evaluate(row, col) {
                    self.bingo = true;
                    self.end_time = at;
                    log::info!("bingo after {} ms", at.saturating_sub(self.start_time));
                }
            }
            Event::Focus { row, col } => {
                if self.grid.in_bounds(row, col) {
                    self.set_active(row, col);
                }
            }
            Event::Move(direction) => {
                if let Some((row, col)) = direction.step(self.active_row, self.active_col, self.size) {
                    self.set_active(row, col);
                }
            }
            Event::Reset { grid, at } => {
                *self = GameState::new(grid, at);
            }
            Event::Submitted => {
                self.leaderboard_submitted = true;
            }
        }
    }

    fn set_active(&mut self, row: usize, col: usize) {
        self.active_cell = cell_id(row, col, self.size);
        self.active_row = row;
        self.active_col = col;
    }

    /// Selection lookup with the free cell always counted.
    #[inline]
    pub fn is_selected(&self, id: CellId) -> bool {
        id == self.midpoint || self.selection.get(&id).copied().unwrap_or(false)
    }

    /// Selected ids in ascending order, free cell included.
    pub fn selected_ids(&self) -> Vec<CellId> {
        (0..self.size * self.size).filter(|&id| self.is_selected(id)).collect()
    }

    /// Win check for the lines through `(row, col)`.
    pub fn evaluate(&self, row: usize, col: usize) -> bool {
        self.check_row(row)
            || self.check_col(col)
            || self.check_diagonal_a(row, col)
            || self.check_diagonal_b(row, col)
    }

    pub fn check_row(&self, row: usize) -> bool {
        let start = row * self.size;
        (start..start + self.size).all(|id| self.is_selected(id))
    }

    pub fn check_col(&self, col: usize) -> bool {
        (col..self.size * self.size)
            .step_by(self.size)
            .all(|id| self.is_selected(id))
    }

    /// Both diagonal checks run for any cell on either diagonal.
    fn on_a_diagonal(&self, row: usize, col: usize) -> bool {
        row == col || row + col + 1 == self.size
    }

    /// Top-left to bottom-right.
    pub fn check_diagonal_a(&self, row: usize, col: usize) -> bool {
        self.on_a_diagonal(row, col) && (0..self.size).all(|i| self.is_selected(self.size * i + i))
    }

    /// Top-right to bottom-left.
    pub fn check_diagonal_b(&self, row: usize, col: usize) -> bool {
        self.on_a_diagonal(row, col)
            && (0..self.size).all(|i| self.is_selected(self.size * i + self.size - i - 1))
    }

    /// Winning time in milliseconds, once there is a bingo.
    pub fn duration(&self) -> Option<Millis> {
        self.bingo.then(|| self.end_time.saturating_sub(self.start_time))
    }

    /// A restored state is only usable if its board and bookkeeping agree.
    pub fn is_consistent(&self) -> bool {
        self.grid.is_well_formed()
            && self.grid.size() == self.size
            && self.size % 2 == 1
            && self.midpoint == midpoint(self.size)
            && self.selection.keys().all(|&id| id < self.size * self.size)
    }
}
