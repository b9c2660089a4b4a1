//! Reversible log of ordinary board edits.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::grid::{CellId, Grid};
use crate::pieces::Piece;

/// One change to a cell's contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edit<P> {
    /// A piece was pushed onto the cell.
    Pushed(CellId),
    /// The given piece was popped from the cell.
    Popped(CellId, P),
}

/// Edits made during one `execute`, handed to the move's undo snapshot.
#[derive(Clone, Debug, Default)]
pub struct Journal<P> {
    edits: SmallVec<[Edit<P>; 4]>,
}

impl<P: Piece> Journal<P> {
    /// Create an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self {
            edits: SmallVec::new(),
        }
    }

    /// Push a piece and log it.
    pub fn push(&mut self, grid: &mut Grid<P>, cell: CellId, piece: P) {
        grid.push(cell, piece);
        self.edits.push(Edit::Pushed(cell));
    }

    /// Pop a piece and log it.
    pub fn pop(&mut self, grid: &mut Grid<P>, cell: CellId) -> Option<P> {
        let piece = grid.pop(cell)?;
        self.edits.push(Edit::Popped(cell, piece));
        Some(piece)
    }

    /// Take the logged edits, leaving the journal empty.
    pub fn take(&mut self) -> SmallVec<[Edit<P>; 4]> {
        std::mem::take(&mut self.edits)
    }

    /// Number of logged edits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Check if nothing has been logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Revert a batch of edits, newest first.
    pub fn rollback(grid: &mut Grid<P>, edits: &[Edit<P>]) {
        for edit in edits.iter().rev() {
            match *edit {
                Edit::Pushed(cell) => {
                    grid.pop(cell);
                }
                Edit::Popped(cell, piece) => grid.push(cell, piece),
            }
        }
    }
}
