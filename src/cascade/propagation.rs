//! Propagation along a line until blocked.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::grid::{Cell, CellId, Grid};
use crate::pieces::Piece;

/// Where material went during one propagation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropagationRecord {
    /// Cell the material came from.
    pub source: CellId,
    /// Direction of travel.
    pub direction: usize,
    /// Cells that each received one piece, in order.
    pub path: SmallVec<[CellId; 8]>,
}

impl PropagationRecord {
    /// Last cell that received material.
    #[must_use]
    pub fn last(&self) -> Option<CellId> {
        self.path.last().copied()
    }

    /// Check if nothing moved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

/// Move the top pieces of `source`, one per cell, to the cells beyond
/// `start` in `direction`.
///
/// Walking stops when the source is empty, the edge of the board is
/// reached, or the next cell is `blocked`. Each step moves exactly one
/// piece, so the walk is bounded by the source height and the board size.
pub fn propagate<P, F>(
    grid: &mut Grid<P>,
    source: CellId,
    start: CellId,
    direction: usize,
    blocked: F,
) -> PropagationRecord
where
    P: Piece,
    F: Fn(&Cell<P>) -> bool,
{
    let mut record = PropagationRecord {
        source,
        direction,
        path: SmallVec::new(),
    };
    let mut cursor = start;
    while !grid.cell(source).is_empty() {
        let Some(next) = grid.exit_to(cursor, direction) else {
            break;
        };
        if blocked(grid.cell(next)) {
            break;
        }
        if let Some(piece) = grid.pop(source) {
            grid.push(next, piece);
            record.path.push(next);
        }
        cursor = next;
    }
    record
}

/// Undo a propagation: pull the pieces back onto the source, last first.
pub fn unwind<P: Piece>(grid: &mut Grid<P>, record: &PropagationRecord) {
    for &cell in record.path.iter().rev() {
        if let Some(piece) = grid.pop(cell) {
            grid.push(record.source, piece);
        }
    }
}
