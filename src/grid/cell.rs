//! Cells and cell coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::topology::MAX_DIRECTIONS;

/// Dense index of a cell within its grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId(pub u16);

impl CellId {
    /// Get the raw index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// External cell name: a column letter and a 1-based row number.
///
/// This is the form cells take in move strings, e.g. `E 5`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub col: char,
    pub row: i32,
}

impl Coord {
    /// Create a coordinate; the column is normalized to upper case.
    #[must_use]
    pub fn new(col: char, row: i32) -> Self {
        Self {
            col: col.to_ascii_uppercase(),
            row,
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.col, self.row)
    }
}

/// One board position.
///
/// Contents are a bounded stack (a single stone is a stack of height one).
/// `sweep` and `last_changed` are transient bookkeeping and take no part in
/// digests or structural comparison.
#[derive(Clone, Debug)]
pub struct Cell<P> {
    pub id: CellId,
    pub coord: Coord,
    /// Lattice position: axial `(q, r)` on hex boards, `(x, y)` otherwise.
    pub pos: (i32, i32),
    pub(crate) links: [Option<CellId>; MAX_DIRECTIONS],
    contents: SmallVec<[P; 4]>,
    pub(crate) sweep: u32,
    /// Move number at which the contents last changed.
    pub last_changed: Option<u32>,
}

impl<P: Copy + Eq> Cell<P> {
    pub(crate) fn new(id: CellId, coord: Coord, pos: (i32, i32)) -> Self {
        Self {
            id,
            coord,
            pos,
            links: [None; MAX_DIRECTIONS],
            contents: SmallVec::new(),
            sweep: 0,
            last_changed: None,
        }
    }

    /// Top piece, if any.
    #[inline]
    #[must_use]
    pub fn top(&self) -> Option<P> {
        self.contents.last().copied()
    }

    /// Piece directly under the top, if any.
    #[must_use]
    pub fn below_top(&self) -> Option<P> {
        let n = self.contents.len();
        if n >= 2 {
            Some(self.contents[n - 2])
        } else {
            None
        }
    }

    /// Number of stacked pieces.
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.contents.len()
    }

    /// Check if the cell holds nothing.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Bottom-to-top contents.
    #[must_use]
    pub fn contents(&self) -> &[P] {
        &self.contents
    }

    /// Place a piece on top.
    pub fn push(&mut self, piece: P) {
        self.contents.push(piece);
    }

    /// Remove and return the top piece.
    pub fn pop(&mut self) -> Option<P> {
        self.contents.pop()
    }

    /// Empty the cell and forget its bookkeeping.
    pub fn clear(&mut self) {
        self.contents.clear();
        self.sweep = 0;
        self.last_changed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_display() {
        assert_eq!(Coord::new('e', 5).to_string(), "E 5");
    }

    #[test]
    fn test_stack_ops() {
        let mut cell: Cell<u8> = Cell::new(CellId(0), Coord::new('A', 1), (0, 0));
        assert!(cell.is_empty());
        assert_eq!(cell.top(), None);

        cell.push(3);
        cell.push(7);
        assert_eq!(cell.height(), 2);
        assert_eq!(cell.top(), Some(7));
        assert_eq!(cell.below_top(), Some(3));

        assert_eq!(cell.pop(), Some(7));
        assert_eq!(cell.below_top(), None);
        assert_eq!(cell.contents(), &[3]);

        cell.last_changed = Some(4);
        cell.clear();
        assert!(cell.is_empty());
        assert_eq!(cell.last_changed, None);
    }
}
