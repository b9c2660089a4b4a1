//! Capture stack with per-player tallies.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::digest::mix64;
use crate::core::{PlayerId, PlayerMap};
use crate::grid::{CellId, Grid};
use crate::pieces::Piece;

/// Pieces removed by one capture, with the cells they came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRecord<P> {
    /// The player credited with the capture.
    pub owner: PlayerId,
    /// Removed pieces in removal order. Each came off the top of its cell.
    pub cells: SmallVec<[(CellId, P); 8]>,
}

impl<P: Piece> CaptureRecord<P> {
    /// Number of pieces in the record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the record is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over the captured pieces.
    pub fn pieces(&self) -> impl Iterator<Item = P> + '_ {
        self.cells.iter().map(|&(_, p)| p)
    }

    fn digest_item(&self) -> u64 {
        self.cells.iter().fold(
            mix64(u64::from(self.owner.0) + 1),
            |acc, &(cell, piece)| mix64(acc ^ piece.digest_tag() ^ (u64::from(cell.0) << 48)),
        )
    }
}

/// Explicit LIFO stack of captures.
///
/// The depth before a ply is all `unexecute` needs: unwinding to it puts
/// every captured piece back on its original cell, cascaded or not.
#[derive(Clone, Debug)]
pub struct CaptureStack<P> {
    records: Vec<CaptureRecord<P>>,
    tallies: PlayerMap<u32>,
}

impl<P: Piece> CaptureStack<P> {
    /// Create an empty stack.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            records: Vec::new(),
            tallies: PlayerMap::with_value(player_count, 0),
        }
    }

    /// Remove the top piece of each listed cell and credit `owner`.
    ///
    /// Empty cells are skipped. Returns the number of pieces removed.
    pub fn capture(
        &mut self,
        grid: &mut Grid<P>,
        owner: PlayerId,
        cells: impl IntoIterator<Item = CellId>,
    ) -> usize {
        let mut record = CaptureRecord {
            owner,
            cells: SmallVec::new(),
        };
        for cell in cells {
            if let Some(piece) = grid.pop(cell) {
                record.cells.push((cell, piece));
            }
        }

        let n = record.len();
        if n > 0 {
            self.tallies[owner] += n as u32;
            self.records.push(record);
        }
        n
    }

    /// Put the most recent capture back on the board.
    pub fn uncapture(&mut self, grid: &mut Grid<P>) -> Option<CaptureRecord<P>> {
        let record = self.records.pop()?;
        for &(cell, piece) in record.cells.iter().rev() {
            grid.push(cell, piece);
        }
        self.tallies[record.owner] -= record.len() as u32;
        Some(record)
    }

    /// Undo captures until only `depth` remain.
    pub fn unwind_to(&mut self, grid: &mut Grid<P>, depth: usize) {
        while self.records.len() > depth {
            self.uncapture(grid);
        }
    }

    /// Number of capture records.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.records.len()
    }

    /// Pieces captured by a player.
    #[must_use]
    pub fn tally(&self, player: PlayerId) -> u32 {
        self.tallies[player]
    }

    /// All tallies.
    #[must_use]
    pub fn tallies(&self) -> &PlayerMap<u32> {
        &self.tallies
    }

    /// Records, oldest first.
    #[must_use]
    pub fn records(&self) -> &[CaptureRecord<P>] {
        &self.records
    }

    /// Pieces captured by a player, oldest first.
    pub fn captured_by(&self, player: PlayerId) -> impl Iterator<Item = P> + '_ {
        self.records
            .iter()
            .filter(move |r| r.owner == player)
            .flat_map(CaptureRecord::pieces)
    }

    /// One digest item per record, in stack order.
    pub fn digest_items(&self) -> impl Iterator<Item = u64> + '_ {
        self.records.iter().map(CaptureRecord::digest_item)
    }

    /// Forget every capture without touching the board.
    pub fn clear(&mut self) {
        self.records.clear();
        self.tallies.fill(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Topology;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    struct Stone(u8);

    impl Piece for Stone {
        fn id(self) -> u16 {
            u16::from(self.0)
        }

        fn digest_tag(self) -> u64 {
            mix64(u64::from(self.0) + 3)
        }
    }

    #[test]
    fn test_capture_and_uncapture() {
        let mut grid: Grid<Stone> = Grid::rectangle(3, 3, Topology::Rect4, 1);
        grid.push(CellId(1), Stone(1));
        grid.push(CellId(2), Stone(1));
        let before = grid.digest_contents();

        let mut stack = CaptureStack::new(2);
        let n = stack.capture(&mut grid, PlayerId::new(0), [CellId(1), CellId(2), CellId(5)]);
        assert_eq!(n, 2);
        assert_eq!(stack.tally(PlayerId::new(0)), 2);
        assert_eq!(stack.depth(), 1);
        assert!(grid.cell(CellId(1)).is_empty());
        assert_eq!(stack.captured_by(PlayerId::new(0)).count(), 2);

        let record = stack.uncapture(&mut grid).unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(stack.tally(PlayerId::new(0)), 0);
        assert_eq!(grid.digest_contents(), before);
    }

    #[test]
    fn test_empty_capture_is_not_recorded() {
        let mut grid: Grid<Stone> = Grid::rectangle(2, 2, Topology::Rect4, 1);
        let mut stack = CaptureStack::new(2);
        assert_eq!(stack.capture(&mut grid, PlayerId::new(1), [CellId(0)]), 0);
        assert_eq!(stack.depth(), 0);
        assert!(stack.uncapture(&mut grid).is_none());
    }

    #[test]
    fn test_unwind_to_restores_stacked_tops() {
        let mut grid: Grid<Stone> = Grid::rectangle(2, 2, Topology::Rect8, 1);
        grid.push(CellId(0), Stone(1));
        grid.push(CellId(0), Stone(2));
        grid.push(CellId(0), Stone(3));
        let before = grid.digest_contents();

        let mut stack = CaptureStack::new(2);
        stack.capture(&mut grid, PlayerId::new(0), [CellId(0)]);
        stack.capture(&mut grid, PlayerId::new(1), [CellId(0)]);
        assert_eq!(grid.top(CellId(0)), Some(Stone(1)));

        let items: Vec<u64> = stack.digest_items().collect();
        assert_eq!(items.len(), 2);
        assert_ne!(items[0], items[1]);

        stack.unwind_to(&mut grid, 0);
        assert_eq!(grid.digest_contents(), before);
        assert_eq!(grid.top(CellId(0)), Some(Stone(3)));
    }
}
