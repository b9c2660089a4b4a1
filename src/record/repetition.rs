//! Digest counts for repetition detection.

use im::HashMap;

use crate::core::GameStatus;
use crate::rules::GameBoard;

/// How often each digest-eligible position has been seen.
///
/// Backed by a persistent map so a search can clone the table per line at
/// no cost.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RepetitionTable {
    seen: HashMap<u64, u32>,
}

impl RepetitionTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more sighting and return the new count.
    pub fn record(&mut self, digest: u64) -> u32 {
        let count = self.count(digest) + 1;
        self.seen.insert(digest, count);
        count
    }

    /// Take back one sighting, as when the move that reached it is undone.
    pub fn forget(&mut self, digest: u64) {
        match self.count(digest) {
            0 => {}
            1 => {
                self.seen.remove(&digest);
            }
            n => {
                self.seen.insert(digest, n - 1);
            }
        }
    }

    #[must_use]
    pub fn count(&self, digest: u64) -> u32 {
        self.seen.get(&digest).copied().unwrap_or(0)
    }

    /// Record `board` if its state takes part in repetition bookkeeping.
    pub fn observe<B: GameBoard>(&mut self, board: &B) -> Option<u32> {
        board
            .state()
            .is_digest_eligible()
            .then(|| self.record(board.digest()))
    }

    /// Highest count of any single position; zero when empty.
    #[must_use]
    pub fn most_seen(&self) -> u32 {
        self.seen.values().copied().max().unwrap_or(0)
    }

    /// Distinct positions recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }
}
