//! Static evaluation seam.

use crate::core::PlayerId;
use crate::rules::GameBoard;

/// Scores a non-terminal position.
///
/// Values are from `player`'s point of view, higher is better, and must
/// stay well below [`VALUE_OF_WIN`](super::VALUE_OF_WIN) so a proven win
/// always dominates.
pub trait Evaluator<B: GameBoard>: Send + Sync {
    fn evaluate(&self, board: &B, player: PlayerId) -> f64;
}

impl<B, F> Evaluator<B> for F
where
    B: GameBoard,
    F: Fn(&B, PlayerId) -> f64 + Send + Sync,
{
    fn evaluate(&self, board: &B, player: PlayerId) -> f64 {
        self(board, player)
    }
}
