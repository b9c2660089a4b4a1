//! Static evaluation for Bug.

use serde::{Deserialize, Serialize};

use super::board::BugBoard;
use super::pieces::BugChip;
use crate::core::PlayerId;
use crate::rules::GameBoard;
use crate::search::Evaluator;

/// Weighted sum of mobility, captures and bug size.
///
/// Running out of placements wins, so a side is better off the fewer
/// placements it has left relative to its opponent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BugEvaluator {
    pub mobility: f64,
    pub captures: f64,
    pub size: f64,
}

impl Default for BugEvaluator {
    fn default() -> Self {
        Self {
            mobility: 1.0,
            captures: 2.0,
            size: 0.5,
        }
    }
}

impl Evaluator<BugBoard> for BugEvaluator {
    fn evaluate(&self, board: &BugBoard, player: PlayerId) -> f64 {
        let opponent = player.next(board.player_count());
        let map = board.critters();

        let mobility =
            board.placement_count(opponent) as f64 - board.placement_count(player) as f64;
        let captures =
            f64::from(board.captures().tally(player)) - f64::from(board.captures().tally(opponent));
        let size = map.largest(BugChip::for_player(player)) as f64
            - map.largest(BugChip::for_player(opponent)) as f64;

        self.mobility * mobility + self.captures * captures + self.size * size
    }
}
