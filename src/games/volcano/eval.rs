//! Static evaluation for Volcano.

use serde::{Deserialize, Serialize};

use super::board::VolcanoBoard;
use crate::core::PlayerId;
use crate::rules::GameBoard;
use crate::search::Evaluator;

/// Score difference plus a small bonus for color coverage.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VolcanoEvaluator {
    pub score: f64,
    pub colors: f64,
}

impl Default for VolcanoEvaluator {
    fn default() -> Self {
        Self {
            score: 1.0,
            colors: 0.1,
        }
    }
}

impl Evaluator<VolcanoBoard> for VolcanoEvaluator {
    fn evaluate(&self, board: &VolcanoBoard, player: PlayerId) -> f64 {
        let mine = board.score(player);
        let theirs = board.score(player.next(board.player_count()));
        self.score * (f64::from(mine.total()) - f64::from(theirs.total()))
            + self.colors * (mine.colors as f64 - theirs.colors as f64)
    }
}
