//! Volcano state machine states.

use serde::{Deserialize, Serialize};

use crate::core::GameStatus;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolcanoState {
    Puzzle,
    Play,
    Confirm,
    Resign,
    Gameover,
}

impl GameStatus for VolcanoState {
    fn is_done_eligible(self) -> bool {
        matches!(self, VolcanoState::Confirm | VolcanoState::Resign)
    }

    fn is_digest_eligible(self) -> bool {
        matches!(self, VolcanoState::Play | VolcanoState::Confirm)
    }

    fn is_terminal(self) -> bool {
        self == VolcanoState::Gameover
    }

    fn is_puzzle(self) -> bool {
        self == VolcanoState::Puzzle
    }

    fn ordinal(self) -> u64 {
        self as u64
    }

    fn description(self) -> &'static str {
        match self {
            VolcanoState::Puzzle => "volcano.puzzle",
            VolcanoState::Play => "volcano.play",
            VolcanoState::Confirm => "volcano.confirm",
            VolcanoState::Resign => "volcano.resign",
            VolcanoState::Gameover => "volcano.gameover",
        }
    }
}
