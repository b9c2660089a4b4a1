//! Bug state machine states.

use serde::{Deserialize, Serialize};

use crate::core::GameStatus;

/// States of a Bug board.
///
/// `Grow` is the cascade sub-phase: the side that just captured keeps the
/// turn and must extend one of its capturing bugs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BugState {
    Puzzle,
    Play,
    Confirm,
    Resign,
    Grow,
    Gameover,
}

impl GameStatus for BugState {
    fn is_done_eligible(self) -> bool {
        matches!(self, BugState::Confirm | BugState::Resign)
    }

    fn is_digest_eligible(self) -> bool {
        self == BugState::Confirm
    }

    fn is_terminal(self) -> bool {
        self == BugState::Gameover
    }

    fn is_puzzle(self) -> bool {
        self == BugState::Puzzle
    }

    fn ordinal(self) -> u64 {
        self as u64
    }

    fn description(self) -> &'static str {
        match self {
            BugState::Puzzle => "bug.puzzle",
            BugState::Play => "bug.play",
            BugState::Confirm => "bug.confirm",
            BugState::Resign => "bug.resign",
            BugState::Grow => "bug.grow",
            BugState::Gameover => "bug.gameover",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facets() {
        assert!(BugState::Confirm.is_done_eligible());
        assert!(BugState::Resign.is_done_eligible());
        assert!(!BugState::Grow.is_done_eligible());
        assert!(BugState::Gameover.is_terminal());
        assert!(BugState::Puzzle.is_puzzle());
        assert!(BugState::Confirm.is_digest_eligible());
        assert!(!BugState::Play.is_digest_eligible());
    }

    #[test]
    fn test_ordinals_are_distinct() {
        let all = [
            BugState::Puzzle,
            BugState::Play,
            BugState::Confirm,
            BugState::Resign,
            BugState::Grow,
            BugState::Gameover,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.ordinal(), b.ordinal());
            }
        }
    }
}
