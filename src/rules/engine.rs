//! Board trait for game implementations.
//!
//! A board is a mutable position plus a per-game state machine. All
//! mutation goes through `execute` / `finalize_ply` / `unexecute`:
//!
//! - `execute` applies one move's forward effects and records, inside the
//!   move, everything needed to invert it.
//! - `finalize_ply` commits pending cascade effects, passes the turn and
//!   detects the end of the game.
//! - `unexecute` is the exact inverse of `execute` together with any
//!   `finalize_ply` that followed it. Calls must come in strict LIFO order.

use serde::{Deserialize, Serialize};

use crate::core::{EngineResult, GameInit, GameStatus, PlayerId, ReplayMode};
use crate::moves::MoveSpec;

use super::snapshot::RenderSnapshot;

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Draw (no winner).
    Draw,
    /// Multiple winners (shared victory).
    Winners(Vec<PlayerId>),
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Winners(ps) => ps.contains(&player),
            GameResult::Draw => false,
        }
    }
}

/// Board contract.
///
/// ## Implementation Notes
///
/// - `legal_moves`: return empty if the side to move cannot act; takes
///   `&mut self` because move generation runs sweep passes
/// - `execute`: trusts the move generator and returns `IllegalTransition`
///   for any opcode/state pair outside the transition table
/// - `digest`: pure function of the position; equal positions reached by
///   different routes must digest equally
/// - `result`: `None` while the game continues
pub trait GameBoard: Clone + Send + 'static {
    /// The game's move type.
    type Move: MoveSpec;

    /// The game's state enum.
    type State: GameStatus;

    /// Re-initialize in place from an init record.
    fn do_init(&mut self, init: &GameInit) -> EngineResult<()>;

    /// The init record this board was built from, with its revision pinned.
    fn game_init(&self) -> &GameInit;

    /// Number of seats.
    fn player_count(&self) -> usize;

    /// Seat to move.
    fn whose_turn(&self) -> PlayerId;

    /// Current state.
    fn state(&self) -> Self::State;

    /// Completed plies since init.
    fn move_number(&self) -> u32;

    /// Apply one move. The move receives its undo snapshot.
    fn execute(&mut self, m: &mut Self::Move, mode: ReplayMode) -> EngineResult<()>;

    /// Commit the current ply. Only legal in a done-eligible state.
    fn finalize_ply(&mut self, mode: ReplayMode) -> EngineResult<()>;

    /// Take back a move applied by `execute`.
    fn unexecute(&mut self, m: &Self::Move) -> EngineResult<()>;

    /// Every move the side to move may make now.
    fn legal_moves(&mut self) -> Vec<Self::Move>;

    /// 64-bit structural hash of the position.
    fn digest(&self) -> u64;

    /// Outcome once the board is in a terminal state.
    fn result(&self) -> Option<GameResult>;

    /// Structural comparison. Any difference, including a digest
    /// difference, is a fatal mismatch.
    fn same_board(&self, other: &Self) -> EngineResult<()>;

    /// Parse a wire string as a move by the side to move.
    fn parse_move(&self, text: &str) -> EngineResult<Self::Move>;

    /// Read-only view for the presentation layer.
    fn snapshot(&mut self) -> RenderSnapshot;

    // === Convenience Methods ===

    /// Init string that reconstructs this board's initial position.
    fn init_string(&self) -> String {
        self.game_init().to_string()
    }

    /// Apply a complete ply: execute, then finalize if the move left the
    /// board in a done-eligible state. This is how search and replay move.
    fn apply_ply(&mut self, m: &mut Self::Move) -> EngineResult<()> {
        self.execute(m, ReplayMode::Replay)?;
        if self.state().is_done_eligible() {
            self.finalize_ply(ReplayMode::Replay)?;
        }
        Ok(())
    }

    /// Check if the game has ended.
    fn is_over(&self) -> bool {
        self.state().is_terminal()
    }
}
