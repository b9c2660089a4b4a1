//! Game state facets and replay modes.
//!
//! Every game declares its own state enum and implements [`GameStatus`] so
//! the engine, the repetition table and the search driver can ask the three
//! questions that matter to them without knowing the game:
//!
//! - may the confirm/commit action be invoked now (`is_done_eligible`)
//! - should this position enter repetition bookkeeping (`is_digest_eligible`)
//! - is the game over (`is_terminal`)

use serde::{Deserialize, Serialize};

/// Categorical facets of a per-game state enum.
pub trait GameStatus: Copy + Eq + std::fmt::Debug + Send + Sync + 'static {
    /// The commit ("Done") action may be invoked in this state.
    fn is_done_eligible(self) -> bool;

    /// Positions in this state are recorded for repetition detection.
    fn is_digest_eligible(self) -> bool;

    /// Absorbing end-of-game state.
    fn is_terminal(self) -> bool;

    /// Free editing without turn discipline.
    fn is_puzzle(self) -> bool;

    /// Stable ordinal used for digesting. Must never be renumbered within a
    /// rules revision.
    fn ordinal(self) -> u64;

    /// Key the presentation layer uses to look up a localized description.
    fn description(self) -> &'static str;
}

/// How a move is being applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReplayMode {
    /// Interactive play; animation pairs are emitted.
    Live,
    /// Bulk replay or robot search; no animation bookkeeping.
    Replay,
    /// Single-stepping through a record; animation pairs are emitted.
    Single,
}

impl ReplayMode {
    /// Whether `execute` should record `(from, to)` animation pairs.
    #[must_use]
    pub const fn animate(self) -> bool {
        !matches!(self, ReplayMode::Replay)
    }
}
