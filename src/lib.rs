//! # board-engine
//!
//! A general-purpose engine for turn-based, perfect-information board
//! games with exact undo, deterministic digests and adversarial search.
//!
//! ## Design Principles
//!
//! 1. **Exact undo**: every `execute` stores what its `unexecute` needs in
//!    the move itself. Cascades (captures, eruptions, growth) are recorded
//!    on explicit stacks and unwound in strict LIFO order.
//!
//! 2. **Reproducible positions**: a board's digest is a pure function of
//!    the position, so independently built copies, replays and clones can
//!    be checked against each other.
//!
//! 3. **Versioned rules**: rule changes ship as a new revision with
//!    explicit compatibility flags; old records replay under old rules.
//!
//! ## Architecture
//!
//! - **Sub-action state machines**: a ply is pick/drop steps plus a
//!   confirming `done`; each game's state enum carries done-eligible,
//!   digest-eligible and terminal facets.
//!
//! - **Private board copies**: the robot clones the live board and owns
//!   the copy; search never borrows the board being displayed.
//!
//! ## Modules
//!
//! - `core`: players, RNG, init strings, errors, state facets, digests
//! - `grid`: cells, coordinates and adjacency
//! - `pieces`: piece identity and digest tags
//! - `moves`: move contract and the textual wire format
//! - `rules`: the `GameBoard` trait, results and render snapshots
//! - `cascade`: capture stacks, edit journals, propagation and sweeps
//! - `search`: alpha-beta with iterative deepening
//! - `mcts`: Monte Carlo Tree Search
//! - `robot`: search-driven players, background worker and autoplay
//! - `record`: replayable game records and repetition counts
//! - `games`: Bug and Volcano

pub mod cascade;
pub mod core;
pub mod games;
pub mod grid;
pub mod mcts;
pub mod moves;
pub mod pieces;
pub mod record;
pub mod robot;
pub mod rules;
pub mod search;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use crate::core::{
    ConfigError, Digester, EngineError, EngineResult, GameInit, GameRng,
    GameStatus, MoveParseError, PlayerId, PlayerMap, ReplayMode, RevisionRange,
};

pub use crate::grid::{Cell, CellId, Coord, Grid, Topology};

pub use crate::pieces::{Piece, PieceCatalog};

pub use crate::moves::{MoveSpec, MoveTokens, OpcodeDictionary};

pub use crate::rules::{GameBoard, GameResult, RenderSnapshot, Spot};

pub use crate::cascade::{CaptureStack, Journal, PropagationRecord};

pub use crate::search::{AlphaBeta, Difficulty, Evaluator, SearchConfig, SearchResult};

pub use crate::mcts::{MCTSConfig, MCTSSearch, PlayoutStats};

pub use crate::robot::{AutoPlayer, Robot, RobotConfig, RobotWorker, Strategy};

pub use crate::record::{GameRecord, RepetitionTable};
