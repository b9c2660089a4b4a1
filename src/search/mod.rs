//! Depth-limited alpha-beta search.
//!
//! ## Overview
//!
//! Negamax over [`GameBoard`](crate::rules::GameBoard) boards using
//! `apply_ply` / `unexecute` for make and unmake. Key features:
//!
//! - **Win sentinel**: wins score [`VALUE_OF_WIN`] plus a depth nudge so
//!   faster wins and slower losses are preferred
//! - **Extra turns**: a child where the same side moves again keeps the
//!   parent's sign and window
//! - **Iterative deepening** with node and wall-clock budgets checked
//!   between expansions; the last completed depth is kept on abort
//! - **Killer moves**: two per ply, tried first when enabled
//! - **Good-enough cutoff**: stop deepening once the best value reaches a
//!   threshold
//! - **Randomized openings**: for the first plies, choose uniformly among
//!   root moves within an acceptable drop of the best
//!
//! ## Usage
//!
//! ```
//! use board_engine::core::GameInit;
//! use board_engine::games::bug::{BugBoard, BugEvaluator};
//! use board_engine::search::{AlphaBeta, SearchConfig};
//!
//! let mut board = BugBoard::new(&GameInit::latest("bug-3", 2, 1)).unwrap();
//! let config = SearchConfig::default().with_depth(2);
//! let evaluator = BugEvaluator::default();
//! let result = AlphaBeta::new(config, &evaluator).search(&mut board).unwrap();
//! assert!(result.best_move.is_some());
//! ```

pub mod alphabeta;
pub mod config;
pub mod evaluator;

pub use alphabeta::{
    is_win_value, minimax_value, win_value, AlphaBeta, AlphaBetaStats, SearchResult, VALUE_OF_WIN,
};
pub use config::{Difficulty, SearchConfig};
pub use evaluator::Evaluator;
