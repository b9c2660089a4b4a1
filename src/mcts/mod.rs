//! Monte Carlo Tree Search (UCT).
//!
//! ## Overview
//!
//! Randomized rollouts over [`GameBoard`](crate::rules::GameBoard) boards,
//! used instead of alpha-beta where the branching factor defeats deep
//! lookahead. Key features:
//!
//! - **Per-iteration board copies**: each iteration clones the root board
//!   and moves with `apply_ply`, so the caller's board is never touched
//! - **N-Player Support**: rewards are kept per seat and every node selects
//!   for the seat to move there
//! - **Configurable Policies**: selection (UCB1/PUCT) and simulation
//!   (uniform random, or random with an evaluator cutoff)
//! - **Budgets**: a playout count and an optional wall-clock limit
//!
//! ## Usage
//!
//! ```
//! use board_engine::core::GameInit;
//! use board_engine::games::volcano::VolcanoBoard;
//! use board_engine::mcts::{MCTSConfig, MCTSSearch};
//!
//! let board = VolcanoBoard::new(&GameInit::latest("volcano", 2, 0)).unwrap();
//! let config = MCTSConfig::default().with_playouts(50).with_rollout_depth(20);
//! let mut search = MCTSSearch::new(config);
//! let best = search.search(&board).unwrap();
//! assert!(best.is_some());
//! ```
//!
//! ## Custom Policies
//!
//! ```rust,ignore
//! use board_engine::mcts::{GuidedSimulation, MCTSSearch, MCTSConfig, PUCT};
//!
//! let search = MCTSSearch::new(config)
//!     .with_selection(PUCT)
//!     .with_simulation(GuidedSimulation::new(evaluator, 10.0));
//! ```

pub mod config;
pub mod node;
pub mod policy;
pub mod search;
pub mod stats;
pub mod tree;

// Re-export main types
pub use config::MCTSConfig;
pub use node::{Edge, MCTSNode, NodeId};
pub use policy::{
    result_to_rewards, GuidedSimulation, RandomSimulation, SelectionPolicy, SimulationPolicy,
    PUCT, UCB1,
};
pub use search::MCTSSearch;
pub use stats::PlayoutStats;
pub use tree::{MCTSTree, TreeStats};
