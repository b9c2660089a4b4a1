//! Volcano: slide caps, erupt stacks and collect Icehouse nests.
//!
//! ## Example
//!
//! ```
//! use board_engine::core::{GameInit, ReplayMode};
//! use board_engine::games::volcano::{VolcanoBoard, VolcanoState};
//! use board_engine::rules::GameBoard;
//!
//! let mut board = VolcanoBoard::new(&GameInit::latest("volcano", 2, 0)).unwrap();
//! let mut m = board.parse_move("move C 3 C 2").unwrap();
//! board.execute(&mut m, ReplayMode::Live).unwrap();
//! assert_eq!(board.state(), VolcanoState::Confirm);
//! board.finalize_ply(ReplayMode::Live).unwrap();
//! assert_eq!(board.score(m.player).total(), 1);
//! ```

pub mod board;
pub mod eval;
pub mod moves;
pub mod pieces;
pub mod state;

pub use board::{
    Score, VolcanoBoard, VolcanoRules, VolcanoVariation, VOLCANO_DIGEST_SEED, VOLCANO_REVISIONS,
};
pub use eval::VolcanoEvaluator;
pub use moves::{VolcanoAction, VolcanoMove, VolcanoOp};
pub use pieces::{Pyramid, PyramidColor, PyramidSize};
pub use state::VolcanoState;
