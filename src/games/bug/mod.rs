//! Bug: a hex placement game where critters eat same-shaped enemies.
//!
//! ## Example
//!
//! ```
//! use board_engine::core::{GameInit, ReplayMode};
//! use board_engine::games::bug::{BugBoard, BugState};
//! use board_engine::rules::GameBoard;
//!
//! let mut board = BugBoard::new(&GameInit::latest("bug-4", 2, 0)).unwrap();
//! for text in ["dropb D 4", "done"] {
//!     let mut m = board.parse_move(text).unwrap();
//!     board.execute(&mut m, ReplayMode::Live).unwrap();
//! }
//! assert_eq!(board.state(), BugState::Play);
//! assert_eq!(board.move_number(), 1);
//! ```

pub mod board;
pub mod critter;
pub mod eval;
pub mod moves;
pub mod pieces;
pub mod state;

pub use board::{BugBoard, BugRules, BugVariation, BUG_DIGEST_SEED, BUG_REVISIONS};
pub use critter::{Critter, CritterMap, Shape};
pub use eval::BugEvaluator;
pub use moves::{BugAction, BugMove, BugOp};
pub use pieces::BugChip;
pub use state::BugState;
