//! Board contract for game implementations.
//!
//! Games implement `GameBoard` to define:
//! - Legal moves for each state
//! - How moves modify the board, and how to take them back
//! - Win/loss conditions and the position digest
//!
//! The search driver, the robot and record replay call into `GameBoard`
//! but never interpret game-specific concepts directly.

pub mod engine;
pub mod snapshot;

pub use engine::{GameBoard, GameResult};
pub use snapshot::{RenderSnapshot, Spot};
