//! Games built on the engine.
//!
//! Each game is a self-contained module exposing its board, move type,
//! state enum, pieces and a static evaluator. Nothing outside a game's
//! module interprets its rules; the search driver, the robot and record
//! replay only see [`GameBoard`](crate::rules::GameBoard).

pub mod bug;
pub mod volcano;
