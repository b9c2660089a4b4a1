//! Cascade and effect resolution.
//!
//! One primary move can set off a chain of secondary effects before the turn
//! passes. The pieces here are game-agnostic and every one of them keeps
//! enough information to be undone exactly:
//!
//! - [`sweep`]: flood-fill group discovery over fresh sweep passes
//! - [`Journal`]: ordinary placements and removals made by `execute`
//! - [`CaptureStack`]: pieces removed by capture, with their original cells
//! - [`propagate`]: material relocated one cell at a time until blocked
//!
//! Undo always runs in reverse: captures first, then propagation, then the
//! journal, because that is the order in which a ply creates them.

pub mod capture;
pub mod journal;
pub mod propagation;
pub mod sweep;

pub use capture::{CaptureRecord, CaptureStack};
pub use journal::{Edit, Journal};
pub use propagation::{propagate, unwind, PropagationRecord};
pub use sweep::{collect_group, extend_group, Group};
