//! Move representation and the textual wire format.
//!
//! Every game defines a move as a tagged opcode plus typed operands and an
//! optional undo snapshot captured by `execute`. On the wire a move is one
//! line of whitespace-separated tokens:
//!
//! ```text
//! dropb E 5
//! move C 3 D 4
//! done
//! ```
//!
//! The opcode resolves through a per-game [`OpcodeDictionary`];
//! [`MoveTokens`] reads the operands. `move_string` is the inverse, and
//! parsing it must yield a move for which `same_move` holds.

pub mod dictionary;
pub mod tokens;

pub use dictionary::OpcodeDictionary;
pub use tokens::MoveTokens;

use crate::core::PlayerId;

/// Contract shared by every game's move type.
pub trait MoveSpec: Clone + std::fmt::Debug + Send + 'static {
    /// Opcode enum.
    type Op: Copy + Eq + std::fmt::Debug + Send + 'static;

    /// The move's opcode.
    fn op(&self) -> Self::Op;

    /// The seat making the move.
    fn player(&self) -> PlayerId;

    /// Equality of opcode, player and operands. Undo snapshots are ignored.
    fn same_move(&self, other: &Self) -> bool;

    /// Wire form of the move.
    fn move_string(&self) -> String;
}
