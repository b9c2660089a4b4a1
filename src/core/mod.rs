//! Core engine types: players, RNG, init strings, errors, state facets, digests.
//!
//! This module contains the fundamental building blocks that are game-agnostic.
//! Games describe themselves through `GameInit`, a `GameStatus` enum and the
//! `GameBoard` trait rather than modifying the core.

pub mod config;
pub mod digest;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;

pub use config::{GameInit, RevisionRange};
pub use digest::{mix64, Digester};
pub use error::{ConfigError, EngineError, EngineResult, MoveParseError};
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
pub use state::{GameStatus, ReplayMode};
