//! Canonical piece values and their digest tags.
//!
//! Pieces are small `Copy` values. Each game builds one [`PieceCatalog`]
//! before its first board exists, drawing a 64-bit tag per piece from a
//! fixed-seed generator so the tags are identical on every machine and every
//! run. Rendering resources never live here.

pub mod catalog;

pub use catalog::{Piece, PieceCatalog};
