//! Cell grid and adjacency.
//!
//! A [`Grid`] owns every cell of one board topology. Cells are allocated
//! once and [`Grid::reset`] clears them in place on re-init. Adjacency is
//! precomputed into per-cell link tables, so `exit_to` is a single lookup
//! and returns `None` off the board.
//!
//! Traversals use sweep marks: [`Grid::begin_sweep`] bumps a grid-wide
//! counter and a cell counts as visited when its mark equals that counter,
//! so no pass ever has to clear the previous one's marks.

pub mod cell;
pub mod layout;
pub mod topology;

pub use cell::{Cell, CellId, Coord};
pub use layout::Grid;
pub use topology::Topology;
