//! Read-only render view of a board.

use serde::{Deserialize, Serialize};

use crate::core::{GameStatus, PlayerId};
use crate::grid::{CellId, Coord, Grid};
use crate::pieces::Piece;

/// One end of an animation: a board cell or a player's reserve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Spot {
    Cell(Coord),
    Reserve(PlayerId),
}

/// What the presentation layer may see of a board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    /// Non-empty cells with their piece ids, bottom to top.
    pub cells: Vec<(Coord, Vec<u16>)>,
    /// Cells a legal move may currently target.
    pub legal_destinations: Vec<Coord>,
    /// `(from, to)` pairs emitted by the last animated `execute`.
    pub animations: Vec<(Spot, Spot)>,
    /// Description key for the current state.
    pub state: String,
    pub whose_turn: PlayerId,
}

impl RenderSnapshot {
    /// Build a snapshot from a grid and the board's bookkeeping.
    pub fn capture<P: Piece, S: GameStatus>(
        grid: &Grid<P>,
        destinations: impl IntoIterator<Item = CellId>,
        animations: &[(Spot, Spot)],
        state: S,
        whose_turn: PlayerId,
    ) -> Self {
        let cells = grid
            .cells()
            .filter(|c| !c.is_empty())
            .map(|c| (c.coord, c.contents().iter().map(|p| p.id()).collect()))
            .collect();

        let mut legal_destinations: Vec<Coord> =
            destinations.into_iter().map(|id| grid.coord(id)).collect();
        legal_destinations.sort_unstable();
        legal_destinations.dedup();

        Self {
            cells,
            legal_destinations,
            animations: animations.to_vec(),
            state: state.description().to_string(),
            whose_turn,
        }
    }

    /// Check if a cell is a legal destination.
    #[must_use]
    pub fn is_legal_destination(&self, coord: Coord) -> bool {
        self.legal_destinations.binary_search(&coord).is_ok()
    }
}
