//! Bug stones.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;
use crate::pieces::{Piece, PieceCatalog};

const BUG_PIECE_SEED: u64 = 0x0B06_0001;

/// One stone of either color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BugChip {
    Black,
    White,
}

impl BugChip {
    /// Both colors, in seat order.
    pub const ALL: [BugChip; 2] = [BugChip::Black, BugChip::White];

    /// The shared catalog, built on first use.
    pub fn catalog() -> &'static PieceCatalog<BugChip> {
        static CATALOG: OnceLock<PieceCatalog<BugChip>> = OnceLock::new();
        CATALOG.get_or_init(|| {
            PieceCatalog::build(
                BUG_PIECE_SEED,
                [(BugChip::Black, "black"), (BugChip::White, "white")],
            )
        })
    }

    /// Color played by a seat. Seat 0 plays black.
    #[must_use]
    pub fn for_player(player: PlayerId) -> Self {
        if player.index() == 0 {
            BugChip::Black
        } else {
            BugChip::White
        }
    }

    /// Seat that plays this color.
    #[must_use]
    pub fn owner(self) -> PlayerId {
        match self {
            BugChip::Black => PlayerId::new(0),
            BugChip::White => PlayerId::new(1),
        }
    }

    #[must_use]
    pub fn opponent(self) -> Self {
        match self {
            BugChip::Black => BugChip::White,
            BugChip::White => BugChip::Black,
        }
    }

    /// Wire name.
    #[must_use]
    pub fn name(self) -> &'static str {
        Self::catalog().name(self).unwrap_or("?")
    }

    /// Case-insensitive lookup of a wire name.
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        Self::catalog().by_name(name)
    }
}

impl Piece for BugChip {
    fn id(self) -> u16 {
        self as u16
    }

    fn digest_tag(self) -> u64 {
        Self::catalog().tag(self)
    }
}
