//! Icehouse pyramids.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::pieces::{Piece, PieceCatalog};

const VOLCANO_PIECE_SEED: u64 = 0x0701_CA40;

/// Pyramid colors. Black only appears as the small volcano caps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PyramidColor {
    Red,
    Yellow,
    Green,
    Blue,
    White,
    Black,
}

impl PyramidColor {
    /// Colors that form nests and count toward scoring.
    pub const NEST_COLORS: [PyramidColor; 5] = [
        PyramidColor::Red,
        PyramidColor::Yellow,
        PyramidColor::Green,
        PyramidColor::Blue,
        PyramidColor::White,
    ];
}

/// Pyramid sizes, smallest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PyramidSize {
    Small,
    Medium,
    Large,
}

impl PyramidSize {
    pub const ALL: [PyramidSize; 3] = [PyramidSize::Small, PyramidSize::Medium, PyramidSize::Large];
}

/// One pyramid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pyramid {
    pub color: PyramidColor,
    pub size: PyramidSize,
}

impl Pyramid {
    /// The volcano cap.
    pub const CAP: Pyramid = Pyramid {
        color: PyramidColor::Black,
        size: PyramidSize::Small,
    };

    #[must_use]
    pub const fn new(color: PyramidColor, size: PyramidSize) -> Self {
        Self { color, size }
    }

    #[must_use]
    pub fn is_cap(self) -> bool {
        self == Self::CAP
    }

    /// The shared catalog, built on first use.
    pub fn catalog() -> &'static PieceCatalog<Pyramid> {
        static CATALOG: OnceLock<PieceCatalog<Pyramid>> = OnceLock::new();
        CATALOG.get_or_init(|| {
            const NAMES: [[&str; 3]; 5] = [
                ["red-small", "red-medium", "red-large"],
                ["yellow-small", "yellow-medium", "yellow-large"],
                ["green-small", "green-medium", "green-large"],
                ["blue-small", "blue-medium", "blue-large"],
                ["white-small", "white-medium", "white-large"],
            ];
            let nests = PyramidColor::NEST_COLORS
                .into_iter()
                .zip(NAMES)
                .flat_map(|(color, names)| {
                    PyramidSize::ALL
                        .into_iter()
                        .zip(names)
                        .map(move |(size, name)| (Pyramid::new(color, size), name))
                });
            PieceCatalog::build(
                VOLCANO_PIECE_SEED,
                nests.chain(std::iter::once((Pyramid::CAP, "cap"))),
            )
        })
    }

    /// Catalog name, e.g. `blue-large`.
    #[must_use]
    pub fn name(self) -> &'static str {
        Self::catalog().name(self).unwrap_or("?")
    }
}

impl Piece for Pyramid {
    fn id(self) -> u16 {
        self.color as u16 * 3 + self.size as u16
    }

    fn digest_tag(self) -> u64 {
        Self::catalog().tag(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_covers_every_piece() {
        let catalog = Pyramid::catalog();
        assert_eq!(catalog.len(), 16);
        assert!(catalog.contains(Pyramid::CAP));
        assert_eq!(
            catalog.by_name("blue-large"),
            Some(Pyramid::new(PyramidColor::Blue, PyramidSize::Large))
        );
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ids: Vec<u16> = Pyramid::catalog().iter().map(Piece::id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 16);
    }

    #[test]
    fn test_cap() {
        assert!(Pyramid::CAP.is_cap());
        assert!(!Pyramid::new(PyramidColor::Black, PyramidSize::Large).is_cap());
        assert_eq!(Pyramid::CAP.name(), "cap");
    }
}
