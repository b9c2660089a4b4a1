//! Piece catalog for tag and name lookup.

use std::hash::Hash;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashMap;

/// Immutable piece value.
pub trait Piece: Copy + Eq + Hash + std::fmt::Debug + Send + Sync + 'static {
    /// Stable small integer id, used in wire strings and records.
    fn id(self) -> u16;

    /// Fixed pseudorandom tag used only for digesting.
    fn digest_tag(self) -> u64;
}

#[derive(Clone, Debug)]
struct CatalogEntry {
    name: &'static str,
    tag: u64,
}

/// Registry of every piece a game can put on its board.
///
/// ## Example
///
/// ```
/// use board_engine::pieces::PieceCatalog;
///
/// #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// enum Stone { Black, White }
///
/// let catalog = PieceCatalog::build(0x5eed, [(Stone::Black, "black"), (Stone::White, "white")]);
/// assert_ne!(catalog.tag(Stone::Black), catalog.tag(Stone::White));
/// assert_eq!(catalog.by_name("WHITE"), Some(Stone::White));
/// ```
#[derive(Clone, Debug)]
pub struct PieceCatalog<K> {
    entries: FxHashMap<K, CatalogEntry>,
    order: Vec<K>,
}

impl<K: Copy + Eq + Hash> PieceCatalog<K> {
    /// Build a catalog, assigning tags in iteration order from `seed`.
    ///
    /// Panics if the same piece is listed twice.
    pub fn build(seed: u64, pieces: impl IntoIterator<Item = (K, &'static str)>) -> Self {
        let mut salts = ChaCha8Rng::seed_from_u64(seed);
        let mut entries = FxHashMap::default();
        let mut order = Vec::new();

        for (piece, name) in pieces {
            let tag = salts.next_u64();
            if entries.insert(piece, CatalogEntry { name, tag }).is_some() {
                panic!("piece '{name}' registered twice");
            }
            order.push(piece);
        }

        Self { entries, order }
    }

    /// Digest tag of a piece. Unregistered pieces contribute nothing.
    #[must_use]
    pub fn tag(&self, piece: K) -> u64 {
        self.entries.get(&piece).map_or(0, |e| e.tag)
    }

    /// Display name of a piece.
    #[must_use]
    pub fn name(&self, piece: K) -> Option<&'static str> {
        self.entries.get(&piece).map(|e| e.name)
    }

    /// Case-insensitive reverse lookup.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<K> {
        self.order
            .iter()
            .copied()
            .find(|p| self.entries[p].name.eq_ignore_ascii_case(name))
    }

    /// Check if a piece is registered.
    #[must_use]
    pub fn contains(&self, piece: K) -> bool {
        self.entries.contains_key(&piece)
    }

    /// Number of registered pieces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate over pieces in registration order.
    pub fn iter(&self) -> impl Iterator<Item = K> + '_ {
        self.order.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Chip {
        Red,
        Green,
        Blue,
    }

    fn catalog() -> PieceCatalog<Chip> {
        PieceCatalog::build(
            1234,
            [(Chip::Red, "red"), (Chip::Green, "green"), (Chip::Blue, "blue")],
        )
    }

    #[test]
    fn test_tags_are_reproducible() {
        let a = catalog();
        let b = catalog();
        for chip in a.iter() {
            assert_eq!(a.tag(chip), b.tag(chip));
        }
    }

    #[test]
    fn test_tags_are_distinct() {
        let c = catalog();
        assert_ne!(c.tag(Chip::Red), c.tag(Chip::Green));
        assert_ne!(c.tag(Chip::Green), c.tag(Chip::Blue));
        assert_ne!(c.tag(Chip::Red), 0);
    }

    #[test]
    fn test_lookup() {
        let c = catalog();
        assert_eq!(c.len(), 3);
        assert!(!c.is_empty());
        assert!(c.contains(Chip::Blue));
        assert_eq!(c.name(Chip::Green), Some("green"));
        assert_eq!(c.by_name("Blue"), Some(Chip::Blue));
        assert_eq!(c.by_name("purple"), None);
        assert_eq!(c.iter().collect::<Vec<_>>(), vec![Chip::Red, Chip::Green, Chip::Blue]);
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn test_duplicate_panics() {
        let _ = PieceCatalog::build(1, [(Chip::Red, "red"), (Chip::Red, "again")]);
    }
}
