//! Game initialization strings and rules revisions.
//!
//! A game is reconstructed from one line: `"variation players seed revision"`.
//! Re-parsing that line and calling `do_init` must rebuild a bit-identical
//! initial board, which is what record replay and review tooling rely on.
//!
//! Rules changes are versioned. Each game declares a [`RevisionRange`]; a
//! record made under an older revision keeps being replayed under that
//! revision's compatibility flags, and a revision outside the range is
//! rejected rather than silently reinterpreted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{EngineError, EngineResult};

/// Default number of seats when the init string omits it.
pub const DEFAULT_PLAYERS: usize = 2;

/// Parsed initialization string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameInit {
    /// Variation name, matched case-insensitively by each game.
    pub variation: String,
    /// Number of seats.
    pub players: usize,
    /// Random key used for seeded layouts and per-board randomness.
    pub seed: u64,
    /// Rules revision; `None` means "the game's current revision".
    pub revision: Option<u32>,
}

impl GameInit {
    /// Create an init record with every field explicit.
    #[must_use]
    pub fn new(variation: impl Into<String>, players: usize, seed: u64, revision: u32) -> Self {
        Self {
            variation: variation.into(),
            players,
            seed,
            revision: Some(revision),
        }
    }

    /// Create an init record for the game's current revision.
    #[must_use]
    pub fn latest(variation: impl Into<String>, players: usize, seed: u64) -> Self {
        Self {
            variation: variation.into(),
            players,
            seed,
            revision: None,
        }
    }

    /// Parse `"variation [players [seed [revision]]]"`.
    ///
    /// ```
    /// use board_engine::core::GameInit;
    ///
    /// let init: GameInit = "bug-4 2 1234 101".parse().unwrap();
    /// assert_eq!(init.variation, "bug-4");
    /// assert_eq!(init.seed, 1234);
    /// assert_eq!(init.revision, Some(101));
    /// assert_eq!(init.to_string(), "bug-4 2 1234 101");
    /// ```
    pub fn parse(text: &str) -> EngineResult<Self> {
        let mut tokens = text.split_whitespace();
        let malformed = || EngineError::MalformedInit(text.to_string());

        let variation = tokens.next().ok_or_else(malformed)?.to_string();
        let players = match tokens.next() {
            Some(t) => t.parse::<usize>().map_err(|_| malformed())?,
            None => DEFAULT_PLAYERS,
        };
        let seed = match tokens.next() {
            Some(t) => t.parse::<u64>().map_err(|_| malformed())?,
            None => 0,
        };
        let revision = match tokens.next() {
            Some(t) => Some(t.parse::<u32>().map_err(|_| malformed())?),
            None => None,
        };
        if tokens.next().is_some() || players == 0 {
            return Err(malformed());
        }

        Ok(Self {
            variation,
            players,
            seed,
            revision,
        })
    }

    /// Copy of this init with the revision pinned.
    #[must_use]
    pub fn with_revision(mut self, revision: u32) -> Self {
        self.revision = Some(revision);
        self
    }
}

impl FromStr for GameInit {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for GameInit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.variation, self.players, self.seed)?;
        if let Some(rev) = self.revision {
            write!(f, " {rev}")?;
        }
        Ok(())
    }
}

/// Supported rules revisions for one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionRange {
    /// Oldest revision still replayable.
    pub min: u32,
    /// Current revision; new games start here.
    pub max: u32,
}

impl RevisionRange {
    /// Declare a range.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Resolve a requested revision, defaulting to the current one.
    pub fn resolve(self, requested: Option<u32>) -> EngineResult<u32> {
        let revision = requested.unwrap_or(self.max);
        if revision < self.min || revision > self.max {
            return Err(EngineError::UnsupportedRevision {
                revision,
                min: self.min,
                max: self.max,
            });
        }
        Ok(revision)
    }
}
