//! Alpha-beta search configuration.

use serde::{Deserialize, Serialize};

/// Alpha-beta search parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Deepest iteration, in plies.
    pub max_depth: u32,

    /// Deepen one ply at a time up to `max_depth` (false = search only
    /// `max_depth`).
    pub iterative_deepening: bool,

    /// Wall-clock budget in milliseconds (None = unlimited).
    pub time_limit_ms: Option<u64>,

    /// Node budget (None = unlimited).
    pub node_limit: Option<u64>,

    /// Stop deepening once the best value reaches this.
    pub good_enough: Option<f64>,

    /// Try the two most recent cutoff moves of each ply first.
    pub killers: bool,

    /// Randomize the root choice while the board's move number is below
    /// this.
    pub random_plies: u32,

    /// Randomized choices stay within this much of the best value.
    pub acceptable_drop: f64,

    /// Seed for randomized root choices.
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            iterative_deepening: true,
            time_limit_ms: None,
            node_limit: None,
            good_enough: None,
            killers: true,
            random_plies: 0,
            acceptable_drop: 0.0,
            seed: 42,
        }
    }
}

impl SearchConfig {
    /// Preset for a difficulty level.
    #[must_use]
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Dumbot => Self {
                max_depth: 2,
                random_plies: 4,
                acceptable_drop: 1.0,
                ..Self::default()
            },
            Difficulty::Smartbot => Self {
                max_depth: 4,
                time_limit_ms: Some(5_000),
                random_plies: 2,
                acceptable_drop: 0.5,
                ..Self::default()
            },
            Difficulty::Bestbot => Self {
                max_depth: 6,
                time_limit_ms: Some(15_000),
                ..Self::default()
            },
        }
    }

    /// Set the maximum depth.
    #[must_use]
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the node budget.
    #[must_use]
    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.node_limit = Some(nodes);
        self
    }

    /// Set the wall-clock budget.
    #[must_use]
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Set the good-enough threshold.
    #[must_use]
    pub fn with_good_enough(mut self, value: f64) -> Self {
        self.good_enough = Some(value);
        self
    }

    /// Enable or disable killer ordering.
    #[must_use]
    pub fn with_killers(mut self, on: bool) -> Self {
        self.killers = on;
        self
    }

    /// Randomize the first `plies` plies within `drop` of the best.
    #[must_use]
    pub fn with_randomization(mut self, plies: u32, drop: f64) -> Self {
        self.random_plies = plies;
        self.acceptable_drop = drop;
        self
    }

    /// Search only at `max_depth`.
    #[must_use]
    pub fn fixed_depth(mut self) -> Self {
        self.iterative_deepening = false;
        self
    }

    /// Set the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Named strength levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Dumbot,
    Smartbot,
    Bestbot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.max_depth, 4);
        assert!(config.killers);
        assert!(config.iterative_deepening);
        assert_eq!(config.random_plies, 0);
    }

    #[test]
    fn test_presets_grow_deeper() {
        let dumb = SearchConfig::for_difficulty(Difficulty::Dumbot);
        let smart = SearchConfig::for_difficulty(Difficulty::Smartbot);
        let best = SearchConfig::for_difficulty(Difficulty::Bestbot);
        assert!(dumb.max_depth < smart.max_depth);
        assert!(smart.max_depth < best.max_depth);
        assert!(dumb.random_plies > 0);
        assert_eq!(best.random_plies, 0);
    }

    #[test]
    fn test_builder_pattern() {
        let config = SearchConfig::default()
            .with_depth(3)
            .with_node_limit(1000)
            .with_good_enough(50.0)
            .with_randomization(2, 0.25)
            .fixed_depth();
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.node_limit, Some(1000));
        assert_eq!(config.good_enough, Some(50.0));
        assert_eq!(config.random_plies, 2);
        assert!(!config.iterative_deepening);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SearchConfig = toml::from_str("max_depth = 3\nkillers = false").unwrap();
        assert_eq!(config.max_depth, 3);
        assert!(!config.killers);
        assert_eq!(config.seed, 42);
    }
}
