//! MCTS configuration parameters.

use serde::{Deserialize, Serialize};

/// MCTS configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MCTSConfig {
    /// UCB1 exploration constant (default: sqrt(2) = 1.414).
    /// Higher values favor exploration over exploitation.
    pub exploration_constant: f64,

    /// Playouts per search.
    pub playouts: u32,

    /// Wall-clock budget in milliseconds (None = playouts only).
    pub time_limit_ms: Option<u64>,

    /// Plies a rollout may play before it is scored (0 = to the end).
    pub rollout_depth: u32,

    /// Maximum nodes to allocate in the tree.
    /// Prevents memory exhaustion on large searches.
    pub max_nodes: usize,

    /// Random seed for simulation RNG.
    /// Same seed produces deterministic searches.
    pub seed: u64,

    /// Temperature for action selection (0 = greedy, higher = more exploration).
    /// Affects final action selection from root.
    pub temperature: f64,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        Self {
            exploration_constant: std::f64::consts::SQRT_2,
            playouts: 1_000,
            time_limit_ms: None,
            rollout_depth: 60,
            max_nodes: 100_000,
            seed: 42,
            temperature: 0.0, // Greedy by default
        }
    }
}

impl MCTSConfig {
    /// Create a new config with custom exploration constant.
    #[must_use]
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Create a new config with custom seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the playout budget.
    #[must_use]
    pub fn with_playouts(mut self, playouts: u32) -> Self {
        self.playouts = playouts;
        self
    }

    /// Add a wall-clock budget.
    #[must_use]
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Set the rollout cutoff.
    #[must_use]
    pub fn with_rollout_depth(mut self, depth: u32) -> Self {
        self.rollout_depth = depth;
        self
    }

    /// Create a new config with custom temperature.
    #[must_use]
    pub fn with_temperature(mut self, temp: f64) -> Self {
        self.temperature = temp;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MCTSConfig::default();
        assert!((config.exploration_constant - std::f64::consts::SQRT_2).abs() < 0.001);
        assert_eq!(config.playouts, 1_000);
        assert_eq!(config.time_limit_ms, None);
        assert_eq!(config.seed, 42);
        assert_eq!(config.temperature, 0.0);
    }

    #[test]
    fn test_builder_pattern() {
        let config = MCTSConfig::default()
            .with_exploration(2.0)
            .with_seed(123)
            .with_playouts(500)
            .with_time_limit_ms(250)
            .with_rollout_depth(50);

        assert_eq!(config.exploration_constant, 2.0);
        assert_eq!(config.seed, 123);
        assert_eq!(config.playouts, 500);
        assert_eq!(config.time_limit_ms, Some(250));
        assert_eq!(config.rollout_depth, 50);
    }

    #[test]
    fn test_serialization() {
        let config = MCTSConfig::default().with_time_limit_ms(10);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: MCTSConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
