//! Robot configuration, loadable from TOML.
//!
//! ```toml
//! strategy = "mcts"
//!
//! [search]
//! max_depth = 3
//!
//! [mcts]
//! playouts = 400
//! rollout_depth = 30
//! ```

use std::path::Path;

use clap::ValueEnum;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::core::ConfigError;
use crate::mcts::MCTSConfig;
use crate::search::{Difficulty, SearchConfig};

/// Which searcher picks the robot's moves. TOML and the command line
/// spell the variants the same way.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    #[value(name = "alphabeta")]
    AlphaBeta,
    Mcts,
}

/// Strategy plus the settings of both searchers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    pub strategy: Strategy,
    pub search: SearchConfig,
    pub mcts: MCTSConfig,
    /// Evaluation difference that a cut-off MCTS rollout maps to a ~73%
    /// reward.
    pub rollout_scale: f64,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::AlphaBeta,
            search: SearchConfig::default(),
            mcts: MCTSConfig::default(),
            rollout_scale: 10.0,
        }
    }
}

impl RobotConfig {
    /// Alpha-beta robot at a difficulty preset.
    #[must_use]
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self {
            search: SearchConfig::for_difficulty(difficulty),
            ..Self::default()
        }
    }

    /// MCTS robot with the given settings.
    #[must_use]
    pub fn mcts(mcts: MCTSConfig) -> Self {
        Self {
            strategy: Strategy::Mcts,
            mcts,
            ..Self::default()
        }
    }

    /// Parse and validate TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: RobotConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!("robot config '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.max_depth == 0 {
            return Err(ConfigError::Validation("search.max_depth must be > 0".into()));
        }
        if self.search.acceptable_drop < 0.0 {
            return Err(ConfigError::Validation(
                "search.acceptable_drop must be >= 0".into(),
            ));
        }
        if self.mcts.playouts == 0 && self.mcts.time_limit_ms.is_none() {
            return Err(ConfigError::Validation(
                "mcts needs playouts > 0 or a time limit".into(),
            ));
        }
        if self.mcts.exploration_constant < 0.0 {
            return Err(ConfigError::Validation(
                "mcts.exploration_constant must be >= 0".into(),
            ));
        }
        if self.mcts.max_nodes == 0 {
            return Err(ConfigError::Validation("mcts.max_nodes must be > 0".into()));
        }
        if self.rollout_scale <= 0.0 {
            return Err(ConfigError::Validation("rollout_scale must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(RobotConfig::default().validate().is_ok());
        assert!(RobotConfig::for_difficulty(Difficulty::Bestbot)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_from_toml_fills_defaults() {
        let config = RobotConfig::from_toml(
            r#"
            strategy = "mcts"

            [mcts]
            playouts = 400
            "#,
        )
        .unwrap();
        assert_eq!(config.strategy, Strategy::Mcts);
        assert_eq!(config.mcts.playouts, 400);
        assert_eq!(config.search, SearchConfig::default());
    }

    #[test]
    fn test_strategy_names_match_toml() {
        for strategy in Strategy::value_variants() {
            let name = strategy.to_possible_value().unwrap().get_name().to_string();
            assert_eq!(Strategy::from_str(&name, false), Ok(*strategy));
            let config = RobotConfig::from_toml(&format!("strategy = \"{name}\"")).unwrap();
            assert_eq!(config.strategy, *strategy);
        }
        assert!(Strategy::from_str("alpha-beta", false).is_err());
    }

    #[test]
    fn test_validation_errors() {
        let err = RobotConfig::from_toml("[search]\nmax_depth = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        let err = RobotConfig::from_toml("strategy = \"guess\"").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn test_missing_file() {
        let path = Path::new("/nonexistent/robot.toml");
        assert!(matches!(
            RobotConfig::load(path),
            Err(ConfigError::FileRead { .. })
        ));
        assert_eq!(RobotConfig::load_or_default(path).unwrap(), RobotConfig::default());
    }
}
