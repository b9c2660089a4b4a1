//! Error taxonomy.
//!
//! - Fatal invariant violations (`IllegalTransition`, `DigestMismatch`,
//!   `BoardMismatch`, `CannotUnexecute`, `RobotPanicked`) abort the current
//!   operation and are never retried.
//! - Version mismatches (`UnsupportedRevision`) are reported instead of
//!   reinterpreting old records under new rules.
//! - Expected absence (no legal move, no search result) is not an error at
//!   all; those paths return `Option`.

use std::path::PathBuf;

use thiserror::Error;

/// Problems turning a wire string into a move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveParseError {
    #[error("empty move string")]
    Empty,

    #[error("unknown opcode '{0}'")]
    UnknownOpcode(String),

    #[error("opcode '{op}' is missing its {operand} operand")]
    MissingOperand { op: String, operand: &'static str },

    #[error("bad {operand} operand '{token}' for opcode '{op}'")]
    BadOperand {
        op: String,
        operand: &'static str,
        token: String,
    },

    #[error("unexpected trailing token '{0}'")]
    Trailing(String),
}

/// Engine-level failures.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{op} is not legal in state {state}")]
    IllegalTransition { op: String, state: String },

    #[error("digest mismatch: expected {expected:#018x}, found {actual:#018x}")]
    DigestMismatch { expected: u64, actual: u64 },

    #[error("board mismatch: {0}")]
    BoardMismatch(String),

    #[error("cannot unexecute {0}")]
    CannotUnexecute(String),

    #[error("robot worker panicked: {0}")]
    RobotPanicked(String),

    #[error("no cell at {0}")]
    NoSuchCell(String),

    #[error("unknown variation '{0}'")]
    UnknownVariation(String),

    #[error("malformed init string '{0}'")]
    MalformedInit(String),

    #[error("rules revision {revision} is not supported (supported {min}..={max})")]
    UnsupportedRevision { revision: u32, min: u32, max: u32 },

    #[error("move parse error: {0}")]
    Parse(#[from] MoveParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("record codec error: {0}")]
    Codec(#[from] bincode::Error),
}

impl EngineError {
    /// True for invariant violations that indicate a logic defect.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EngineError::IllegalTransition { .. }
                | EngineError::DigestMismatch { .. }
                | EngineError::BoardMismatch(_)
                | EngineError::CannotUnexecute(_)
                | EngineError::RobotPanicked(_)
        )
    }

    pub(crate) fn illegal(op: impl std::fmt::Debug, state: impl std::fmt::Debug) -> Self {
        EngineError::IllegalTransition {
            op: format!("{op:?}"),
            state: format!("{state:?}"),
        }
    }
}

/// Result alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur when loading robot configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let e = MoveParseError::BadOperand {
            op: "dropb".into(),
            operand: "row",
            token: "x".into(),
        };
        assert_eq!(e.to_string(), "bad row operand 'x' for opcode 'dropb'");
    }

    #[test]
    fn test_parse_error_converts() {
        let e: EngineError = MoveParseError::UnknownOpcode("zap".into()).into();
        assert!(matches!(e, EngineError::Parse(_)));
        assert!(!e.is_fatal());
    }

    #[test]
    fn test_fatal_classification() {
        assert!(EngineError::illegal("Done", "Puzzle").is_fatal());
        assert!(EngineError::DigestMismatch { expected: 1, actual: 2 }.is_fatal());
        assert!(EngineError::RobotPanicked("boom".into()).is_fatal());
        assert!(!EngineError::UnknownVariation("x".into()).is_fatal());
        assert!(!EngineError::UnsupportedRevision { revision: 7, min: 100, max: 101 }.is_fatal());
    }

    #[test]
    fn test_digest_mismatch_display() {
        let e = EngineError::DigestMismatch { expected: 0xff, actual: 0x1 };
        assert_eq!(
            e.to_string(),
            "digest mismatch: expected 0x00000000000000ff, found 0x0000000000000001"
        );
    }

    #[test]
    fn test_config_validation_display() {
        let e = ConfigError::Validation("depth must be > 0".into());
        assert_eq!(e.to_string(), "invalid config: depth must be > 0");
    }
}
