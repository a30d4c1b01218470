//! Error handling for the mapflow crates.

use std::fmt;
use thiserror::Error;

/// Pipeline stage a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Map,
    Reduce,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Map => write!(f, "map"),
            Stage::Reduce => write!(f, "reduce"),
        }
    }
}

/// Errors surfaced by the engine itself.
///
/// Failures inside a job's own logic never show up here: a job is expected to
/// log or otherwise handle them. The only job-related variant is
/// [`MapflowError::TaskPanicked`], which aborts the whole run.
#[derive(Error, Debug)]
pub enum MapflowError {
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    #[error("{stage} task for key '{key}' panicked: {message}")]
    TaskPanicked {
        stage: Stage,
        key: String,
        message: String,
    },

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },
}

/// Result type alias for mapflow operations.
pub type Result<T> = std::result::Result<T, MapflowError>;

impl MapflowError {
    /// Create a configuration error with a custom message.
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with a custom message and source error.
    pub fn invalid_config_with_source<S: Into<String>, E: Into<anyhow::Error>>(
        message: S,
        source: E,
    ) -> Self {
        Self::InvalidConfig {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a task fault error for the given stage and key.
    pub fn task_panicked<K: Into<String>, S: Into<String>>(stage: Stage, key: K, message: S) -> Self {
        Self::TaskPanicked {
            stage,
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create an internal error with a custom message and source error.
    pub fn internal_with_source<S: Into<String>, E: Into<anyhow::Error>>(
        message: S,
        source: E,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Whether the error ended a run that had already started.
    pub fn is_run_fault(&self) -> bool {
        matches!(self, Self::TaskPanicked { .. } | Self::Internal { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_task_panicked_display() {
        let err = MapflowError::task_panicked(Stage::Reduce, "cat", "index out of bounds");
        assert_eq!(
            err.to_string(),
            "reduce task for key 'cat' panicked: index out of bounds"
        );
        assert!(err.is_run_fault());
    }

    #[test]
    fn test_invalid_config_with_source() {
        let parse_err = "abc".parse::<usize>().unwrap_err();
        let err = MapflowError::invalid_config_with_source("bad buffer capacity", parse_err);
        assert!(err.to_string().contains("bad buffer capacity"));
        assert!(err.source().is_some());
        assert!(!err.is_run_fault());
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Map.to_string(), "map");
        assert_eq!(Stage::Reduce.to_string(), "reduce");
    }
}
