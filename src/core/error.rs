//! Error types for Skywalker

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for walk operations
#[derive(Error, Debug)]
pub enum WalkError {
    /// A glob pattern could not be compiled
    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// Configuration errors
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    /// The root could not be resolved to an existing absolute path
    #[error("Cannot resolve walk root {path}: {source}")]
    Root {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An entry in the tree could not be read or stat'ed
    #[error("Traversal error: {0}")]
    Traversal(#[from] walkdir::Error),

    /// A consumer thread could not be started
    #[error("Failed to spawn worker {id}: {source}")]
    WorkerSpawn {
        id: usize,
        #[source]
        source: std::io::Error,
    },

    /// Every consumer exited before the queue was closed
    #[error("All workers exited before the queue was drained")]
    WorkersExited,
}

impl WalkError {
    /// Create a new configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Create a new invalid glob error
    pub fn invalid_glob(pattern: impl Into<String>, source: glob::PatternError) -> Self {
        Self::InvalidGlob {
            pattern: pattern.into(),
            source,
        }
    }

    /// Create a new root resolution error
    pub fn root(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Root {
            path: path.into(),
            source,
        }
    }

    /// Whether the walk was rejected before traversal because of its configuration
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidGlob { .. } | Self::Configuration { .. })
    }

    /// Whether the root could not be resolved
    pub fn is_root(&self) -> bool {
        matches!(self, Self::Root { .. })
    }

    /// Whether the walk stopped on an unreadable entry
    pub fn is_traversal(&self) -> bool {
        matches!(self, Self::Traversal(_))
    }
}

/// Result type alias for walk operations
pub type Result<T> = std::result::Result<T, WalkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifiers() {
        let glob_err = glob::Pattern::new("[unclosed").unwrap_err();
        let err = WalkError::invalid_glob("[unclosed", glob_err);
        assert!(err.is_configuration());
        assert!(!err.is_root());
        assert!(err.to_string().contains("[unclosed"));

        let err = WalkError::root(
            "/does/not/exist",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.is_root());
        assert!(!err.is_traversal());

        assert!(WalkError::configuration("bad toml").is_configuration());
        assert!(!WalkError::WorkersExited.is_configuration());
    }
}
