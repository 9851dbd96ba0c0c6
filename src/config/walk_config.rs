//! Walk configuration
//!
//! A walk can be configured programmatically through [`crate::Skywalker`]'s
//! builder methods or loaded from a TOML file:
//!
//! ```toml
//! root = "/srv/data"
//! workers = 8
//! files_only = true
//!
//! [directories]
//! rule = "whitelist"
//! entries = ["src", "docs/api"]
//!
//! [extensions]
//! rule = "blacklist"
//! entries = [".log", ".tmp"]
//! ```

use crate::core::error::{Result, WalkError};
use crate::core::types::ListRule;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default number of consumer threads
pub const DEFAULT_WORKERS: usize = 20;

/// Default capacity of the path queue between the walker and the workers
pub const DEFAULT_QUEUE_SIZE: usize = 100;

/// A raw filter list together with its polarity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Whether listed entries are excluded or are the only ones included
    pub rule: ListRule,
    /// Directory fragments, extensions (with their leading `.`) or glob patterns
    pub entries: Vec<String>,
}

impl ListConfig {
    pub fn new<I, S>(rule: ListRule, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rule,
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything a walk needs except the worker itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    /// Where the walk starts; resolved to an absolute path before traversal
    pub root: PathBuf,
    /// Number of worker threads (0 = auto-detect)
    pub workers: usize,
    /// How many admitted paths may wait for a worker
    pub queue_size: usize,
    /// Only dispatch files; directories are used for pruning alone
    pub files_only: bool,
    /// Follow symbolic links while traversing
    pub follow_links: bool,
    /// Maximum depth below the root (None = unlimited)
    pub max_depth: Option<usize>,
    /// Glob patterns tested against root-relative paths
    pub globs: ListConfig,
    /// File extensions
    pub extensions: ListConfig,
    /// Directories relative to the root
    pub directories: ListConfig,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            workers: DEFAULT_WORKERS,
            queue_size: DEFAULT_QUEUE_SIZE,
            files_only: true,
            follow_links: false,
            max_depth: None,
            globs: ListConfig::default(),
            extensions: ListConfig::default(),
            directories: ListConfig::default(),
        }
    }
}

impl WalkConfig {
    /// Create a configuration with defaults for the given root
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            WalkError::configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| WalkError::configuration(format!("Failed to parse walk config: {}", e)))
    }

    /// Serialize configuration to TOML text
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| WalkError::configuration(format!("Failed to serialize config: {}", e)))
    }

    /// Worker count with auto-detection applied
    pub fn effective_workers(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get().max(1)
        } else {
            self.workers
        }
    }
}
