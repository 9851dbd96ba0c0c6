//! Core data types for Skywalker

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Polarity of a membership check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListRule {
    /// Members of the list are excluded
    #[default]
    Blacklist,
    /// Everything outside the list is excluded
    Whitelist,
}

impl ListRule {
    /// Whether an entry with the given membership is excluded under this rule
    pub fn excludes(self, in_list: bool) -> bool {
        match self {
            ListRule::Blacklist => in_list,
            ListRule::Whitelist => !in_list,
        }
    }
}

impl fmt::Display for ListRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListRule::Blacklist => write!(f, "blacklist"),
            ListRule::Whitelist => write!(f, "whitelist"),
        }
    }
}

impl FromStr for ListRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blacklist" | "black" | "exclude" => Ok(ListRule::Blacklist),
            "whitelist" | "white" | "include" => Ok(ListRule::Whitelist),
            other => Err(format!(
                "unknown list rule '{}', expected 'blacklist' or 'whitelist'",
                other
            )),
        }
    }
}

/// Outcome of admitting a directory during traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirVerdict {
    /// Skip the directory and everything beneath it
    Prune,
    /// Descend, but the directory itself is out of scope. It only leads to
    /// whitelisted directories further down.
    PassThrough,
    /// In scope, and so is everything beneath it; no further directory checks needed
    AdmitAndStopChecking,
    /// In scope; descendants are still subject to directory checks
    AdmitAndContinue,
}

impl DirVerdict {
    /// Whether traversal should descend into the directory
    pub fn descends(self) -> bool {
        !matches!(self, DirVerdict::Prune)
    }

    /// Whether the directory itself is in scope
    pub fn admits(self) -> bool {
        matches!(
            self,
            DirVerdict::AdmitAndStopChecking | DirVerdict::AdmitAndContinue
        )
    }
}

/// Outcome of admitting a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileVerdict {
    /// Dispatch the file to the workers
    Include,
    /// Skip the file
    Exclude,
}

impl FileVerdict {
    /// Whether the file is dispatched
    pub fn is_included(self) -> bool {
        self == FileVerdict::Include
    }
}
