//! Core types and error handling for Skywalker
//!
//! This module contains the list rules, admission verdicts and the
//! error type shared by the filter and walker modules.

pub mod error;
pub mod types;

// Re-export commonly used items
pub use error::{Result, WalkError};
pub use types::{DirVerdict, FileVerdict, ListRule};
