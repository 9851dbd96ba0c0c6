//! Walk configuration for Skywalker
//!
//! This module holds the serializable walk settings, loadable from a TOML
//! file or built in code.

pub mod walk_config;

// Re-export commonly used items
pub use walk_config::{ListConfig, WalkConfig, DEFAULT_QUEUE_SIZE, DEFAULT_WORKERS};
