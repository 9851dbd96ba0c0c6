//! Skywalker - concurrent filtered directory walking
//!
//! Skywalker walks a directory tree on one thread and hands every path that
//! passes its filters to a fixed pool of worker threads through a bounded
//! queue. Three independent rules decide what is in scope:
//!
//! - **Directories**: a whitelist or blacklist of directories relative to the
//!   root. Excluded subtrees are pruned without being read.
//! - **Extensions**: a whitelist or blacklist of file extensions, dot included.
//! - **Globs**: a whitelist or blacklist of patterns matched against the
//!   root-relative path.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use skywalker::{ListRule, Skywalker};
//! use std::path::Path;
//!
//! let walker = Skywalker::new("./my-project", |path: &Path| {
//!     println!("{}", path.display());
//! })
//! .directories(ListRule::Blacklist, ["target", ".git"])
//! .globs(ListRule::Whitelist, ["*.rs"]);
//!
//! walker.walk()?;
//! # Ok::<(), skywalker::WalkError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod filter;
pub mod walker;

// Re-export commonly used types
pub use crate::core::{
    error::{Result, WalkError},
    types::{DirVerdict, FileVerdict, ListRule},
};

pub use config::{ListConfig, WalkConfig};

pub use filter::CompiledFilters;

pub use walker::{Skywalker, Worker};

/// Current version of Skywalker
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
