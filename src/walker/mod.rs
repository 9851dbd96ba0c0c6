//! Concurrent filtered walk
//!
//! [`Skywalker`] ties the pieces together: it compiles the filters, resolves
//! the root, starts the worker pool, runs the producer on the calling thread
//! and waits for the pool to drain before returning.

pub mod pipeline;
pub mod worker;

pub use pipeline::ProducerStats;
pub use worker::{PoolStats, Worker};

use crate::config::{ListConfig, WalkConfig};
use crate::core::error::{Result, WalkError};
use crate::core::types::ListRule;
use crate::filter::CompiledFilters;
use crossbeam_channel::bounded;
use pipeline::Producer;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use worker::WorkerPool;

/// Walks `root` and calls the worker on every admitted file, and on
/// admitted directories too unless `files_only` is set.
///
/// ```rust,no_run
/// use skywalker::{ListRule, Skywalker};
/// use std::path::Path;
///
/// let walker = Skywalker::new("/srv/data", |path: &Path| println!("{}", path.display()))
///     .workers(8)
///     .directories(ListRule::Whitelist, ["projects", "docs/api"])
///     .extensions(ListRule::Blacklist, [".tmp", ".log"]);
///
/// walker.walk()?;
/// # Ok::<(), skywalker::WalkError>(())
/// ```
pub struct Skywalker {
    config: WalkConfig,
    worker: Arc<dyn Worker>,
}

impl Skywalker {
    /// Create a walker with 20 workers, a queue of 100 paths, files only and
    /// no filtering
    pub fn new<W: Worker + 'static>(root: impl Into<PathBuf>, worker: W) -> Self {
        Self::from_config(WalkConfig::new(root), worker)
    }

    /// Create a walker from a prepared configuration
    pub fn from_config<W: Worker + 'static>(config: WalkConfig, worker: W) -> Self {
        Self::with_shared_worker(config, Arc::new(worker))
    }

    /// Create a walker whose worker is shared with the caller
    pub fn with_shared_worker(config: WalkConfig, worker: Arc<dyn Worker>) -> Self {
        Self { config, worker }
    }

    /// Number of worker threads (0 = one per CPU)
    pub fn workers(mut self, count: usize) -> Self {
        self.config.workers = count;
        self
    }

    /// Capacity of the queue between the traversal and the workers
    pub fn queue_size(mut self, size: usize) -> Self {
        self.config.queue_size = size;
        self
    }

    /// Only dispatch files; directories are used for pruning alone
    pub fn files_only(mut self, files_only: bool) -> Self {
        self.config.files_only = files_only;
        self
    }

    /// Set whether to follow symbolic links
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.config.follow_links = follow;
        self
    }

    /// Set maximum depth for directory traversal
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = Some(depth);
        self
    }

    /// Glob patterns, matched against paths relative to the root (with a
    /// leading separator, e.g. `/src/main.rs`)
    pub fn globs<I, S>(mut self, rule: ListRule, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.globs = ListConfig::new(rule, patterns);
        self
    }

    /// File extensions, each with its leading `.`
    pub fn extensions<I, S>(mut self, rule: ListRule, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.extensions = ListConfig::new(rule, extensions);
        self
    }

    /// Directories relative to the root. Excluded directories are pruned
    /// without visiting their contents.
    pub fn directories<I, S>(mut self, rule: ListRule, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.directories = ListConfig::new(rule, dirs);
        self
    }

    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    /// Walk the tree and block until every queued path has been processed.
    ///
    /// Configuration and root errors are returned before anything is
    /// dispatched. A traversal error stops the walk, but paths queued before
    /// it are still handed to the workers first.
    pub fn walk(&self) -> Result<()> {
        let start = Instant::now();
        let root = resolve_root(&self.config.root)?;
        let filters = CompiledFilters::compile(
            &root,
            &self.config.globs,
            &self.config.extensions,
            &self.config.directories,
        )?;

        let (sender, receiver) = bounded(self.config.queue_size);
        let pool = WorkerPool::spawn(
            self.config.effective_workers(),
            receiver,
            Arc::clone(&self.worker),
        )?;
        debug!(
            root = %root.display(),
            workers = pool.len(),
            queue_size = self.config.queue_size,
            files_only = self.config.files_only,
            "Starting walk"
        );

        let (producer_stats, result) = Producer::new(&filters, &self.config, &sender).run();

        // Closing the queue lets the workers exit once it is empty
        drop(sender);
        let pool_stats = pool.join();

        info!(
            root = %root.display(),
            dispatched = producer_stats.dispatched,
            processed = pool_stats.processed,
            dirs_pruned = producer_stats.dirs_pruned,
            files_excluded = producer_stats.files_excluded,
            panicked = pool_stats.panicked,
            elapsed = ?start.elapsed(),
            "Walk finished"
        );

        result
    }
}

/// Resolve the root to an existing absolute path
fn resolve_root(root: &Path) -> Result<PathBuf> {
    dunce::canonicalize(root).map_err(|e| WalkError::root(root, e))
}
