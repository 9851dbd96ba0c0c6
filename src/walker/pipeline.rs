//! Producer side of the walk
//!
//! A single thread traverses the tree top-down in lexical order, consults the
//! compiled filters for every entry and pushes admitted paths onto the bounded
//! queue. Sending blocks while the queue is full.

use crate::config::WalkConfig;
use crate::core::error::{Result, WalkError};
use crate::core::types::DirVerdict;
use crate::filter::CompiledFilters;
use crossbeam_channel::Sender;
use std::path::PathBuf;
use tracing::{debug, trace, warn};
use walkdir::{DirEntry, WalkDir};

/// What the traversal does after visiting an entry
#[derive(Debug)]
pub(crate) enum Visit {
    Continue,
    /// Do not descend into the directory just visited
    SkipSubtree,
    /// Stop traversing and report the error
    Abort(WalkError),
}

/// Counters kept by the producer
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProducerStats {
    pub dirs_visited: u64,
    pub dirs_pruned: u64,
    pub files_visited: u64,
    pub files_excluded: u64,
    pub dispatched: u64,
}

/// Depth of the shallowest enclosing directory that matched a listed
/// whitelist entry. Entries below it skip the directory rule entirely.
#[derive(Debug, Default)]
struct AdmittedScope {
    depth: Option<usize>,
}

impl AdmittedScope {
    /// Leave the scope once traversal is back at or above its depth
    fn enter(&mut self, depth: usize) -> bool {
        if matches!(self.depth, Some(scope) if depth <= scope) {
            self.depth = None;
        }
        self.depth.is_some()
    }
}

pub(crate) struct Producer<'a> {
    filters: &'a CompiledFilters,
    files_only: bool,
    follow_links: bool,
    max_depth: Option<usize>,
    queue: &'a Sender<PathBuf>,
    scope: AdmittedScope,
    stats: ProducerStats,
}

impl<'a> Producer<'a> {
    pub fn new(filters: &'a CompiledFilters, config: &WalkConfig, queue: &'a Sender<PathBuf>) -> Self {
        Self {
            filters,
            files_only: config.files_only,
            follow_links: config.follow_links,
            max_depth: config.max_depth,
            queue,
            scope: AdmittedScope::default(),
            stats: ProducerStats::default(),
        }
    }

    /// Traverse the whole tree. Returns the first traversal error; paths
    /// already queued stay queued.
    pub fn run(mut self) -> (ProducerStats, Result<()>) {
        let mut walker = WalkDir::new(self.filters.root())
            .follow_links(self.follow_links)
            .sort_by_file_name();
        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }

        let mut entries = walker.into_iter();
        while let Some(entry) = entries.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(
                        path = ?err.path().map(|p| p.display().to_string()),
                        error = %err,
                        "Traversal stopped"
                    );
                    return (self.stats, Err(WalkError::Traversal(err)));
                }
            };

            match self.visit(&entry) {
                Visit::Continue => {}
                Visit::SkipSubtree => entries.skip_current_dir(),
                Visit::Abort(err) => return (self.stats, Err(err)),
            }
        }

        (self.stats, Ok(()))
    }

    fn visit(&mut self, entry: &DirEntry) -> Visit {
        let path = entry.path();
        let in_scope = self.scope.enter(entry.depth());

        if entry.file_type().is_dir() {
            self.stats.dirs_visited += 1;

            let verdict = if in_scope {
                DirVerdict::AdmitAndContinue
            } else {
                self.filters.check_dir(path)
            };

            match verdict {
                DirVerdict::Prune => {
                    debug!(path = %path.display(), "Pruning directory");
                    self.stats.dirs_pruned += 1;
                    return Visit::SkipSubtree;
                }
                DirVerdict::AdmitAndStopChecking => self.scope.depth = Some(entry.depth()),
                DirVerdict::PassThrough | DirVerdict::AdmitAndContinue => {}
            }

            if self.files_only || !verdict.admits() || self.filters.glob_excludes(path) {
                return Visit::Continue;
            }
        } else {
            self.stats.files_visited += 1;

            let verdict = if in_scope {
                self.filters.check_file_in_scope(path)
            } else {
                self.filters.check_file(path)
            };

            if !verdict.is_included() {
                self.stats.files_excluded += 1;
                return Visit::Continue;
            }
        }

        self.dispatch(path.to_path_buf())
    }

    fn dispatch(&mut self, path: PathBuf) -> Visit {
        trace!(path = %path.display(), "Queueing path");
        match self.queue.send(path) {
            Ok(()) => {
                self.stats.dispatched += 1;
                Visit::Continue
            }
            Err(_) => Visit::Abort(WalkError::WorkersExited),
        }
    }
}
