//! Consumer side of the walk
//!
//! A fixed pool of threads, all started before traversal begins. Each one
//! pulls admitted paths off the shared bounded queue and hands them to the
//! [`Worker`] until the queue is closed and drained.

use crate::core::error::{Result, WalkError};
use crossbeam_channel::Receiver;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{error, trace, warn};

/// Anything that knows what to do with an admitted path.
///
/// Called synchronously from one of the pool threads; it may block. Its
/// outcome is not reported back to the walk.
pub trait Worker: Send + Sync {
    fn work(&self, path: &Path);
}

impl<F> Worker for F
where
    F: Fn(&Path) + Send + Sync,
{
    fn work(&self, path: &Path) {
        self(path)
    }
}

/// Totals reported by the pool once every thread has exited
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Paths handed to the worker
    pub processed: u64,
    /// Worker calls that panicked
    pub panicked: u64,
}

/// Running consumer threads
pub(crate) struct WorkerPool {
    handles: Vec<(usize, JoinHandle<PoolStats>)>,
}

impl WorkerPool {
    /// Start `count` consumers on `queue`.
    ///
    /// If a thread fails to start, the ones already running exit as soon as
    /// the caller drops the sending side.
    pub fn spawn(count: usize, queue: Receiver<PathBuf>, worker: Arc<dyn Worker>) -> Result<Self> {
        let mut handles = Vec::with_capacity(count);

        for id in 0..count {
            let queue = queue.clone();
            let worker = Arc::clone(&worker);

            let handle = thread::Builder::new()
                .name(format!("skywalker-{}", id))
                .spawn(move || consume(id, queue, worker))
                .map_err(|source| WalkError::WorkerSpawn { id, source })?;

            handles.push((id, handle));
        }

        Ok(Self { handles })
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Wait for every consumer to drain the queue and exit
    pub fn join(self) -> PoolStats {
        let mut total = PoolStats::default();

        for (id, handle) in self.handles {
            match handle.join() {
                Ok(stats) => {
                    total.processed += stats.processed;
                    total.panicked += stats.panicked;
                }
                Err(_) => error!(worker = id, "Worker thread terminated abnormally"),
            }
        }

        total
    }
}

fn consume(id: usize, queue: Receiver<PathBuf>, worker: Arc<dyn Worker>) -> PoolStats {
    let mut stats = PoolStats::default();

    // Ends once the producer has dropped its sender and the queue is empty
    for path in queue.iter() {
        trace!(worker = id, path = %path.display(), "Processing path");

        if panic::catch_unwind(AssertUnwindSafe(|| worker.work(&path))).is_err() {
            warn!(worker = id, path = %path.display(), "Worker panicked on path");
            stats.panicked += 1;
        }
        stats.processed += 1;
    }

    stats
}
