use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use crate::engine::item::Item;
use crate::engine::item_list::ItemList;

/// Performs one clone. Ordinary failures (missing repository, network) are
/// reported as `false`, never as a panic or error value.
pub trait CloneExecutor: Send + Sync {
    fn clone_repo(&self, identifier: &str, destination: &Path) -> bool;
}

/// Counting gate that caps how many executor calls run at once.
pub struct CloneLimiter {
    available: Mutex<usize>,
    released: Condvar,
}

pub struct Permit<'a> {
    limiter: &'a CloneLimiter,
}

impl CloneLimiter {
    pub fn new(permits: usize) -> Self {
        Self {
            available: Mutex::new(permits),
            released: Condvar::new(),
        }
    }

    pub fn acquire(&self) -> Permit<'_> {
        let mut available = self.available.lock().unwrap_or_else(PoisonError::into_inner);
        while *available == 0 {
            available = self
                .released
                .wait(available)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *available -= 1;
        Permit { limiter: self }
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        let mut available = self
            .limiter
            .available
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *available += 1;
        self.limiter.released.notify_one();
    }
}

pub struct CloneOrchestrator {
    executor: Arc<dyn CloneExecutor>,
    projects_root: PathBuf,
    limiter: Option<Arc<CloneLimiter>>,
    workers: Vec<JoinHandle<()>>,
}

impl CloneOrchestrator {
    pub fn new(executor: Arc<dyn CloneExecutor>, projects_root: impl Into<PathBuf>) -> Self {
        Self {
            executor,
            projects_root: projects_root.into(),
            limiter: None,
            workers: Vec::new(),
        }
    }

    /// `None` (or zero) keeps fan-out unbounded: one worker per selected item,
    /// all running at once.
    pub fn with_max_concurrent(mut self, max: Option<usize>) -> Self {
        self.limiter = max
            .filter(|&n| n > 0)
            .map(|n| Arc::new(CloneLimiter::new(n)));
        self
    }

    pub fn destination_for(&self, identifier: &str) -> PathBuf {
        self.projects_root.join(identifier)
    }

    /// Launches one worker for every selected item and returns how many were
    /// launched. An item is only handed to a worker after this call wins its
    /// Selected -> Cloning transition, so overlapping calls never clone the
    /// same item twice.
    pub fn start(&mut self, list: &ItemList) -> usize {
        self.reap();
        let mut launched = 0;
        for item in list.items() {
            if !item.begin_clone() {
                continue;
            }
            match self.spawn_worker(item.clone()) {
                Ok(handle) => {
                    self.workers.push(handle);
                    launched += 1;
                }
                Err(err) => {
                    warn!(repo = item.identifier(), error = %err, "failed to spawn clone worker");
                    item.finish(false);
                }
            }
        }
        if launched > 0 {
            info!(launched, in_flight = self.workers.len(), "started clone workers");
        }
        launched
    }

    /// Number of workers that have not finished yet.
    pub fn in_flight(&mut self) -> usize {
        self.reap();
        self.workers.len()
    }

    pub fn join_all(&mut self) {
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }

    fn reap(&mut self) {
        self.workers.retain(|handle| !handle.is_finished());
    }

    fn spawn_worker(&self, item: Item) -> io::Result<JoinHandle<()>> {
        let executor = Arc::clone(&self.executor);
        let limiter = self.limiter.clone();
        let destination = self.destination_for(item.identifier());
        thread::Builder::new()
            .name(format!("clone-{}", item.identifier()))
            .spawn(move || run_worker(&item, executor.as_ref(), &destination, limiter.as_deref()))
    }
}

fn run_worker(
    item: &Item,
    executor: &dyn CloneExecutor,
    destination: &Path,
    limiter: Option<&CloneLimiter>,
) {
    let _permit = limiter.map(CloneLimiter::acquire);
    debug!(repo = item.identifier(), destination = %destination.display(), "clone started");

    let success = panic::catch_unwind(AssertUnwindSafe(|| {
        executor.clone_repo(item.identifier(), destination)
    }))
    .unwrap_or(false);

    item.finish(success);
    if success {
        info!(repo = item.identifier(), "clone finished");
    } else {
        warn!(repo = item.identifier(), "clone failed");
    }
}
