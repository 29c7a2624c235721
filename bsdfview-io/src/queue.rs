//! Background dataset loading.
//!
//! Files are parsed on a rayon pool; each finished load is posted to a
//! channel that the owner drains from its own thread (typically once per
//! UI frame). Every dispatched path produces exactly one [`LoadResult`],
//! successful or not.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::dataset::Dataset;
use crate::{Error, Result};

/// Configuration for the loader pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadQueueConfig {
    /// Worker threads; 0 lets rayon choose.
    pub num_threads: usize,
}

impl LoadQueueConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of worker threads.
    #[must_use]
    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }
}

/// Outcome of one background load.
#[derive(Debug)]
pub struct LoadResult {
    /// File that was loaded.
    pub path: PathBuf,
    /// The dataset, or why it could not be loaded.
    pub outcome: Result<Dataset>,
}

impl LoadResult {
    /// User-facing message for a failed load, `None` on success.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.outcome.as_ref().err().map(|err| {
            format!(
                "Could not open dataset \"{}\" : {err}",
                self.path.display()
            )
        })
    }
}

/// Worker pool plus result queue for concurrent dataset loads.
pub struct LoadQueue {
    pool: ThreadPool,
    tx: Sender<LoadResult>,
    rx: Receiver<LoadResult>,
    pending: usize,
}

impl LoadQueue {
    /// Creates a queue with its own worker pool.
    ///
    /// # Errors
    /// Returns [`Error::ThreadPool`] if the pool cannot be created.
    pub fn new(config: LoadQueueConfig) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.num_threads)
            .thread_name(|i| format!("bsdfview-load-{i}"))
            .build()?;
        let (tx, rx) = channel();
        Ok(Self {
            pool,
            tx,
            rx,
            pending: 0,
        })
    }

    /// Dispatches one load task per path and returns immediately.
    pub fn open_files<I, P>(&mut self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.open_files_with(paths, |path| Dataset::open(path));
    }

    /// Like [`LoadQueue::open_files`] with a custom loader.
    ///
    /// A panic inside `load` is caught and delivered as
    /// [`Error::LoaderPanic`], so every path still yields exactly
    /// one result.
    pub fn open_files_with<I, P, F>(&mut self, paths: I, load: F)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
        F: Fn(&Path) -> Result<Dataset> + Send + Sync + 'static,
    {
        let load = Arc::new(load);
        for path in paths {
            let path = path.as_ref().to_path_buf();
            let tx = self.tx.clone();
            let load = Arc::clone(&load);
            self.pending += 1;
            self.pool.spawn(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| load(&path)))
                    .unwrap_or_else(|payload| Err(Error::LoaderPanic(panic_message(&*payload))));
                if let Err(err) = &outcome {
                    log::error!("failed to load {}: {err}", path.display());
                }
                // Fails only if the queue was dropped.
                let _ = tx.send(LoadResult { path, outcome });
            });
        }
    }

    /// Returns a finished load if one is ready, without blocking.
    pub fn try_next(&mut self) -> Option<LoadResult> {
        let result = self.rx.try_recv().ok()?;
        self.pending -= 1;
        Some(result)
    }

    /// Collects every load finished so far.
    pub fn drain(&mut self) -> Vec<LoadResult> {
        let mut results = Vec::new();
        while let Some(result) = self.try_next() {
            results.push(result);
        }
        results
    }

    /// Waits for the next load; `None` once nothing is pending.
    pub fn recv_blocking(&mut self) -> Option<LoadResult> {
        if self.pending == 0 {
            return None;
        }
        let result = self.rx.recv().ok()?;
        self.pending -= 1;
        Some(result)
    }

    /// Loads dispatched but not yet received.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl std::fmt::Debug for LoadQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadQueue")
            .field("threads", &self.pool.current_num_threads())
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}
