use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::errors::MixnetError;

const LOG_TARGET: &str = "mixnet::prodpow::pool";

/// A bounded pool of workers for independent, indexed units of work.
///
/// Unit `k` writes only result slot `k`, so the assembled output does not
/// depend on scheduling. With fewer than two threads every unit runs inline
/// on the calling thread.
#[derive(Debug)]
pub struct WorkerPool {
    nthreads: usize,
    pool: Option<ThreadPool>,
}

impl WorkerPool {
    /// A pool of `nthreads` workers.
    pub fn new(nthreads: usize) -> Result<Self, MixnetError> {
        if nthreads < 2 {
            return Ok(Self::single_threaded());
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(nthreads)
            .thread_name(|i| format!("mixnet-worker-{}", i))
            .build()
            .map_err(|e| MixnetError::ThreadPool(e.to_string()))?;
        debug!(target: LOG_TARGET, nthreads, "worker pool started");
        Ok(WorkerPool {
            nthreads,
            pool: Some(pool),
        })
    }

    /// Runs everything on the calling thread.
    pub fn single_threaded() -> Self {
        WorkerPool {
            nthreads: 1,
            pool: None,
        }
    }

    /// Three quarters of the available cores, at least one.
    pub fn default_threads() -> usize {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        (cores * 3 / 4).max(1)
    }

    /// Number of workers.
    pub fn nthreads(&self) -> usize {
        self.nthreads
    }

    /// Evaluates `f(0..n)` and returns the results in index order.
    ///
    /// The first error aborts the run; no partial output is returned.
    pub fn run_indexed<T, F>(&self, n: usize, f: F) -> Result<Vec<T>, MixnetError>
    where
        T: Send,
        F: Fn(usize) -> Result<T, MixnetError> + Sync,
    {
        match &self.pool {
            None => (0..n).map(f).collect(),
            Some(pool) => pool.install(|| (0..n).into_par_iter().map(|k| f(k)).collect()),
        }
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::single_threaded()
    }
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------
