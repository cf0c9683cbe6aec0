//! Single-flight memoization of the pipeline.
//!
//! The first caller of [`PipelineCache::get_or_compute`] runs the pipeline
//! outside the slot lock; callers that arrive while that attempt is in flight
//! park on a condition variable and receive its outcome, success or failure.
//! A failure is shared with those waiters but never stored as the answer: the
//! next caller to arrive after a failed attempt has finished starts a new run.
//! Nothing ever evicts a stored result.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::pipeline::{PipelineOutput, run_pipeline};
use ames_data::DatasetSource;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// Outcome of a cached pipeline call.
pub type CacheResult = Result<Arc<PipelineOutput>, Arc<PipelineError>>;

#[derive(Debug, Default)]
struct Slot {
    output: Option<Arc<PipelineOutput>>,
    /// Error of the most recent finished attempt, if it failed
    failure: Option<Arc<PipelineError>>,
    running: bool,
    /// Attempts finished so far
    finished: u64,
}

/// Process-lifetime cache of one pipeline run.
#[derive(Debug)]
pub struct PipelineCache<S> {
    source: S,
    config: PipelineConfig,
    slot: Mutex<Slot>,
    done: Condvar,
    runs: AtomicUsize,
}

impl<S: DatasetSource> PipelineCache<S> {
    /// Create an empty cache over `source`.
    pub fn new(source: S, config: PipelineConfig) -> Self {
        Self {
            source,
            config,
            slot: Mutex::new(Slot::default()),
            done: Condvar::new(),
            runs: AtomicUsize::new(0),
        }
    }

    /// The cached output, computing it on first use.
    ///
    /// # Errors
    /// The stage error of the attempt this call ran or waited on. The failure
    /// is not cached.
    pub fn get_or_compute(&self) -> CacheResult {
        let mut slot = self.lock();
        loop {
            if let Some(output) = &slot.output {
                debug!(dataset = self.source.name(), "pipeline cache hit");
                return Ok(Arc::clone(output));
            }
            if !slot.running {
                break;
            }

            let attempt = slot.finished;
            slot = self
                .done
                .wait_while(slot, |s| s.finished == attempt)
                .unwrap_or_else(PoisonError::into_inner);
            match (&slot.output, &slot.failure) {
                (Some(output), _) => return Ok(Arc::clone(output)),
                (None, Some(e)) => return Err(Arc::clone(e)),
                // the leader panicked; take over
                (None, None) => {}
            }
        }

        debug!(dataset = self.source.name(), "pipeline cache miss");
        slot.running = true;
        drop(slot);

        let attempt = Attempt { cache: self };
        self.runs.fetch_add(1, Ordering::SeqCst);
        let result = run_pipeline(&self.source, &self.config);
        attempt.finish(result)
    }

    /// The cached output, if a run has completed.
    pub fn get(&self) -> Option<Arc<PipelineOutput>> {
        self.lock().output.clone()
    }

    /// Number of pipeline runs started, failed ones included.
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    /// Configuration the cache runs with.
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        // the pipeline never runs under the lock, so a poisoned slot is
        // still consistent
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// An in-flight run. Dropping it without [`Attempt::finish`] (a panicking
/// stage) still wakes the waiters.
struct Attempt<'a, S: DatasetSource> {
    cache: &'a PipelineCache<S>,
}

impl<S: DatasetSource> Attempt<'_, S> {
    fn finish(self, result: Result<PipelineOutput, PipelineError>) -> CacheResult {
        let mut slot = self.cache.lock();
        let outcome = match result {
            Ok(output) => {
                let output = Arc::new(output);
                slot.output = Some(Arc::clone(&output));
                slot.failure = None;
                Ok(output)
            }
            Err(e) => {
                warn!(dataset = self.cache.source.name(), error = %e, "pipeline run failed");
                let e = Arc::new(e);
                slot.failure = Some(Arc::clone(&e));
                Err(e)
            }
        };
        slot.running = false;
        slot.finished += 1;
        self.cache.done.notify_all();
        outcome
    }
}

impl<S: DatasetSource> Drop for Attempt<'_, S> {
    fn drop(&mut self) {
        let mut slot = self.cache.lock();
        if slot.running {
            slot.running = false;
            slot.failure = None;
            slot.finished += 1;
            self.cache.done.notify_all();
        }
    }
}
