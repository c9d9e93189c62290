use std::sync::{Arc, Mutex};

use dagrun::errors::Result;
use dagrun::pool::{Job, Scheduler};

/// A scheduler wrapper that counts every scheduled job and forwards it to
/// the inner scheduler.
pub struct RecordingScheduler<S: Scheduler> {
    inner: S,
    scheduled: Arc<Mutex<usize>>,
}

impl<S: Scheduler> RecordingScheduler<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            scheduled: Arc::new(Mutex::new(0)),
        }
    }

    /// Jobs accepted by the inner scheduler so far.
    pub fn scheduled(&self) -> usize {
        *self.scheduled.lock().unwrap()
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: Scheduler> Scheduler for RecordingScheduler<S> {
    fn schedule(&self, job: Job) -> Result<()> {
        // Count first: the job may finish before `schedule` returns.
        *self.scheduled.lock().unwrap() += 1;
        let result = self.inner.schedule(job);
        if result.is_err() {
            *self.scheduled.lock().unwrap() -= 1;
        }
        result
    }

    fn parallelism(&self) -> usize {
        self.inner.parallelism()
    }
}

/// A scheduler that runs each job on a fresh OS thread. Unbounded
/// parallelism; useful to shake out ordering bugs that a small pool hides.
#[derive(Debug, Default)]
pub struct ThreadPerJobScheduler;

impl Scheduler for ThreadPerJobScheduler {
    fn schedule(&self, job: Job) -> Result<()> {
        std::thread::spawn(job);
        Ok(())
    }

    fn parallelism(&self) -> usize {
        usize::MAX
    }
}
