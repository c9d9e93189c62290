// src/pool/thread_pool.rs

//! Fixed-size pool of long-lived worker threads.

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use tracing::{debug, error, info, trace};

use crate::config::PoolConfig;
use crate::errors::{DagrunError, Result};
use crate::pool::handle::{TaskHandle, capture, completion_pair, panic_message};
use crate::pool::scheduler::{Job, Scheduler};

/// Queue state shared by submitters and workers.
struct QueueState {
    jobs: VecDeque<Job>,
    shutting_down: bool,
}

struct Shared {
    state: Mutex<QueueState>,
    /// Signalled whenever a job is queued or shutdown starts.
    available: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        // Jobs never run while the lock is held, so a poisoned lock still
        // guards a consistent queue.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A fixed set of worker threads pulling jobs from one unbounded FIFO queue.
///
/// - Workers sleep on a condition variable while the queue is empty and
///   re-check the predicate after every wake-up.
/// - A job that fails or panics is contained; the worker carries on with the
///   next job.
/// - [`ThreadPool::shutdown`] rejects new work, lets the workers drain what is
///   already queued, and joins them. Dropping the pool shuts it down too.
pub struct ThreadPool {
    shared: Arc<Shared>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    size: usize,
    name: String,
}

impl std::fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPool")
            .field("name", &self.name)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl ThreadPool {
    /// Start a pool with `size` workers and default thread naming.
    pub fn new(size: usize) -> Result<Self> {
        Self::from_config(&PoolConfig::with_workers(size))
    }

    /// Start a pool as described by `config`.
    pub fn from_config(config: &PoolConfig) -> Result<Self> {
        if config.workers == 0 {
            return Err(DagrunError::ConfigError(
                "thread pool needs at least one worker".to_string(),
            ));
        }

        let shared = Arc::new(Shared {
            state: Mutex::new(QueueState {
                jobs: VecDeque::new(),
                shutting_down: false,
            }),
            available: Condvar::new(),
        });

        let pool = Self {
            shared,
            workers: Mutex::new(Vec::with_capacity(config.workers)),
            size: config.workers,
            name: config.thread_name.clone(),
        };

        for index in 0..config.workers {
            let shared = Arc::clone(&pool.shared);
            let spawned = thread::Builder::new()
                .name(format!("{}-{}", config.thread_name, index))
                .spawn(move || worker_loop(index, shared));

            match spawned {
                Ok(handle) => pool.lock_workers().push(handle),
                Err(err) => {
                    // Dropping `pool` stops and joins the workers started so far.
                    error!(index, error = %err, "failed to spawn worker thread");
                    return Err(err.into());
                }
            }
        }

        info!(name = %pool.name, workers = pool.size, "thread pool started");
        Ok(pool)
    }

    /// Number of worker threads.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Jobs waiting in the queue (not counting the ones currently running).
    pub fn queued(&self) -> usize {
        self.shared.lock().jobs.len()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shared.lock().shutting_down
    }

    /// Submit a closure and get a handle to its outcome.
    ///
    /// Errors returned by `f` surface as [`DagrunError::TaskFailed`], panics
    /// as [`DagrunError::TaskPanicked`]; neither affects the worker.
    pub fn submit<T, F>(&self, f: F) -> Result<TaskHandle<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    {
        let (completer, handle) = completion_pair();
        self.schedule(Box::new(move || completer.complete(capture(f))))?;
        Ok(handle)
    }

    /// Stop accepting work, let queued jobs finish, and join every worker.
    ///
    /// Safe to call more than once and from any thread. When called from one
    /// of this pool's own workers, that worker is not joined (it exits once
    /// its current job returns).
    pub fn shutdown(&self) {
        {
            let mut state = self.shared.lock();
            if !state.shutting_down {
                state.shutting_down = true;
                debug!(name = %self.name, queued = state.jobs.len(), "thread pool shutting down");
            }
        }
        self.shared.available.notify_all();

        let handles: Vec<JoinHandle<()>> = self.lock_workers().drain(..).collect();
        if handles.is_empty() {
            return;
        }

        let current = thread::current().id();
        for handle in handles {
            if handle.thread().id() == current {
                continue;
            }
            if handle.join().is_err() {
                error!(name = %self.name, "worker thread terminated abnormally");
            }
        }

        info!(name = %self.name, "thread pool stopped");
    }

    fn lock_workers(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.workers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for ThreadPool {
    fn schedule(&self, job: Job) -> Result<()> {
        {
            let mut state = self.shared.lock();
            if state.shutting_down {
                return Err(DagrunError::PoolShutdown);
            }
            state.jobs.push_back(job);
            trace!(queued = state.jobs.len(), "job queued");
        }
        self.shared.available.notify_one();
        Ok(())
    }

    fn parallelism(&self) -> usize {
        self.size
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Body of every worker thread: wait, dequeue one job, run it, repeat.
///
/// Exits once shutdown has started and the queue is empty.
fn worker_loop(index: usize, shared: Arc<Shared>) {
    debug!(worker = index, "worker started");

    loop {
        let job = {
            let state = shared.lock();
            let mut state = shared
                .available
                .wait_while(state, |s| s.jobs.is_empty() && !s.shutting_down)
                .unwrap_or_else(PoisonError::into_inner);

            match state.jobs.pop_front() {
                Some(job) => job,
                None => break,
            }
        };

        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
            error!(
                worker = index,
                panic = %panic_message(payload.as_ref()),
                "job panicked; worker continues"
            );
        }
    }

    debug!(worker = index, "worker exiting");
}
