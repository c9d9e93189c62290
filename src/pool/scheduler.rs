// src/pool/scheduler.rs

//! Pluggable task-execution abstraction.
//!
//! The DAG executor talks to a `Scheduler` instead of owning threads. The
//! production implementation is [`crate::pool::ThreadPool`]; tests can wrap
//! it (for example to record what was scheduled) without touching the
//! executor.

use crate::errors::Result;

/// A unit of work as the scheduler sees it.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Something that can run jobs, possibly concurrently.
pub trait Scheduler: Send + Sync + 'static {
    /// Queue `job` for execution.
    ///
    /// Must be callable concurrently, including from inside a running job.
    /// Fails with [`crate::errors::DagrunError::PoolShutdown`] once the
    /// scheduler stopped accepting work; the job is dropped in that case.
    fn schedule(&self, job: Job) -> Result<()>;

    /// Number of jobs that may run at the same time.
    fn parallelism(&self) -> usize;
}
