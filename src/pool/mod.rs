// src/pool/mod.rs

//! Worker pool and the scheduler abstraction on top of it.
//!
//! - [`scheduler`] defines the `Scheduler` trait the DAG executor submits to.
//! - [`thread_pool`] is the fixed-size, condvar-driven `ThreadPool`.
//! - [`handle`] provides `TaskHandle` and the error/panic capture used for
//!   every unit of work.

pub mod handle;
pub mod scheduler;
pub mod thread_pool;

pub use handle::{Completer, TaskHandle, capture, completion_pair};
pub use scheduler::{Job, Scheduler};
pub use thread_pool::ThreadPool;
