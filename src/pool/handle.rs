// src/pool/handle.rs

//! Completion handles for submitted work.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tokio::sync::oneshot;

use crate::errors::{DagrunError, Result};

/// Receiving side of a unit's outcome.
///
/// Await it with [`TaskHandle::join`] from async code (no worker thread is
/// blocked), or call [`TaskHandle::wait`] from a plain thread.
#[derive(Debug)]
pub struct TaskHandle<T> {
    rx: oneshot::Receiver<Result<T>>,
}

/// Producing side of a [`TaskHandle`]. Dropping it without completing makes
/// the handle resolve to [`DagrunError::ResultLost`].
#[derive(Debug)]
pub struct Completer<T> {
    tx: oneshot::Sender<Result<T>>,
}

/// Create a connected completer/handle pair.
pub fn completion_pair<T>() -> (Completer<T>, TaskHandle<T>) {
    let (tx, rx) = oneshot::channel();
    (Completer { tx }, TaskHandle { rx })
}

impl<T> Completer<T> {
    /// Deliver the outcome. A dropped handle just means nobody is listening.
    pub fn complete(self, outcome: Result<T>) {
        let _ = self.tx.send(outcome);
    }
}

impl<T> TaskHandle<T> {
    /// Wait asynchronously for the outcome.
    pub async fn join(self) -> Result<T> {
        self.rx.await.unwrap_or(Err(DagrunError::ResultLost))
    }

    /// Block the current thread until the outcome is available.
    ///
    /// Must not be called from a pool worker whose own queue feeds this
    /// handle. Use [`TaskHandle::join`] from async code.
    ///
    /// # Panics
    ///
    /// Panics if called from within a tokio runtime.
    pub fn wait(self) -> Result<T> {
        debug_assert!(
            tokio::runtime::Handle::try_current().is_err(),
            "TaskHandle::wait called inside a tokio runtime; use `join().await` instead"
        );
        self.rx.blocking_recv().unwrap_or(Err(DagrunError::ResultLost))
    }

    /// Non-blocking check. Returns `None` while the unit is still pending.
    pub fn try_take(&mut self) -> Option<Result<T>> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(DagrunError::ResultLost)),
        }
    }
}

/// Run `f`, turning both a returned error and a panic into a [`DagrunError`].
pub fn capture<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> anyhow::Result<T>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(DagrunError::TaskFailed(err)),
        Err(payload) => Err(DagrunError::TaskPanicked(panic_message(payload.as_ref()))),
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
