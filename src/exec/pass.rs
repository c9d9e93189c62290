// src/exec/pass.rs

//! Shared state of one execution pass over an action graph.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::dag::VertexId;
use crate::errors::{DagrunError, Result};
use crate::exec::action::ActionGraph;
use crate::pool::{Completer, Scheduler, capture};

/// One pass: the caller's graph, the shrinking predecessor graph, and the
/// bookkeeping needed to report a single aggregate outcome.
pub(crate) struct Pass<S: Scheduler> {
    pass_id: u64,
    scheduler: Arc<S>,
    /// Original graph; successor lists drive dependent release.
    graph: ActionGraph,
    /// Transposed graph. `remaining.successors(v)` are the predecessors of
    /// `v` that have not completed yet. Guarded by one lock for the pass.
    remaining: Mutex<ActionGraph>,
    /// Units submitted but not yet fully processed.
    outstanding: AtomicUsize,
    /// Actions that ran to completion successfully.
    completed: AtomicUsize,
    /// First failure observed in this pass.
    failure: Mutex<Option<DagrunError>>,
    completer: Mutex<Option<Completer<()>>>,
    started: Instant,
}

impl<S: Scheduler> Pass<S> {
    pub(crate) fn new(
        pass_id: u64,
        scheduler: Arc<S>,
        graph: &ActionGraph,
        completer: Completer<()>,
    ) -> Arc<Self> {
        Arc::new(Self {
            pass_id,
            scheduler,
            graph: graph.clone(),
            remaining: Mutex::new(graph.transpose()),
            outstanding: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            failure: Mutex::new(None),
            completer: Mutex::new(Some(completer)),
            started: Instant::now(),
        })
    }

    /// Vertices with no predecessors.
    pub(crate) fn initial_ready(&self) -> Vec<VertexId> {
        self.lock_remaining()
            .leaves()
            .into_iter()
            .map(|v| v.id())
            .collect()
    }

    /// Submit the initial ready set.
    ///
    /// If the very first submission is rejected nothing has started, so the
    /// error is returned to the caller directly. Later rejections are folded
    /// into the pass outcome.
    pub(crate) fn seed(self: &Arc<Self>, ready: Vec<VertexId>) -> Result<()> {
        if ready.is_empty() {
            self.finish();
            return Ok(());
        }

        // Count every seed before any of them can complete, so the pass
        // cannot resolve while seeding is still in progress.
        self.outstanding.fetch_add(ready.len(), Ordering::SeqCst);

        for (n, id) in ready.into_iter().enumerate() {
            if let Err(err) = self.submit(id) {
                if n == 0 {
                    return Err(err);
                }
                self.record_failure(err);
                self.unit_done();
            }
        }
        Ok(())
    }

    fn submit(self: &Arc<Self>, id: VertexId) -> Result<()> {
        debug!(pass = self.pass_id, vertex = id, "submitting action");
        let pass = Arc::clone(self);
        self.scheduler.schedule(Box::new(move || pass.run_vertex(id)))
    }

    /// Job body: run the action, then release dependents.
    fn run_vertex(self: &Arc<Self>, id: VertexId) {
        let outcome = match self.graph.find_vertex(id) {
            Ok(vertex) => {
                let action = vertex.value().clone();
                capture(move || action.call())
            }
            Err(err) => Err(err),
        };

        match outcome {
            Ok(()) => {
                self.completed.fetch_add(1, Ordering::SeqCst);
                debug!(pass = self.pass_id, vertex = id, "action completed");
                self.release_dependents(id);
            }
            Err(cause) => {
                warn!(
                    pass = self.pass_id,
                    vertex = id,
                    error = %cause,
                    "action failed; its dependents will not run"
                );
                self.record_failure(DagrunError::ActionFailed {
                    vertex: id,
                    cause: Box::new(cause),
                });
            }
        }

        self.unit_done();
    }

    /// Remove `finished` from each dependent's predecessor list; submit the
    /// dependents whose list became empty.
    fn release_dependents(self: &Arc<Self>, finished: VertexId) {
        let mut ready = Vec::new();

        for &to in self.graph.successors(finished) {
            let mut remaining = self.lock_remaining();
            remaining.remove_edge(to, finished);
            if remaining.successors(to).is_empty() {
                // Only the completion that empties the list gets here, and it
                // accounts for the new unit before releasing the lock.
                self.outstanding.fetch_add(1, Ordering::SeqCst);
                ready.push(to);
            }
        }

        for id in ready {
            if let Err(err) = self.submit(id) {
                warn!(pass = self.pass_id, vertex = id, error = %err, "could not submit ready action");
                self.record_failure(err);
                self.unit_done();
            }
        }
    }

    fn record_failure(&self, err: DagrunError) {
        let mut failure = self.failure.lock().unwrap_or_else(PoisonError::into_inner);
        if failure.is_none() {
            *failure = Some(err);
        } else {
            debug!(pass = self.pass_id, error = %err, "additional failure after the first; ignored");
        }
    }

    fn unit_done(&self) {
        if self.outstanding.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.finish();
        }
    }

    /// Resolve the pass handle. Runs once, when nothing is outstanding.
    fn finish(&self) {
        let Some(completer) = self
            .completer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        else {
            return;
        };

        let failure = self
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let completed = self.completed.load(Ordering::SeqCst);
        let total = self.graph.vertex_count();
        let elapsed_ms = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match failure {
            None => {
                info!(pass = self.pass_id, completed, total, elapsed_ms, "pass finished");
                completer.complete(Ok(()));
            }
            Some(err) => {
                warn!(
                    pass = self.pass_id,
                    completed,
                    total,
                    elapsed_ms,
                    error = %err,
                    "pass finished with failure"
                );
                completer.complete(Err(err));
            }
        }
    }

    fn lock_remaining(&self) -> MutexGuard<'_, ActionGraph> {
        self.remaining.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
