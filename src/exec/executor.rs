// src/exec/executor.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{info, warn};

use crate::config::PoolConfig;
use crate::errors::{DagrunError, Result};
use crate::exec::action::ActionGraph;
use crate::exec::pass::Pass;
use crate::pool::{Scheduler, TaskHandle, ThreadPool, completion_pair};

/// Runs action graphs on a [`Scheduler`], respecting every dependency edge.
///
/// For an edge `u -> v`, `v`'s action starts only after `u`'s action has
/// returned successfully. Actions with no path between them may run in any
/// order and concurrently, up to the scheduler's parallelism.
///
/// The executor is reusable: each [`DagExecutor::run_graph`] call is an
/// independent pass with its own private copy of the dependency state.
pub struct DagExecutor<S: Scheduler = ThreadPool> {
    scheduler: Arc<S>,
    passes: AtomicU64,
}

impl<S: Scheduler> std::fmt::Debug for DagExecutor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DagExecutor")
            .field("parallelism", &self.scheduler.parallelism())
            .field("passes", &self.passes.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl DagExecutor<ThreadPool> {
    /// Executor backed by a dedicated pool sized by `config`.
    pub fn from_config(config: &PoolConfig) -> Result<Self> {
        Ok(Self::with_scheduler(Arc::new(ThreadPool::from_config(config)?)))
    }

    /// Executor backed by a dedicated pool with the default size.
    pub fn with_default_pool() -> Result<Self> {
        Self::from_config(&PoolConfig::default())
    }
}

impl<S: Scheduler> DagExecutor<S> {
    pub fn with_scheduler(scheduler: Arc<S>) -> Self {
        Self {
            scheduler,
            passes: AtomicU64::new(0),
        }
    }

    pub fn scheduler(&self) -> &Arc<S> {
        &self.scheduler
    }

    /// Start one pass over `graph`.
    ///
    /// Fails immediately, before anything is scheduled, with
    /// [`DagrunError::CycleDetected`] if the graph is cyclic, or with
    /// [`DagrunError::PoolShutdown`] if the scheduler rejects the first unit.
    ///
    /// Otherwise the returned handle resolves once no action of the pass is
    /// running or queued: `Ok(())` if every action succeeded, or the first
    /// [`DagrunError::ActionFailed`]. Dependents of a failed action never run;
    /// actions already running are left to finish.
    pub fn run_graph(&self, graph: &ActionGraph) -> Result<TaskHandle<()>> {
        if graph.has_cycle() {
            warn!(vertices = graph.vertex_count(), "refusing to run cyclic action graph");
            return Err(DagrunError::CycleDetected);
        }

        let pass_id = self.passes.fetch_add(1, Ordering::Relaxed) + 1;
        let (completer, handle) = completion_pair();
        let pass = Pass::new(pass_id, Arc::clone(&self.scheduler), graph, completer);
        let ready = pass.initial_ready();

        info!(
            pass = pass_id,
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            roots = ready.len(),
            parallelism = self.scheduler.parallelism(),
            "starting pass"
        );

        pass.seed(ready)?;
        Ok(handle)
    }

    /// Convenience: start a pass and block until it resolves.
    ///
    /// Must not be called from a worker of the same scheduler.
    ///
    /// # Panics
    ///
    /// Panics if called from within a tokio runtime; await the handle from
    /// [`DagExecutor::run_graph`] there instead.
    pub fn run_graph_blocking(&self, graph: &ActionGraph) -> Result<()> {
        self.run_graph(graph)?.wait()
    }
}
