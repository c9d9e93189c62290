// src/exec/action.rs

use std::fmt;
use std::sync::Arc;

use crate::dag::Graph;

/// A zero-argument unit of work attached to a graph vertex.
///
/// Actions are shared between graph clones, so they are `Fn` rather than
/// `FnOnce`; each pass calls every action at most once.
#[derive(Clone)]
pub struct Action(Arc<dyn Fn() -> anyhow::Result<()> + Send + Sync>);

impl Action {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Wrap an infallible closure.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::new(move || {
            f();
            Ok(())
        })
    }

    pub fn call(&self) -> anyhow::Result<()> {
        (self.0)()
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action(..)")
    }
}

/// Graph whose vertex payloads are actions.
pub type ActionGraph = Graph<Action>;
