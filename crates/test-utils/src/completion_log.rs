use std::sync::{Arc, Mutex};

use dagrun::{Action, VertexId};

/// Start/finish event recorded by a [`CompletionLog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Started(VertexId),
    Finished(VertexId),
}

/// Thread-safe, shared log of action start and finish events.
///
/// Clones share the same underlying log.
#[derive(Debug, Clone, Default)]
pub struct CompletionLog {
    events: Arc<Mutex<Vec<Event>>>,
}

impl CompletionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    /// An action that records `Started(id)`, then `Finished(id)`.
    pub fn action(&self, id: VertexId) -> Action {
        let log = self.clone();
        Action::from_fn(move || {
            log.record(Event::Started(id));
            std::thread::yield_now();
            log.record(Event::Finished(id));
        })
    }

    /// Like [`CompletionLog::action`] but sleeps in between.
    pub fn slow_action(&self, id: VertexId, millis: u64) -> Action {
        let log = self.clone();
        Action::from_fn(move || {
            log.record(Event::Started(id));
            std::thread::sleep(std::time::Duration::from_millis(millis));
            log.record(Event::Finished(id));
        })
    }

    /// An action that records `Started(id)` and then fails without finishing.
    pub fn failing_action(&self, id: VertexId) -> Action {
        let log = self.clone();
        Action::new(move || {
            log.record(Event::Started(id));
            anyhow::bail!("action {id} failed on purpose")
        })
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    /// Ids in the order their actions finished.
    pub fn finished(&self) -> Vec<VertexId> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Finished(id) => Some(id),
                Event::Started(_) => None,
            })
            .collect()
    }

    /// Ids in the order their actions started.
    pub fn started(&self) -> Vec<VertexId> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Started(id) => Some(id),
                Event::Finished(_) => None,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }

    fn index_of(&self, event: Event) -> Option<usize> {
        self.events().iter().position(|e| *e == event)
    }

    /// `true` if `first` finished strictly before `second` started.
    pub fn finished_before_start(&self, first: VertexId, second: VertexId) -> bool {
        match (
            self.index_of(Event::Finished(first)),
            self.index_of(Event::Started(second)),
        ) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        }
    }

    /// `true` if `first` appears before `second` in the finish order.
    pub fn finished_before(&self, first: VertexId, second: VertexId) -> bool {
        let finished = self.finished();
        let a = finished.iter().position(|&id| id == first);
        let b = finished.iter().position(|&id| id == second);
        match (a, b) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        }
    }
}
