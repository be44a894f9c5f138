//! Event handler registry.
//!
//! Handlers run synchronously on the listen-loop task, in registration
//! order. A handler that returns an error or panics is logged and skipped;
//! the remaining handlers still run.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};

use puppet_shared::{EventKind, PuppetEvent};
use tracing::{error, trace};

pub type EventHandler = Arc<dyn Fn(&PuppetEvent) -> anyhow::Result<()> + Send + Sync>;

#[derive(Default)]
pub struct Dispatcher {
    handlers: Mutex<HashMap<EventKind, Vec<EventHandler>>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `kind`. Registering the same handler twice
    /// makes it fire twice.
    pub fn on<F>(&self, kind: EventKind, handler: F)
    where
        F: Fn(&PuppetEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.lock().entry(kind).or_default().push(Arc::new(handler));
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.lock().get(&kind).map_or(0, Vec::len)
    }

    /// Invoke every handler registered for the event's kind.
    ///
    /// Returns the number of handlers that completed successfully.
    pub fn emit(&self, event: &PuppetEvent) -> usize {
        let kind = event.kind();
        // Snapshot so handlers may register or clear listeners without deadlocking.
        let handlers: Vec<EventHandler> = self.lock().get(&kind).cloned().unwrap_or_default();
        trace!(event = %kind, handlers = handlers.len(), "Dispatching event");

        let mut delivered = 0;
        for (index, handler) in handlers.iter().enumerate() {
            match catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(e)) => {
                    error!(event = %kind, handler = index, error = %e, "Event handler failed");
                }
                Err(_) => {
                    error!(event = %kind, handler = index, "Event handler panicked");
                }
            }
        }
        delivered
    }

    pub fn remove_all_listeners(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<EventKind, Vec<EventHandler>>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
