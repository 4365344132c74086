//! In-process implementation of the game's synchronous event bus.
//!
//! Handlers run on the emitting thread in subscription order. A panicking
//! handler is logged and skipped; later handlers still receive the event.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, RwLock};

use casebook_core::models::CaseEvent;
use casebook_core::traits::IEventBus;

type Handler = Arc<dyn Fn(&CaseEvent) + Send + Sync>;

/// Wildcard channel that receives every announcement.
pub const ANY_CHANNEL: &str = "*";

/// Event bus with named channels and a recorded log of everything emitted.
#[derive(Default)]
pub struct InMemoryEventBus {
    handlers: RwLock<HashMap<String, Vec<Handler>>>,
    log: Mutex<Vec<CaseEvent>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `handler` to `channel` (for example `"case:solved"`, or `"*"`).
    pub fn on<F>(&self, channel: &str, handler: F)
    where
        F: Fn(&CaseEvent) + Send + Sync + 'static,
    {
        if let Ok(mut handlers) = self.handlers.write() {
            handlers
                .entry(channel.to_string())
                .or_default()
                .push(Arc::new(handler));
        }
    }

    /// Every event emitted so far, in order.
    pub fn events(&self) -> Vec<CaseEvent> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    /// Channel names of every event emitted so far, in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.log
            .lock()
            .map(|log| log.iter().map(CaseEvent::name).collect())
            .unwrap_or_default()
    }

    /// Events emitted on `channel`.
    pub fn events_named(&self, channel: &str) -> Vec<CaseEvent> {
        self.log
            .lock()
            .map(|log| log.iter().filter(|e| e.name() == channel).cloned().collect())
            .unwrap_or_default()
    }

    pub fn count(&self, channel: &str) -> usize {
        self.events_named(channel).len()
    }

    pub fn clear(&self) {
        if let Ok(mut log) = self.log.lock() {
            log.clear();
        }
    }

    fn handlers_for(&self, channel: &str) -> Vec<Handler> {
        let Ok(handlers) = self.handlers.read() else {
            return Vec::new();
        };
        [channel, ANY_CHANNEL]
            .iter()
            .filter_map(|name| handlers.get(*name))
            .flatten()
            .cloned()
            .collect()
    }
}

impl IEventBus for InMemoryEventBus {
    fn emit(&self, event: &CaseEvent) {
        if let Ok(mut log) = self.log.lock() {
            log.push(event.clone());
        }
        // Handlers are cloned out first so a handler may subscribe without deadlocking.
        for handler in self.handlers_for(event.name()) {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler(event)));
            if outcome.is_err() {
                tracing::error!(
                    channel = event.name(),
                    case_id = event.case_id(),
                    "event handler panicked; continuing with remaining subscribers"
                );
            }
        }
    }
}

impl std::fmt::Debug for InMemoryEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let channels = self.handlers.read().map(|h| h.len()).unwrap_or_default();
        let emitted = self.log.lock().map(|l| l.len()).unwrap_or_default();
        f.debug_struct("InMemoryEventBus")
            .field("channels", &channels)
            .field("emitted", &emitted)
            .finish()
    }
}
