use crate::models::CaseEvent;

/// Synchronous publish side of the game's event bus.
///
/// Implementations must tolerate handlers that fail; one broken subscriber
/// must not keep the others from receiving an event.
pub trait IEventBus: Send + Sync {
    fn emit(&self, event: &CaseEvent);
}

/// Bus that drops every announcement. Used when no UI is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEventBus;

impl IEventBus for NullEventBus {
    fn emit(&self, _event: &CaseEvent) {}
}
