mod event_bus;
mod theory_validator;

pub use event_bus::{IEventBus, NullEventBus};
pub use theory_validator::ITheoryValidator;
