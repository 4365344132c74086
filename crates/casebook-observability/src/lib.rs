//! # casebook-observability
//!
//! Logging and announcement plumbing shared by the engine crates.
//!
//! - [`tracing_setup`]: subscriber initialization, span macros, structured event helpers
//! - [`capture`]: in-memory log sink for asserting on warnings in tests
//! - [`event_bus`]: synchronous pub/sub bus with `on`/`emit` and a recorded log

pub mod capture;
pub mod event_bus;
pub mod tracing_setup;

pub use capture::LogCapture;
pub use event_bus::InMemoryEventBus;
pub use tracing_setup::init_tracing;
