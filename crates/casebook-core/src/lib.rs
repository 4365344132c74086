//! # casebook-core
//!
//! Foundation crate for the Casebook investigation engine.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::CasebookConfig;
pub use errors::{CasebookError, CasebookResult};
pub use models::{
    CaseDefinition, CaseEvent, CaseStatus, Connection, ConnectionType, NormalizedTheory,
    Objective, ObjectiveKind, RawTheory, TheoryGraph, TheoryVerdict,
};
