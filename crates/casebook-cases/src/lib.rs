//! # casebook-cases
//!
//! Owns the mutable state of every in-progress case.
//!
//! ## Responsibilities
//! - Evidence and clue sets per case
//! - Objective state machine (monotonic completion)
//! - Testimony log with a fact-indexed contradiction detector
//! - Theory validation routing and case solving
//! - Snapshot save/restore

pub mod case_file;
pub mod manager;
pub mod objectives;
pub mod snapshot;
pub mod testimony;

pub use case_file::{CaseFile, CaseProgress};
pub use manager::{CaseManager, RegisterOptions};
pub use testimony::{RecordOutcome, TestimonyLog};
