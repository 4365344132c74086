//! # casebook-theory
//!
//! Checks a player-built theory graph against every solution graph of a case.
//!
//! ## Pipeline
//! 1. **Normalize**: restrict nodes to the case universe, reject malformed,
//!    unknown, unsupported and duplicate connections
//! 2. **Score**: connection F1 blended with node coverage, per solution
//! 3. **Select**: keep the closest solution, apply the invalid-connection penalty
//! 4. **Explain**: ranked hints and a single feedback sentence

pub mod engine;
pub mod feedback;
pub mod hints;
pub mod normalize;
pub mod scoring;

pub use engine::TheoryValidator;
pub use normalize::{normalize, Normalized, Universe};
