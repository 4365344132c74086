//! Default values for every configuration knob.
//!
//! The scoring constants reproduce the shipped game's tuning and should only
//! change together with the UI copy that depends on them.

pub const DEFAULT_CONNECTION_WEIGHT: f64 = 0.85;
pub const DEFAULT_NODE_WEIGHT: f64 = 0.15;
pub const DEFAULT_INVALID_PENALTY_PER_CONNECTION: f64 = 0.05;
pub const DEFAULT_MAX_INVALID_PENALTY: f64 = 0.15;
pub const DEFAULT_MAX_HINTS: usize = 3;
pub const DEFAULT_ACCURACY_THRESHOLD: f64 = 0.7;

pub const DEFAULT_EMIT_FX_CUES: bool = true;

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_JSON: bool = false;
