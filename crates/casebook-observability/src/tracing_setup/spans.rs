//! Span definitions per operation: validation, testimony, objectives, persistence.

/// Create a theory validation span.
#[macro_export]
macro_rules! validation_span {
    ($case_id:expr) => {
        tracing::info_span!("casebook.validation", case_id = %$case_id)
    };
}

/// Create a testimony recording span.
#[macro_export]
macro_rules! testimony_span {
    ($case_id:expr, $npc_id:expr) => {
        tracing::info_span!("casebook.testimony", case_id = %$case_id, npc_id = %$npc_id)
    };
}

/// Create an objective evaluation span.
#[macro_export]
macro_rules! objective_span {
    ($case_id:expr) => {
        tracing::debug_span!("casebook.objectives", case_id = %$case_id)
    };
}

/// Create a snapshot save/restore span.
#[macro_export]
macro_rules! snapshot_span {
    ($direction:expr, $case_count:expr) => {
        tracing::info_span!("casebook.snapshot", direction = $direction, case_count = $case_count)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const VALIDATION: &str = "casebook.validation";
    pub const TESTIMONY: &str = "casebook.testimony";
    pub const OBJECTIVES: &str = "casebook.objectives";
    pub const SNAPSHOT: &str = "casebook.snapshot";
}
