//! Structured log events for the moments designers ask about in playtests.

/// A case was registered.
pub fn case_registered(case_id: &str, objective_count: usize, solution_count: usize) {
    tracing::info!(case_id, objective_count, solution_count, "case registered");
}

/// An objective flipped to completed.
pub fn objective_completed(case_id: &str, objective_id: &str, objective_type: &str) {
    tracing::info!(case_id, objective_id, objective_type, "objective completed");
}

/// Two testimonies disagree on a fact.
pub fn contradiction_detected(case_id: &str, fact_id: &str, first: &str, second: &str) {
    tracing::info!(
        case_id,
        fact_id,
        first_testimony = first,
        second_testimony = second,
        "testimony contradiction detected"
    );
}

/// A theory was checked.
pub fn theory_validated(case_id: &str, accuracy: f64, threshold: f64, valid: bool) {
    tracing::info!(case_id, accuracy, threshold, valid, "theory validated");
}

/// A case reached a terminal status.
pub fn case_closed(case_id: &str, status: &str, accuracy: Option<f64>) {
    tracing::info!(case_id, status, accuracy = ?accuracy, "case closed");
}

/// Content referenced something the engine does not know about.
pub fn authoring_problem(case_id: &str, problem: &str) {
    tracing::warn!(case_id, problem, "case data problem");
}
