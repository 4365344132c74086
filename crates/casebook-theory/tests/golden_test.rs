//! Golden dataset tests for casebook-theory.
//!
//! Each file under `golden/theory/` names a case fixture, a raw player
//! theory, and the verdict fields the validator must reproduce.

use casebook_core::models::{CaseDefinition, RawTheory, ValidateOptions};
use casebook_theory::TheoryValidator;
use serde_json::Value;
use test_fixtures::{list_fixtures, load_fixture, load_fixture_value};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn strings(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

fn run_golden(relative: &str) {
    let fixture = load_fixture_value(relative);
    let case: CaseDefinition = load_fixture(
        fixture["input"]["case"]
            .as_str()
            .expect("fixture must name input.case"),
    );
    let theory: RawTheory = serde_json::from_value(fixture["input"]["theory"].clone())
        .expect("fixture must have input.theory");
    let expected = &fixture["expected"];

    let verdict = TheoryValidator::default().validate(&theory, &case, &ValidateOptions::default());

    assert_eq!(
        verdict.valid,
        expected["valid"].as_bool().unwrap(),
        "{relative}: valid"
    );
    let accuracy = expected["accuracy"].as_f64().unwrap();
    assert!(
        (verdict.accuracy - accuracy).abs() < 1e-9,
        "{relative}: accuracy {} != {accuracy}",
        verdict.accuracy
    );
    assert_eq!(
        verdict.solution_id.as_deref(),
        expected["solutionId"].as_str(),
        "{relative}: solution id"
    );

    let missing: Vec<String> = verdict.missing_connections.iter().map(|c| c.key()).collect();
    assert_eq!(missing, strings(&expected["missingConnections"]), "{relative}: missing");

    let reasons: Vec<String> = verdict
        .invalid_connections
        .iter()
        .map(|i| i.reason.as_str().to_string())
        .collect();
    assert_eq!(reasons, strings(&expected["invalidReasons"]), "{relative}: reasons");

    for needle in strings(&expected["hintContains"]) {
        assert!(
            verdict.hints.iter().any(|h| h.contains(&needle)),
            "{relative}: no hint contains {needle:?} in {:?}",
            verdict.hints
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn golden_full_match() {
    run_golden("golden/theory/full_match.json");
}

#[test]
fn golden_partial_match() {
    run_golden("golden/theory/partial_match.json");
}

#[test]
fn golden_unsupported_type() {
    run_golden("golden/theory/unsupported_type.json");
}

#[test]
fn golden_alternate_solution() {
    run_golden("golden/theory/alternate_solution.json");
}

#[test]
fn golden_external_leads() {
    run_golden("golden/theory/external_leads.json");
}

#[test]
fn every_golden_file_is_covered() {
    let files = list_fixtures("golden/theory");
    assert_eq!(files.len(), 5, "new golden files need a test above");
}
