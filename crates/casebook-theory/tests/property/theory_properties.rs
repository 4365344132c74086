//! Property tests for casebook-theory scoring.

use proptest::prelude::*;

use casebook_core::models::{CaseDefinition, RawTheory, TheoryGraph, ValidateOptions};
use casebook_theory::TheoryValidator;

const TYPES: [&str; 3] = ["supports", "causes", "implicates"];

/// A solution over up to 8 nodes with distinct, non-looping connections.
fn solution_strategy() -> impl Strategy<Value = TheoryGraph> {
    prop::collection::btree_set((0usize..8, 0usize..8, 0usize..TYPES.len()), 1..12).prop_map(
        |edges| {
            edges
                .into_iter()
                .filter(|(from, to, _)| from != to)
                .fold(TheoryGraph::new("solution"), |graph, (from, to, ty)| {
                    graph.with_connection(format!("n{from}"), format!("n{to}"), TYPES[ty])
                })
        },
    )
}

fn case_for(solution: TheoryGraph) -> CaseDefinition {
    let mut case = CaseDefinition::new("prop");
    case.theory = Some(solution);
    case
}

fn raw_strategy() -> impl Strategy<Value = RawTheory> {
    prop::collection::vec((0usize..10, 0usize..10, 0usize..4), 0..15).prop_map(|edges| {
        edges.into_iter().fold(RawTheory::new(), |raw, (from, to, ty)| {
            let ty = TYPES.get(ty).copied().unwrap_or("contradicts");
            raw.connect(&format!("n{from}"), &format!("n{to}"), ty)
        })
    })
}

proptest! {
    #[test]
    fn submitting_the_solution_is_perfect(solution in solution_strategy()) {
        prop_assume!(!solution.connections.is_empty());
        let case = case_for(solution);
        let theory = RawTheory::from(case.theory.as_ref().unwrap());
        let verdict = TheoryValidator::default().validate(&theory, &case, &ValidateOptions::default());
        prop_assert_eq!(verdict.accuracy, 1.0);
        prop_assert!(verdict.valid);
        prop_assert!(verdict.missing_connections.is_empty());
    }

    #[test]
    fn accuracy_stays_in_unit_interval(solution in solution_strategy(), raw in raw_strategy()) {
        let case = case_for(solution);
        let verdict = TheoryValidator::default().validate(&raw, &case, &ValidateOptions::default());
        prop_assert!((0.0..=1.0).contains(&verdict.accuracy));
        prop_assert!(verdict.hints.len() <= 3);
        if !verdict.invalid_connections.is_empty() {
            prop_assert!(!verdict.valid);
        }
    }

    #[test]
    fn matched_missing_and_extra_partition_the_graphs(solution in solution_strategy(), raw in raw_strategy()) {
        let case = case_for(solution.clone());
        let verdict = TheoryValidator::default().validate(&raw, &case, &ValidateOptions::default());
        prop_assert_eq!(
            verdict.matched_connections.len() + verdict.missing_connections.len(),
            solution.connections.len()
        );
        prop_assert_eq!(
            verdict.matched_connections.len() + verdict.extra_connections.len(),
            verdict.normalized_theory.connections.len()
        );
    }

    #[test]
    fn theory_without_connections_has_zero_recall(solution in solution_strategy()) {
        prop_assume!(!solution.connections.is_empty());
        let case = case_for(solution);
        let nodes = case.theory.as_ref().unwrap().required_nodes();
        let verdict = TheoryValidator::default().validate(
            &RawTheory::new().nodes(nodes),
            &case,
            &ValidateOptions::default(),
        );
        let score = verdict.score.unwrap();
        prop_assert_eq!(score.recall, 0.0);
        prop_assert_eq!(score.connection_score, 0.0);
        prop_assert!((verdict.accuracy - 0.15).abs() < 1e-12);
    }
}
