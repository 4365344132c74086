//! Per-solution scoring.
//!
//! accuracy = connection_weight · F1(precision, recall) + node_weight · node_coverage

use std::collections::HashSet;

use casebook_core::config::ValidatorConfig;
use casebook_core::models::{Connection, NormalizedTheory, SolutionRef, SolutionScore};

/// How a normalized theory lines up with one solution graph.
#[derive(Debug, Clone)]
pub struct SolutionMatch {
    pub solution_id: String,
    pub matched: Vec<Connection>,
    pub missing: Vec<Connection>,
    pub extra: Vec<Connection>,
    pub missing_nodes: Vec<String>,
    pub score: SolutionScore,
}

impl SolutionMatch {
    pub fn accuracy(&self) -> f64 {
        self.score.raw_accuracy
    }
}

/// Score `theory` against a single solution.
pub fn score_solution(
    solution: &SolutionRef<'_>,
    theory: &NormalizedTheory,
    config: &ValidatorConfig,
) -> SolutionMatch {
    let mut solution_keys: HashSet<String> = HashSet::new();
    let solution_connections: Vec<&Connection> = solution
        .graph
        .connections
        .iter()
        .filter(|c| solution_keys.insert(c.key()))
        .collect();

    let player_keys: HashSet<String> = theory.connections.iter().map(Connection::key).collect();

    let (matched, extra): (Vec<Connection>, Vec<Connection>) = theory
        .connections
        .iter()
        .cloned()
        .partition(|c| solution_keys.contains(&c.key()));

    let missing: Vec<Connection> = solution_connections
        .into_iter()
        .filter(|c| !player_keys.contains(&c.key()))
        .cloned()
        .collect();

    let precision = if theory.connections.is_empty() {
        0.0
    } else {
        matched.len() as f64 / (matched.len() + extra.len()) as f64
    };
    let recall = if solution_keys.is_empty() {
        1.0
    } else {
        matched.len() as f64 / solution_keys.len() as f64
    };
    let connection_score = f1(precision, recall);

    let player_nodes: HashSet<&str> = theory.nodes.iter().map(String::as_str).collect();
    let required_nodes = solution.graph.required_nodes();
    let missing_nodes: Vec<String> = required_nodes
        .iter()
        .filter(|n| !player_nodes.contains(n.as_str()))
        .cloned()
        .collect();
    let node_coverage = if required_nodes.is_empty() {
        1.0
    } else {
        (required_nodes.len() - missing_nodes.len()) as f64 / required_nodes.len() as f64
    };

    let raw_accuracy =
        config.connection_weight * connection_score + config.node_weight * node_coverage;

    SolutionMatch {
        solution_id: solution.id(),
        matched,
        missing,
        extra,
        missing_nodes,
        score: SolutionScore {
            precision,
            recall,
            connection_score,
            node_coverage,
            raw_accuracy,
            penalty: 0.0,
        },
    }
}

/// Harmonic mean of precision and recall; 0 when both are 0.
pub fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// Pick the highest-accuracy match. Ties keep the earlier solution.
pub fn best_match(matches: impl IntoIterator<Item = SolutionMatch>) -> Option<SolutionMatch> {
    matches.into_iter().fold(None, |best, candidate| match best {
        Some(current) if current.accuracy() >= candidate.accuracy() => Some(current),
        _ => Some(candidate),
    })
}
