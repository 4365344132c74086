use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::objective::Objective;
use super::theory::{ConnectionType, TheoryGraph};

/// Lifecycle status of a case. Only `Active → Solved` and `Active → Failed` are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    #[default]
    Active,
    Solved,
    Failed,
}

impl CaseStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Active)
    }
}

/// Rewards granted when a case completes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct CaseRewards {
    pub experience: u32,
    pub currency: u32,
    pub unlocks: Vec<String>,
}

/// Authored case content, as loaded from game data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaseDefinition {
    /// Required; registration fails without it.
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    /// Evidence universe. Collected evidence must come from this list.
    pub evidence_ids: Vec<String>,
    pub required_clues: Vec<String>,
    pub objectives: Vec<Objective>,
    /// Primary solution graph.
    pub theory: Option<TheoryGraph>,
    pub alternate_theories: Vec<TheoryGraph>,
    /// Additional accepted solutions.
    pub solutions: Vec<TheoryGraph>,
    pub accuracy_threshold: Option<f64>,
    /// Nodes players may use without being penalized as unknown.
    pub optional_nodes: Vec<String>,
    /// Replaces the vocabulary derived from the solutions.
    pub allowed_connection_types: Option<Vec<ConnectionType>>,
    /// Display titles for clue nodes, used when wording hints.
    pub clue_titles: BTreeMap<String, String>,
    pub fallback_hint: Option<String>,
    pub rewards: CaseRewards,
}

/// A solution graph paired with the id reported in verdicts.
#[derive(Debug, Clone, Copy)]
pub struct SolutionRef<'a> {
    pub label: &'a str,
    pub index: usize,
    pub graph: &'a TheoryGraph,
}

impl SolutionRef<'_> {
    /// The graph's own id, or a positional label when the author left it blank.
    pub fn id(&self) -> String {
        if self.graph.id.trim().is_empty() {
            format!("{}-{}", self.label, self.index)
        } else {
            self.graph.id.clone()
        }
    }
}

impl CaseDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Every registered solution: primary, then alternates, then the additional list.
    pub fn solution_graphs(&self) -> Vec<SolutionRef<'_>> {
        let primary = self.theory.iter().map(|graph| SolutionRef {
            label: "primary",
            index: 0,
            graph,
        });
        let alternates = self
            .alternate_theories
            .iter()
            .enumerate()
            .map(|(index, graph)| SolutionRef {
                label: "alternate",
                index,
                graph,
            });
        let additional = self
            .solutions
            .iter()
            .enumerate()
            .map(|(index, graph)| SolutionRef {
                label: "solution",
                index,
                graph,
            });
        primary.chain(alternates).chain(additional).collect()
    }

    pub fn has_solution(&self) -> bool {
        self.theory.is_some() || !self.alternate_theories.is_empty() || !self.solutions.is_empty()
    }
}
