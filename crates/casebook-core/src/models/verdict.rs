use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::theory::{Connection, ConnectionType, NormalizedTheory};

/// Why a submitted connection was dropped during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// Missing endpoint or a self-loop.
    InvalidNodes,
    /// An endpoint outside the case's node universe.
    UnknownNode,
    /// A relationship type outside the case vocabulary.
    UnsupportedConnectionType,
    /// Same canonical key submitted more than once.
    Duplicate,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidNodes => "invalid_nodes",
            Self::UnknownNode => "unknown_node",
            Self::UnsupportedConnectionType => "unsupported_connection_type",
            Self::Duplicate => "duplicate",
        }
    }
}

/// A rejected connection, echoed back with whatever fields were present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvalidConnection {
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(rename = "type")]
    pub connection_type: Option<String>,
    pub reason: RejectionReason,
    /// Canonical key, when the connection was well-formed enough to have one.
    pub key: Option<String>,
}

/// Score breakdown against the best-matching solution.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SolutionScore {
    pub precision: f64,
    pub recall: f64,
    /// Harmonic mean of precision and recall.
    pub connection_score: f64,
    pub node_coverage: f64,
    /// Blended accuracy before the invalid-connection penalty.
    pub raw_accuracy: f64,
    pub penalty: f64,
}

/// Result of checking a player theory against a case.
///
/// An invalid theory is still a successful verdict; `valid` and the
/// diagnostic lists say why it fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TheoryVerdict {
    pub valid: bool,
    pub accuracy: f64,
    pub threshold: f64,
    pub feedback: String,
    pub hints: Vec<String>,
    pub matched_connections: Vec<Connection>,
    pub missing_connections: Vec<Connection>,
    pub extra_connections: Vec<Connection>,
    pub invalid_connections: Vec<InvalidConnection>,
    pub missing_nodes: Vec<String>,
    pub unknown_nodes: Vec<String>,
    /// Id of the solution the theory was scored against; `None` when the case has none.
    pub solution_id: Option<String>,
    pub score: Option<SolutionScore>,
    pub normalized_theory: NormalizedTheory,
}

/// Per-call overrides for theory validation.
#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    /// Replaces the case threshold for this call.
    pub threshold: Option<f64>,
    /// Replaces the case vocabulary for this call. `contradicts` is always added.
    pub allowed_connection_types: Option<Vec<ConnectionType>>,
    /// Extra clue titles for hint wording, merged over the case's own lookup.
    pub clue_titles: BTreeMap<String, String>,
}

impl ValidateOptions {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_allowed_types<I, T>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ConnectionType>,
    {
        self.allowed_connection_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_clue_title(mut self, clue_id: impl Into<String>, title: impl Into<String>) -> Self {
        self.clue_titles.insert(clue_id.into(), title.into());
        self
    }
}
