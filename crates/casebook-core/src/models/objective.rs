use serde::{Deserialize, Serialize};

/// Completion predicate of an objective.
///
/// Content authors write objectives as `{ "type": "...", ... }`; types the
/// engine does not know become [`ObjectiveKind::Unrecognized`], which never
/// completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectiveKind {
    CollectEvidence { evidence_id: String },
    DiscoverClue { clue_id: String },
    CollectAllEvidence,
    DiscoverRequiredClues,
    /// Holds once the case is solved at or above its threshold.
    ValidateTheory,
    Unrecognized(String),
}

impl ObjectiveKind {
    pub fn parse(type_name: &str, evidence_id: Option<String>, clue_id: Option<String>) -> Self {
        match (type_name, evidence_id, clue_id) {
            ("collect_evidence", Some(evidence_id), _) => Self::CollectEvidence { evidence_id },
            ("discover_clue", _, Some(clue_id)) => Self::DiscoverClue { clue_id },
            ("collect_all_evidence", _, _) => Self::CollectAllEvidence,
            ("discover_required_clues", _, _) => Self::DiscoverRequiredClues,
            ("validate_theory", _, _) => Self::ValidateTheory,
            (other, _, _) => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            Self::CollectEvidence { .. } => "collect_evidence",
            Self::DiscoverClue { .. } => "discover_clue",
            Self::CollectAllEvidence => "collect_all_evidence",
            Self::DiscoverRequiredClues => "discover_required_clues",
            Self::ValidateTheory => "validate_theory",
            Self::Unrecognized(name) => name,
        }
    }
}

/// A named completion predicate attached to a case.
///
/// `completed` only ever moves from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ObjectiveRecord", into = "ObjectiveRecord")]
pub struct Objective {
    pub id: String,
    pub description: String,
    pub kind: ObjectiveKind,
    pub completed: bool,
}

impl Objective {
    pub fn new(id: impl Into<String>, kind: ObjectiveKind) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            kind,
            completed: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Wire shape of an objective.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectiveRecord {
    id: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "type")]
    objective_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    evidence_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    clue_id: Option<String>,
    #[serde(default)]
    completed: bool,
}

impl From<ObjectiveRecord> for Objective {
    fn from(record: ObjectiveRecord) -> Self {
        Self {
            kind: ObjectiveKind::parse(&record.objective_type, record.evidence_id, record.clue_id),
            id: record.id,
            description: record.description,
            completed: record.completed,
        }
    }
}

impl From<Objective> for ObjectiveRecord {
    fn from(objective: Objective) -> Self {
        let (evidence_id, clue_id) = match &objective.kind {
            ObjectiveKind::CollectEvidence { evidence_id } => (Some(evidence_id.clone()), None),
            ObjectiveKind::DiscoverClue { clue_id } => (None, Some(clue_id.clone())),
            _ => (None, None),
        };
        Self {
            objective_type: objective.kind.type_name().to_string(),
            id: objective.id,
            description: objective.description,
            evidence_id,
            clue_id,
            completed: objective.completed,
        }
    }
}
