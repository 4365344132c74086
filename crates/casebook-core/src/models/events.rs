//! Announcements emitted on the event bus and inbound gameplay events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::case_definition::CaseRewards;
use super::testimony::{TestimonyContradiction, TestimonyPayload};
use super::theory::Connection;
use super::verdict::InvalidConnection;

/// Presentation cue for the UI overlay layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FxCue {
    ObjectiveComplete,
    ObjectivesComplete,
    TestimonyContradiction,
    TheoryValid,
    TheoryInvalid,
    CaseSolved,
    CaseFailed,
}

/// Announcement emitted by the case manager after a state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum CaseEvent {
    #[serde(rename = "case:created", rename_all = "camelCase")]
    CaseCreated { case_id: String, title: String },

    #[serde(rename = "case:activated", rename_all = "camelCase")]
    CaseActivated {
        case_id: String,
        previous_case_id: Option<String>,
    },

    #[serde(rename = "case:objective_completed", rename_all = "camelCase")]
    ObjectiveCompleted {
        case_id: String,
        objective_id: String,
        objective_type: String,
    },

    #[serde(rename = "case:objectives_complete", rename_all = "camelCase")]
    ObjectivesComplete { case_id: String },

    #[serde(rename = "case:testimony_recorded", rename_all = "camelCase")]
    TestimonyRecorded {
        case_id: String,
        testimony_id: String,
        npc_id: String,
        statement_count: usize,
    },

    #[serde(rename = "case:testimony_contradiction", rename_all = "camelCase")]
    TestimonyContradiction {
        case_id: String,
        contradiction: TestimonyContradiction,
    },

    #[serde(rename = "theory:validated", rename_all = "camelCase")]
    TheoryValidated {
        case_id: String,
        accuracy: f64,
        valid: bool,
        threshold: f64,
        hints: Vec<String>,
        missing_connections: Vec<Connection>,
        extra_connections: Vec<Connection>,
        invalid_connections: Vec<InvalidConnection>,
        solution_id: Option<String>,
    },

    #[serde(rename = "case:solved", rename_all = "camelCase")]
    CaseSolved {
        case_id: String,
        accuracy: f64,
        solve_time: DateTime<Utc>,
    },

    #[serde(rename = "case:completed", rename_all = "camelCase")]
    CaseCompleted {
        case_id: String,
        rewards: CaseRewards,
    },

    #[serde(rename = "case:failed", rename_all = "camelCase")]
    CaseFailed { case_id: String, reason: String },

    #[serde(rename = "fx:overlay_cue", rename_all = "camelCase")]
    Fx {
        case_id: String,
        cue: FxCue,
        intensity: f64,
    },
}

impl CaseEvent {
    /// Bus channel name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CaseCreated { .. } => "case:created",
            Self::CaseActivated { .. } => "case:activated",
            Self::ObjectiveCompleted { .. } => "case:objective_completed",
            Self::ObjectivesComplete { .. } => "case:objectives_complete",
            Self::TestimonyRecorded { .. } => "case:testimony_recorded",
            Self::TestimonyContradiction { .. } => "case:testimony_contradiction",
            Self::TheoryValidated { .. } => "theory:validated",
            Self::CaseSolved { .. } => "case:solved",
            Self::CaseCompleted { .. } => "case:completed",
            Self::CaseFailed { .. } => "case:failed",
            Self::Fx { .. } => "fx:overlay_cue",
        }
    }

    pub fn case_id(&self) -> &str {
        match self {
            Self::CaseCreated { case_id, .. }
            | Self::CaseActivated { case_id, .. }
            | Self::ObjectiveCompleted { case_id, .. }
            | Self::ObjectivesComplete { case_id }
            | Self::TestimonyRecorded { case_id, .. }
            | Self::TestimonyContradiction { case_id, .. }
            | Self::TheoryValidated { case_id, .. }
            | Self::CaseSolved { case_id, .. }
            | Self::CaseCompleted { case_id, .. }
            | Self::CaseFailed { case_id, .. }
            | Self::Fx { case_id, .. } => case_id,
        }
    }
}

/// Gameplay events consumed by the case manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum InboundEvent {
    #[serde(rename = "evidence:collected", rename_all = "camelCase")]
    EvidenceCollected { case_id: String, evidence_id: String },

    #[serde(rename = "clue:derived", rename_all = "camelCase")]
    ClueDerived { case_id: String, clue_id: String },

    #[serde(rename = "testimony:completed")]
    TestimonyCompleted(TestimonyPayload),
}

impl InboundEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::EvidenceCollected { .. } => "evidence:collected",
            Self::ClueDerived { .. } => "clue:derived",
            Self::TestimonyCompleted(_) => "testimony:completed",
        }
    }
}
