use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::case_definition::CaseStatus;
use super::testimony::{Testimony, TestimonyContradiction};
use super::theory::NormalizedTheory;
use crate::constants::SNAPSHOT_VERSION;

/// Persisted state of every registered case. This is the save-game contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CasebookSnapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    pub active_case_id: Option<String>,
    pub cases: BTreeMap<String, CaseSnapshot>,
}

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

impl Default for CasebookSnapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            active_case_id: None,
            cases: BTreeMap::new(),
        }
    }
}

/// Mutable progress of one case.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct CaseSnapshot {
    pub status: CaseStatus,
    pub collected_evidence: Vec<String>,
    pub discovered_clues: Vec<String>,
    pub objectives: Vec<ObjectiveState>,
    pub accuracy: Option<f64>,
    pub solve_time: Option<DateTime<Utc>>,
    pub player_theory: Option<NormalizedTheory>,
    pub testimonies: Vec<Testimony>,
    pub testimony_contradictions: Vec<TestimonyContradiction>,
}

/// Completion flag of one objective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ObjectiveState {
    pub id: String,
    #[serde(rename = "type")]
    pub objective_type: String,
    pub completed: bool,
}
