//! Runtime record of one registered case.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use casebook_core::config::is_threshold;
use casebook_core::models::{CaseDefinition, CaseStatus, NormalizedTheory, Objective};

use crate::testimony::TestimonyLog;

/// A case definition plus everything the player has done with it.
#[derive(Debug, Clone)]
pub struct CaseFile {
    pub id: String,
    pub definition: CaseDefinition,
    pub status: CaseStatus,
    /// Resolved once at registration: the case's own value, else the configured default.
    pub accuracy_threshold: f64,
    pub evidence_ids: BTreeSet<String>,
    pub collected_evidence: BTreeSet<String>,
    pub required_clues: BTreeSet<String>,
    pub discovered_clues: BTreeSet<String>,
    pub objectives: Vec<Objective>,
    pub player_theory: Option<NormalizedTheory>,
    /// Latest theory accuracy while active; frozen once the case closes.
    pub accuracy: Option<f64>,
    pub registered_at: DateTime<Utc>,
    pub solve_time: Option<DateTime<Utc>>,
    pub failure_reason: Option<String>,
    pub testimony: TestimonyLog,
}

impl CaseFile {
    pub fn new(
        id: String,
        definition: CaseDefinition,
        default_threshold: f64,
        now: DateTime<Utc>,
    ) -> Self {
        let accuracy_threshold = match definition.accuracy_threshold {
            Some(t) if is_threshold(t) => t,
            Some(t) => {
                tracing::warn!(case_id = %id, threshold = t, "case threshold out of range; using default");
                default_threshold
            }
            None => default_threshold,
        };
        let evidence_ids = trimmed_set(&definition.evidence_ids);
        let required_clues = trimmed_set(&definition.required_clues);
        let objectives = definition.objectives.clone();

        Self {
            id,
            definition,
            status: CaseStatus::Active,
            accuracy_threshold,
            evidence_ids,
            collected_evidence: BTreeSet::new(),
            required_clues,
            discovered_clues: BTreeSet::new(),
            objectives,
            player_theory: None,
            accuracy: None,
            registered_at: now,
            solve_time: None,
            failure_reason: None,
            testimony: TestimonyLog::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.definition.title
    }

    pub fn is_active(&self) -> bool {
        self.status == CaseStatus::Active
    }

    pub fn objective(&self, objective_id: &str) -> Option<&Objective> {
        self.objectives.iter().find(|o| o.id == objective_id)
    }

    pub fn all_objectives_complete(&self) -> bool {
        self.objectives.iter().all(|o| o.completed)
    }

    /// Counters for HUD and journal screens.
    pub fn progress(&self) -> CaseProgress {
        CaseProgress {
            case_id: self.id.clone(),
            status: self.status,
            evidence_collected: self.collected_evidence.len(),
            evidence_total: self.evidence_ids.len(),
            required_clues_discovered: self
                .required_clues
                .iter()
                .filter(|c| self.discovered_clues.contains(*c))
                .count(),
            required_clues_total: self.required_clues.len(),
            clues_discovered: self.discovered_clues.len(),
            objectives_completed: self.objectives.iter().filter(|o| o.completed).count(),
            objectives_total: self.objectives.len(),
            testimonies: self.testimony.len(),
            contradictions: self.testimony.contradictions().len(),
            accuracy: self.accuracy,
        }
    }
}

/// Progress counters of one case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseProgress {
    pub case_id: String,
    pub status: CaseStatus,
    pub evidence_collected: usize,
    pub evidence_total: usize,
    pub required_clues_discovered: usize,
    pub required_clues_total: usize,
    pub clues_discovered: usize,
    pub objectives_completed: usize,
    pub objectives_total: usize,
    pub testimonies: usize,
    pub contradictions: usize,
    pub accuracy: Option<f64>,
}

fn trimmed_set(ids: &[String]) -> BTreeSet<String> {
    ids.iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_falls_back_when_out_of_range() {
        let mut definition = CaseDefinition::new("c");
        definition.accuracy_threshold = Some(1.5);
        let file = CaseFile::new("c".into(), definition, 0.7, Utc::now());
        assert_eq!(file.accuracy_threshold, 0.7);

        let mut definition = CaseDefinition::new("c");
        definition.accuracy_threshold = Some(0.8);
        let file = CaseFile::new("c".into(), definition, 0.7, Utc::now());
        assert_eq!(file.accuracy_threshold, 0.8);
    }

    #[test]
    fn evidence_universe_ignores_blank_ids() {
        let mut definition = CaseDefinition::new("c");
        definition.evidence_ids = vec!["knife".into(), " ".into(), " rope ".into()];
        let file = CaseFile::new("c".into(), definition, 0.7, Utc::now());
        assert_eq!(
            file.evidence_ids.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["knife", "rope"]
        );
        assert_eq!(file.progress().evidence_total, 2);
    }
}
