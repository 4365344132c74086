//! Conversion between live case files and their persisted form.

use casebook_core::models::{CaseSnapshot, ObjectiveState};

use crate::case_file::CaseFile;
use crate::testimony::TestimonyLog;

/// Capture the mutable state of `case`.
pub fn capture(case: &CaseFile) -> CaseSnapshot {
    CaseSnapshot {
        status: case.status,
        collected_evidence: case.collected_evidence.iter().cloned().collect(),
        discovered_clues: case.discovered_clues.iter().cloned().collect(),
        objectives: case
            .objectives
            .iter()
            .map(|o| ObjectiveState {
                id: o.id.clone(),
                objective_type: o.kind.type_name().to_string(),
                completed: o.completed,
            })
            .collect(),
        accuracy: case.accuracy,
        solve_time: case.solve_time,
        player_theory: case.player_theory.clone(),
        testimonies: case.testimony.testimonies().to_vec(),
        testimony_contradictions: case.testimony.contradictions().to_vec(),
    }
}

/// Overwrite the mutable state of `case` with `snapshot`.
///
/// Evidence outside the case's universe and objective ids the definition no
/// longer declares are dropped with a warning.
pub fn apply(case: &mut CaseFile, snapshot: CaseSnapshot) {
    case.status = snapshot.status;
    case.accuracy = snapshot.accuracy;
    case.solve_time = snapshot.solve_time;
    case.player_theory = snapshot.player_theory;

    case.collected_evidence.clear();
    for evidence_id in snapshot.collected_evidence {
        if case.evidence_ids.contains(&evidence_id) {
            case.collected_evidence.insert(evidence_id);
        } else {
            tracing::warn!(case_id = %case.id, evidence_id = %evidence_id, "saved evidence is not part of the case; dropped");
        }
    }
    case.discovered_clues = snapshot.discovered_clues.into_iter().collect();

    for objective in &mut case.objectives {
        objective.completed = false;
    }
    for state in snapshot.objectives {
        match case.objectives.iter_mut().find(|o| o.id == state.id) {
            Some(objective) => objective.completed = state.completed,
            None => {
                tracing::warn!(case_id = %case.id, objective_id = %state.id, "saved objective no longer exists; dropped");
            }
        }
    }

    case.testimony = TestimonyLog::restore(snapshot.testimonies, snapshot.testimony_contradictions);
}
