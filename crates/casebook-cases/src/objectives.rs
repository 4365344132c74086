//! Objective evaluation.
//!
//! Completion is monotonic: an objective that has completed is never
//! re-checked, so later state changes cannot undo it.

use casebook_core::models::{CaseStatus, Objective, ObjectiveKind};

use crate::case_file::CaseFile;

/// Objectives that completed during one evaluation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectivePass {
    /// `(objective id, objective type)` in declaration order.
    pub newly_completed: Vec<(String, String)>,
    /// True only when this pass completed the last open objective.
    pub all_complete: bool,
}

impl ObjectivePass {
    pub fn ids(&self) -> Vec<String> {
        self.newly_completed.iter().map(|(id, _)| id.clone()).collect()
    }
}

/// Whether `objective`'s predicate currently holds for `case`.
///
/// `collect_all_evidence` over an empty evidence list holds vacuously; the
/// same goes for `discover_required_clues` with no required clues.
pub fn is_satisfied(objective: &Objective, case: &CaseFile) -> bool {
    match &objective.kind {
        ObjectiveKind::CollectEvidence { evidence_id } => {
            case.collected_evidence.contains(evidence_id)
        }
        ObjectiveKind::DiscoverClue { clue_id } => case.discovered_clues.contains(clue_id),
        ObjectiveKind::CollectAllEvidence => case
            .evidence_ids
            .iter()
            .all(|e| case.collected_evidence.contains(e)),
        ObjectiveKind::DiscoverRequiredClues => case
            .required_clues
            .iter()
            .all(|c| case.discovered_clues.contains(c)),
        ObjectiveKind::ValidateTheory => {
            case.status == CaseStatus::Solved
                && case
                    .accuracy
                    .is_some_and(|accuracy| accuracy >= case.accuracy_threshold)
        }
        ObjectiveKind::Unrecognized(_) => false,
    }
}

/// Mark every open objective whose predicate holds as completed.
pub fn evaluate(case: &mut CaseFile) -> ObjectivePass {
    let _span = casebook_observability::objective_span!(case.id).entered();

    let ready: Vec<usize> = case
        .objectives
        .iter()
        .enumerate()
        .filter(|(_, objective)| !objective.completed && is_satisfied(objective, case))
        .map(|(position, _)| position)
        .collect();

    let mut pass = ObjectivePass::default();
    for position in ready {
        let objective = &mut case.objectives[position];
        objective.completed = true;
        pass.newly_completed
            .push((objective.id.clone(), objective.kind.type_name().to_string()));
    }
    pass.all_complete = !pass.newly_completed.is_empty() && case.all_objectives_complete();
    pass
}

/// Objectives whose type the engine does not know.
pub fn unrecognized(objectives: &[Objective]) -> impl Iterator<Item = &Objective> {
    objectives
        .iter()
        .filter(|o| matches!(o.kind, ObjectiveKind::Unrecognized(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use casebook_core::models::CaseDefinition;
    use chrono::Utc;

    fn case() -> CaseFile {
        let mut definition = CaseDefinition::new("c");
        definition.evidence_ids = vec!["knife".into(), "rope".into()];
        definition.objectives = vec![
            Objective::new(
                "find_knife",
                ObjectiveKind::CollectEvidence {
                    evidence_id: "knife".into(),
                },
            ),
            Objective::new("sweep", ObjectiveKind::CollectAllEvidence),
            Objective::new("odd", ObjectiveKind::Unrecognized("pet_the_cat".into())),
        ];
        CaseFile::new("c".into(), definition, 0.7, Utc::now())
    }

    #[test]
    fn completes_in_declaration_order() {
        let mut file = case();
        file.collected_evidence.insert("knife".into());
        file.collected_evidence.insert("rope".into());

        let pass = evaluate(&mut file);
        assert_eq!(pass.ids(), vec!["find_knife", "sweep"]);
        assert!(!pass.all_complete, "unrecognized objective never completes");
    }

    #[test]
    fn completion_is_sticky() {
        let mut file = case();
        file.collected_evidence.insert("knife".into());
        assert_eq!(evaluate(&mut file).ids(), vec!["find_knife"]);

        file.collected_evidence.clear();
        let pass = evaluate(&mut file);
        assert!(pass.newly_completed.is_empty());
        assert!(file.objective("find_knife").unwrap().completed);
    }

    #[test]
    fn validate_theory_needs_solved_at_threshold() {
        let mut definition = CaseDefinition::new("c");
        definition.objectives = vec![Objective::new("theory", ObjectiveKind::ValidateTheory)];
        let mut file = CaseFile::new("c".into(), definition, 0.7, Utc::now());

        file.accuracy = Some(0.9);
        assert!(evaluate(&mut file).newly_completed.is_empty());

        file.status = CaseStatus::Solved;
        file.accuracy = Some(0.5);
        assert!(evaluate(&mut file).newly_completed.is_empty());

        file.accuracy = Some(0.7);
        let pass = evaluate(&mut file);
        assert_eq!(pass.ids(), vec!["theory"]);
        assert!(pass.all_complete);
    }

    #[test]
    fn empty_universe_is_vacuously_collected() {
        let mut definition = CaseDefinition::new("c");
        definition.objectives = vec![
            Objective::new("all", ObjectiveKind::CollectAllEvidence),
            Objective::new("clues", ObjectiveKind::DiscoverRequiredClues),
        ];
        let mut file = CaseFile::new("c".into(), definition, 0.7, Utc::now());
        assert!(evaluate(&mut file).all_complete);
    }
}
