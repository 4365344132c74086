//! Property tests for case bookkeeping.

use std::collections::HashSet;

use casebook_cases::CaseManager;
use casebook_core::models::{CaseDefinition, Objective, ObjectiveKind, TestimonyPayload};
use proptest::prelude::*;

const EVIDENCE: [&str; 4] = ["knife", "rope", "letter", "lamp"];
const CLUES: [&str; 3] = ["motive", "alibi", "weapon"];

fn investigation() -> CaseDefinition {
    let mut case = CaseDefinition::new("prop");
    case.evidence_ids = EVIDENCE.iter().map(|e| e.to_string()).collect();
    case.required_clues = CLUES.iter().map(|c| c.to_string()).collect();
    case.objectives = vec![
        Objective::new(
            "knife",
            ObjectiveKind::CollectEvidence {
                evidence_id: "knife".into(),
            },
        ),
        Objective::new(
            "motive",
            ObjectiveKind::DiscoverClue {
                clue_id: "motive".into(),
            },
        ),
        Objective::new("all_evidence", ObjectiveKind::CollectAllEvidence),
        Objective::new("all_clues", ObjectiveKind::DiscoverRequiredClues),
    ];
    case
}

#[derive(Debug, Clone)]
enum Step {
    Evidence(usize),
    Clue(usize),
    Foreign,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0..EVIDENCE.len()).prop_map(Step::Evidence),
        (0..CLUES.len()).prop_map(Step::Clue),
        Just(Step::Foreign),
    ]
}

fn statement() -> impl Strategy<Value = (usize, usize, usize)> {
    // (npc, fact, value)
    (0usize..4, 0usize..3, 0usize..3)
}

proptest! {
    #[test]
    fn objective_completion_never_reverts(steps in prop::collection::vec(step(), 0..40)) {
        let mut manager = CaseManager::default();
        manager.create_case(investigation()).unwrap();

        let mut completed: HashSet<String> = HashSet::new();
        for step in steps {
            match step {
                Step::Evidence(i) => { manager.on_evidence_collected("prop", EVIDENCE[i]); }
                Step::Clue(i) => { manager.on_clue_derived("prop", CLUES[i]); }
                Step::Foreign => { manager.on_evidence_collected("prop", "not_in_case"); }
            }
            let now: HashSet<String> = manager
                .case("prop")
                .unwrap()
                .objectives
                .iter()
                .filter(|o| o.completed)
                .map(|o| o.id.clone())
                .collect();
            prop_assert!(completed.is_subset(&now));
            completed = now;
        }

        let case = manager.case("prop").unwrap();
        prop_assert!(case.collected_evidence.iter().all(|e| case.evidence_ids.contains(e)));
    }

    #[test]
    fn contradictions_are_symmetric_and_unique(statements in prop::collection::vec(statement(), 1..25)) {
        let mut manager = CaseManager::default();
        manager.create_case(investigation()).unwrap();

        for (npc, fact, value) in statements {
            let payload = TestimonyPayload::new("prop", format!("npc{npc}"))
                .fact(&format!("fact{fact}"), &format!("v{value}"));
            manager.record_testimony(payload).unwrap();
        }

        let contradictions = manager.contradictions("prop");
        let keys: HashSet<&str> = contradictions.iter().map(|c| c.key.as_str()).collect();
        prop_assert_eq!(keys.len(), contradictions.len());

        for c in contradictions {
            prop_assert_ne!(&c.first.testimony_id, &c.second.testimony_id);
            prop_assert_ne!(&c.first.value, &c.second.value);
            for (own, other) in [(&c.first, &c.second), (&c.second, &c.first)] {
                let testimony = manager
                    .testimonies("prop")
                    .iter()
                    .find(|t| t.id == own.testimony_id)
                    .unwrap();
                prop_assert!(testimony.contradicts(&other.testimony_id));
            }
        }

        let refs: usize = manager
            .testimonies("prop")
            .iter()
            .map(|t| t.contradictions.len())
            .sum();
        prop_assert_eq!(refs, contradictions.len() * 2);
    }

    #[test]
    fn second_solve_changes_nothing(first in 0.0f64..=1.0, second in 0.0f64..=1.0) {
        let mut manager = CaseManager::default();
        manager.create_case(investigation()).unwrap();

        prop_assert!(manager.solve_case("prop", first));
        let solved_at = manager.case("prop").unwrap().solve_time;
        prop_assert!(!manager.solve_case("prop", second));

        let case = manager.case("prop").unwrap();
        prop_assert_eq!(case.accuracy, Some(first));
        prop_assert_eq!(case.solve_time, solved_at);
    }
}
