//! End-to-end investigation: register a case from fixtures, drive it through
//! inbound bus events, interview witnesses, submit theories, save and reload.

use std::sync::{Arc, Mutex};

use casebook_cases::CaseManager;
use casebook_core::config::CasebookConfig;
use casebook_core::models::{
    CaseDefinition, CaseEvent, CaseStatus, InboundEvent, RawTheory,
};
use casebook_observability::{InMemoryEventBus, LogCapture};
use serde_json::json;
use test_fixtures::{fixture_exists, list_fixtures, load_case, load_fixture_value};
use tracing::Level;

fn inbound(value: serde_json::Value) -> InboundEvent {
    serde_json::from_value(value).unwrap()
}

#[test]
fn fixture_set_is_complete() {
    for name in ["harbor_murder", "simple_chain", "no_deduction"] {
        assert!(fixture_exists(&format!("cases/{name}.json")), "{name} missing");
    }
    assert_eq!(list_fixtures("golden/testimony").len(), 1);
}

#[test]
fn every_case_fixture_registers() {
    let mut manager = CaseManager::default();
    for path in list_fixtures("cases") {
        let name = path.file_stem().unwrap().to_str().unwrap().to_string();
        let definition: CaseDefinition = load_case(&name);
        manager.create_case(definition).unwrap();
    }
    assert_eq!(manager.case_count(), 3);
}

#[test]
fn harbor_murder_end_to_end() {
    let config = CasebookConfig::from_toml("[cases]\nemit_fx_cues = false\n").unwrap();
    let bus = Arc::new(InMemoryEventBus::new());
    let solved_titles = Arc::new(Mutex::new(Vec::new()));
    {
        let solved_titles = solved_titles.clone();
        bus.on("case:solved", move |event| {
            solved_titles.lock().unwrap().push(event.case_id().to_string());
        });
    }
    let mut manager = CaseManager::with_config(&config, bus.clone());
    let definition: CaseDefinition = load_case("harbor_murder");
    let case_id = manager.create_case(definition).unwrap();
    assert_eq!(manager.active_case_id(), Some(case_id.as_str()));

    // Gameplay arrives over the bus.
    for evidence in ["crowbar", "ledger", "torn_glove", "tide_chart"] {
        assert!(manager.handle_event(inbound(json!({
            "event": "evidence:collected",
            "payload": { "caseId": case_id, "evidenceId": evidence }
        }))));
    }
    for clue in ["motive_debt", "weapon_crowbar", "timeline_gap"] {
        assert!(manager.handle_event(inbound(json!({
            "event": "clue:derived",
            "payload": { "caseId": case_id, "clueId": clue }
        }))));
    }

    // Interviews.
    let golden = load_fixture_value("golden/testimony/time_conflict.json");
    for payload in golden["input"]["testimonies"].as_array().unwrap() {
        assert!(manager.handle_event(inbound(json!({
            "event": "testimony:completed",
            "payload": payload
        }))));
    }
    assert_eq!(manager.contradictions(&case_id).len(), 2);

    // A first, weak attempt.
    let weak = RawTheory::new()
        .nodes(["motive_debt", "suspect_foreman"])
        .connect("motive_debt", "suspect_foreman", "implicates");
    let verdict = manager.validate_theory(&case_id, &weak).unwrap();
    assert!(!verdict.valid);
    assert!(!verdict.hints.is_empty());

    // Save mid-investigation, then reload into a fresh manager.
    let saved = manager.snapshot_json().unwrap();
    let mut reloaded = CaseManager::with_config(&config, Arc::new(InMemoryEventBus::new()));
    reloaded.create_case(load_case("harbor_murder")).unwrap();
    assert!(reloaded.restore_json(&saved).unwrap());
    assert_eq!(reloaded.serialize(), manager.serialize());

    // The full theory closes the case.
    let full = RawTheory::new()
        .connect("motive_debt", "suspect_foreman", "implicates")
        .connect("weapon_crowbar", "suspect_foreman", "implicates")
        .connect("timeline_gap", "weapon_crowbar", "supports");
    let verdict = manager.validate_theory(&case_id, &full).unwrap();
    assert!(verdict.valid);
    assert_eq!(verdict.solution_id.as_deref(), Some("foreman_did_it"));

    let case = manager.case(&case_id).unwrap();
    assert_eq!(case.status, CaseStatus::Solved);
    assert!(case.all_objectives_complete());
    assert_eq!(*solved_titles.lock().unwrap(), vec![case_id.clone()]);
    assert_eq!(bus.count("fx:overlay_cue"), 0);
    assert!(matches!(
        bus.events().last(),
        Some(CaseEvent::CaseCompleted { .. })
    ));
}

#[test]
fn malformed_inbound_events_are_logged_not_fatal() {
    let mut manager = CaseManager::default();
    manager.create_case(load_case("simple_chain")).unwrap();

    let capture = LogCapture::new();
    let handled = tracing::subscriber::with_default(capture.subscriber(Level::WARN), || {
        [
            manager.handle_event(inbound(json!({
                "event": "evidence:collected",
                "payload": { "caseId": "missing_case", "evidenceId": "e1" }
            }))),
            manager.handle_event(inbound(json!({
                "event": "testimony:completed",
                "payload": { "caseId": "simple_chain", "npcId": "" }
            }))),
        ]
    });
    assert_eq!(handled, [false, false]);
    assert!(capture.contains("unknown case"));
    assert!(capture.contains("without npc id"));
}
