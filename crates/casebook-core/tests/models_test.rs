use casebook_core::models::*;
use serde_json::json;

#[test]
fn case_definition_parses_authored_json() {
    let case: CaseDefinition = serde_json::from_value(json!({
        "id": "pier",
        "title": "Pier",
        "evidenceIds": ["knife"],
        "objectives": [{"id": "o1", "type": "collect_evidence", "evidenceId": "knife"}],
        "theory": {
            "id": "main",
            "nodes": ["a", "b"],
            "connections": [{"from": "a", "to": "b", "type": "Supports"}]
        },
        "accuracyThreshold": 0.8,
        "allowedConnectionTypes": ["supports", "alibi_for"]
    }))
    .unwrap();

    assert_eq!(case.id.as_deref(), Some("pier"));
    assert_eq!(case.accuracy_threshold, Some(0.8));
    assert_eq!(
        case.theory.as_ref().unwrap().connections[0].connection_type,
        ConnectionType::Supports
    );
    assert_eq!(
        case.allowed_connection_types.as_deref(),
        Some(&[ConnectionType::Supports, ConnectionType::Custom("alibi_for".into())][..])
    );
    assert!(case.has_solution());
    assert_eq!(case.rewards, CaseRewards::default());
}

#[test]
fn solution_ids_fall_back_to_position() {
    let mut case = CaseDefinition::new("c");
    case.theory = Some(TheoryGraph::new("primary_story"));
    case.alternate_theories = vec![TheoryGraph::default(), TheoryGraph::new("alt")];
    case.solutions = vec![TheoryGraph::default()];

    let ids: Vec<String> = case.solution_graphs().iter().map(|s| s.id()).collect();
    assert_eq!(ids, vec!["primary_story", "alternate-0", "alt", "solution-0"]);
}

#[test]
fn required_nodes_include_connection_endpoints() {
    let graph = TheoryGraph::new("g")
        .with_nodes(["a"])
        .with_connection("b", "c", "causes");
    assert_eq!(graph.required_nodes(), vec!["a", "b", "c"]);
}

#[test]
fn connection_keys_are_directional() {
    let forward = Connection::new("a", "b", "supports");
    let backward = Connection::new("b", "a", "supports");
    assert_ne!(forward.key(), backward.key());
    assert_eq!(forward.key(), "a→b::supports");
}

#[test]
fn verdict_serializes_camel_case() {
    let verdict = TheoryVerdict {
        valid: false,
        accuracy: 0.5,
        threshold: 0.7,
        feedback: String::new(),
        hints: vec![],
        matched_connections: vec![],
        missing_connections: vec![Connection::new("a", "b", "supports")],
        extra_connections: vec![],
        invalid_connections: vec![],
        missing_nodes: vec![],
        unknown_nodes: vec![],
        solution_id: Some("main".into()),
        score: None,
        normalized_theory: NormalizedTheory::default(),
    };
    let value = serde_json::to_value(&verdict).unwrap();
    assert_eq!(value["solutionId"], "main");
    assert_eq!(value["missingConnections"][0]["type"], "supports");
    assert!(value.get("normalizedTheory").is_some());
}

#[test]
fn objectives_round_trip_their_wire_shape() {
    let objective = Objective::new(
        "find",
        ObjectiveKind::DiscoverClue {
            clue_id: "motive".into(),
        },
    )
    .with_description("Find the motive");
    let value = serde_json::to_value(&objective).unwrap();
    assert_eq!(value["type"], "discover_clue");
    assert_eq!(value["clueId"], "motive");
    assert!(value.get("evidenceId").is_none());

    let back: Objective = serde_json::from_value(value).unwrap();
    assert_eq!(back, objective);
}

#[test]
fn snapshot_without_version_defaults_to_current() {
    let snapshot: CasebookSnapshot =
        serde_json::from_value(json!({"activeCaseId": null, "cases": {}})).unwrap();
    assert_eq!(snapshot.version, casebook_core::constants::SNAPSHOT_VERSION);
}

#[test]
fn case_status_is_lowercase_on_the_wire() {
    assert_eq!(serde_json::to_value(CaseStatus::Solved).unwrap(), "solved");
    assert!(CaseStatus::Failed.is_terminal());
    assert!(!CaseStatus::Active.is_terminal());
}

#[test]
fn testimony_payload_accepts_minimal_shape() {
    let payload: TestimonyPayload = serde_json::from_value(json!({
        "caseId": "c",
        "npcId": "guard",
        "statements": [{"text": "I heard a splash."}]
    }))
    .unwrap();
    assert_eq!(payload.statements.len(), 1);
    assert!(payload.statements[0].fact_id.is_none());
    assert!(payload.metadata.is_null());
}
