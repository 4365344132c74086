//! Ranked remediation hints.
//!
//! Priority: unsupported type, duplicate, unknown-node reference, missing
//! connections, missing nodes, external leads, then the case's fallback hint.

use std::collections::BTreeMap;

use casebook_core::models::{CaseDefinition, Connection, InvalidConnection, RejectionReason};

/// Everything hint generation looks at.
pub struct HintInputs<'a> {
    pub case: &'a CaseDefinition,
    /// Case titles merged with caller-supplied titles.
    pub clue_titles: &'a BTreeMap<String, String>,
    pub invalid: &'a [InvalidConnection],
    pub missing_connections: &'a [Connection],
    pub missing_nodes: &'a [String],
    pub unknown_nodes: &'a [String],
    pub valid: bool,
    pub max_hints: usize,
}

impl HintInputs<'_> {
    fn title<'t>(&'t self, clue_id: &'t str) -> &'t str {
        self.clue_titles
            .get(clue_id)
            .map(String::as_str)
            .unwrap_or(clue_id)
    }

    fn first_rejected(&self, reason: RejectionReason) -> Option<&InvalidConnection> {
        self.invalid.iter().find(|i| i.reason == reason)
    }

    fn endpoint_titles(&self, invalid: &InvalidConnection) -> (String, String) {
        let side = |v: &Option<String>| {
            v.as_deref()
                .map(|id| self.title(id.trim()).to_string())
                .unwrap_or_else(|| "an unnamed clue".to_string())
        };
        (side(&invalid.from), side(&invalid.to))
    }
}

/// Build up to `max_hints` hints in priority order.
pub fn build_hints(inputs: &HintInputs<'_>) -> Vec<String> {
    let mut hints: Vec<String> = Vec::new();
    let full = |hints: &Vec<String>| hints.len() >= inputs.max_hints;

    if let Some(invalid) = inputs.first_rejected(RejectionReason::UnsupportedConnectionType) {
        let (from, to) = inputs.endpoint_titles(invalid);
        let label = invalid
            .connection_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or("untyped");
        hints.push(format!(
            "\"{label}\" isn't a relationship this case recognizes. Rethink how {from} and {to} are linked."
        ));
    }

    if !full(&hints) {
        if let Some(invalid) = inputs.first_rejected(RejectionReason::Duplicate) {
            let (from, to) = inputs.endpoint_titles(invalid);
            hints.push(format!(
                "You've linked {from} and {to} the same way twice. Remove the duplicate connection."
            ));
        }
    }

    if !full(&hints) && inputs.first_rejected(RejectionReason::UnknownNode).is_some() {
        hints.push(
            "One of your connections points at a lead that isn't part of this case.".to_string(),
        );
    }

    for connection in inputs.missing_connections {
        if full(&hints) {
            break;
        }
        hints.push(format!(
            "Consider whether {} {} {}.",
            inputs.title(&connection.from),
            connection.connection_type.verb_phrase(),
            inputs.title(&connection.to)
        ));
    }

    for node in inputs.missing_nodes {
        if full(&hints) {
            break;
        }
        hints.push(format!(
            "Your theory leaves out a key piece: {}.",
            inputs.title(node)
        ));
    }

    if !full(&hints) && !inputs.unknown_nodes.is_empty() {
        hints.push(
            "Some leads on your board come from outside this case. External leads are distracting."
                .to_string(),
        );
    }

    if hints.is_empty() && !inputs.valid {
        if let Some(fallback) = inputs
            .case
            .fallback_hint
            .as_deref()
            .filter(|h| !h.trim().is_empty())
        {
            hints.push(fallback.to_string());
        }
    }

    hints.truncate(inputs.max_hints);
    hints
}
