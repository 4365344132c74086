//! Testimony log and contradiction detection.
//!
//! Every normalized statement is indexed by fact id. A new statement whose
//! value differs from an assertion made in a *different* testimony yields a
//! contradiction, recorded once per (fact, testimony pair).

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde_json::Value;

use casebook_core::models::{
    contradiction_key, synthesize_fact_id, ContradictionRef, FactAssertion, RawStatement,
    Statement, Testimony, TestimonyContradiction, TestimonyPayload,
};

/// Result of recording one payload.
#[derive(Debug, Clone)]
pub struct RecordOutcome {
    /// The testimony as stored after recording.
    pub testimony: Testimony,
    /// Statements accepted from this payload.
    pub accepted_statements: usize,
    /// Contradictions first detected by this payload.
    pub new_contradictions: Vec<TestimonyContradiction>,
}

/// Per-case testimony storage with its fact index.
#[derive(Debug, Clone, Default)]
pub struct TestimonyLog {
    testimonies: Vec<Testimony>,
    contradictions: Vec<TestimonyContradiction>,
    fact_index: HashMap<String, Vec<FactAssertion>>,
    contradiction_keys: HashSet<String>,
}

impl TestimonyLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the log from persisted state.
    ///
    /// The fact index is recomputed from the statements. The persisted
    /// contradiction list is trusted as-is and not re-derived.
    pub fn restore(
        testimonies: Vec<Testimony>,
        contradictions: Vec<TestimonyContradiction>,
    ) -> Self {
        let mut log = Self {
            testimonies,
            contradictions,
            ..Self::default()
        };
        for testimony in &log.testimonies {
            for statement in &testimony.statements {
                index_assertion(
                    &mut log.fact_index,
                    &statement.fact_id,
                    FactAssertion {
                        testimony_id: testimony.id.clone(),
                        npc_id: testimony.npc_id.clone(),
                        value: statement.value.clone(),
                    },
                );
            }
            log.contradiction_keys
                .extend(testimony.contradictions.iter().map(|c| c.key.clone()));
        }
        log.contradiction_keys
            .extend(log.contradictions.iter().map(|c| c.key.clone()));
        log
    }

    pub fn testimonies(&self) -> &[Testimony] {
        &self.testimonies
    }

    pub fn contradictions(&self) -> &[TestimonyContradiction] {
        &self.contradictions
    }

    pub fn testimony(&self, testimony_id: &str) -> Option<&Testimony> {
        self.testimonies.iter().find(|t| t.id == testimony_id)
    }

    /// Everything said about `fact_id`, in recording order.
    pub fn assertions(&self, fact_id: &str) -> &[FactAssertion] {
        self.fact_index
            .get(fact_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.testimonies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.testimonies.is_empty()
    }

    /// Record `payload`, creating a testimony or appending to the one named
    /// by `payload.testimony_id`.
    pub fn record(&mut self, payload: TestimonyPayload, now: DateTime<Utc>) -> RecordOutcome {
        let testimony_id = self.resolve_testimony_id(&payload, now);
        let position = self.position(&testimony_id).unwrap_or_else(|| {
            self.testimonies.push(Testimony {
                id: testimony_id.clone(),
                case_id: payload.case_id.clone(),
                npc_id: payload.npc_id.clone(),
                npc_name: payload.npc_name.clone(),
                dialogue_id: payload.dialogue_id.clone(),
                approach_id: payload.approach_id.clone(),
                approach_history: payload.approach_history.clone(),
                statements: Vec::new(),
                metadata: payload.metadata.clone(),
                recorded_at: now,
                contradictions: Vec::new(),
            });
            self.testimonies.len() - 1
        });
        let npc_id = self.testimonies[position].npc_id.clone();

        let mut accepted = 0;
        let mut new_contradictions = Vec::new();
        for raw in &payload.statements {
            let ordinal = self.testimonies[position].statements.len();
            let Some(statement) = normalize_statement(raw, &testimony_id, ordinal) else {
                tracing::warn!(
                    case_id = %payload.case_id,
                    testimony_id = %testimony_id,
                    "dropping statement with neither value nor text"
                );
                continue;
            };

            let assertion = FactAssertion {
                testimony_id: testimony_id.clone(),
                npc_id: npc_id.clone(),
                value: statement.value.clone(),
            };
            let conflicting: Vec<FactAssertion> = self
                .assertions(&statement.fact_id)
                .iter()
                .filter(|a| a.testimony_id != testimony_id && a.value != statement.value)
                .cloned()
                .collect();
            for earlier in conflicting {
                if let Some(found) = self.link(&statement.fact_id, earlier, assertion.clone(), now) {
                    new_contradictions.push(found);
                }
            }

            index_assertion(&mut self.fact_index, &statement.fact_id, assertion);
            self.testimonies[position].statements.push(statement);
            accepted += 1;
        }

        RecordOutcome {
            testimony: self.testimonies[position].clone(),
            accepted_statements: accepted,
            new_contradictions,
        }
    }

    /// Record a disagreement on both testimonies and at case level, unless
    /// this pair was already linked for this fact.
    fn link(
        &mut self,
        fact_id: &str,
        first: FactAssertion,
        second: FactAssertion,
        now: DateTime<Utc>,
    ) -> Option<TestimonyContradiction> {
        let key = contradiction_key(fact_id, &first.testimony_id, &second.testimony_id);
        if !self.contradiction_keys.insert(key.clone()) {
            return None;
        }

        for (own, other) in [(&first, &second), (&second, &first)] {
            if let Some(position) = self.position(&own.testimony_id) {
                self.testimonies[position].contradictions.push(ContradictionRef {
                    key: key.clone(),
                    fact_id: fact_id.to_string(),
                    value: own.value.clone(),
                    other_testimony_id: other.testimony_id.clone(),
                    other_npc_id: other.npc_id.clone(),
                    other_value: other.value.clone(),
                });
            }
        }

        let contradiction = TestimonyContradiction {
            key,
            fact_id: fact_id.to_string(),
            first,
            second,
            detected_at: now,
        };
        self.contradictions.push(contradiction.clone());
        Some(contradiction)
    }

    fn position(&self, testimony_id: &str) -> Option<usize> {
        self.testimonies.iter().position(|t| t.id == testimony_id)
    }

    /// Existing id when re-recording, the payload's own id when fresh, else a
    /// generated `{npc}-{millis}-{n}` id that is unique within the log.
    fn resolve_testimony_id(&self, payload: &TestimonyPayload, now: DateTime<Utc>) -> String {
        if let Some(requested) = payload
            .testimony_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
        {
            return requested.to_string();
        }

        let mut sequence = self.testimonies.len() + 1;
        loop {
            let candidate = format!(
                "{}-{}-{sequence}",
                payload.npc_id.trim(),
                now.timestamp_millis()
            );
            if self.position(&candidate).is_none() {
                return candidate;
            }
            sequence += 1;
        }
    }
}

fn index_assertion(
    index: &mut HashMap<String, Vec<FactAssertion>>,
    fact_id: &str,
    assertion: FactAssertion,
) {
    let entries = index.entry(fact_id.to_string()).or_default();
    if !entries.contains(&assertion) {
        entries.push(assertion);
    }
}

/// Fill in `value`, `text`, and `fact_id` defaults. `None` when the statement
/// carries neither a value nor text.
fn normalize_statement(raw: &RawStatement, testimony_id: &str, ordinal: usize) -> Option<Statement> {
    let value = raw.value.as_ref().and_then(render_value);
    let text = raw
        .text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    let (value, text) = match (value, text) {
        (Some(value), Some(text)) => (value, text),
        (Some(value), None) => (value.clone(), value),
        (None, Some(text)) => (text.clone(), text),
        (None, None) => return None,
    };

    let authored = raw
        .fact_id
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty());
    let (fact_id, fact_synthesized) = match authored {
        Some(fact_id) => (fact_id.to_string(), false),
        None => (synthesize_fact_id(&text), true),
    };

    Some(Statement {
        id: format!("{testimony_id}#{ordinal}"),
        fact_id,
        value,
        text,
        confidence: raw.confidence,
        category: raw.category.clone(),
        tags: raw.tags.clone(),
        importance: raw.importance.clone(),
        fact_synthesized,
    })
}

/// Strings compare by their trimmed content; other scalars by JSON rendering.
fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        other => Some(other.to_string()),
    }
}
