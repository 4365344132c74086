use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::constants::{
    CONTRADICTION_KEY_SEPARATOR, SYNTHETIC_FACT_HASH_LEN, SYNTHETIC_FACT_PREFIX,
};

/// Testimony as assembled upstream by the dialogue layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonyPayload {
    pub case_id: String,
    pub npc_id: String,
    #[serde(default)]
    pub npc_name: Option<String>,
    #[serde(default)]
    pub dialogue_id: Option<String>,
    #[serde(default)]
    pub approach_id: Option<String>,
    #[serde(default)]
    pub approach_history: Vec<String>,
    /// Set when re-recording onto an existing testimony.
    #[serde(default)]
    pub testimony_id: Option<String>,
    #[serde(default)]
    pub statements: Vec<RawStatement>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl TestimonyPayload {
    pub fn new(case_id: impl Into<String>, npc_id: impl Into<String>) -> Self {
        Self {
            case_id: case_id.into(),
            npc_id: npc_id.into(),
            ..Self::default()
        }
    }

    pub fn statement(mut self, statement: RawStatement) -> Self {
        self.statements.push(statement);
        self
    }

    pub fn fact(self, fact_id: &str, value: &str) -> Self {
        self.statement(RawStatement::fact(fact_id, value))
    }
}

/// A statement before `value`/`text`/`fact_id` defaulting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawStatement {
    pub fact_id: Option<String>,
    /// Any JSON scalar; non-strings are compared by their JSON rendering.
    pub value: Option<serde_json::Value>,
    pub text: Option<String>,
    pub confidence: Option<f64>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub importance: Option<serde_json::Value>,
}

impl RawStatement {
    pub fn fact(fact_id: &str, value: &str) -> Self {
        Self {
            fact_id: Some(fact_id.to_string()),
            value: Some(serde_json::Value::String(value.to_string())),
            ..Self::default()
        }
    }

    pub fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Self::default()
        }
    }
}

/// A normalized statement inside a testimony.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    pub id: String,
    pub fact_id: String,
    pub value: String,
    pub text: String,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub importance: Option<serde_json::Value>,
    /// True when `fact_id` was derived from the text rather than authored.
    #[serde(default)]
    pub fact_synthesized: bool,
}

/// One side of a contradiction, as seen from the testimony holding it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ContradictionRef {
    pub key: String,
    pub fact_id: String,
    /// This testimony's value for the fact.
    pub value: String,
    pub other_testimony_id: String,
    pub other_npc_id: String,
    pub other_value: String,
}

/// One interview session with one NPC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Testimony {
    pub id: String,
    pub case_id: String,
    pub npc_id: String,
    #[serde(default)]
    pub npc_name: Option<String>,
    #[serde(default)]
    pub dialogue_id: Option<String>,
    #[serde(default)]
    pub approach_id: Option<String>,
    #[serde(default)]
    pub approach_history: Vec<String>,
    pub statements: Vec<Statement>,
    #[serde(default)]
    pub metadata: serde_json::Value,
    pub recorded_at: DateTime<Utc>,
    #[serde(default)]
    pub contradictions: Vec<ContradictionRef>,
}

impl Testimony {
    pub fn contradicts(&self, other_testimony_id: &str) -> bool {
        self.contradictions
            .iter()
            .any(|c| c.other_testimony_id == other_testimony_id)
    }
}

/// A single assertion in the fact index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FactAssertion {
    pub testimony_id: String,
    pub npc_id: String,
    pub value: String,
}

/// Case-level record of two testimonies disagreeing on one fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TestimonyContradiction {
    pub key: String,
    pub fact_id: String,
    /// The earlier assertion (already indexed when the disagreement was seen).
    pub first: FactAssertion,
    /// The assertion that triggered detection.
    pub second: FactAssertion,
    pub detected_at: DateTime<Utc>,
}

/// Order-independent key for a disagreement on `fact_id` between two testimonies.
pub fn contradiction_key(fact_id: &str, testimony_a: &str, testimony_b: &str) -> String {
    let (low, high) = if testimony_a <= testimony_b {
        (testimony_a, testimony_b)
    } else {
        (testimony_b, testimony_a)
    };
    [fact_id, low, high]
        .map(escape_key_part)
        .join(CONTRADICTION_KEY_SEPARATOR)
}

/// Escape the separator so distinct triples never share a key.
fn escape_key_part(part: &str) -> String {
    part.replace('\\', "\\\\")
        .replace(CONTRADICTION_KEY_SEPARATOR, "\\|")
}

/// Fact id for a statement that did not carry one.
///
/// Identical wording (ignoring case and surrounding whitespace) maps to the
/// same fact, so repeated lines agree rather than contradict.
pub fn synthesize_fact_id(text: &str) -> String {
    let normalized = text.trim().to_lowercase();
    let hash = blake3::hash(normalized.as_bytes()).to_hex();
    format!("{SYNTHETIC_FACT_PREFIX}{}", &hash.as_str()[..SYNTHETIC_FACT_HASH_LEN])
}
