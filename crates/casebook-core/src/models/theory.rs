use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::constants::{CONNECTION_ARROW, CONNECTION_TYPE_SEPARATOR};

/// Relationship type carried by a theory connection.
///
/// Serialized as a plain lowercase string. Types outside the built-in set
/// land in [`ConnectionType::Custom`] and are only accepted when a case's
/// vocabulary names them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConnectionType {
    Supports,
    /// Permitted in every case, whether or not a solution uses it.
    Contradicts,
    Causes,
    Enables,
    Precedes,
    Implicates,
    Custom(String),
}

impl ConnectionType {
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "supports" => Self::Supports,
            "contradicts" => Self::Contradicts,
            "causes" => Self::Causes,
            "enables" => Self::Enables,
            "precedes" => Self::Precedes,
            "implicates" => Self::Implicates,
            _ => Self::Custom(normalized),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Supports => "supports",
            Self::Contradicts => "contradicts",
            Self::Causes => "causes",
            Self::Enables => "enables",
            Self::Precedes => "precedes",
            Self::Implicates => "implicates",
            Self::Custom(name) => name,
        }
    }

    /// Verb phrase used when wording hints about this relationship.
    pub fn verb_phrase(&self) -> &str {
        match self {
            Self::Supports => "supports",
            Self::Contradicts => "contradicts",
            Self::Causes => "led to",
            Self::Enables => "made possible",
            Self::Precedes => "happened before",
            Self::Implicates => "points to",
            Self::Custom(_) => "is linked to",
        }
    }
}

impl From<String> for ConnectionType {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for ConnectionType {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<ConnectionType> for String {
    fn from(value: ConnectionType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical `from→to::type` key used for matching and duplicate detection.
pub fn connection_key(from: &str, to: &str, connection_type: &ConnectionType) -> String {
    let (from, to) = (from.trim(), to.trim());
    format!("{from}{CONNECTION_ARROW}{to}{CONNECTION_TYPE_SEPARATOR}{connection_type}")
}

/// A directed, typed edge between two clue nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Connection {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    #[ts(type = "string")]
    pub connection_type: ConnectionType,
}

impl Connection {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        connection_type: impl Into<ConnectionType>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            connection_type: connection_type.into(),
        }
    }

    pub fn key(&self) -> String {
        connection_key(&self.from, &self.to, &self.connection_type)
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// A canonical theory graph authored with the case (primary or alternate solution).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TheoryGraph {
    pub id: String,
    pub nodes: Vec<String>,
    pub connections: Vec<Connection>,
}

impl TheoryGraph {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_nodes<I, S>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nodes.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn with_connection(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        connection_type: impl Into<ConnectionType>,
    ) -> Self {
        self.connections
            .push(Connection::new(from, to, connection_type));
        self
    }

    /// Required nodes in authored order: declared nodes, then connection
    /// endpoints not already declared.
    pub fn required_nodes(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let declared = self.nodes.iter().map(|n| n.trim());
        let endpoints = self
            .connections
            .iter()
            .flat_map(|c| [c.from.trim(), c.to.trim()]);
        declared
            .chain(endpoints)
            .filter(|n| !n.is_empty() && seen.insert(*n))
            .map(str::to_string)
            .collect()
    }

    /// Distinct connection types used by this graph.
    pub fn connection_types(&self) -> BTreeSet<ConnectionType> {
        self.connections
            .iter()
            .map(|c| c.connection_type.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.connections.is_empty()
    }
}

/// A connection exactly as the player submitted it.
///
/// Any field may be missing; normalization classifies what is wrong with it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawConnection {
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(rename = "type")]
    pub connection_type: Option<String>,
}

impl RawConnection {
    pub fn new(from: &str, to: &str, connection_type: &str) -> Self {
        Self {
            from: Some(from.to_string()),
            to: Some(to.to_string()),
            connection_type: Some(connection_type.to_string()),
        }
    }
}

/// The player's theory before normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTheory {
    pub nodes: Vec<String>,
    pub connections: Vec<RawConnection>,
}

impl RawTheory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(mut self, node: impl Into<String>) -> Self {
        self.nodes.push(node.into());
        self
    }

    pub fn nodes<I, S>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nodes.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn connect(mut self, from: &str, to: &str, connection_type: &str) -> Self {
        self.connections
            .push(RawConnection::new(from, to, connection_type));
        self
    }

    pub fn push_connection(mut self, connection: RawConnection) -> Self {
        self.connections.push(connection);
        self
    }
}

impl From<&TheoryGraph> for RawTheory {
    fn from(graph: &TheoryGraph) -> Self {
        Self {
            nodes: graph.nodes.clone(),
            connections: graph
                .connections
                .iter()
                .map(|c| RawConnection::new(&c.from, &c.to, c.connection_type.as_str()))
                .collect(),
        }
    }
}

impl From<&NormalizedTheory> for RawTheory {
    fn from(theory: &NormalizedTheory) -> Self {
        Self {
            nodes: theory.nodes.clone(),
            connections: theory
                .connections
                .iter()
                .map(|c| RawConnection::new(&c.from, &c.to, c.connection_type.as_str()))
                .collect(),
        }
    }
}

/// The player's theory after normalization: only allowed nodes and valid,
/// unique connections remain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct NormalizedTheory {
    pub nodes: Vec<String>,
    pub connections: Vec<Connection>,
}

impl NormalizedTheory {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.connections.is_empty()
    }
}
