//! Player theory normalization.
//!
//! Produces the deduplicated node set and the valid connection list, and
//! classifies every rejected connection by reason.

use std::collections::{BTreeSet, HashSet};

use casebook_core::models::{
    connection_key, CaseDefinition, Connection, ConnectionType, InvalidConnection,
    NormalizedTheory, RawConnection, RawTheory, RejectionReason, ValidateOptions,
};

/// Nodes and connection types a theory may use.
///
/// `None` means unrestricted.
#[derive(Debug, Clone, Default)]
pub struct Universe {
    nodes: Option<HashSet<String>>,
    types: Option<BTreeSet<ConnectionType>>,
}

impl Universe {
    /// Accepts any node and any type. Used for cases without solution graphs.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Union of solution nodes plus optional nodes; vocabulary from the caller,
    /// else the case, else the solutions. `contradicts` is always allowed.
    pub fn for_case(case: &CaseDefinition, options: &ValidateOptions) -> Self {
        let solutions = case.solution_graphs();

        let mut nodes: HashSet<String> = solutions
            .iter()
            .flat_map(|s| s.graph.required_nodes())
            .collect();
        nodes.extend(
            case.optional_nodes
                .iter()
                .map(|n| n.trim())
                .filter(|n| !n.is_empty())
                .map(str::to_string),
        );

        let mut types: BTreeSet<ConnectionType> = match options
            .allowed_connection_types
            .as_ref()
            .or(case.allowed_connection_types.as_ref())
        {
            Some(overridden) => overridden.iter().cloned().collect(),
            None => solutions
                .iter()
                .flat_map(|s| s.graph.connection_types())
                .collect(),
        };
        types.insert(ConnectionType::Contradicts);

        Self {
            nodes: Some(nodes),
            types: Some(types),
        }
    }

    pub fn allows_node(&self, node: &str) -> bool {
        self.nodes.as_ref().map_or(true, |nodes| nodes.contains(node))
    }

    pub fn allows_type(&self, connection_type: &ConnectionType) -> bool {
        self.types
            .as_ref()
            .map_or(true, |types| types.contains(connection_type))
    }
}

/// Output of [`normalize`].
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub theory: NormalizedTheory,
    pub invalid: Vec<InvalidConnection>,
    /// Submitted nodes (listed or referenced by a connection) outside the universe.
    pub unknown_nodes: Vec<String>,
}

/// Normalize a raw theory against `universe`.
///
/// Connections are checked in submission order, so the first of two
/// identical connections is kept and the second is rejected as a duplicate.
/// Endpoints of accepted connections join the node set even if the player
/// never listed them.
pub fn normalize(raw: &RawTheory, universe: &Universe) -> Normalized {
    let mut out = Normalized::default();
    let mut node_set: HashSet<String> = HashSet::new();
    let mut unknown_set: HashSet<String> = HashSet::new();

    for node in &raw.nodes {
        let node = node.trim();
        if node.is_empty() {
            continue;
        }
        if universe.allows_node(node) {
            if node_set.insert(node.to_string()) {
                out.theory.nodes.push(node.to_string());
            }
        } else if unknown_set.insert(node.to_string()) {
            out.unknown_nodes.push(node.to_string());
        }
    }

    let mut seen_keys: HashSet<String> = HashSet::new();
    for raw_connection in &raw.connections {
        let from = clean(raw_connection.from.as_deref());
        let to = clean(raw_connection.to.as_deref());
        let type_name = clean(raw_connection.connection_type.as_deref());
        let key = match (from, to, type_name) {
            (Some(f), Some(t), Some(ty)) => Some(connection_key(f, t, &ConnectionType::parse(ty))),
            _ => None,
        };
        let reject = |reason: RejectionReason| rejected(raw_connection, reason, key.clone());

        let (Some(from), Some(to)) = (from, to) else {
            out.invalid.push(reject(RejectionReason::InvalidNodes));
            continue;
        };
        if from == to {
            out.invalid.push(reject(RejectionReason::InvalidNodes));
            continue;
        }

        let unknown_endpoints: Vec<&str> = [from, to]
            .into_iter()
            .filter(|n| !universe.allows_node(n))
            .collect();
        if !unknown_endpoints.is_empty() {
            for node in unknown_endpoints {
                if unknown_set.insert(node.to_string()) {
                    out.unknown_nodes.push(node.to_string());
                }
            }
            out.invalid.push(reject(RejectionReason::UnknownNode));
            continue;
        }

        let Some(type_name) = type_name else {
            out.invalid
                .push(reject(RejectionReason::UnsupportedConnectionType));
            continue;
        };
        let connection_type = ConnectionType::parse(type_name);
        if !universe.allows_type(&connection_type) {
            tracing::debug!(connection_type = %connection_type, "connection type not in case vocabulary");
            out.invalid
                .push(reject(RejectionReason::UnsupportedConnectionType));
            continue;
        }

        let connection = Connection::new(from, to, connection_type);
        if !seen_keys.insert(connection.key()) {
            out.invalid.push(reject(RejectionReason::Duplicate));
            continue;
        }

        for endpoint in [from, to] {
            if node_set.insert(endpoint.to_string()) {
                out.theory.nodes.push(endpoint.to_string());
            }
        }
        out.theory.connections.push(connection);
    }

    out
}

fn clean(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn rejected(raw: &RawConnection, reason: RejectionReason, key: Option<String>) -> InvalidConnection {
    InvalidConnection {
        from: raw.from.clone(),
        to: raw.to.clone(),
        connection_type: raw.connection_type.clone(),
        reason,
        key,
    }
}
