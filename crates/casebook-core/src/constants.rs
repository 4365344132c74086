/// Separator between endpoints in a canonical connection key.
pub const CONNECTION_ARROW: &str = "→";

/// Separator between the endpoint pair and the type in a canonical connection key.
pub const CONNECTION_TYPE_SEPARATOR: &str = "::";

/// Separator used inside contradiction composite keys.
pub const CONTRADICTION_KEY_SEPARATOR: &str = "|";

/// Prefix for fact ids synthesized from statement text.
pub const SYNTHETIC_FACT_PREFIX: &str = "fact:";

/// Number of hex characters kept from the statement hash when synthesizing a fact id.
pub const SYNTHETIC_FACT_HASH_LEN: usize = 16;

/// Snapshot format version written by `CaseManager::serialize`.
pub const SNAPSHOT_VERSION: u32 = 1;
