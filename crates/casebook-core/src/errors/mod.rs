mod config_error;

pub use config_error::ConfigError;

/// Top-level error type for the Casebook engine.
///
/// Only programming mistakes and I/O-shaped failures surface here.
/// Bad case content is logged and answered with a neutral value instead.
#[derive(Debug, thiserror::Error)]
pub enum CasebookError {
    #[error("case definition has no id")]
    MissingCaseId,

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Convenience alias used throughout the workspace.
pub type CasebookResult<T> = Result<T, CasebookError>;
