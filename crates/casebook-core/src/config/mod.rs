//! Engine configuration, loadable from TOML.
//!
//! Every section is optional; missing keys fall back to [`defaults`].

mod cases_config;
pub mod defaults;
mod observability_config;
mod validator_config;

pub use cases_config::CasesConfig;
pub use observability_config::ObservabilityConfig;
pub use validator_config::{is_threshold, ValidatorConfig};

use serde::{Deserialize, Serialize};

use crate::errors::{CasebookResult, ConfigError};

/// Root configuration for the whole engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CasebookConfig {
    pub validator: ValidatorConfig,
    pub cases: CasesConfig,
    pub observability: ObservabilityConfig,
}

impl CasebookConfig {
    /// Parse a TOML document and validate the result.
    pub fn from_toml(source: &str) -> CasebookResult<Self> {
        let config: Self = toml::from_str(source).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validator.validate()?;
        self.cases.validate()
    }
}
