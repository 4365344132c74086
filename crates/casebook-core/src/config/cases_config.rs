use serde::{Deserialize, Serialize};

use super::defaults;
use crate::errors::ConfigError;

/// Case bookkeeping configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CasesConfig {
    /// Threshold for cases that do not declare one. Default: 0.7.
    pub default_accuracy_threshold: f64,
    /// Whether presentation-only fx cues are announced. Default: true.
    pub emit_fx_cues: bool,
}

impl Default for CasesConfig {
    fn default() -> Self {
        Self {
            default_accuracy_threshold: defaults::DEFAULT_ACCURACY_THRESHOLD,
            emit_fx_cues: defaults::DEFAULT_EMIT_FX_CUES,
        }
    }
}

impl CasesConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !super::is_threshold(self.default_accuracy_threshold) {
            return Err(ConfigError::InvalidValue {
                field: "cases.default_accuracy_threshold",
                reason: format!("must be in (0, 1], got {}", self.default_accuracy_threshold),
            });
        }
        Ok(())
    }
}
