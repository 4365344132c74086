use serde::{Deserialize, Serialize};

use super::defaults;
use crate::errors::ConfigError;

/// Theory scoring configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Weight of the connection F1 score in the blended accuracy. Default: 0.85.
    pub connection_weight: f64,
    /// Weight of solution node coverage in the blended accuracy. Default: 0.15.
    pub node_weight: f64,
    /// Accuracy deducted per invalid connection. Default: 0.05.
    pub invalid_penalty_per_connection: f64,
    /// Upper bound on the invalid-connection penalty. Default: 0.15.
    pub max_invalid_penalty: f64,
    /// Maximum number of hints returned with a verdict. Default: 3.
    pub max_hints: usize,
    /// Threshold used when neither the caller nor the case supplies one. Default: 0.7.
    pub default_threshold: f64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            connection_weight: defaults::DEFAULT_CONNECTION_WEIGHT,
            node_weight: defaults::DEFAULT_NODE_WEIGHT,
            invalid_penalty_per_connection: defaults::DEFAULT_INVALID_PENALTY_PER_CONNECTION,
            max_invalid_penalty: defaults::DEFAULT_MAX_INVALID_PENALTY,
            max_hints: defaults::DEFAULT_MAX_HINTS,
            default_threshold: defaults::DEFAULT_ACCURACY_THRESHOLD,
        }
    }
}

impl ValidatorConfig {
    /// Penalty for `invalid_count` rejected connections.
    pub fn invalid_penalty(&self, invalid_count: usize) -> f64 {
        (self.invalid_penalty_per_connection * invalid_count as f64).min(self.max_invalid_penalty)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.connection_weight < 0.0 || self.node_weight < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "validator.connection_weight",
                reason: "weights must be non-negative".into(),
            });
        }
        if ((self.connection_weight + self.node_weight) - 1.0).abs() > 1e-9 {
            return Err(ConfigError::InvalidValue {
                field: "validator.node_weight",
                reason: format!(
                    "connection_weight + node_weight must equal 1.0, got {}",
                    self.connection_weight + self.node_weight
                ),
            });
        }
        if !is_threshold(self.default_threshold) {
            return Err(ConfigError::InvalidValue {
                field: "validator.default_threshold",
                reason: format!("must be in (0, 1], got {}", self.default_threshold),
            });
        }
        if self.invalid_penalty_per_connection < 0.0 || self.max_invalid_penalty < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "validator.max_invalid_penalty",
                reason: "penalties must be non-negative".into(),
            });
        }
        Ok(())
    }
}

/// Whether `value` is a usable accuracy threshold.
pub fn is_threshold(value: f64) -> bool {
    value > 0.0 && value <= 1.0
}
