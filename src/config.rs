//! Configuration objects for the validation engine.
//!
//! The core never reads environment variables or files for its settings.
//! Callers build an `EngineConfig` (or deserialize one) and hand it to the
//! service, which checks it once with [`validate_config`].
use crate::error::EngineError;
use crate::validation::ValidationOptions;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Evaluate active rules on the rayon pool.
    pub parallel: bool,
    /// Options applied when a caller passes none.
    pub default_options: ValidationOptions,
    pub load_path: LoadPathConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            default_options: ValidationOptions::default(),
            load_path: LoadPathConfig::default(),
        }
    }
}

/// Limits for feature load analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadPathConfig {
    /// Largest acceptable drop between source pin and load pin, in volts.
    pub max_voltage_drop_volts: f64,
}

impl Default for LoadPathConfig {
    fn default() -> Self {
        Self { max_voltage_drop_volts: 0.5 }
    }
}

pub fn validate_config(cfg: &EngineConfig) -> Result<(), EngineError> {
    let drop = cfg.load_path.max_voltage_drop_volts;
    if !drop.is_finite() || drop <= 0.0 {
        return Err(EngineError::InvalidConfig(format!(
            "max_voltage_drop_volts must be a positive number, got {}",
            drop
        )));
    }

    if let Some(filter) = &cfg.default_options.rule_filter {
        if filter.iter().any(|id| id.trim().is_empty()) {
            return Err(EngineError::InvalidConfig(
                "default rule filter contains an empty rule id".to_string(),
            ));
        }
    }

    Ok(())
}
