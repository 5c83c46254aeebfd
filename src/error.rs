//! Error types for thermostat construction and wiring.

use std::path::PathBuf;

use thiserror::Error;

use crate::observer::ObserverId;

/// Result type for thermostat operations.
pub type ThermostatResult<T> = Result<T, ThermostatError>;

/// Errors that can occur while building or wiring a simulation.
///
/// Per-tick operations never fail; everything here surfaces at
/// construction time or while (de)registering observers.
#[derive(Debug, Error)]
pub enum ThermostatError {
    /// Invalid construction or command input.
    #[error("Invalid configuration: {what}")]
    Configuration { what: String },

    /// Attempted to detach an observer that is not registered.
    #[error("Observer {id} is not registered")]
    ObserverNotFound { id: ObserverId },

    /// Config file could not be read.
    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file contents are not valid YAML for [`SimulationConfig`](crate::SimulationConfig).
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
}

impl ThermostatError {
    pub(crate) fn configuration(what: impl Into<String>) -> Self {
        Self::Configuration { what: what.into() }
    }
}

/// Reject a non-finite value for the named field.
pub(crate) fn ensure_finite(field: &str, value: f64) -> ThermostatResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ThermostatError::configuration(format!(
            "{field} must be finite, got {value}"
        )))
    }
}
