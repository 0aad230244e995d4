//! Error types for configuration loading and validation.

use thiserror::Error;

/// Errors raised while loading or validating configuration.
///
/// Every variant is fatal: no scenario is built from a configuration that
/// fails validation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Scenario type tag with no registered variant.
    #[error("unknown scenario type: {0}")]
    UnknownScenarioType(String),

    /// Object type tag outside the known catalog.
    #[error("unknown object type: {0}")]
    UnknownObjectType(String),

    /// Simulation mode tag outside the known set.
    #[error("unknown simulation mode: {0}")]
    UnknownSimulationMode(String),

    /// A sampling bound has `min > max` or is not finite.
    #[error("invalid {axis} bounds: [{min}, {max}]")]
    InvalidBounds {
        /// Axis name (`x`, `roll`, ...).
        axis: &'static str,
        /// Configured minimum.
        min: f64,
        /// Configured maximum.
        max: f64,
    },

    /// Grid layout parameters that cannot place copies.
    #[error("invalid display layout: {0}")]
    InvalidLayout(String),

    /// Model list too short or otherwise unusable.
    #[error("invalid model list: {0}")]
    InvalidModels(String),

    /// Trial parameters that cannot be scheduled.
    #[error("invalid trial parameters: {0}")]
    InvalidTrials(String),

    /// Any other invalid value.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// Reading the configuration file failed.
    #[error("IO error: {0}")]
    Io(String),

    /// The configuration file is not valid JSON for the expected shape.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ConfigError {
    /// Creates an invalid layout error.
    #[must_use]
    pub fn invalid_layout(reason: impl Into<String>) -> Self {
        Self::InvalidLayout(reason.into())
    }

    /// Creates an invalid models error.
    #[must_use]
    pub fn invalid_models(reason: impl Into<String>) -> Self {
        Self::InvalidModels(reason.into())
    }

    /// Creates an invalid trials error.
    #[must_use]
    pub fn invalid_trials(reason: impl Into<String>) -> Self {
        Self::InvalidTrials(reason.into())
    }

    /// Creates a generic invalid configuration error.
    #[must_use]
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid(reason.into())
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
