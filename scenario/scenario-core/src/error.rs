//! Error types for scenario orchestration.

use scenario_optim::OptimError;
use scenario_types::ConfigError;
use thiserror::Error;

use crate::actor::ActorId;

/// Errors raised while building or stepping scenarios.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScenarioError {
    /// Configuration rejected before or during build.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The pose optimizer failed; the step cannot continue.
    #[error("optimizer error: {0}")]
    Optimizer(#[from] OptimError),

    /// Random placement found no collision-free pose within the cap.
    #[error("copy {copy}: no collision-free placement after {attempts} attempts")]
    Placement {
        /// Copy index.
        copy: usize,
        /// Attempts made.
        attempts: usize,
    },

    /// The manipulation chain cursor was moved out of range.
    #[error("chain position {position} out of range for {len} manipulable slots")]
    ChainIndex {
        /// Requested position.
        position: usize,
        /// Chain length.
        len: usize,
    },

    /// A copy index with no instance.
    #[error("copy {0} does not exist")]
    UnknownCopy(usize),

    /// A handle the scene does not know.
    #[error("unknown actor: {0}")]
    UnknownActor(ActorId),

    /// Writing an output artifact failed.
    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ScenarioError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type for scenario operations.
pub type Result<T> = std::result::Result<T, ScenarioError>;
