//! Domain error types.

use crate::domain::universe::UniverseError;

/// Top-level error type for rotator.
#[derive(Debug, thiserror::Error)]
pub enum RotatorError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("unknown rebalance periodicity: {0}")]
    UnknownPeriodicity(String),

    #[error("top_n must be at least 1, got {0}")]
    InvalidTopN(usize),

    #[error("heat_weight must lie in [0, 1], got {0}")]
    InvalidBlendWeight(f64),

    #[error("rank lists cover different asset sets: {reason}")]
    MismatchedAssetSets { reason: String },

    #[error("unknown signal: {0}")]
    UnknownSignal(String),

    #[error(transparent)]
    Universe(#[from] UniverseError),

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&RotatorError> for std::process::ExitCode {
    fn from(err: &RotatorError) -> Self {
        let code: u8 = match err {
            RotatorError::Io(_) => 1,
            RotatorError::ConfigParse { .. }
            | RotatorError::ConfigMissing { .. }
            | RotatorError::ConfigInvalid { .. } => 2,
            RotatorError::UnknownPeriodicity(_)
            | RotatorError::InvalidTopN(_)
            | RotatorError::InvalidBlendWeight(_)
            | RotatorError::MismatchedAssetSets { .. }
            | RotatorError::UnknownSignal(_)
            | RotatorError::Universe(_) => 3,
            RotatorError::Data { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
