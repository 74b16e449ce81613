use thiserror::Error;

use crate::game_config::ValidationErrors;

#[derive(Debug, Error)]
pub enum SpotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid game config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown sample game '{0}'")]
    UnknownSample(String),

    #[error("Game config is not valid: {0}")]
    InvalidConfig(ValidationErrors),

    #[error("Game config has no difference regions")]
    NoRegions,

    #[error("Results log error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T, E = SpotError> = std::result::Result<T, E>;
