use thiserror::Error;

use crate::roster::RosterError;
use crate::schedule::ScheduleError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn config_error(message: impl Into<String>) -> Self {
        AppError::Config(message.into())
    }
}
