use thiserror::Error;

use domain::ConfigError;

use crate::ports::out_::StoreError;

#[derive(Debug, Error)]
pub enum MatchmakerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("matchmaker is already running")]
    AlreadyRunning,
}

impl From<ConfigError> for MatchmakerError {
    fn from(err: ConfigError) -> Self {
        MatchmakerError::InvalidArgument(err.to_string())
    }
}
