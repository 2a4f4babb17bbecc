use repopulse_api::GitHubError;
use thiserror::Error;

/// All the ways a RepoPulse run can fail
#[derive(Error, Debug)]
pub enum Error {
    /// Upstream condition reported by the search API, passed through untouched
    #[error(transparent)]
    GitHub(#[from] GitHubError),

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// The upstream failure behind this error, if there is one
    pub fn as_github(&self) -> Option<&GitHubError> {
        match self {
            Error::GitHub(e) => Some(e),
            _ => None,
        }
    }
}
