use reqwest::StatusCode;
use thiserror::Error;

/// Everything the GitHub search endpoint can hand back instead of a page.
///
/// The first five variants are upstream conditions signalled by status code.
/// `Network` and `Decode` cover the transport itself.
#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("Resource not modified since last request")]
    NotModified,

    #[error("Invalid request parameters for GitHub API")]
    InvalidQuery,

    #[error("GitHub API rate limit exceeded - try later or authenticate")]
    RateLimitExceeded,

    #[error("GitHub API service is currently unavailable")]
    UpstreamUnavailable,

    #[error("GitHub API returned status {status}")]
    Upstream { status: u16 },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GitHubError>;

impl GitHubError {
    /// HTTP status an outer layer should answer with for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            GitHubError::NotModified => StatusCode::NOT_MODIFIED.as_u16(),
            GitHubError::InvalidQuery => StatusCode::UNPROCESSABLE_ENTITY.as_u16(),
            GitHubError::RateLimitExceeded => StatusCode::FORBIDDEN.as_u16(),
            GitHubError::UpstreamUnavailable => StatusCode::SERVICE_UNAVAILABLE.as_u16(),
            GitHubError::Upstream { status } => *status,
            GitHubError::Network(_) | GitHubError::Decode(_) => StatusCode::BAD_GATEWAY.as_u16(),
        }
    }

    /// Short label for error reports
    pub fn kind(&self) -> &'static str {
        match self {
            GitHubError::NotModified => "not_modified",
            GitHubError::InvalidQuery => "invalid_query",
            GitHubError::RateLimitExceeded => "rate_limit_exceeded",
            GitHubError::UpstreamUnavailable => "upstream_unavailable",
            GitHubError::Upstream { .. } => "upstream_error",
            GitHubError::Network(_) => "network_error",
            GitHubError::Decode(_) => "decode_error",
        }
    }
}

/// Map a response status to the failure it stands for.
///
/// Returns `None` for success statuses, meaning the body should be decoded.
pub fn classify_status(status: StatusCode) -> Option<GitHubError> {
    if status.is_success() {
        return None;
    }

    let error = match status {
        StatusCode::NOT_MODIFIED => GitHubError::NotModified,
        StatusCode::UNPROCESSABLE_ENTITY => GitHubError::InvalidQuery,
        StatusCode::FORBIDDEN => GitHubError::RateLimitExceeded,
        StatusCode::SERVICE_UNAVAILABLE => GitHubError::UpstreamUnavailable,
        other => GitHubError::Upstream {
            status: other.as_u16(),
        },
    };

    Some(error)
}
