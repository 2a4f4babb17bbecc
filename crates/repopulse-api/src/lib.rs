// GitHub search API client and its failure taxonomy
pub mod error;
pub mod github;

// Re-export common types
pub use error::{classify_status, GitHubError};
pub use github::{GitHubClient, GitHubRepo, GitHubSearchResponse, GITHUB_API_BASE};
