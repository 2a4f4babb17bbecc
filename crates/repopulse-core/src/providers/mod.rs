// Page fetcher implementations for search backends
pub mod github;

pub use github::{build_search_query, GitHubProvider};
