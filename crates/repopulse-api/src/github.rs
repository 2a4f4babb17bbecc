use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{classify_status, Result};

pub const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";
const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const SEARCH_REPOSITORIES_PATH: &str = "/search/repositories";

/// Thin client over the GitHub repository search endpoint.
///
/// One call to [`GitHubClient::search_repositories`] is exactly one HTTP
/// request, never retried. Paging is up to the caller.
pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
    base_url: String,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Result<Self> {
        Self::with_base_url(token, GITHUB_API_BASE.to_string())
    }

    /// For GitHub Enterprise or a local stand-in
    pub fn with_base_url(token: Option<String>, base_url: String) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            client,
            // An empty token is the same as no token at all
            token: token.filter(|t| !t.trim().is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Build the request for one page of search results without sending it
    pub fn search_request(&self, query: &str, page: u32, per_page: u32) -> Result<reqwest::Request> {
        let url = format!("{}{}", self.base_url, SEARCH_REPOSITORIES_PATH);

        let mut request = self
            .client
            .get(&url)
            .query(&[
                ("q", query.to_string()),
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
            ])
            .header(ACCEPT, GITHUB_ACCEPT)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .header(USER_AGENT, concat!("RepoPulse/", env!("CARGO_PKG_VERSION")));

        if let Some(ref token) = self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        Ok(request.build()?)
    }

    /// Fetch one page of repositories matching `query`
    pub async fn search_repositories(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<GitHubSearchResponse> {
        let request = self.search_request(query, page, per_page)?;
        debug!("GET {} (page {}, per_page {})", request.url().path(), page, per_page);

        let response = self.client.execute(request).await?;
        let status = response.status();

        if let Some(error) = classify_status(status) {
            warn!("GitHub search failed on page {}: {}", page, error);
            return Err(error);
        }

        let body = response.bytes().await?;
        let page_response: GitHubSearchResponse = serde_json::from_slice(&body)?;
        Ok(page_response)
    }
}

/// Body of a `/search/repositories` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubSearchResponse {
    pub total_count: u64,
    /// Decoded for completeness; pagination never looks at it.
    #[serde(default)]
    pub incomplete_results: bool,
    #[serde(default)]
    pub items: Vec<GitHubRepo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRepo {
    pub id: u64,
    pub full_name: String,
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    /// Null for repositories that never received a push
    pub pushed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    pub language: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_FIXTURE: &str = r#"{
        "total_count": 2,
        "incomplete_results": false,
        "items": [
            {
                "id": 1296269,
                "node_id": "MDEwOlJlcG9zaXRvcnkxMjk2MjY5",
                "full_name": "octocat/Hello-World",
                "html_url": "https://github.com/octocat/Hello-World",
                "created_at": "2011-01-26T19:01:12Z",
                "pushed_at": "2011-01-26T19:06:43Z",
                "stargazers_count": 80,
                "forks_count": 9,
                "language": "Rust"
            },
            {
                "id": 42,
                "full_name": "octocat/empty",
                "html_url": "https://github.com/octocat/empty",
                "created_at": "2024-03-01T00:00:00Z",
                "pushed_at": null,
                "stargazers_count": 0,
                "forks_count": 0,
                "language": null
            }
        ]
    }"#;

    #[test]
    fn test_decode_search_response() {
        let response: GitHubSearchResponse = serde_json::from_str(SEARCH_FIXTURE).unwrap();

        assert_eq!(response.total_count, 2);
        assert!(!response.incomplete_results);
        assert_eq!(response.items.len(), 2);

        let first = &response.items[0];
        assert_eq!(first.id, 1296269);
        assert_eq!(first.full_name, "octocat/Hello-World");
        assert_eq!(first.stargazers_count, 80);
        assert_eq!(first.forks_count, 9);
        assert_eq!(first.language.as_deref(), Some("Rust"));
        assert!(first.pushed_at.is_some());

        let second = &response.items[1];
        assert!(second.pushed_at.is_none());
        assert!(second.language.is_none());
    }

    #[test]
    fn test_decode_rejects_missing_total_count() {
        let result = serde_json::from_str::<GitHubSearchResponse>(r#"{"items": []}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_search_request_carries_pagination_and_query() {
        let client = GitHubClient::with_base_url(None, "https://example.test/".to_string()).unwrap();
        let request = client
            .search_request("created:>=2024-01-01 language:rust", 3, 50)
            .unwrap();

        let url = request.url();
        assert_eq!(url.host_str(), Some("example.test"));
        assert_eq!(url.path(), "/search/repositories");

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("q".to_string(), "created:>=2024-01-01 language:rust".to_string()),
                ("page".to_string(), "3".to_string()),
                ("per_page".to_string(), "50".to_string()),
            ]
        );

        let headers = request.headers();
        assert_eq!(headers.get(ACCEPT).unwrap(), GITHUB_ACCEPT);
        assert_eq!(headers.get("X-GitHub-Api-Version").unwrap(), GITHUB_API_VERSION);
        assert!(headers.get(USER_AGENT).is_some());
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_bearer_token_is_sent_when_configured() {
        let client = GitHubClient::new(Some("ghp_secret".to_string())).unwrap();
        assert!(client.has_token());

        let request = client.search_request("", 1, 100).unwrap();
        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap(),
            "Bearer ghp_secret"
        );
    }

    #[test]
    fn test_empty_token_counts_as_unauthenticated() {
        let client = GitHubClient::new(Some("   ".to_string())).unwrap();
        assert!(!client.has_token());

        let request = client.search_request("", 1, 100).unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }
}
