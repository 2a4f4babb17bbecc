// GitHub provider implementation - bridges the API client with the PageFetcher trait
use async_trait::async_trait;
use repopulse_api::{GitHubClient, GitHubError, GitHubRepo, GitHubSearchResponse};

use crate::{
    models::{RepositoryRecord, SearchPage, SearchQuery},
    search::PageFetcher,
};

/// Wrapper around GitHubClient that implements PageFetcher
pub struct GitHubProvider {
    client: GitHubClient,
}

impl GitHubProvider {
    pub fn new(client: GitHubClient) -> Self {
        Self { client }
    }

    /// Whether requests go out with an access token
    pub fn is_authenticated(&self) -> bool {
        self.client.has_token()
    }
}

#[async_trait]
impl PageFetcher for GitHubProvider {
    async fn fetch_page(
        &self,
        query: &SearchQuery,
        page: u32,
    ) -> Result<SearchPage, GitHubError> {
        let q = build_search_query(query);
        let response = self
            .client
            .search_repositories(&q, page, query.page_size())
            .await?;

        Ok(github_to_page(response))
    }
}

/// Build the `q` parameter for the search endpoint.
///
/// `created:>=<date>` and `language:<lang>` in that order, space separated,
/// each clause left out when its filter is unset.
pub fn build_search_query(query: &SearchQuery) -> String {
    let mut parts = Vec::with_capacity(2);

    if let Some(date) = query.earliest_creation_date() {
        parts.push(format!("created:>={}", date.format("%Y-%m-%d")));
    }

    if let Some(lang) = query.language() {
        parts.push(format!("language:{}", lang));
    }

    parts.join(" ")
}

fn github_to_page(response: GitHubSearchResponse) -> SearchPage {
    SearchPage {
        total_count: response.total_count,
        incomplete_results: response.incomplete_results,
        items: response.items.into_iter().map(github_to_record).collect(),
    }
}

/// Convert GitHub API repo to our internal record
fn github_to_record(gh: GitHubRepo) -> RepositoryRecord {
    RepositoryRecord {
        id: gh.id,
        name: gh.full_name,
        url: gh.html_url,
        created_at: gh.created_at,
        // never pushed: creation is the last activity
        pushed_at: gh.pushed_at.unwrap_or(gh.created_at),
        stars: gh.stargazers_count,
        forks: gh.forks_count,
        language: gh.language,
    }
}
