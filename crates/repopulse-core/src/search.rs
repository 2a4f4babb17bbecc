use async_trait::async_trait;
use repopulse_api::GitHubError;
use tracing::{debug, info};

use crate::{
    models::{RepositoryRecord, SearchPage, SearchQuery},
    Result,
};

/// Page cap when requests carry an access token (higher upstream allowance)
pub const MAX_REQUESTS_WITH_TOKEN: u32 = 30;
/// Page cap for anonymous requests
pub const MAX_REQUESTS_WITHOUT_TOKEN: u32 = 10;

/// Source of single search result pages.
///
/// One call is one upstream request. Implementations must not retry and
/// must surface upstream conditions as the matching [`GitHubError`] variant.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(
        &self,
        query: &SearchQuery,
        page: u32,
    ) -> std::result::Result<SearchPage, GitHubError>;
}

/// Most pages one logical fetch may request
pub fn page_cap(has_auth_token: bool) -> u32 {
    if has_auth_token {
        MAX_REQUESTS_WITH_TOKEN
    } else {
        MAX_REQUESTS_WITHOUT_TOKEN
    }
}

/// `ceil(total_count / page_size)`
pub fn total_pages(total_count: u64, page_size: u32) -> u64 {
    let page_size = u64::from(page_size.max(1));
    total_count / page_size + u64::from(total_count % page_size != 0)
}

/// Number of page requests a fetch issues, page 1 included.
///
/// The first page is always requested since it is what reports the total.
pub fn pages_to_fetch(page_cap: u32, total_count: u64, page_size: u32) -> u32 {
    let pages = u64::from(page_cap).min(total_pages(total_count, page_size));
    // bounded by page_cap, so it fits
    (pages as u32).max(1)
}

/// Fetch every page the query and rate-limit budget allow, in order.
///
/// Pages are requested one at a time, ascending, and their items appended
/// as received. The first failure aborts the whole fetch; pages already
/// fetched are dropped.
pub async fn fetch_all(
    fetcher: &dyn PageFetcher,
    query: &SearchQuery,
    has_auth_token: bool,
) -> Result<Vec<RepositoryRecord>> {
    let cap = page_cap(has_auth_token).min(query.max_pages());

    debug!("Fetching page 1 (cap {} pages)", cap);
    let first = fetcher.fetch_page(query, 1).await?;

    let pages = pages_to_fetch(cap, first.total_count, query.page_size());
    debug!(
        "Upstream reports {} matches, fetching {} page(s)",
        first.total_count, pages
    );

    let mut repositories = first.items;
    for page in 2..=pages {
        debug!("Fetching page {} of {}", page, pages);
        let next = fetcher.fetch_page(query, page).await?;
        repositories.extend(next.items);
    }

    info!(
        "Fetched {} repositories across {} page(s)",
        repositories.len(),
        pages
    );

    Ok(repositories)
}
