// Fetch-then-score pipeline
use chrono::{DateTime, Utc};
use tracing::info;

use crate::{
    models::{RepositoryRecord, ScoredRepository, SearchQuery},
    scoring::{days_since, PopularityScorer, SimplePopularityScorer},
    search::{fetch_all, PageFetcher},
    Result,
};

/// Fetches every allowed page for a query and scores each repository.
///
/// Whether an access token is configured is decided once, here, and only
/// affects the page cap.
pub struct ScoringPipeline {
    fetcher: Box<dyn PageFetcher>,
    scorer: Box<dyn PopularityScorer>,
    has_auth_token: bool,
}

impl ScoringPipeline {
    pub fn new(fetcher: Box<dyn PageFetcher>, has_auth_token: bool) -> Self {
        Self::with_scorer(fetcher, Box::new(SimplePopularityScorer), has_auth_token)
    }

    pub fn with_scorer(
        fetcher: Box<dyn PageFetcher>,
        scorer: Box<dyn PopularityScorer>,
        has_auth_token: bool,
    ) -> Self {
        Self {
            fetcher,
            scorer,
            has_auth_token,
        }
    }

    /// Fetch and score, measuring recency against the current time
    pub async fn run(&self, query: &SearchQuery) -> Result<Vec<ScoredRepository>> {
        self.run_at(query, Utc::now()).await
    }

    /// Same as [`run`](Self::run) with an explicit "now"
    pub async fn run_at(
        &self,
        query: &SearchQuery,
        now: DateTime<Utc>,
    ) -> Result<Vec<ScoredRepository>> {
        let repositories = fetch_all(self.fetcher.as_ref(), query, self.has_auth_token).await?;

        let scored: Vec<ScoredRepository> = repositories
            .into_iter()
            .map(|repository| self.score_repository(repository, now))
            .collect();

        info!("Scored {} repositories", scored.len());
        Ok(scored)
    }

    fn score_repository(&self, repository: RepositoryRecord, now: DateTime<Utc>) -> ScoredRepository {
        let days = days_since(repository.pushed_at, now);
        let popularity_score = self.scorer.score(repository.stars, repository.forks, days);

        ScoredRepository {
            repository,
            popularity_score,
        }
    }
}
