// Core logic: paginated fetching, popularity scoring and the pipeline tying them together
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod pipeline;
pub mod providers;
pub mod scoring;
pub mod search;

pub use config::Config;
pub use error::Error;
pub use export::{ExportFormat, Exporter};
pub use models::{parse_creation_date, RepositoryRecord, ScoredRepository, SearchPage, SearchQuery};
pub use pipeline::ScoringPipeline;
pub use providers::GitHubProvider;
pub use scoring::{PopularityScorer, SimplePopularityScorer};
pub use search::{fetch_all, PageFetcher};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
