use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_PAGES: u32 = 1;
/// Upper bound on pages a single query may ask for
pub const MAX_PAGES: u32 = 30;
pub const MIN_PAGE_SIZE: u32 = 1;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_MAX_PAGES: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// What to search for and how many results to pull.
///
/// Page counts and sizes are clamped into range when the query is built,
/// never rejected. Fields are private so a constructed query can't drift
/// out of range afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    earliest_creation_date: Option<NaiveDate>,
    language: Option<String>,
    max_pages: u32,
    page_size: u32,
}

impl SearchQuery {
    pub fn new(
        earliest_creation_date: Option<NaiveDate>,
        language: Option<String>,
        max_pages: i64,
        page_size: i64,
    ) -> Self {
        Self {
            earliest_creation_date,
            language: language
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty()),
            max_pages: clamp(max_pages, MIN_PAGES, MAX_PAGES),
            page_size: clamp(page_size, MIN_PAGE_SIZE, MAX_PAGE_SIZE),
        }
    }

    pub fn earliest_creation_date(&self) -> Option<NaiveDate> {
        self.earliest_creation_date
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self::new(
            None,
            None,
            DEFAULT_MAX_PAGES as i64,
            DEFAULT_PAGE_SIZE as i64,
        )
    }
}

/// Parse an ISO `YYYY-MM-DD` date as accepted for `earliest_creation_date`
pub fn parse_creation_date(input: &str) -> crate::Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| crate::Error::InvalidDate(input.to_string()))
}

fn clamp(value: i64, min: u32, max: u32) -> u32 {
    value.clamp(min as i64, max as i64) as u32
}

/// One repository as reported by a search page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    pub id: u64,
    pub name: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub pushed_at: DateTime<Utc>,
    pub stars: u32,
    pub forks: u32,
    pub language: Option<String>,
}

/// A single decoded page. Lives only until its items are appended.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    pub total_count: u64,
    pub incomplete_results: bool,
    pub items: Vec<RepositoryRecord>,
}

/// A repository together with its popularity score (0.0 - 5.0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRepository {
    #[serde(flatten)]
    pub repository: RepositoryRecord,
    pub popularity_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query() {
        let query = SearchQuery::default();
        assert_eq!(query.max_pages(), 1);
        assert_eq!(query.page_size(), 100);
        assert!(query.earliest_creation_date().is_none());
        assert!(query.language().is_none());
    }

    #[test]
    fn test_max_pages_is_clamped() {
        let cases = [(0, 1), (1, 1), (15, 15), (30, 30), (31, 30), (-5, 1)];
        for (requested, expected) in cases {
            let query = SearchQuery::new(None, None, requested, 100);
            assert_eq!(query.max_pages(), expected, "max_pages={}", requested);
        }
    }

    #[test]
    fn test_page_size_is_clamped() {
        let cases = [(0, 1), (1, 1), (50, 50), (100, 100), (101, 100), (-10, 1)];
        for (requested, expected) in cases {
            let query = SearchQuery::new(None, None, 1, requested);
            assert_eq!(query.page_size(), expected, "page_size={}", requested);
        }
    }

    #[test]
    fn test_parse_valid_date() {
        let date = parse_creation_date("2023-01-15").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2023, 1, 15).unwrap());
    }

    #[test]
    fn test_reject_invalid_dates() {
        for input in ["2023/01/15", "15-01-2023", "01-15-2023", "2023-13-01", "2023-01-32", "invalid"] {
            let err = parse_creation_date(input).unwrap_err();
            assert!(
                matches!(err, crate::Error::InvalidDate(ref s) if s == input),
                "{} should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_blank_language_is_absent() {
        let query = SearchQuery::new(None, Some("  ".to_string()), 1, 100);
        assert!(query.language().is_none());

        let query = SearchQuery::new(None, Some(" rust ".to_string()), 1, 100);
        assert_eq!(query.language(), Some("rust"));
    }

    #[test]
    fn test_scored_repository_serializes_flat() {
        let scored = ScoredRepository {
            repository: RepositoryRecord {
                id: 7,
                name: "octocat/Hello-World".to_string(),
                url: "https://github.com/octocat/Hello-World".to_string(),
                created_at: "2024-01-01T00:00:00Z".parse().unwrap(),
                pushed_at: "2024-02-01T00:00:00Z".parse().unwrap(),
                stars: 10,
                forks: 2,
                language: None,
            },
            popularity_score: 0.01,
        };

        let json = serde_json::to_value(&scored).unwrap();
        assert_eq!(json["name"], "octocat/Hello-World");
        assert_eq!(json["stars"], 10);
        assert_eq!(json["popularity_score"], 0.01);
    }
}
