// GitHub API response types.
// Defines the subset of the starred-repository payload findstar reads.

use serde::Deserialize;

use crate::star::StarRecord;

/// Repository object from `GET /users/{user}/starred`.
///
/// Unknown fields are ignored; only `full_name` and `html_url` are required.
#[derive(Debug, Clone, Deserialize)]
pub struct StarredRepo {
    pub full_name: String,
    pub html_url: String,
    pub description: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
}

impl From<StarredRepo> for StarRecord {
    fn from(repo: StarredRepo) -> Self {
        StarRecord::new(repo.full_name, repo.html_url)
            .with_description(repo.description.unwrap_or_default())
            .with_language(repo.language.unwrap_or_default())
            .with_topics(repo.topics)
    }
}

/// GitHub error body, e.g. `{"message": "Not Found", ...}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Default)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: Option<u64>,
    /// Unix timestamp when the window resets.
    pub reset: Option<i64>,
}

/// Page links parsed from a `Link` response header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub next: Option<u32>,
    pub last: Option<u32>,
}

/// One page of starred repositories.
#[derive(Debug, Clone, Default)]
pub struct StarPage {
    pub records: Vec<StarRecord>,
    /// Whether the API advertised a following page.
    pub has_next: bool,
    /// Total page count when known.
    pub last_page: Option<u32>,
}
