// Error types for findstar.
// Covers GitHub API failures, cache read/write problems, and configuration errors.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FindstarError {
    #[error("no cached stars for this user")]
    CacheMissing,

    #[error("cache file is unreadable: {0}")]
    CorruptCache(String),

    #[error("GitHub API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("GitHub API rate limit exceeded{}", retry_hint(.reset_at))]
    RateLimited { reset_at: Option<DateTime<Utc>> },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("invalid request header: {0}")]
    InvalidHeader(String),

    #[error("could not determine a cache directory; set FINDSTAR_CACHE_DIR")]
    NoCacheDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FindstarError {
    /// True for errors that are recovered by fetching fresh data.
    pub fn is_cache_miss(&self) -> bool {
        matches!(
            self,
            FindstarError::CacheMissing | FindstarError::CorruptCache(_)
        )
    }
}

fn retry_hint(reset_at: &Option<DateTime<Utc>>) -> String {
    match reset_at {
        Some(at) => format!(", try again after {}", at.format("%H:%M:%S UTC")),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, FindstarError>;
