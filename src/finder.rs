// Search orchestration.
// Decides between the cache and a fresh fetch, refreshes the cache, then filters.

use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::cache::{CacheEntry, CacheStore};
use crate::error::{FindstarError, Result};
use crate::github::{StarSource, fetch_all};
use crate::matcher::{Query, filter_records};
use crate::star::StarRecord;

/// One invocation's inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub username: String,
    pub query: Query,
    /// Skip the cache read and refetch.
    pub flush: bool,
}

/// Where the searched records came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Cache,
    Fetched,
}

/// Steps of a search. `Match` is followed by reporting the outcome; any
/// error ends the run without output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    TryCache,
    Fetch,
    Match { entry: CacheEntry, origin: Origin },
}

impl Step {
    /// The decision made at start: a flush goes straight to fetching.
    pub fn start(flush: bool) -> Self {
        if flush { Step::Fetch } else { Step::TryCache }
    }
}

/// Result of a successful search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub username: String,
    pub fetched_at: DateTime<Utc>,
    pub origin: Origin,
    /// Number of records searched.
    pub total: usize,
    /// Matching records in cache order.
    pub matches: Vec<StarRecord>,
}

/// Runs searches against a cache store and a star source.
pub struct Finder<S> {
    store: CacheStore,
    source: S,
}

impl<S: StarSource> Finder<S> {
    pub fn new(store: CacheStore, source: S) -> Self {
        Self { store, source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run one search to completion.
    pub async fn run(&mut self, request: &SearchRequest) -> Result<SearchOutcome> {
        let mut step = Step::start(request.flush);

        loop {
            step = match step {
                Step::TryCache => self.try_cache(&request.username)?,
                Step::Fetch => self.fetch(&request.username).await?,
                Step::Match { entry, origin } => {
                    return Ok(Self::search(entry, origin, &request.query));
                }
            };
        }
    }

    fn try_cache(&self, username: &str) -> Result<Step> {
        match self.store.load(username) {
            Ok(entry) => {
                info!(
                    "Using {} cached stars for {} (fetched {})",
                    entry.records.len(),
                    username,
                    entry.fetched_at.format("%Y-%m-%d %H:%M UTC")
                );
                Ok(Step::Match {
                    entry,
                    origin: Origin::Cache,
                })
            }
            Err(FindstarError::CorruptCache(reason)) => {
                warn!("Ignoring unreadable cache for {}: {}", username, reason);
                Ok(Step::Fetch)
            }
            Err(FindstarError::CacheMissing) => {
                info!("No cached stars for {}", username);
                Ok(Step::Fetch)
            }
            Err(e) => Err(e),
        }
    }

    async fn fetch(&mut self, username: &str) -> Result<Step> {
        let records = fetch_all(&mut self.source, username).await?;
        let entry = CacheEntry::new(username, records);
        self.store.save(&entry)?;

        Ok(Step::Match {
            entry,
            origin: Origin::Fetched,
        })
    }

    fn search(entry: CacheEntry, origin: Origin, query: &Query) -> SearchOutcome {
        let total = entry.records.len();
        let matches = filter_records(
            &entry.records,
            query.keywords(),
            query.mode(),
            query.case_sensitive(),
        );

        SearchOutcome {
            username: entry.username,
            fetched_at: entry.fetched_at,
            origin,
            total,
            matches,
        }
    }
}
