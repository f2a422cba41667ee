//! # findstar
//!
//! Grep over the repositories a GitHub user has starred.
//!
//! Stars are fetched once through the GitHub REST API, stored as compressed
//! JSON in a per-user cache file, and filtered locally by keyword against
//! each repository's name, description, language, and topics. The cache is
//! only refreshed on request.
//!
//! - [`star`]: the searchable record for one starred repository
//! - [`cache`]: loading and atomically saving cache entries
//! - [`github`]: the API client and page assembly
//! - [`matcher`]: AND/OR keyword filtering
//! - [`finder`]: cache-or-fetch orchestration
//! - [`report`]: terminal output

pub mod cache;
pub mod config;
pub mod error;
pub mod finder;
pub mod github;
pub mod matcher;
pub mod report;
pub mod star;

pub use error::{FindstarError, Result};
