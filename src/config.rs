// Runtime configuration.
// Resolved once at startup from the environment and passed down explicitly.

use std::path::PathBuf;

use crate::cache::default_cache_dir;
use crate::error::{FindstarError, Result};
use crate::github::client::GITHUB_API_BASE;

/// Largest page size the starred endpoint accepts.
pub const DEFAULT_PER_PAGE: u32 = 100;

pub const CACHE_DIR_VAR: &str = "FINDSTAR_CACHE_DIR";
pub const API_URL_VAR: &str = "FINDSTAR_API_URL";
pub const TOKEN_VAR: &str = "GITHUB_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding per-user cache files.
    pub cache_root: PathBuf,
    pub api_base: String,
    /// Optional bearer token; only raises the rate limit.
    pub token: Option<String>,
    pub per_page: u32,
}

impl Config {
    pub fn new(cache_root: impl Into<PathBuf>) -> Self {
        Self {
            cache_root: cache_root.into(),
            api_base: GITHUB_API_BASE.to_string(),
            token: None,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Build a configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from any variable lookup. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let cache_root = var(CACHE_DIR_VAR)
            .map(PathBuf::from)
            .or_else(default_cache_dir)
            .ok_or(FindstarError::NoCacheDir)?;

        let mut config = Self::new(cache_root);
        if let Some(api_base) = var(API_URL_VAR) {
            config.api_base = api_base;
        }
        config.token = var(TOKEN_VAR);
        Ok(config)
    }
}
