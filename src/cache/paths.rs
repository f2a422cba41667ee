// Cache path utilities.
// Resolves the cache root and the per-user file inside it.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// File name of a user's compressed star list.
pub const STARS_FILE: &str = "stars.json.gz";

/// Platform cache directory (~/.cache/findstar on Linux).
pub fn default_cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "findstar").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Case-insensitive identity of a username. Two names with the same key
/// share one cache entry.
pub fn username_key(username: &str) -> String {
    username.to_lowercase()
}

/// Directory holding one user's cache files.
pub fn user_dir(root: &Path, username: &str) -> PathBuf {
    root.join(sanitize_name(&username_key(username)))
}

/// Path to a user's cached star list.
pub fn stars_path(root: &Path, username: &str) -> PathBuf {
    user_dir(root, username).join(STARS_FILE)
}

/// Sibling path written first and renamed over the live file.
pub fn temp_path(path: &Path) -> PathBuf {
    path.with_extension("tmp")
}

/// Sanitize a name for use in filesystem paths.
/// Replaces problematic characters with underscores.
fn sanitize_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect();

    match sanitized.as_str() {
        "" | "." | ".." => format!("_{sanitized}"),
        _ => sanitized,
    }
}
