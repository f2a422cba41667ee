// Cache store for reading and writing a user's star list.
// Handles JSON serialization, gzip compression, and atomic file replacement.

use std::collections::HashSet;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{FindstarError, Result};
use crate::star::StarRecord;

use super::paths;

/// Version written into every cache file. Files with any other version are
/// treated as corrupt and refetched.
pub const FORMAT_VERSION: u32 = 1;

/// Snapshot of a user's starred repositories at fetch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub username: String,
    /// Informational only; entries never expire on their own.
    pub fetched_at: DateTime<Utc>,
    /// In the order the API returned them.
    pub records: Vec<StarRecord>,
}

impl CacheEntry {
    pub fn new(username: impl Into<String>, records: Vec<StarRecord>) -> Self {
        Self {
            username: username.into(),
            fetched_at: Utc::now(),
            records,
        }
    }

    /// Check the invariants a loaded entry must hold for `username`.
    fn validate(&self, username: &str) -> std::result::Result<(), String> {
        if paths::username_key(&self.username) != paths::username_key(username) {
            return Err(format!(
                "entry belongs to {:?}, expected {:?}",
                self.username, username
            ));
        }

        let mut seen = HashSet::with_capacity(self.records.len());
        for record in &self.records {
            if record.full_name.is_empty() {
                return Err("record with empty fullName".to_string());
            }
            if !seen.insert(record.full_name.as_str()) {
                return Err(format!("duplicate record {}", record.full_name));
            }
        }
        Ok(())
    }
}

/// On-disk envelope around a cache entry.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheFile<E> {
    format_version: u32,
    #[serde(flatten)]
    entry: E,
}

/// Reads and writes cache entries under a fixed root directory.
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the cache file for `username`.
    pub fn entry_path(&self, username: &str) -> PathBuf {
        paths::stars_path(&self.root, username)
    }

    /// Load the cached entry for `username`.
    ///
    /// Returns `CacheMissing` when no file exists and `CorruptCache` when the
    /// file cannot be decompressed, parsed, or fails validation. Other read
    /// failures surface as `Io`.
    pub fn load(&self, username: &str) -> Result<CacheEntry> {
        let path = self.entry_path(username);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(FindstarError::CacheMissing);
            }
            Err(e) => return Err(e.into()),
        };

        let entry = decode(&bytes).map_err(FindstarError::CorruptCache)?;
        entry
            .validate(username)
            .map_err(FindstarError::CorruptCache)?;

        debug!(
            "loaded {} records for {} from {}",
            entry.records.len(),
            username,
            path.display()
        );
        Ok(entry)
    }

    /// Replace the cached entry for `entry.username`.
    ///
    /// The new file is fully written and synced under a temporary name, then
    /// renamed into place. On failure the temporary file is removed and the
    /// previous entry, if any, is left untouched.
    pub fn save(&self, entry: &CacheEntry) -> Result<()> {
        let path = self.entry_path(&entry.username);
        let bytes = encode(entry)?;
        write_atomic(&path, &bytes)?;

        debug!(
            "saved {} records for {} to {}",
            entry.records.len(),
            entry.username,
            path.display()
        );
        Ok(())
    }
}

fn encode(entry: &CacheEntry) -> Result<Vec<u8>> {
    let file = CacheFile {
        format_version: FORMAT_VERSION,
        entry,
    };
    let json = serde_json::to_vec(&file).map_err(io::Error::from)?;

    let mut encoder = GzEncoder::new(Vec::with_capacity(json.len() / 4), Compression::default());
    encoder.write_all(&json)?;
    Ok(encoder.finish()?)
}

fn decode(bytes: &[u8]) -> std::result::Result<CacheEntry, String> {
    let mut json = Vec::new();
    GzDecoder::new(bytes)
        .read_to_end(&mut json)
        .map_err(|e| format!("decompression failed: {e}"))?;

    // Peek at the version first so a format change reads as a version
    // mismatch rather than a schema error.
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Version {
        format_version: Option<u32>,
    }
    let version: Version =
        serde_json::from_slice(&json).map_err(|e| format!("invalid JSON: {e}"))?;
    if version.format_version != Some(FORMAT_VERSION) {
        return Err(format!(
            "format version {:?}, expected {}",
            version.format_version, FORMAT_VERSION
        ));
    }

    let file: CacheFile<CacheEntry> =
        serde_json::from_slice(&json).map_err(|e| format!("invalid entry: {e}"))?;
    Ok(file.entry)
}

/// Write bytes to `path` via a synced temporary file and a rename.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = paths::temp_path(path);
    let written = (|| -> io::Result<()> {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&temp_path, path)
    })();

    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }
    Ok(())
}
