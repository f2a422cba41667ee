// Cache module for the local star list.
// Stores each user's starred repositories as compressed JSON on disk.

pub mod paths;
pub mod store;

pub use paths::default_cache_dir;
pub use store::{CacheEntry, CacheStore, FORMAT_VERSION};
