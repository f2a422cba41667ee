// GitHub API module.
// Provides the client, wire types, and page assembly for starred repositories.

pub mod client;
pub mod endpoints;
pub mod paging;
pub mod types;

pub use client::GitHubClient;
pub use paging::{StarSource, fetch_all};
pub use types::{StarPage, StarredRepo};
