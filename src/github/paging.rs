// Page assembly for starred repositories.
// Combines pages from any source into one ordered, deduplicated list.

use std::collections::HashSet;

use log::{debug, info};

use crate::error::Result;
use crate::star::StarRecord;

use super::types::StarPage;

/// Something that can return starred repositories one page at a time.
///
/// Pages are numbered from 1.
#[allow(async_fn_in_trait)]
pub trait StarSource {
    async fn fetch_page(&mut self, username: &str, page: u32) -> Result<StarPage>;
}

/// Fetch every page for `username` and concatenate them in order.
///
/// Paging stops when a page advertises no next page or comes back empty.
/// A repository repeated across a page boundary is kept once, at its first
/// position. Errors from the source are returned unchanged.
pub async fn fetch_all<S: StarSource>(source: &mut S, username: &str) -> Result<Vec<StarRecord>> {
    let mut records = Vec::new();
    let mut seen = HashSet::new();
    let mut page = 1;
    info!("Fetching stars for {}, page 1...", username);

    loop {
        let StarPage {
            records: batch,
            has_next,
            last_page,
        } = source.fetch_page(username, page).await?;

        let fetched = batch.len();
        for record in batch {
            if seen.insert(record.full_name.clone()) {
                records.push(record);
            } else {
                debug!("skipping duplicate {} on page {}", record.full_name, page);
            }
        }

        if !has_next || fetched == 0 {
            break;
        }

        page += 1;
        match last_page {
            Some(last) => info!("Fetching page {} of {}...", page, last),
            None => info!("Fetching page {}...", page),
        }
    }

    info!("Fetched {} starred repositories for {}", records.len(), username);
    Ok(records)
}
