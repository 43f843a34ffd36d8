// src/crawl/queue.rs
// =============================================================================
// This module implements the bounded-depth website crawl.
//
// How it works:
// 1. Start with (seed, depth 0) on the work list
// 2. Pop an entry; skip it if already visited or deeper than max_depth
// 3. Fetch the page and extract its links
// 4. Record every link (after the optional same-domain filter)
// 5. If the page is shallower than max_depth, push its links at depth + 1
// 6. Repeat until the work list is empty
//
// The work list is a stack (last discovered, first fetched). Nothing relies
// on that order - the depth bound and the visited set hold either way.
//
// The crawl is sequential on purpose: the visited set and work list are
// owned by one loop, so they need no locking.
// =============================================================================

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use super::fetch::PageFetcher;
use crate::checker::{extract_html_links, is_checkable_scheme};
use crate::error::{LinkError, Result};

// One entry on the work list
#[derive(Debug, Clone)]
struct CrawlItem {
    url: String,
    depth: usize, // Link hops from the seed (seed = 0)
}

/// What a crawl found
#[derive(Debug, Clone, Default)]
pub struct CrawlResult {
    /// Every distinct link discovered within the depth bound and domain filter
    pub links: BTreeSet<String>,
    /// Pages that were fetched, in fetch order
    pub fetched: Vec<String>,
}

// Turns user input into the URL the crawl starts from
//
// - "example.com" becomes "http://example.com/" (missing scheme -> http)
// - the fragment is dropped
// - only http/https URLs with a host are accepted
pub fn normalize_seed(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    let mut url = Url::parse(&candidate).map_err(|e| LinkError::invalid_url(raw, e))?;

    if !is_checkable_scheme(&url) {
        return Err(LinkError::invalid_url(raw, "only http and https URLs are supported"));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(LinkError::invalid_url(raw, "URL has no host"));
    }

    url.set_fragment(None);
    Ok(url)
}

pub struct Crawler {
    fetcher: Arc<dyn PageFetcher>,
}

impl Crawler {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    // Crawls from `seed`, following links up to `max_depth` hops
    //
    // Parameters:
    //   seed: the normalized starting URL
    //   max_depth: 0 = only the seed's own links, 1 = also the links on
    //              the pages it links to, etc.
    //   same_domain: drop links whose host differs from the seed's host
    //
    // Returns: the discovered links. A failed fetch of the seed page is an
    // error (there's nothing to check); failed fetches of other pages are
    // logged and their branch is simply not expanded.
    pub async fn crawl(&self, seed: &Url, max_depth: usize, same_domain: bool) -> Result<CrawlResult> {
        let seed_url = seed.to_string();
        let seed_host = seed.host_str().map(str::to_string);

        let mut stack = vec![CrawlItem {
            url: seed_url.clone(),
            depth: 0,
        }];
        let mut visited: HashSet<String> = HashSet::new();
        let mut result = CrawlResult::default();

        while let Some(item) = stack.pop() {
            if item.depth > max_depth || visited.contains(&item.url) {
                continue;
            }
            visited.insert(item.url.clone());

            debug!(url = %item.url, depth = item.depth, "fetching page");

            let html = match self.fetcher.fetch(&item.url).await {
                Ok(html) => html,
                Err(e) if item.depth == 0 => {
                    let reason = match e {
                        LinkError::Fetch { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    return Err(LinkError::SeedFetch {
                        url: seed_url,
                        reason,
                    });
                }
                Err(e) => {
                    warn!("{}", e);
                    continue;
                }
            };
            result.fetched.push(item.url.clone());

            for link in extract_html_links(&html, &item.url) {
                if same_domain && host_of(&link) != seed_host {
                    continue;
                }

                if item.depth < max_depth && !visited.contains(&link) {
                    stack.push(CrawlItem {
                        url: link.clone(),
                        depth: item.depth + 1,
                    });
                }
                result.links.insert(link);
            }
        }

        Ok(result)
    }
}

fn host_of(link: &str) -> Option<String> {
    Url::parse(link)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why a Vec as a stack instead of a VecDeque?
//    - the traversal order isn't part of the contract
//    - push()/pop() on a Vec is the simplest work list there is
//
// 2. Why check `visited` again when popping?
//    - the same URL can be pushed by several pages before it is fetched
//    - the pop-time check guarantees each URL is fetched at most once
//
// 3. Depth boundary:
//    - links found on a page at max_depth are recorded but never pushed
//    - so leaves at max_depth + 1 get checked but never fetched as pages
// -----------------------------------------------------------------------------
