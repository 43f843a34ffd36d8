// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Depth-bounded crawl starting from a seed URL
// - Optional same-domain restriction
// - Each page fetched at most once per run
//
// Submodules:
// - fetch: the PageFetcher capability and its reqwest implementation
// - queue: the crawl loop itself
// =============================================================================

mod fetch;
mod queue;

pub use fetch::{HttpFetcher, PageFetcher};
pub use queue::{normalize_seed, Crawler};
