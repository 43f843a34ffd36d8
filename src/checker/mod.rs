// src/checker/mod.rs
// =============================================================================
// This module contains all link checking logic.
//
// Submodules:
// - html: Extracts links from HTML pages
// - http: Decides whether a single URL is alive (HEAD, then GET)
// - pipeline: Checks many URLs concurrently and summarizes the results
// =============================================================================

mod html;
mod http;
mod pipeline;

// Re-export public items from submodules
// This lets users write `checker::extract_html_links()` instead of
// `checker::html::extract_html_links()`
pub use html::extract_html_links;
pub(crate) use html::is_checkable_scheme;
pub use http::{build_client, LinkVerifier, Outcome, Verify};
pub(crate) use http::describe_error;
pub use pipeline::{Disposition, RunSummary, VerificationPipeline};
