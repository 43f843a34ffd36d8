// src/error.rs
// =============================================================================
// Error types shared by the crawler, the verifier and the report sink.
//
// Taxonomy:
// - Config / InvalidUrl: bad user input, rejected before any network activity
// - Fetch: a page could not be retrieved during the crawl (swallowed there)
// - SeedFetch: the seed page itself could not be retrieved (fatal)
// - NoLinks: the crawl finished without discovering anything to check (fatal)
//
// Broken links are NOT errors - they are Outcomes carried in the RunSummary.
// =============================================================================

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, LinkError>;

#[derive(Error, Debug)]
pub enum LinkError {
    /// A URL could not be parsed or has an unsupported scheme
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A command-line value failed validation
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A page could not be fetched during the crawl
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The seed page could not be fetched, so there is nothing to check
    #[error("Cannot proceed without the seed page {url}: {reason}")]
    SeedFetch { url: String, reason: String },

    /// The crawl produced an empty link set
    #[error("No links found on {0}")]
    NoLinks(String),

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LinkError {
    pub fn invalid_url(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn fetch(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
