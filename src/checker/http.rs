// src/checker/http.rs
// =============================================================================
// This module checks if URLs are alive by making HTTP requests.
//
// Key functionality:
// - Makes an HTTP HEAD request first (lightweight, no body download)
// - Escalates to a full GET when HEAD looks wrong (status >= 400, or a
//   transport error the GET might not hit)
// - Treats the GET as ground truth when the two disagree
// - Describes transport failures (timeout, DNS, TLS, ...) in plain words
//
// Why escalate? Some servers answer HEAD with 405 Method Not Allowed or
// 404 but serve the page fine on GET.
// =============================================================================

use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, Response};

use crate::config::CheckerConfig;
use crate::error::Result;

/// Redirects followed automatically by every request
pub const MAX_REDIRECTS: usize = 10;

// The verdict for one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The server answered with a status below 400
    Healthy(u16),
    /// The authoritative response had a status >= 400
    BrokenStatus(u16),
    /// No response at all (DNS, connection refused, timeout, TLS, ...)
    BrokenTransport(String),
}

impl Outcome {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Outcome::Healthy(_))
    }

    // The reason recorded in the broken-link list and report file
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Healthy(code) | Outcome::BrokenStatus(code) => write!(f, "{}", code),
            Outcome::BrokenTransport(description) => f.write_str(description),
        }
    }
}

// Anything that can decide whether a URL is alive
//
// The pipeline only talks to this trait, so tests can plug in a fake
// without a network.
#[async_trait]
pub trait Verify: Send + Sync {
    async fn verify(&self, url: &str) -> Outcome;
}

// Builds the HTTP client shared by the crawler and the verifier
//
// One client means one connection pool; cloning it is cheap (it's an Arc
// internally).
pub fn build_client(config: &CheckerConfig) -> Result<Client> {
    let client = Client::builder()
        .timeout(config.timeout)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(client)
}

// HEAD-then-GET verifier backed by reqwest
#[derive(Debug, Clone)]
pub struct LinkVerifier {
    client: Client,
}

impl LinkVerifier {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    // Full GET - its answer is final
    async fn fetch_fallback(&self, url: &str) -> Outcome {
        match self.client.get(url).send().await {
            Ok(response) => classify_status(&response),
            Err(e) => Outcome::BrokenTransport(describe_error(&e)),
        }
    }
}

#[async_trait]
impl Verify for LinkVerifier {
    async fn verify(&self, url: &str) -> Outcome {
        // First, try a HEAD request (faster, no body download)
        match self.client.head(url).send().await {
            Ok(response) if response.status().as_u16() < 400 => {
                Outcome::Healthy(response.status().as_u16())
            }
            Ok(response) => {
                tracing::debug!(url, status = response.status().as_u16(), "HEAD rejected, retrying with GET");
                self.fetch_fallback(url).await
            }
            Err(e) if escalates(&e) => {
                tracing::debug!(url, error = %e, "HEAD failed, retrying with GET");
                self.fetch_fallback(url).await
            }
            Err(e) => Outcome::BrokenTransport(describe_error(&e)),
        }
    }
}

// Maps an HTTP status to an outcome
//
// HTTP status codes:
// - 100-399: the resource answered (redirects were already followed)
// - 400-499: Client error (404 not found, 410 gone, ...)
// - 500-599: Server error
fn classify_status(response: &Response) -> Outcome {
    let code = response.status().as_u16();
    if code < 400 {
        Outcome::Healthy(code)
    } else {
        Outcome::BrokenStatus(code)
    }
}

// Decides whether a failed HEAD is worth a GET
//
// Timeouts and connection failures (DNS, refused, unreachable) will fail
// the same way with any verb, so only the remaining errors - resets, bad
// responses to HEAD, body/decode errors - escalate.
fn escalates(error: &reqwest::Error) -> bool {
    !(error.is_timeout() || error.is_connect())
}

// Turns a reqwest error into a human-readable description
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure
// - SSL certificate issues
// - Too many redirects
// - etc.
pub(crate) fn describe_error(error: &reqwest::Error) -> String {
    let detail = error_chain(error);
    let lowered = detail.to_lowercase();

    let category = if error.is_timeout() {
        "Request timed out"
    } else if error.is_redirect() {
        "Too many redirects"
    } else if lowered.contains("certificate") || lowered.contains("tls") || lowered.contains("ssl") {
        "SSL/TLS error"
    } else if error.is_connect() {
        if lowered.contains("dns") || lowered.contains("resolve") || lowered.contains("lookup") {
            "Could not resolve hostname"
        } else {
            "Connection failed"
        }
    } else {
        "Request failed"
    };

    format!("{}: {}", category, detail)
}

// reqwest's Display only shows the outermost error; the interesting part
// (e.g. "Connection refused") is usually a few sources down
fn error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = std::error::Error::source(inner);
    }
    message
}
