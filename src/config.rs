// src/config.rs
// =============================================================================
// Run configuration.
//
// Everything that tunes a run (timeouts, worker count, crawl depth, ...)
// lives in one CheckerConfig value that is handed to the HTTP client
// builder, the crawler and the verification pipeline. There are no
// process-wide settings.
// =============================================================================

use std::time::Duration;

use crate::cli::Cli;
use crate::error::{LinkError, Result};
use crate::report::ReportFormat;

/// Identifies us to the servers we crawl and probe
pub const DEFAULT_USER_AGENT: &str = concat!(
    "link-crawler/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/vswaroop04/link-crawler)"
);

pub const DEFAULT_WORKERS: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct CheckerConfig {
    /// Timeout applied to every single network call
    pub timeout: Duration,
    /// Size of the verification worker pool
    pub workers: usize,
    /// Maximum traversal distance from the seed (seed = 0)
    pub max_depth: usize,
    /// Drop links whose host differs from the seed's host
    pub same_domain: bool,
    pub user_agent: String,
    /// Report format, if a report file should be written
    pub output: Option<ReportFormat>,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            workers: DEFAULT_WORKERS,
            max_depth: 0,
            same_domain: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            output: None,
        }
    }
}

impl CheckerConfig {
    // Builds and validates a config from parsed command-line arguments
    //
    // Clap already guarantees the types; here we check the ranges that
    // would make a run meaningless (zero workers, zero timeout).
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        if cli.workers == 0 {
            return Err(LinkError::Config("--workers must be at least 1".to_string()));
        }
        if cli.timeout == 0 {
            return Err(LinkError::Config("--timeout must be at least 1 second".to_string()));
        }

        let user_agent = match &cli.user_agent {
            Some(ua) if ua.trim().is_empty() => {
                return Err(LinkError::Config("--user-agent must not be empty".to_string()));
            }
            Some(ua) => ua.clone(),
            None => DEFAULT_USER_AGENT.to_string(),
        };

        Ok(Self {
            timeout: Duration::from_secs(cli.timeout),
            workers: cli.workers,
            max_depth: cli.depth,
            same_domain: cli.same_domain,
            user_agent,
            output: cli.output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Cli {
        let mut full = vec!["link-crawler", "https://example.com"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_from_cli_defaults_match_default() {
        let config = CheckerConfig::from_cli(&parse(&[])).unwrap();
        assert_eq!(config, CheckerConfig::default());
    }

    #[test]
    fn test_from_cli_carries_flags() {
        let config =
            CheckerConfig::from_cli(&parse(&["--same-domain", "-d", "3", "-w", "2", "-t", "5", "-o", "json"]))
                .unwrap();
        assert!(config.same_domain);
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.workers, 2);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.output, Some(ReportFormat::Json));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let err = CheckerConfig::from_cli(&parse(&["-w", "0"])).unwrap_err();
        assert!(matches!(err, LinkError::Config(_)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = CheckerConfig::from_cli(&parse(&["-t", "0"])).unwrap_err();
        assert!(matches!(err, LinkError::Config(_)));
    }

    #[test]
    fn test_blank_user_agent_rejected() {
        let err = CheckerConfig::from_cli(&parse(&["--user-agent", "  "])).unwrap_err();
        assert!(matches!(err, LinkError::Config(_)));
    }
}
