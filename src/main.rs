// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Crawl from the given URL to collect links
// 3. Check every link concurrently and print progress as checks finish
// 4. Print a summary, optionally write a report file
// 5. Exit with proper code (0 = all healthy, 2 = broken links, 1 = fatal)
// =============================================================================

mod checker; // src/checker/ - link extraction and checking
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - run configuration
mod crawl; // src/crawl/ - website crawling
mod error; // src/error.rs - error types
mod report; // src/report.rs - report files

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use url::Url;

use checker::{Disposition, LinkVerifier, Outcome, RunSummary, VerificationPipeline, Verify};
use cli::Cli;
use config::CheckerConfig;
use crawl::{Crawler, HttpFetcher, PageFetcher};
use error::LinkError;

#[tokio::main]
async fn main() {
    init_tracing();

    let exit_code = match Cli::try_parse() {
        Ok(cli) => match run(cli).await {
            Ok(summary) => summary.disposition.exit_code(),
            Err(e) => {
                eprintln!("Error: {:#}", e);
                Disposition::Fatal.exit_code()
            }
        },
        Err(e) => {
            // --help / --version land here too; those print to stdout and succeed.
            // If even that write fails there is nowhere left to report it.
            e.print().ok();
            if e.use_stderr() {
                Disposition::Fatal.exit_code()
            } else {
                0
            }
        }
    };

    std::process::exit(exit_code);
}

// Diagnostics go to stderr so they never mix with the progress output.
// RUST_LOG overrides the default level (e.g. RUST_LOG=link_crawler=debug).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("link_crawler=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// Validates the arguments, wires up the HTTP-backed crawler and verifier,
// runs the scan, and writes the report if one was requested
async fn run(cli: Cli) -> Result<RunSummary> {
    // Everything that can be rejected is rejected before any network activity
    let config = CheckerConfig::from_cli(&cli)?;
    let seed = crawl::normalize_seed(&cli.url)?;

    let client = checker::build_client(&config)?;
    let fetcher = Arc::new(HttpFetcher::new(client.clone()));
    let verifier = Arc::new(LinkVerifier::new(client));

    let summary = scan(&seed, &config, fetcher, verifier).await?;

    if let Some(format) = config.output {
        let path = report::write_report(Path::new("."), format, &summary.broken)
            .with_context(|| format!("failed to write {}", format.file_name()))?;
        println!("\n💾 Report written to {}", path.display());
    }

    Ok(summary)
}

// seed -> crawl -> verify -> summary
async fn scan(
    seed: &Url,
    config: &CheckerConfig,
    fetcher: Arc<dyn PageFetcher>,
    verifier: Arc<dyn Verify>,
) -> Result<RunSummary> {
    println!("🔍 Scanning {} ...", seed);
    if config.max_depth > 0 {
        println!("📊 Max crawl depth: {}", config.max_depth);
    }

    let crawler = Crawler::new(fetcher);
    let crawled = crawler.crawl(seed, config.max_depth, config.same_domain).await?;

    println!("📄 Crawled {} page(s)", crawled.fetched.len());

    if crawled.links.is_empty() {
        return Err(LinkError::NoLinks(seed.to_string()).into());
    }

    println!("\n🌐 Checking {} unique link(s)...\n", crawled.links.len());

    let mut pipeline = VerificationPipeline::new(verifier, config.workers);
    let summary = pipeline.run(crawled.links, print_progress).await;
    tracing::debug!(state = ?pipeline.state(), total = summary.total, "verification finished");

    print_summary(&summary);
    Ok(summary)
}

// One line per finished check, in completion order
fn print_progress(url: &str, outcome: &Outcome) {
    if outcome.is_healthy() {
        println!("[OK] {} -> {}", url, outcome);
    } else {
        println!("[BROKEN] {} -> {}", url, outcome);
    }
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("📊 Summary:");
    println!("   📋 Total links checked: {}", summary.total);
    println!("   ✅ OK: {}", summary.healthy);
    println!("   ❌ Broken: {}", summary.broken.len());

    if !summary.broken.is_empty() {
        println!("\nList of broken links:");
        for (url, reason) in &summary.broken {
            println!(" - {} ({})", url, reason);
        }
    }
}
