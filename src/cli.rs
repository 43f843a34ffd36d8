// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// There is a single command: give it a URL, it crawls (optionally) and then
// checks every link it found. All flags end up in a CheckerConfig
// (see config.rs) - nothing here is read as global state.
// =============================================================================

use clap::Parser;

use crate::report::ReportFormat;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
#[derive(Parser, Debug)]
#[command(
    name = "link-crawler",
    version,
    about = "Crawl a website and report broken links",
    long_about = "link-crawler fetches a page, optionally follows its links a few levels deep, \
                  and checks every discovered link over HTTP. \
                  Exit code 0 = all links healthy, 2 = broken links found, 1 = fatal error."
)]
pub struct Cli {
    /// URL of the page to scan (e.g., https://example.com)
    ///
    /// A missing scheme defaults to http://
    pub url: String,

    /// Only collect and follow links on the same host as the starting URL
    #[arg(long)]
    pub same_domain: bool,

    /// How many link hops to follow from the starting page
    ///
    /// 0 = check only the links on the starting page
    /// 1 = also fetch those pages and check their links
    /// etc.
    #[arg(short = 'd', long, default_value_t = 0)]
    pub depth: usize,

    /// Write the broken links to broken_links.<format>
    #[arg(short = 'o', long, value_enum)]
    pub output: Option<ReportFormat>,

    /// Number of links checked concurrently
    #[arg(short = 'w', long, default_value_t = 10)]
    pub workers: usize,

    /// Per-request timeout in seconds
    #[arg(short = 't', long, default_value_t = 10)]
    pub timeout: u64,

    /// User-Agent header sent with every request
    #[arg(long)]
    pub user_agent: Option<String>,
}
