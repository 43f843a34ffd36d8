// src/report.rs
// =============================================================================
// Writes the broken-link list to a file.
//
// Formats:
// - json: a pretty-printed list of [url, reason] pairs
// - csv:  a "URL,Error" header, then one row per broken link
//
// The file is always called broken_links.<format>.
// =============================================================================

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Json,
    Csv,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
        }
    }

    pub fn file_name(self) -> String {
        format!("broken_links.{}", self.extension())
    }
}

// Writes `broken` into `dir/broken_links.<ext>` and returns the path
pub fn write_report(dir: &Path, format: ReportFormat, broken: &[(String, String)]) -> Result<PathBuf> {
    let path = dir.join(format.file_name());

    let contents = match format {
        ReportFormat::Json => render_json(broken)?,
        ReportFormat::Csv => render_csv(broken),
    };

    fs::write(&path, contents)?;
    Ok(path)
}

fn render_json(broken: &[(String, String)]) -> Result<String> {
    // A (String, String) tuple serializes as a two-element array
    let mut json = serde_json::to_string_pretty(broken)?;
    json.push('\n');
    Ok(json)
}

fn render_csv(broken: &[(String, String)]) -> String {
    let mut csv = String::from("URL,Error\n");
    for (url, reason) in broken {
        csv.push_str(&csv_field(url));
        csv.push(',');
        csv.push_str(&csv_field(reason));
        csv.push('\n');
    }
    csv
}

// RFC 4180 quoting: wrap in quotes when needed, double any inner quote
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
