// src/report.rs
// =============================================================================
// Console output.
//
// While a run is going we print one line per rewritten file:
//
//   docs/readme.md                                          3 CDN URLs
//
// At the end we print a short summary table, or the whole summary as JSON
// when --json is given.
// =============================================================================

use anyhow::Result;
use std::path::Path;

use crate::process::{RunSummary, ScanReport};

const PATH_WIDTH: usize = 80;
const COUNT_WIDTH: usize = 20;
const COUNT_LABEL: &str = "CDN URLs";

// Formats the progress line for a rewritten file
//
// Paths longer than the column are cut and end in "..."
pub fn format_rewrite_line(path: &Path, changed_lines: usize) -> String {
    let path = path.display().to_string();
    let path = if path.chars().count() > PATH_WIDTH {
        let kept: String = path.chars().take(PATH_WIDTH - 3).collect();
        format!("{}...", kept)
    } else {
        path
    };

    format!(
        "{:<path_width$}{:>count_width$}",
        path,
        format!("{} {}", changed_lines, COUNT_LABEL),
        path_width = PATH_WIDTH,
        count_width = COUNT_WIDTH,
    )
}

pub fn print_summary(summary: &RunSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!();
    println!("📊 Summary:");
    println!("   📄 Files visited:   {}", summary.files_visited);
    println!("   🙈 Files excluded:  {}", summary.files_excluded);
    println!("   ✏️  Files rewritten: {}", summary.files_rewritten);
    println!("   📥 Assets saved:    {}", summary.assets_fetched);
    if summary.fetch_failures > 0 {
        println!("   ❌ Failed downloads: {}", summary.fetch_failures);
    }
    if summary.file_failures > 0 {
        println!("   ⚠️  Failed files:    {}", summary.file_failures);
    }
    Ok(())
}

pub fn print_scan(report: &ScanReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    for file in &report.files {
        println!("{}", file.path.display());
        for found in &file.urls {
            let saved_as = found.filename.as_deref().unwrap_or("(no file name, kept)");
            println!("   {:>5}: {} -> {}", found.line, found.url, saved_as);
        }
    }

    let total: usize = report.files.iter().map(|file| file.urls.len()).sum();
    println!();
    println!(
        "📊 {} URL(s) in {} of {} file(s)",
        total,
        report.files.len(),
        report.files_visited
    );
    Ok(())
}
