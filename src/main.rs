// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Turn them into validated Settings
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = success, 1 = some downloads/files failed,
//    2 = error)
// =============================================================================

mod cli;        // src/cli.rs - command-line parsing
mod error;      // src/error.rs - typed errors
mod fetch;      // src/fetch/ - downloading assets
mod logging;    // src/logging.rs - tracing setup
mod process;    // src/process/ - files and project trees
mod report;     // src/report.rs - console output
mod rewrite;    // src/rewrite/ - finding and replacing URLs in a line
mod settings;   // src/settings.rs - run configuration

use anyhow::{bail, Result};
use clap::Parser;
use std::path::Path;
use tracing::info;

use cli::{Cli, CommonArgs, Commands};
use fetch::HttpFetcher;
use settings::{Settings, DEFAULT_CONCURRENCY};

#[tokio::main]
async fn main() {
    logging::init_logging();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = every asset localized (or nothing to do)
//   Ok(1) = finished, but some downloads or files failed
//   Err   = bad arguments or unexpected error
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Localize { common, concurrency } => {
            let settings = settings_from(&common, concurrency)?;
            handle_localize(&common.project_root, &settings, common.json).await
        }
        Commands::Scan { common } => {
            let settings = settings_from(&common, DEFAULT_CONCURRENCY)?;
            handle_scan(&common.project_root, &settings, common.json).await
        }
    }
}

fn settings_from(common: &CommonArgs, concurrency: usize) -> Result<Settings> {
    if !common.project_root.is_dir() {
        bail!("project root is not a directory: {}", common.project_root.display());
    }

    Ok(Settings::new(
        common.origin.clone(),
        common.asset_dir.clone(),
        common.excludes.clone(),
        concurrency,
    )?)
}

// Handles the 'localize' subcommand
async fn handle_localize(root: &Path, settings: &Settings, json: bool) -> Result<i32> {
    if !json {
        println!("🔍 Localizing {} URLs in {}", settings.origin, root.display());
    }
    info!(root = %root.display(), origin = %settings.origin, "starting localize run");

    let fetcher = HttpFetcher::new()?;
    let summary = process::localize_tree(root, settings, &fetcher, |path, changed_lines| {
        if !json {
            println!("{}", report::format_rewrite_line(path, changed_lines));
        }
    })
    .await;

    report::print_summary(&summary, json)?;

    Ok(if summary.is_clean() { 0 } else { 1 })
}

// Handles the 'scan' subcommand
async fn handle_scan(root: &Path, settings: &Settings, json: bool) -> Result<i32> {
    if !json {
        println!("🔍 Scanning {} for {} URLs", root.display(), settings.origin);
    }

    let scan = process::scan_tree(root, settings).await;
    report::print_scan(&scan, json)?;

    Ok(0)
}
