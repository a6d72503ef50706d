// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - localize: download every CDN asset and rewrite the references
// - scan:     only list what `localize` would do, changing nothing
//
// Both take the project root plus a few options that end up in a
// Settings value (see settings.rs).
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::settings::{DEFAULT_ASSET_DIR, DEFAULT_CONCURRENCY, DEFAULT_ORIGIN};

#[derive(Parser, Debug)]
#[command(
    name = "cdn-localizer",
    version,
    about = "Download CDN-hosted assets referenced in a project and point the references at local copies",
    long_about = "cdn-localizer walks a project, finds URLs that start with a CDN origin \
                  (Discord's CDN by default), saves each asset under <project>/public and \
                  rewrites the reference to the local path. Everything else in the files is left \
                  byte-for-byte as it was."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download assets and rewrite references in place
    ///
    /// Example: cdn-localizer localize ./my-site
    Localize {
        #[command(flatten)]
        common: CommonArgs,

        /// How many assets of one file are downloaded at the same time
        #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
        concurrency: usize,
    },

    /// List the CDN URLs that `localize` would replace, without changing anything
    ///
    /// Example: cdn-localizer scan ./my-site --json
    Scan {
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Root directory of the project
    pub project_root: PathBuf,

    /// URL prefix that marks the assets to download
    #[arg(long, default_value = DEFAULT_ORIGIN)]
    pub origin: String,

    /// Directory under the project root where assets are saved
    #[arg(long, default_value = DEFAULT_ASSET_DIR)]
    pub asset_dir: String,

    /// Skip files whose path contains this text (repeatable)
    ///
    /// Giving this flag replaces the default list: .git, node_modules, __pycache__
    #[arg(long = "exclude", value_name = "FRAGMENT")]
    pub excludes: Vec<String>,

    /// Print the summary as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}
