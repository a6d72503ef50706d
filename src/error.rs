// src/error.rs
// =============================================================================
// Typed errors for the parts of the tool that can fail.
//
// main.rs still works with anyhow::Result. These enums exist so the file
// processor can tell a failed download (skip the line, keep going) apart
// from a file it could not write (skip the file).
// =============================================================================

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while downloading one asset.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server answered HTTP {status}")]
    Status { status: u16 },

    #[error("could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure that stops one file from being processed.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not create asset directory {}: {source}", path.display())]
    AssetDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Invalid command-line configuration.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid origin '{origin}': {reason}")]
    Origin { origin: String, reason: String },

    #[error("invalid asset directory name '{0}': must be a single, non-empty path component")]
    AssetDir(String),

    #[error("concurrency must be at least 1")]
    Concurrency,
}
