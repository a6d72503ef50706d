// src/rewrite/mod.rs
// =============================================================================
// This module contains the line-level logic: finding a CDN URL in a line,
// naming the file it will be saved as, and swapping it for a local path.
//
// Submodules:
// - span: Finds where a URL starts and ends inside a line
// - filename: Derives the local file name from a URL
// - line: Rewrites the line once the asset is saved
//
// Nothing in here touches the network or the filesystem, which keeps it
// easy to test line by line.
// =============================================================================

mod filename;
mod line;
mod span;

pub use filename::derive_filename;
pub use line::{local_reference, rewrite_line};
pub use span::{extract_url, UrlSpan};

/// Why a line (or a whole file) was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The URL has no path segment to name a file after
    NoFilename,
    /// Downloading the asset failed, so the URL was kept
    FetchFailed,
    /// The file is not valid UTF-8
    NotText,
}

/// What happened to one line of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Unchanged,
    Replaced(String),
    Skipped(SkipReason),
}

/// What a line asks for, before anything is downloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinePlan<'a> {
    /// No qualifying URL in the line
    NoUrl,
    /// A URL was found but no file name could be derived from it
    NoFilename(UrlSpan<'a>),
    /// The asset at `span.url` should be saved as `filename`
    Localize { span: UrlSpan<'a>, filename: &'a str },
}

// Runs span extraction and filename derivation for one line
pub fn inspect_line<'a>(line: &'a str, origin: &str) -> LinePlan<'a> {
    let Some(span) = extract_url(line, origin) else {
        return LinePlan::NoUrl;
    };

    match derive_filename(span.url) {
        Some(filename) => LinePlan::Localize { span, filename },
        None => LinePlan::NoFilename(span),
    }
}
