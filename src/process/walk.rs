// src/process/walk.rs
// =============================================================================
// Walks a project directory and runs the file processor on every file.
//
// Which files are looked at:
// - every regular file under the project root, at any depth
// - EXCEPT files whose path contains one of the excluded fragments
//   (".git", "node_modules", "__pycache__" by default)
//
// Note the exclusion is a plain substring test on the whole path, so
// ".git" also excludes ".github/" and "notes.gitkeep".
//
// Symlinks to files are processed like the files they point to. Symlinks to
// directories are not followed.
//
// The file list is collected before anything is rewritten, so assets saved
// into public/ during the run are not walked again.
// =============================================================================

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};
use walkdir::WalkDir;

use crate::fetch::{AssetDir, AssetFetcher};
use crate::process::file::{FileOutcome, FileProcessor};
use crate::rewrite::{inspect_line, LinePlan, SkipReason};
use crate::settings::{Settings, MARKDOWN_EXTENSION};

/// Files the walk found, split into the ones to process and a count of
/// the ones left out.
#[derive(Debug, Default)]
pub struct Candidates {
    pub files: Vec<PathBuf>,
    pub excluded: usize,
}

/// A file that was rewritten, as listed in the JSON summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewrittenFile {
    pub path: PathBuf,
    pub changed_lines: usize,
}

/// Totals for a `localize` run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub files_visited: usize,
    pub files_excluded: usize,
    pub files_not_text: usize,
    pub files_rewritten: usize,
    pub lines_replaced: usize,
    pub assets_fetched: usize,
    pub fetch_failures: usize,
    pub file_failures: usize,
    pub rewritten: Vec<RewrittenFile>,
}

impl RunSummary {
    /// True when every download and every file went through
    pub fn is_clean(&self) -> bool {
        self.fetch_failures == 0 && self.file_failures == 0
    }
}

/// One qualifying URL found by `scan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoundUrl {
    /// 1-based line number
    pub line: usize,
    pub url: String,
    /// None when no file name can be derived (the URL would be left alone)
    pub filename: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub urls: Vec<FoundUrl>,
}

/// Result of a read-only `scan` run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub files_visited: usize,
    pub files_excluded: usize,
    pub files: Vec<ScannedFile>,
}

// Lists every candidate file under `root`
//
// Unreadable directory entries are logged and skipped rather than failing
// the whole walk.
pub fn candidate_files(root: &Path, excludes: &[String]) -> Candidates {
    let mut candidates = Candidates::default();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };

        // Symlinked files are kept (the link target gets rewritten);
        // symlinked directories are not descended into
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if !is_file {
            continue;
        }

        let path = entry.into_path();
        if is_excluded(&path, excludes) {
            debug!(path = %path.display(), "excluded");
            candidates.excluded += 1;
            continue;
        }

        candidates.files.push(path);
    }

    candidates
}

/// True if any exclusion fragment appears anywhere in the path
pub fn is_excluded(path: &Path, excludes: &[String]) -> bool {
    let path = path.to_string_lossy();
    excludes.iter().any(|fragment| path.contains(fragment.as_str()))
}

/// Markdown files get the asset directory in their local paths
pub fn is_markdown(path: &Path) -> bool {
    path.to_string_lossy().ends_with(MARKDOWN_EXTENSION)
}

// Localizes every candidate file under `root`, one file at a time
//
// `on_rewrite` is called with the path and changed-line count of each file
// as soon as it has been written back.
pub async fn localize_tree(
    root: &Path,
    settings: &Settings,
    fetcher: &dyn AssetFetcher,
    mut on_rewrite: impl FnMut(&Path, usize),
) -> RunSummary {
    let candidates = candidate_files(root, &settings.excludes);
    let assets = AssetDir::new(root, &settings.asset_dir);
    let processor = FileProcessor::new(settings, &assets, fetcher);

    let mut summary = RunSummary {
        files_excluded: candidates.excluded,
        ..RunSummary::default()
    };

    for path in candidates.files {
        summary.files_visited += 1;

        let report = match processor.process(&path, is_markdown(&path)).await {
            Ok(report) => report,
            Err(e) => {
                error!(error = %e, "file not processed");
                summary.file_failures += 1;
                continue;
            }
        };

        summary.assets_fetched += report.assets_fetched;
        summary.fetch_failures += report.fetch_failures;
        summary.lines_replaced += report.lines_replaced;

        match report.outcome {
            FileOutcome::Rewritten { changed_lines } => {
                on_rewrite(&path, changed_lines);
                summary.files_rewritten += 1;
                summary.rewritten.push(RewrittenFile {
                    path,
                    changed_lines,
                });
            }
            FileOutcome::Skipped {
                reason: SkipReason::NotText,
            } => summary.files_not_text += 1,
            _ => {}
        }
    }

    summary
}

// Lists every qualifying URL under `root` without downloading or writing
pub async fn scan_tree(root: &Path, settings: &Settings) -> ScanReport {
    let candidates = candidate_files(root, &settings.excludes);
    let mut report = ScanReport {
        files_excluded: candidates.excluded,
        ..ScanReport::default()
    };

    for path in candidates.files {
        report.files_visited += 1;

        let text = match tokio::fs::read(&path).await {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(_) => continue,
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read file");
                continue;
            }
        };

        let urls: Vec<FoundUrl> = text
            .split_inclusive('\n')
            .enumerate()
            .filter_map(|(index, line)| {
                let (span, filename) = match inspect_line(line, &settings.origin) {
                    LinePlan::NoUrl => return None,
                    LinePlan::NoFilename(span) => (span, None),
                    LinePlan::Localize { span, filename } => (span, Some(filename.to_string())),
                };
                Some(FoundUrl {
                    line: index + 1,
                    url: span.url.to_string(),
                    filename,
                })
            })
            .collect();

        if !urls.is_empty() {
            report.files.push(ScannedFile { path, urls });
        }
    }

    report
}
