// src/process/file.rs
// =============================================================================
// Localizes the CDN URLs of a single file.
//
// How it works:
// 1. Read the file; if it isn't UTF-8 text, skip it
// 2. Split it into lines, keeping each line's terminator
// 3. Work out which lines reference an asset and under which file name
// 4. Download every distinct file name once (a few at a time); when
//    several URLs share a name, the last one is downloaded
// 5. Rewrite the lines whose download succeeded
// 6. Write the file back, but only if something changed
//
// A failed download leaves that line's URL as it was. The rest of the file
// is still rewritten.
// =============================================================================

use futures::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{FetchError, ProcessError};
use crate::fetch::{AssetDir, AssetFetcher};
use crate::rewrite::{inspect_line, local_reference, rewrite_line, LineOutcome, LinePlan, SkipReason};
use crate::settings::Settings;

/// What happened to a file as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Nothing to replace (or every download failed); file not written
    Unchanged,
    /// File written back; `changed_lines` counts distinct new lines
    Rewritten { changed_lines: usize },
    /// File not processed at all
    Skipped { reason: SkipReason },
}

/// Result of processing one file, with counters for the run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub outcome: FileOutcome,
    pub lines_replaced: usize,
    pub assets_fetched: usize,
    pub fetch_failures: usize,
}

impl FileReport {
    fn untouched(outcome: FileOutcome) -> Self {
        Self {
            outcome,
            lines_replaced: 0,
            assets_fetched: 0,
            fetch_failures: 0,
        }
    }
}

pub struct FileProcessor<'a> {
    settings: &'a Settings,
    assets: &'a AssetDir,
    fetcher: &'a dyn AssetFetcher,
}

impl<'a> FileProcessor<'a> {
    pub fn new(settings: &'a Settings, assets: &'a AssetDir, fetcher: &'a dyn AssetFetcher) -> Self {
        Self {
            settings,
            assets,
            fetcher,
        }
    }

    // Processes one file
    //
    // `prefix_with_asset_dir` is true for markdown files: their local paths
    // become "/public/<name>" instead of "/<name>".
    pub async fn process(
        &self,
        path: &Path,
        prefix_with_asset_dir: bool,
    ) -> Result<FileReport, ProcessError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ProcessError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let Ok(text) = String::from_utf8(bytes) else {
            debug!(path = %path.display(), "not UTF-8 text, skipping");
            return Ok(FileReport::untouched(FileOutcome::Skipped {
                reason: SkipReason::NotText,
            }));
        };

        let lines: Vec<&str> = text.split_inclusive('\n').collect();
        let plans: Vec<LinePlan> = lines
            .iter()
            .map(|line| inspect_line(line, &self.settings.origin))
            .collect();

        // One download per file name; a later URL with the same name
        // replaces the earlier one (last write wins)
        let mut slots: HashMap<&str, usize> = HashMap::new();
        let mut downloads: Vec<(&str, &str)> = Vec::new();
        for plan in &plans {
            let LinePlan::Localize { span, filename } = plan else {
                continue;
            };
            match slots.get(filename) {
                Some(&slot) => downloads[slot].1 = span.url,
                None => {
                    slots.insert(*filename, downloads.len());
                    downloads.push((*filename, span.url));
                }
            }
        }

        if downloads.is_empty() {
            return Ok(FileReport::untouched(FileOutcome::Unchanged));
        }

        self.assets
            .ensure()
            .await
            .map_err(|source| ProcessError::AssetDir {
                path: self.assets.path().to_path_buf(),
                source,
            })?;

        let fetched = self.fetch_all(&downloads).await;

        let mut report = FileReport::untouched(FileOutcome::Unchanged);
        for result in fetched.values() {
            match result {
                Ok(_) => report.assets_fetched += 1,
                Err(_) => report.fetch_failures += 1,
            }
        }

        let outcomes: Vec<LineOutcome> = lines
            .iter()
            .zip(&plans)
            .map(|(line, plan)| match plan {
                LinePlan::NoUrl => LineOutcome::Unchanged,
                LinePlan::NoFilename(_) => LineOutcome::Skipped(SkipReason::NoFilename),
                LinePlan::Localize { span, filename } => match fetched.get(filename) {
                    Some(Ok(_)) => {
                        let reference =
                            local_reference(filename, self.assets.name(), prefix_with_asset_dir);
                        LineOutcome::Replaced(rewrite_line(line, &reference, span.start, span.end))
                    }
                    _ => LineOutcome::Skipped(SkipReason::FetchFailed),
                },
            })
            .collect();

        let new_lines: Vec<&str> = lines
            .iter()
            .zip(&outcomes)
            .map(|(line, outcome)| match outcome {
                LineOutcome::Replaced(rewritten) => rewritten.as_str(),
                _ => *line,
            })
            .collect();

        if new_lines == lines {
            return Ok(report);
        }

        report.lines_replaced = outcomes
            .iter()
            .filter(|outcome| matches!(outcome, LineOutcome::Replaced(_)))
            .count();
        report.outcome = FileOutcome::Rewritten {
            changed_lines: count_changed_lines(&lines, &new_lines),
        };

        tokio::fs::write(path, new_lines.concat())
            .await
            .map_err(|source| ProcessError::Write {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(report)
    }

    // Downloads each (filename, url) pair, at most `concurrency` at a time.
    // File names are unique here, so no two downloads share a destination.
    async fn fetch_all<'f>(
        &self,
        downloads: &[(&'f str, &str)],
    ) -> HashMap<&'f str, Result<u64, FetchError>> {
        stream::iter(downloads.iter().copied())
            .map(|(filename, url)| async move {
                let destination = self.assets.destination(filename);
                let result = self.fetcher.fetch_and_save(url, &destination).await;

                match &result {
                    Ok(bytes) => info!(url, path = %destination.display(), bytes, "saved asset"),
                    Err(e) => warn!(url, path = %destination.display(), error = %e, "download failed, keeping URL"),
                }

                (filename, result)
            })
            .buffer_unordered(self.settings.concurrency)
            .collect()
            .await
    }
}

// Number of distinct lines in the new file that did not exist in the old one
fn count_changed_lines(old: &[&str], new: &[&str]) -> usize {
    let old: HashSet<&str> = old.iter().copied().collect();
    new.iter()
        .copied()
        .filter(|line| !old.contains(line))
        .collect::<HashSet<&str>>()
        .len()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is split_inclusive('\n')?
//    - Like split('\n') but each piece keeps its '\n'
//    - Joining the pieces with concat() gives back the exact original text,
//      including "\r\n" line endings
//
// 2. Why &'a dyn AssetFetcher?
//    - dyn Trait = "any type that implements this trait", chosen at runtime
//    - main.rs passes the real HttpFetcher, tests pass a stub
//
// 3. What does let-else do?
//    - let Ok(text) = ... else { return ...; } binds text on success
//    - and must leave the function (return/continue/panic) otherwise
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::stub::StubFetcher;
    use std::fs;

    const ORIGIN: &str = "https://cdn.example.test";

    fn settings() -> Settings {
        Settings::new(ORIGIN.to_string(), "public".to_string(), Vec::new(), 4).unwrap()
    }

    #[tokio::test]
    async fn test_file_without_urls_is_not_written() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("notes.txt");
        fs::write(&file, "hello\nworld\n").unwrap();

        let settings = settings();
        let assets = AssetDir::new(root.path(), "public");
        let fetcher = StubFetcher::new(b"png");
        let report = FileProcessor::new(&settings, &assets, &fetcher)
            .process(&file, false)
            .await
            .unwrap();

        assert_eq!(report.outcome, FileOutcome::Unchanged);
        assert!(fetcher.calls().is_empty());
        assert!(!assets.path().exists());
        assert_eq!(fs::read_to_string(&file).unwrap(), "hello\nworld\n");
    }

    #[tokio::test]
    async fn test_quoted_url_in_plain_file() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("index.html");
        fs::write(&file, "<p>\na \"https://cdn.example.test/base/img.png\" b\n</p>").unwrap();

        let settings = settings();
        let assets = AssetDir::new(root.path(), "public");
        let fetcher = StubFetcher::new(b"PNGDATA");
        let report = FileProcessor::new(&settings, &assets, &fetcher)
            .process(&file, false)
            .await
            .unwrap();

        assert_eq!(report.outcome, FileOutcome::Rewritten { changed_lines: 1 });
        assert_eq!(report.assets_fetched, 1);
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "<p>\na \"/img.png\" b\n</p>"
        );
        assert_eq!(fs::read(root.path().join("public/img.png")).unwrap(), b"PNGDATA");
    }

    #[tokio::test]
    async fn test_markdown_gets_asset_dir_prefix() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("readme.md");
        fs::write(&file, "a \"https://cdn.example.test/base/img.png\" b\n").unwrap();

        let settings = settings();
        let assets = AssetDir::new(root.path(), "public");
        let fetcher = StubFetcher::new(b"x");
        FileProcessor::new(&settings, &assets, &fetcher)
            .process(&file, true)
            .await
            .unwrap();

        assert_eq!(fs::read_to_string(&file).unwrap(), "a \"/public/img.png\" b\n");
    }

    #[tokio::test]
    async fn test_second_run_changes_nothing() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("page.html");
        fs::write(
            &file,
            "<img src=\"https://cdn.example.test/1/a.png\">\n<img src='https://cdn.example.test/2/b.gif'>\n",
        )
        .unwrap();

        let settings = settings();
        let assets = AssetDir::new(root.path(), "public");
        let fetcher = StubFetcher::new(b"bytes");
        let processor = FileProcessor::new(&settings, &assets, &fetcher);

        let first = processor.process(&file, false).await.unwrap();
        assert_eq!(first.outcome, FileOutcome::Rewritten { changed_lines: 2 });
        let after_first = fs::read_to_string(&file).unwrap();

        let second = processor.process(&file, false).await.unwrap();
        assert_eq!(second.outcome, FileOutcome::Unchanged);
        assert_eq!(second.lines_replaced, 0);
        assert_eq!(fs::read_to_string(&file).unwrap(), after_first);
        assert_eq!(fetcher.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_download_keeps_that_url_only() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("page.html");
        let broken = "https://cdn.example.test/1/missing.png";
        fs::write(
            &file,
            format!("<img src=\"{broken}\">\n<img src=\"https://cdn.example.test/2/ok.png\">\n"),
        )
        .unwrap();

        let settings = settings();
        let assets = AssetDir::new(root.path(), "public");
        let fetcher = StubFetcher::new(b"ok").failing_on(broken);
        let report = FileProcessor::new(&settings, &assets, &fetcher)
            .process(&file, false)
            .await
            .unwrap();

        assert_eq!(report.fetch_failures, 1);
        assert_eq!(report.lines_replaced, 1);
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            format!("<img src=\"{broken}\">\n<img src=\"/ok.png\">\n")
        );
    }

    #[tokio::test]
    async fn test_all_downloads_failing_leaves_file_alone() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("a.txt");
        let url = "https://cdn.example.test/1/gone.png";
        fs::write(&file, format!("({url})\n")).unwrap();

        let settings = settings();
        let assets = AssetDir::new(root.path(), "public");
        let fetcher = StubFetcher::new(b"").failing_on(url);
        let report = FileProcessor::new(&settings, &assets, &fetcher)
            .process(&file, false)
            .await
            .unwrap();

        assert_eq!(report.outcome, FileOutcome::Unchanged);
        assert_eq!(fs::read_to_string(&file).unwrap(), format!("({url})\n"));
    }

    #[tokio::test]
    async fn test_same_filename_is_downloaded_once() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("a.txt");
        fs::write(
            &file,
            "(https://cdn.example.test/1/logo.png)\n(https://cdn.example.test/2/logo.png)\n",
        )
        .unwrap();

        let settings = settings();
        let assets = AssetDir::new(root.path(), "public");
        let fetcher = StubFetcher::new(b"logo");
        let report = FileProcessor::new(&settings, &assets, &fetcher)
            .process(&file, false)
            .await
            .unwrap();

        assert_eq!(fetcher.calls(), vec!["https://cdn.example.test/2/logo.png"]);
        assert_eq!(report.lines_replaced, 2);
        // Both lines become "(/logo.png)\n", one distinct new line
        assert_eq!(report.outcome, FileOutcome::Rewritten { changed_lines: 1 });
    }

    #[tokio::test]
    async fn test_last_url_for_a_filename_wins() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("a.txt");
        fs::write(
            &file,
            "(https://cdn.example.test/1/logo.png)\nother\n'https://cdn.example.test/2/logo.png'\n(https://cdn.example.test/3/icon.png)\n",
        )
        .unwrap();

        let settings = settings();
        let assets = AssetDir::new(root.path(), "public");
        let fetcher = StubFetcher::new(b"bytes");
        let report = FileProcessor::new(&settings, &assets, &fetcher)
            .process(&file, false)
            .await
            .unwrap();

        let mut calls = fetcher.calls();
        calls.sort();
        assert_eq!(
            calls,
            vec![
                "https://cdn.example.test/2/logo.png",
                "https://cdn.example.test/3/icon.png",
            ]
        );
        assert_eq!(report.assets_fetched, 2);
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "(/logo.png)\nother\n'/logo.png'\n(/icon.png)\n"
        );
    }

    #[tokio::test]
    async fn test_host_only_url_is_left_alone() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("a.txt");
        fs::write(&file, "visit \"https://cdn.example.test\"\n").unwrap();

        let settings = settings();
        let assets = AssetDir::new(root.path(), "public");
        let fetcher = StubFetcher::new(b"");
        let report = FileProcessor::new(&settings, &assets, &fetcher)
            .process(&file, false)
            .await
            .unwrap();

        assert_eq!(report.outcome, FileOutcome::Unchanged);
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_binary_file_is_skipped() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("image.bin");
        fs::write(&file, [0xffu8, 0xfe, 0x00, 0x80]).unwrap();

        let settings = settings();
        let assets = AssetDir::new(root.path(), "public");
        let fetcher = StubFetcher::new(b"");
        let report = FileProcessor::new(&settings, &assets, &fetcher)
            .process(&file, false)
            .await
            .unwrap();

        assert_eq!(
            report.outcome,
            FileOutcome::Skipped {
                reason: SkipReason::NotText
            }
        );
    }

    #[tokio::test]
    async fn test_crlf_line_endings_survive() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("a.txt");
        fs::write(&file, "x\r\n\"https://cdn.example.test/1/a.png\"\r\ny\r\n").unwrap();

        let settings = settings();
        let assets = AssetDir::new(root.path(), "public");
        let fetcher = StubFetcher::new(b"a");
        FileProcessor::new(&settings, &assets, &fetcher)
            .process(&file, false)
            .await
            .unwrap();

        assert_eq!(fs::read_to_string(&file).unwrap(), "x\r\n\"/a.png\"\r\ny\r\n");
    }

    #[test]
    fn test_count_changed_lines_is_distinct() {
        let old = ["a\n", "b\n", "c\n"];
        let new = ["x\n", "x\n", "c\n"];
        assert_eq!(count_changed_lines(&old, &new), 1);
    }
}
