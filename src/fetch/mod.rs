// src/fetch/mod.rs
// =============================================================================
// This module gets asset bytes from the CDN onto disk.
//
// Submodules:
// - http: The real downloader, built on reqwest
//
// The file processor only sees the AssetFetcher trait, so tests can swap
// in a fetcher that never touches the network.
// =============================================================================

mod http;

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::sync::OnceCell;

use crate::error::FetchError;

pub use http::HttpFetcher;

/// Something that can download a URL into a file.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Downloads `url` and writes the body to `destination`, replacing any
    /// existing file. Returns the number of bytes written.
    async fn fetch_and_save(&self, url: &str, destination: &Path) -> Result<u64, FetchError>;
}

/// The directory downloaded assets are saved into (`<root>/public` by
/// default).
///
/// It is only created the first time an asset actually needs saving, so
/// a run that finds nothing leaves the project untouched.
#[derive(Debug)]
pub struct AssetDir {
    name: String,
    path: PathBuf,
    ready: OnceCell<()>,
}

impl AssetDir {
    pub fn new(project_root: &Path, name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: project_root.join(name),
            ready: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an asset with this file name is saved
    pub fn destination(&self, filename: &str) -> PathBuf {
        self.path.join(filename)
    }

    /// Creates the directory if this run has not done so yet
    pub async fn ensure(&self) -> io::Result<&Path> {
        self.ready
            .get_or_try_init(|| async { tokio::fs::create_dir_all(&self.path).await })
            .await?;
        Ok(&self.path)
    }
}

#[cfg(test)]
pub(crate) mod stub {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Serves the same bytes for every URL, except the ones told to fail.
    pub struct StubFetcher {
        body: Vec<u8>,
        failing: HashSet<String>,
        calls: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        pub fn new(body: &[u8]) -> Self {
            Self {
                body: body.to_vec(),
                failing: HashSet::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn failing_on(mut self, url: &str) -> Self {
            self.failing.insert(url.to_string());
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AssetFetcher for StubFetcher {
        async fn fetch_and_save(&self, url: &str, destination: &Path) -> Result<u64, FetchError> {
            self.calls.lock().unwrap().push(url.to_string());

            if self.failing.contains(url) {
                return Err(FetchError::Status { status: 404 });
            }

            tokio::fs::write(destination, &self.body)
                .await
                .map_err(|source| FetchError::Write {
                    path: destination.to_path_buf(),
                    source,
                })?;
            Ok(self.body.len() as u64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_asset_dir_is_created_lazily() {
        let root = tempfile::tempdir().unwrap();
        let assets = AssetDir::new(root.path(), "public");

        assert!(!assets.path().exists());
        assets.ensure().await.unwrap();
        assert!(assets.path().is_dir());

        // Second call is a no-op, even if the directory already exists
        assets.ensure().await.unwrap();
        assert_eq!(assets.destination("a.png"), root.path().join("public").join("a.png"));
    }

    #[tokio::test]
    async fn test_existing_asset_dir_is_fine() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("public")).unwrap();

        let assets = AssetDir::new(root.path(), "public");
        assert!(assets.ensure().await.is_ok());
        assert_eq!(assets.name(), "public");
    }
}
