// src/fetch/http.rs
// =============================================================================
// Downloads assets over HTTP with reqwest.
//
// One Client is built per run and reused for every download, so
// connections to the CDN are pooled.
//
// Behaviour:
// - GET, following up to 10 redirects
// - Any non-2xx answer is a failure and nothing is written
// - The body is written in one go, creating or truncating the file
// - No retries
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use std::path::Path;

use super::AssetFetcher;
use crate::error::FetchError;

const MAX_REDIRECTS: usize = 10;

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(concat!("cdn-localizer/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl AssetFetcher for HttpFetcher {
    async fn fetch_and_save(&self, url: &str, destination: &Path) -> Result<u64, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;

        tokio::fs::write(destination, &body)
            .await
            .map_err(|source| FetchError::Write {
                path: destination.to_path_buf(),
                source,
            })?;

        Ok(body.len() as u64)
    }
}
