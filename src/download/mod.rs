use anyhow::{Context, Result};
use async_trait::async_trait;
use log::info;

use crate::http::HttpClient;

/// Fetches the full contents of a remote file.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Downloader backed by the shared HTTP client.
pub struct HttpDownloader {
    http_client: HttpClient,
}

impl HttpDownloader {
    pub fn new(http_client: HttpClient) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        info!("Downloading file from {}...", url);

        let mut buffer = Vec::new();
        self.http_client
            .download_to(url, &mut buffer)
            .await
            .with_context(|| format!("Failed to download {}", url))?;

        info!("Download complete.");
        Ok(buffer)
    }
}
