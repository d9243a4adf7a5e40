// Platform downloader trait definition

use std::path::Path;

use async_trait::async_trait;

use super::errors::DownloadError;
use super::models::MediaInfo;
use crate::link::Platform;

/// Trait for per-platform downloader implementations
#[async_trait]
pub trait PlatformDownloader: Send + Sync {
    /// Name of the backend (for logging)
    fn name(&self) -> &'static str;

    /// Platform this backend serves
    fn platform(&self) -> Platform;

    /// Resolve a URL to media metadata without downloading it
    async fn resolve(&self, url: &str) -> Result<MediaInfo, DownloadError>;

    /// Fetch the media to exactly `target`, aborting above `max_bytes`
    async fn fetch(
        &self,
        url: &str,
        media: &MediaInfo,
        target: &Path,
        max_bytes: u64,
    ) -> Result<(), DownloadError>;
}
