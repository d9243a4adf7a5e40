// Downloader - routes a classified link to its platform backend and enforces
// the size / completeness policy shared by every platform

use std::path::Path;

use tracing::{info, warn};

use super::errors::DownloadError;
use super::models::MediaInfo;
use super::traits::PlatformDownloader;
use super::utils::{file_size, remove_if_exists};
use crate::link::{ClassifiedLink, Platform};

pub struct Downloader {
    backends: Vec<Box<dyn PlatformDownloader>>,
    max_bytes: u64,
}

impl Downloader {
    pub fn new(max_bytes: u64) -> Self {
        Self {
            backends: Vec::new(),
            max_bytes,
        }
    }

    pub fn add_backend(&mut self, backend: Box<dyn PlatformDownloader>) {
        self.backends.push(backend);
    }

    fn backend_for(&self, platform: Platform) -> Option<&dyn PlatformDownloader> {
        self.backends
            .iter()
            .find(|b| b.platform() == platform)
            .map(|b| &**b)
    }

    /// Backends classifying tool output do not know the configured limit
    fn with_limit(&self, error: DownloadError) -> DownloadError {
        match error {
            DownloadError::ContentTooLarge { size, .. } => DownloadError::ContentTooLarge {
                size,
                limit: self.max_bytes,
            },
            other => other,
        }
    }

    /// Materialize the linked video at `target`.
    ///
    /// On any failure `target` is removed before returning.
    pub async fn download(
        &self,
        link: &ClassifiedLink,
        target: &Path,
    ) -> Result<MediaInfo, DownloadError> {
        let backend = self
            .backend_for(link.platform)
            .ok_or(DownloadError::UnsupportedLink)?;

        info!(backend = backend.name(), url = %link.url, "downloading");

        let result = self.run(backend, &link.url, target).await;
        if let Err(e) = &result {
            warn!(backend = backend.name(), url = %link.url, error = %e, "download failed");
            let _ = remove_if_exists(target).await;
        }
        result
    }

    async fn run(
        &self,
        backend: &dyn PlatformDownloader,
        url: &str,
        target: &Path,
    ) -> Result<MediaInfo, DownloadError> {
        let media = backend.resolve(url).await.map_err(|e| self.with_limit(e))?;

        if !media.has_video() {
            return Err(DownloadError::ContentNotVideo);
        }

        if let Some(size) = media.estimated_size() {
            if size > self.max_bytes {
                return Err(DownloadError::ContentTooLarge {
                    size,
                    limit: self.max_bytes,
                });
            }
        }

        backend
            .fetch(url, &media, target, self.max_bytes)
            .await
            .map_err(|e| self.with_limit(e))?;

        match file_size(target).await {
            Ok(Some(0)) => Err(DownloadError::DownloadIncomplete(format!(
                "{} is empty",
                target.display()
            ))),
            Ok(Some(size)) if size > self.max_bytes => Err(DownloadError::ContentTooLarge {
                size,
                limit: self.max_bytes,
            }),
            Ok(Some(size)) => {
                info!(
                    id = %media.id,
                    size,
                    duration = %media.duration_label().unwrap_or_default(),
                    "download complete"
                );
                Ok(media)
            }
            Ok(None) => Err(DownloadError::DownloadIncomplete(format!(
                "{} was not created",
                target.display()
            ))),
            Err(e) => Err(DownloadError::DownloadIncomplete(format!(
                "cannot stat {}: {}",
                target.display(),
                e
            ))),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{FetchBehavior, StubBackend};
    use super::*;

    fn link(platform: Platform, url: &str) -> ClassifiedLink {
        ClassifiedLink {
            url: url.to_string(),
            platform,
        }
    }

    fn downloader_with(backend: StubBackend, max_bytes: u64) -> Downloader {
        let mut downloader = Downloader::new(max_bytes);
        downloader.add_backend(Box::new(backend));
        downloader
    }

    #[tokio::test]
    async fn test_success_leaves_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("youtube_1.mp4");
        let downloader = downloader_with(StubBackend::video(Platform::YouTube, b"video"), 100);

        let media = downloader
            .download(&link(Platform::YouTube, "https://youtu.be/abc123"), &target)
            .await
            .unwrap();

        assert_eq!(media.id, "abc123");
        assert_eq!(std::fs::read(&target).unwrap(), b"video");
    }

    #[tokio::test]
    async fn test_missing_backend_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = downloader_with(StubBackend::video(Platform::YouTube, b"video"), 100);

        let err = downloader
            .download(&link(Platform::Instagram, "https://instagram.com/p/x/"), &dir.path().join("a.mp4"))
            .await
            .unwrap_err();
        assert_eq!(err, DownloadError::UnsupportedLink);
    }

    #[tokio::test]
    async fn test_not_video_is_rejected_before_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("instagram_1.mp4");
        let image = MediaInfo {
            id: "XYZ".to_string(),
            vcodec: Some("none".to_string()),
            ext: Some("jpg".to_string()),
            ..Default::default()
        };
        let downloader = downloader_with(
            StubBackend::video(Platform::Instagram, b"video").with_resolved(Ok(image)),
            100,
        );

        let err = downloader
            .download(&link(Platform::Instagram, "https://instagram.com/p/XYZ/"), &target)
            .await
            .unwrap_err();
        assert_eq!(err, DownloadError::ContentNotVideo);
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn test_metadata_size_over_limit() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("youtube_1.mp4");
        let big = MediaInfo {
            id: "big".to_string(),
            vcodec: Some("avc1".to_string()),
            filesize_approx: Some(1_000),
            ..Default::default()
        };
        let downloader = downloader_with(
            StubBackend::video(Platform::YouTube, b"video").with_resolved(Ok(big)),
            100,
        );

        let err = downloader
            .download(&link(Platform::YouTube, "https://youtu.be/big"), &target)
            .await
            .unwrap_err();
        assert_eq!(err, DownloadError::ContentTooLarge { size: 1_000, limit: 100 });
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn test_tool_size_refusal_reports_configured_limit() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("youtube_1.mp4");
        let refused = DownloadError::from(
            "ERROR: File is larger than max-filesize (9000 bytes > 100 bytes)".to_string(),
        );
        let downloader = downloader_with(
            StubBackend::video(Platform::YouTube, b"video").with_resolved(Err(refused)),
            100,
        );

        let err = downloader
            .download(&link(Platform::YouTube, "https://youtu.be/abc"), &target)
            .await
            .unwrap_err();
        assert_eq!(err, DownloadError::ContentTooLarge { size: 0, limit: 100 });
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn test_actual_size_over_limit_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("youtube_1.mp4");
        let downloader = downloader_with(StubBackend::video(Platform::YouTube, &[0u8; 64]), 10);

        let err = downloader
            .download(&link(Platform::YouTube, "https://youtu.be/abc"), &target)
            .await
            .unwrap_err();
        assert_eq!(err, DownloadError::ContentTooLarge { size: 64, limit: 10 });
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn test_missing_output_is_incomplete() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("youtube_1.mp4");
        let downloader = downloader_with(
            StubBackend::video(Platform::YouTube, b"").with_fetch(FetchBehavior::Nothing),
            100,
        );

        let err = downloader
            .download(&link(Platform::YouTube, "https://youtu.be/abc"), &target)
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::DownloadIncomplete(_)));
    }

    #[tokio::test]
    async fn test_empty_output_is_incomplete_and_removed() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("youtube_1.mp4");
        let downloader = downloader_with(StubBackend::video(Platform::YouTube, b""), 100);

        let err = downloader
            .download(&link(Platform::YouTube, "https://youtu.be/abc"), &target)
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::DownloadIncomplete(_)));
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn test_partial_file_removed_on_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("instagram_1.mp4");
        let downloader = downloader_with(
            StubBackend::video(Platform::Instagram, b"").with_fetch(FetchBehavior::WriteThenFail(
                b"partial".to_vec(),
                DownloadError::PrivateOrRestricted("login required".to_string()),
            )),
            100,
        );

        let err = downloader
            .download(&link(Platform::Instagram, "https://instagram.com/p/XYZ/"), &target)
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::PrivateOrRestricted(_)));
        assert!(!target.exists());
    }
}
