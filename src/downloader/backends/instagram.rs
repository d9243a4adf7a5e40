use std::path::Path;

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use super::ytdlp::YtDlp;
use crate::downloader::errors::DownloadError;
use crate::downloader::models::{ExtractorConfig, MediaInfo};
use crate::downloader::traits::PlatformDownloader;
use crate::link::Platform;

const INSTAGRAM_FORMAT: &str = "best[vcodec!=none]/best";

lazy_static::lazy_static! {
    static ref SHORTCODE_RE: Regex =
        Regex::new(r"(?i)/(?:p|reel|reels|tv)/([A-Za-z0-9_-]+)").unwrap();
}

/// Extract the post shortcode from an Instagram URL
pub fn shortcode(url: &str) -> Option<&str> {
    SHORTCODE_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub struct InstagramBackend {
    ytdlp: YtDlp,
}

impl InstagramBackend {
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            ytdlp: YtDlp::new(config),
        }
    }

    fn extra_args(&self) -> Vec<String> {
        match &self.ytdlp.config().instagram_cookies {
            Some(path) => vec!["--cookies".to_string(), path.to_string_lossy().to_string()],
            None => Vec::new(),
        }
    }
}

#[async_trait]
impl PlatformDownloader for InstagramBackend {
    fn name(&self) -> &'static str {
        "yt-dlp-instagram"
    }

    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    async fn resolve(&self, url: &str) -> Result<MediaInfo, DownloadError> {
        let code = shortcode(url).ok_or_else(|| {
            DownloadError::InvalidLink(format!("no post shortcode in {}", url))
        })?;
        debug!(shortcode = %code, "resolving instagram post");

        let entries = self.ytdlp.probe(url, INSTAGRAM_FORMAT, &self.extra_args()).await?;

        // carousels list every slide; take the first one that is a video
        entries
            .into_iter()
            .find(MediaInfo::has_video)
            .ok_or(DownloadError::ContentNotVideo)
    }

    async fn fetch(
        &self,
        url: &str,
        media: &MediaInfo,
        target: &Path,
        max_bytes: u64,
    ) -> Result<(), DownloadError> {
        self.ytdlp
            .fetch(url, media, target, max_bytes, INSTAGRAM_FORMAT, &self.extra_args())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcode_forms() {
        assert_eq!(shortcode("https://www.instagram.com/p/XYZ/"), Some("XYZ"));
        assert_eq!(shortcode("https://instagram.com/reel/Cabc_12-x/?igsh=1"), Some("Cabc_12-x"));
        assert_eq!(shortcode("https://instagram.com/reels/abc"), Some("abc"));
        assert_eq!(shortcode("https://instagr.am/tv/abc/"), Some("abc"));
        assert_eq!(shortcode("https://instagram.com/someone/"), None);
    }

    #[tokio::test]
    async fn test_profile_link_is_invalid() {
        let backend = InstagramBackend::new(ExtractorConfig::default());
        let err = backend.resolve("https://instagram.com/someone/").await.unwrap_err();
        assert!(matches!(err, DownloadError::InvalidLink(_)));
    }

    #[test]
    fn test_cookie_args() {
        let backend = InstagramBackend::new(
            ExtractorConfig::default().with_instagram_cookies(Some("/etc/clipgrab/cookies.txt".into())),
        );
        assert_eq!(
            backend.extra_args(),
            vec!["--cookies".to_string(), "/etc/clipgrab/cookies.txt".to_string()]
        );
        assert!(InstagramBackend::new(ExtractorConfig::default()).extra_args().is_empty());
    }
}
