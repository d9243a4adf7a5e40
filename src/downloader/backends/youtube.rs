use std::path::Path;

use async_trait::async_trait;

use super::ytdlp::YtDlp;
use crate::downloader::errors::DownloadError;
use crate::downloader::models::{ExtractorConfig, MediaInfo};
use crate::downloader::traits::PlatformDownloader;
use crate::link::Platform;

/// Single progressive file, so no ffmpeg merge is needed and the output path stays exact
const YOUTUBE_FORMAT: &str =
    "best[ext=mp4][vcodec!=none][acodec!=none]/best[vcodec!=none][acodec!=none]/best";

pub struct YouTubeBackend {
    ytdlp: YtDlp,
}

impl YouTubeBackend {
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            ytdlp: YtDlp::new(config),
        }
    }

    fn extra_args(&self) -> Vec<String> {
        let mut args = vec!["--no-playlist".to_string()];
        if let Some(client) = &self.ytdlp.config().youtube_player_client {
            args.push("--extractor-args".to_string());
            args.push(format!("youtube:player_client={}", client));
        }
        args
    }
}

#[async_trait]
impl PlatformDownloader for YouTubeBackend {
    fn name(&self) -> &'static str {
        "yt-dlp-youtube"
    }

    fn platform(&self) -> Platform {
        Platform::YouTube
    }

    async fn resolve(&self, url: &str) -> Result<MediaInfo, DownloadError> {
        let entries = self.ytdlp.probe(url, YOUTUBE_FORMAT, &self.extra_args()).await?;
        entries
            .into_iter()
            .next()
            .ok_or_else(|| DownloadError::InvalidLink(url.to_string()))
    }

    async fn fetch(
        &self,
        url: &str,
        media: &MediaInfo,
        target: &Path,
        max_bytes: u64,
    ) -> Result<(), DownloadError> {
        self.ytdlp
            .fetch(url, media, target, max_bytes, YOUTUBE_FORMAT, &self.extra_args())
            .await
    }
}
