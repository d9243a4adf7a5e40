// Downloader module - platform backends behind a common policy layer

pub mod backends;
pub mod diagnostics;
pub mod errors;
pub mod models;
pub mod orchestrator;
pub mod traits;
pub mod utils;

pub use errors::DownloadError;
pub use models::{ExtractorConfig, MediaInfo};
pub use orchestrator::Downloader;
pub use traits::PlatformDownloader;

use backends::{InstagramBackend, YouTubeBackend};

/// Downloader wired with the Instagram and YouTube yt-dlp backends
pub fn default_downloader(config: &ExtractorConfig, max_bytes: u64) -> Downloader {
    let mut downloader = Downloader::new(max_bytes);
    downloader.add_backend(Box::new(InstagramBackend::new(config.clone())));
    downloader.add_backend(Box::new(YouTubeBackend::new(config.clone())));
    downloader
}
