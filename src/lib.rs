pub mod bot;
pub mod config;
pub mod downloader;
pub mod link;
pub mod storage;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use bot::Delivery;
use config::BotConfig;
use downloader::backends::YtDlp;
use storage::DownloadDir;

/// Start the bot and block until shutdown
pub async fn run(config: BotConfig) -> anyhow::Result<()> {
    let storage = DownloadDir::new(&config.download_dir);
    storage
        .ensure()
        .await
        .with_context(|| format!("cannot create download dir {}", config.download_dir.display()))?;
    info!(dir = %storage.root().display(), "download directory ready");

    match YtDlp::new(config.extractor.clone()).version().await {
        Some(version) => info!(version = %version, "yt-dlp available"),
        None => warn!("yt-dlp did not answer --version; downloads will fail until it is installed"),
    }

    let downloader = downloader::default_downloader(&config.extractor, config.max_upload_bytes);
    let delivery = Arc::new(Delivery::new(downloader, storage));

    let bot = bot::build_bot(config.token(), config.extractor.proxy.as_deref())?;
    bot::serve(bot, delivery).await
}
