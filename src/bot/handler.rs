// Delivery orchestration - one inbound text message from link to video

use teloxide::types::ChatId;
use teloxide::utils::command::BotCommands;
use tracing::{error, info, warn};

use super::commands::{help_text, Command, WELCOME_TEXT};
use super::status::{Stage, StatusMessage};
use super::transport::ChatTransport;
use crate::downloader::{DownloadError, Downloader};
use crate::link::{classify, ClassifiedLink};
use crate::storage::DownloadDir;

/// How handling one message ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Welcomed,
    Helped,
    Rejected,
    Delivered,
    Failed(DownloadError),
}

pub struct Delivery {
    downloader: Downloader,
    storage: DownloadDir,
}

impl Delivery {
    pub fn new(downloader: Downloader, storage: DownloadDir) -> Self {
        Self { downloader, storage }
    }

    /// Entry point for every inbound text message
    pub async fn handle_update<T>(&self, transport: &T, chat: ChatId, text: &str, bot_name: &str) -> Outcome
    where
        T: ChatTransport + ?Sized,
    {
        match Command::parse(text, bot_name) {
            Ok(command) => self.handle_command(transport, chat, command).await,
            Err(_) => self.handle_text(transport, chat, text).await,
        }
    }

    pub async fn handle_command<T>(&self, transport: &T, chat: ChatId, command: Command) -> Outcome
    where
        T: ChatTransport + ?Sized,
    {
        let (reply, outcome) = match command {
            Command::Start => (WELCOME_TEXT.to_string(), Outcome::Welcomed),
            Command::Help => (help_text(), Outcome::Helped),
        };
        if let Err(e) = transport.send_text(chat, &reply).await {
            warn!(chat_id = chat.0, error = %e, "failed to answer command");
        }
        outcome
    }

    pub async fn handle_text<T>(&self, transport: &T, chat: ChatId, text: &str) -> Outcome
    where
        T: ChatTransport + ?Sized,
    {
        let Some(link) = classify(text) else {
            info!(chat_id = chat.0, "no supported link in message");
            if let Err(e) = transport
                .send_text(chat, DownloadError::UnsupportedLink.user_message())
                .await
            {
                warn!(chat_id = chat.0, error = %e, "failed to send rejection");
            }
            return Outcome::Rejected;
        };

        info!(chat_id = chat.0, platform = %link.platform, url = %link.url, "handling link");

        let mut status = match StatusMessage::open(transport, chat).await {
            Ok(status) => status,
            Err(e) => {
                error!(chat_id = chat.0, error = %e, "cannot open status message");
                return Outcome::Failed(DownloadError::Unknown(e.to_string()));
            }
        };

        let media = self.storage.allocate(link.platform.file_prefix(), "mp4");
        let result = self.deliver(transport, chat, &link, &mut status, media.path()).await;
        media.release().await;

        match result {
            Ok(()) => {
                status.finish(transport).await;
                info!(chat_id = chat.0, platform = %link.platform, "video delivered");
                Outcome::Delivered
            }
            Err(e) => {
                error!(
                    chat_id = chat.0,
                    platform = %link.platform,
                    kind = e.kind(),
                    error = %e,
                    "delivery failed"
                );
                status.fail(transport, e.user_message()).await;
                Outcome::Failed(e)
            }
        }
    }

    async fn deliver<T>(
        &self,
        transport: &T,
        chat: ChatId,
        link: &ClassifiedLink,
        status: &mut StatusMessage,
        target: &std::path::Path,
    ) -> Result<(), DownloadError>
    where
        T: ChatTransport + ?Sized,
    {
        status.advance(transport, Stage::Downloading).await;
        let media = self.downloader.download(link, target).await?;

        status.advance(transport, Stage::Uploading).await;
        if let Err(e) = transport.upload_action(chat).await {
            warn!(chat_id = chat.0, error = %e, "failed to send chat action");
        }

        let caption = media.caption(link.platform.label());
        transport
            .send_video(chat, target, &caption)
            .await
            .map_err(|e| DownloadError::UploadFailure(e.to_string()))
    }
}
