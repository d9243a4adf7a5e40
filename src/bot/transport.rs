// Chat transport seam - the handful of Bot API calls the orchestrator needs

use std::path::Path;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, InputFile, MessageId};
use teloxide::{ApiError, RequestError};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("telegram request failed: {0}")]
    Request(#[from] RequestError),

    #[error("transport error: {0}")]
    Other(String),
}

/// Outbound side of a chat platform
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_text(&self, chat: ChatId, text: &str) -> Result<MessageId, TransportError>;

    async fn edit_text(
        &self,
        chat: ChatId,
        message: MessageId,
        text: &str,
    ) -> Result<(), TransportError>;

    async fn delete_message(&self, chat: ChatId, message: MessageId) -> Result<(), TransportError>;

    /// Hint that a video upload is in progress
    async fn upload_action(&self, chat: ChatId) -> Result<(), TransportError>;

    async fn send_video(&self, chat: ChatId, path: &Path, caption: &str) -> Result<(), TransportError>;
}

/// [`ChatTransport`] backed by the Telegram Bot API
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send_text(&self, chat: ChatId, text: &str) -> Result<MessageId, TransportError> {
        let sent = self.bot.send_message(chat, text).await?;
        Ok(sent.id)
    }

    async fn edit_text(
        &self,
        chat: ChatId,
        message: MessageId,
        text: &str,
    ) -> Result<(), TransportError> {
        match self.bot.edit_message_text(chat, message, text).await {
            Ok(_) => Ok(()),
            Err(e) if is_not_modified(&e) => {
                debug!(chat_id = chat.0, "status text unchanged");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_message(&self, chat: ChatId, message: MessageId) -> Result<(), TransportError> {
        self.bot.delete_message(chat, message).await?;
        Ok(())
    }

    async fn upload_action(&self, chat: ChatId) -> Result<(), TransportError> {
        self.bot.send_chat_action(chat, ChatAction::UploadVideo).await?;
        Ok(())
    }

    async fn send_video(&self, chat: ChatId, path: &Path, caption: &str) -> Result<(), TransportError> {
        self.bot
            .send_video(chat, InputFile::file(path))
            .caption(caption)
            .supports_streaming(true)
            .await?;
        Ok(())
    }
}

/// Editing a message to its current text is rejected by the Bot API
fn is_not_modified(error: &RequestError) -> bool {
    matches!(error, RequestError::Api(ApiError::MessageNotModified))
}
