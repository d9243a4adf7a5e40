// Status message - one message per request, rewritten as the request advances

use teloxide::types::{ChatId, MessageId};
use tracing::warn;

use super::transport::{ChatTransport, TransportError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Processing,
    Downloading,
    Uploading,
}

impl Stage {
    pub fn text(&self) -> &'static str {
        match self {
            Self::Processing => "⏳ Processing... Please wait.",
            Self::Downloading => "⬇️ Downloading video...",
            Self::Uploading => "📤 Uploading video...",
        }
    }
}

/// Handle to the status message of one request.
///
/// Advanced through `&mut self`; `finish` and `fail` consume it, so a
/// request ends with the message either deleted or showing an error.
#[derive(Debug)]
pub struct StatusMessage {
    chat: ChatId,
    id: MessageId,
    stage: Stage,
}

impl StatusMessage {
    pub async fn open<T>(transport: &T, chat: ChatId) -> Result<Self, TransportError>
    where
        T: ChatTransport + ?Sized,
    {
        let id = transport.send_text(chat, Stage::Processing.text()).await?;
        Ok(Self {
            chat,
            id,
            stage: Stage::Processing,
        })
    }

    /// Move to `stage`; a failed edit is logged and otherwise ignored
    pub async fn advance<T>(&mut self, transport: &T, stage: Stage)
    where
        T: ChatTransport + ?Sized,
    {
        if self.stage == stage {
            return;
        }
        self.stage = stage;
        if let Err(e) = transport.edit_text(self.chat, self.id, stage.text()).await {
            warn!(chat_id = self.chat.0, error = %e, "failed to update status message");
        }
    }

    /// Success: remove the status message
    pub async fn finish<T>(self, transport: &T)
    where
        T: ChatTransport + ?Sized,
    {
        if let Err(e) = transport.delete_message(self.chat, self.id).await {
            warn!(chat_id = self.chat.0, error = %e, "failed to delete status message");
        }
    }

    /// Failure: leave the status message showing `text`
    pub async fn fail<T>(self, transport: &T, text: &str)
    where
        T: ChatTransport + ?Sized,
    {
        if let Err(e) = transport.edit_text(self.chat, self.id, text).await {
            warn!(chat_id = self.chat.0, error = %e, "failed to report error in status message");
        }
    }
}
