// Error types for platform downloaders and delivery

use thiserror::Error;

use super::diagnostics::{diagnose_error, FailureReason};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DownloadError {
    /// Message did not contain an Instagram or YouTube link
    #[error("unsupported link")]
    UnsupportedLink,

    /// Link is malformed or points at something that is not a post/video
    #[error("invalid link: {0}")]
    InvalidLink(String),

    /// Content is private, removed, age-gated or otherwise restricted
    #[error("private or restricted content: {0}")]
    PrivateOrRestricted(String),

    /// Post resolved fine but carries no video stream
    #[error("content is not a video")]
    ContentNotVideo,

    /// Video is larger than the upload ceiling
    #[error("content too large: {size} bytes (limit {limit})")]
    ContentTooLarge { size: u64, limit: u64 },

    /// Fetch reported success but the file is missing or empty
    #[error("download incomplete: {0}")]
    DownloadIncomplete(String),

    /// Sending the video to the chat failed
    #[error("upload failed: {0}")]
    UploadFailure(String),

    /// Unknown error with details
    #[error("unknown error: {0}")]
    Unknown(String),
}

impl DownloadError {
    /// Short text shown to the user in the status message
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::UnsupportedLink => "⚠️ Please send a valid Instagram or YouTube link.",
            Self::InvalidLink(_) => "⚠️ That link doesn't point to a video I can download. Please check the link.",
            Self::PrivateOrRestricted(_) => {
                "🔒 This content is private or restricted. Please ensure the link is public."
            }
            Self::ContentNotVideo => "🖼 This post doesn't contain a video.",
            Self::ContentTooLarge { .. } => "📦 This video is too large to send via Telegram.",
            Self::DownloadIncomplete(_) => "❌ The download didn't complete. Please try again later.",
            Self::UploadFailure(_) => "❌ Failed to send the video. Please try again later.",
            Self::Unknown(_) => "❌ Something went wrong while downloading the video.",
        }
    }

    /// Stable short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedLink => "unsupported_link",
            Self::InvalidLink(_) => "invalid_link",
            Self::PrivateOrRestricted(_) => "private_or_restricted",
            Self::ContentNotVideo => "content_not_video",
            Self::ContentTooLarge { .. } => "content_too_large",
            Self::DownloadIncomplete(_) => "download_incomplete",
            Self::UploadFailure(_) => "upload_failure",
            Self::Unknown(_) => "unknown",
        }
    }
}

// Classify raw yt-dlp stderr into the failure taxonomy
impl From<String> for DownloadError {
    fn from(s: String) -> Self {
        match diagnose_error(&s) {
            Some(FailureReason::InvalidLink) => Self::InvalidLink(s),
            Some(FailureReason::PrivateOrRestricted) => Self::PrivateOrRestricted(s),
            Some(FailureReason::NotVideo) => Self::ContentNotVideo,
            // size is unknown when yt-dlp refuses up front; the Downloader fills in the limit
            Some(FailureReason::TooLarge) => Self::ContentTooLarge { size: 0, limit: 0 },
            Some(FailureReason::Network) | Some(FailureReason::Unknown) | None => Self::Unknown(s),
        }
    }
}
