// Common data models for downloader

use std::path::PathBuf;

use serde::Deserialize;

/// Container extensions that imply a video stream when codec info is missing
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "mkv", "m4v"];

/// Single format entry from yt-dlp JSON
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FormatEntry {
    pub format_id: String,
    pub ext: Option<String>,
    pub vcodec: Option<String>,
    pub acodec: Option<String>,
    #[serde(deserialize_with = "lenient_size")]
    pub filesize: Option<u64>,
    #[serde(deserialize_with = "lenient_size")]
    pub filesize_approx: Option<u64>,
}

impl FormatEntry {
    pub fn has_video(&self) -> bool {
        codec_present(self.vcodec.as_deref())
    }
}

/// Media metadata as resolved by yt-dlp (`--dump-json`)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MediaInfo {
    pub id: String,
    pub title: Option<String>,
    pub uploader: Option<String>,
    /// Duration in seconds
    pub duration: Option<f64>,
    pub ext: Option<String>,
    pub vcodec: Option<String>,
    #[serde(deserialize_with = "lenient_size")]
    pub filesize: Option<u64>,
    #[serde(deserialize_with = "lenient_size")]
    pub filesize_approx: Option<u64>,
    pub webpage_url: Option<String>,
    /// 1-based position inside a carousel/playlist
    pub playlist_index: Option<u32>,
    pub formats: Vec<FormatEntry>,
}

impl MediaInfo {
    /// Check whether the media carries a video stream.
    ///
    /// Top-level codec info wins; otherwise any video format counts, and as a
    /// last resort the container extension is used.
    pub fn has_video(&self) -> bool {
        match self.vcodec.as_deref() {
            Some("none") => return self.formats.iter().any(FormatEntry::has_video),
            Some(_) => return true,
            None => {}
        }

        if !self.formats.is_empty() {
            if self.formats.iter().any(FormatEntry::has_video) {
                return true;
            }
            if self.formats.iter().any(|f| f.vcodec.is_some()) {
                return false;
            }
        }

        self.ext
            .as_deref()
            .map_or(false, |ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
    }

    /// Get effective file size (exact or approximate)
    pub fn estimated_size(&self) -> Option<u64> {
        self.filesize.or(self.filesize_approx)
    }

    /// Caption for the delivered video
    pub fn caption(&self, fallback: &str) -> String {
        let title = self
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(fallback);

        // Telegram caption limit is 1024 chars
        title.chars().take(1024).collect()
    }

    /// Formatted duration like "3:07"
    pub fn duration_label(&self) -> Option<String> {
        let secs = self.duration? as u64;
        Some(format!("{}:{:02}", secs / 60, secs % 60))
    }
}

// yt-dlp sometimes reports approximate sizes as floats
fn lenient_size<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Number>::deserialize(deserializer)?;
    Ok(value.and_then(|n| n.as_u64().or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))))
}

fn codec_present(codec: Option<&str>) -> bool {
    codec.map_or(false, |c| !c.is_empty() && c != "none")
}

/// Configuration for the yt-dlp extraction tool
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Explicit yt-dlp binary; auto-detected when unset
    pub ytdlp_path: Option<String>,
    /// SOCKS5/HTTP proxy URL
    pub proxy: Option<String>,
    /// cookies.txt used for Instagram requests
    pub instagram_cookies: Option<PathBuf>,
    /// YouTube player client (android, web, tv)
    pub youtube_player_client: Option<String>,
    /// Timeout for metadata resolution in seconds
    pub probe_timeout_secs: u64,
    /// Timeout for the actual download in seconds
    pub fetch_timeout_secs: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: None,
            proxy: None,
            instagram_cookies: None,
            youtube_player_client: None,
            probe_timeout_secs: 60,
            fetch_timeout_secs: 600,
        }
    }
}

impl ExtractorConfig {
    pub fn with_ytdlp_path(mut self, path: Option<String>) -> Self {
        self.ytdlp_path = path;
        self
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn with_instagram_cookies(mut self, path: Option<PathBuf>) -> Self {
        self.instagram_cookies = path;
        self
    }

    pub fn with_youtube_player_client(mut self, client: Option<String>) -> Self {
        self.youtube_player_client = client;
        self
    }

    pub fn with_timeouts(mut self, probe_secs: u64, fetch_secs: u64) -> Self {
        self.probe_timeout_secs = probe_secs;
        self.fetch_timeout_secs = fetch_secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> MediaInfo {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_video_by_top_level_codec() {
        let info = parse(r#"{"id":"a","vcodec":"avc1.64001F","ext":"mp4"}"#);
        assert!(info.has_video());
    }

    #[test]
    fn test_image_post_is_not_video() {
        let info = parse(r#"{"id":"a","vcodec":"none","ext":"jpg","formats":[{"format_id":"0","vcodec":"none"}]}"#);
        assert!(!info.has_video());
    }

    #[test]
    fn test_video_by_formats() {
        let info = parse(
            r#"{"id":"a","formats":[{"format_id":"140","vcodec":"none","acodec":"mp4a"},{"format_id":"18","vcodec":"avc1","acodec":"mp4a"}]}"#,
        );
        assert!(info.has_video());
    }

    #[test]
    fn test_video_by_extension_fallback() {
        assert!(parse(r#"{"id":"a","ext":"MP4"}"#).has_video());
        assert!(!parse(r#"{"id":"a","ext":"jpg"}"#).has_video());
    }

    #[test]
    fn test_null_fields_are_tolerated() {
        let info = parse(r#"{"id":"a","title":null,"filesize":null,"filesize_approx":1234.7,"unknown":1}"#);
        assert_eq!(info.estimated_size(), Some(1234));
        assert_eq!(info.caption("Instagram"), "Instagram");
    }

    #[test]
    fn test_caption_and_duration() {
        let info = parse(r#"{"id":"a","title":"  Cat video ","duration":187.4}"#);
        assert_eq!(info.caption("YouTube"), "Cat video");
        assert_eq!(info.duration_label().as_deref(), Some("3:07"));
    }
}
