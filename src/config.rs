// Bot configuration - environment variables (after an optional `.env`)
//
// Parsing goes through `BotConfig::from_lookup` so it can be tested without
// touching the process environment.

use std::env;
use std::fmt;
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::downloader::ExtractorConfig;

const DEFAULT_MAX_UPLOAD_MB: u64 = 50;
const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 60;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

pub struct BotConfig {
    pub token: SecretString,
    pub download_dir: PathBuf,
    pub max_upload_bytes: u64,
    pub extractor: ExtractorConfig,
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"[REDACTED]")
            .field("download_dir", &self.download_dir)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("extractor", &self.extractor)
            .finish()
    }
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let token = get("TELEGRAM_BOT_TOKEN").ok_or(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))?;

        let download_dir = get("CLIPGRAB_DOWNLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_download_dir);

        let max_upload_mb = positive(&get, "CLIPGRAB_MAX_UPLOAD_MB", DEFAULT_MAX_UPLOAD_MB)?;
        let max_upload_bytes = max_upload_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| ConfigError::InvalidNumber {
                name: "CLIPGRAB_MAX_UPLOAD_MB",
                value: max_upload_mb.to_string(),
            })?;
        let probe_secs = positive(&get, "CLIPGRAB_PROBE_TIMEOUT_SECS", DEFAULT_PROBE_TIMEOUT_SECS)?;
        let fetch_secs = positive(&get, "CLIPGRAB_FETCH_TIMEOUT_SECS", DEFAULT_FETCH_TIMEOUT_SECS)?;

        let extractor = ExtractorConfig::default()
            .with_ytdlp_path(get("CLIPGRAB_YTDLP"))
            .with_proxy(get("CLIPGRAB_PROXY"))
            .with_instagram_cookies(get("CLIPGRAB_INSTAGRAM_COOKIES").map(PathBuf::from))
            .with_youtube_player_client(get("CLIPGRAB_YOUTUBE_CLIENT"))
            .with_timeouts(probe_secs, fetch_secs);

        Ok(Self {
            token: SecretString::from(token),
            download_dir,
            max_upload_bytes,
            extractor,
        })
    }

    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }
}

fn positive<G>(get: &G, name: &'static str, default: u64) -> Result<u64, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        None => Ok(default),
        Some(value) => match value.parse::<u64>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ConfigError::InvalidNumber { name, value }),
        },
    }
}

fn default_download_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("clipgrab").join("downloads"))
        .unwrap_or_else(|| PathBuf::from("downloads"))
}
