// yt-dlp runner shared by the platform backends
//
// Both platforms go through the same binary; the backends only differ in the
// extra arguments (cookies, player client, format selection) they pass in.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::downloader::diagnostics::{diagnose_error, error_summary, FailureReason};
use crate::downloader::errors::DownloadError;
use crate::downloader::models::{ExtractorConfig, MediaInfo};
use crate::downloader::utils::{find_ytdlp, run_output_with_timeout};

pub struct YtDlp {
    ytdlp_path: String,
    config: ExtractorConfig,
}

impl YtDlp {
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            ytdlp_path: find_ytdlp(config.ytdlp_path.as_deref()),
            config,
        }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// yt-dlp version string, `None` when the binary is missing or broken
    pub async fn version(&self) -> Option<String> {
        let args = ["--version".to_string()];
        match run_output_with_timeout(&self.ytdlp_path, &args, self.config.probe_timeout_secs).await {
            Ok(out) if out.status.success() => {
                Some(String::from_utf8_lossy(&out.stdout).trim().to_string())
            }
            _ => None,
        }
    }

    fn base_args(&self, timeout_secs: u64) -> Vec<String> {
        let mut args = vec![
            "--no-warnings".to_string(),
            "--no-progress".to_string(),
            "--socket-timeout".to_string(),
            timeout_secs.min(60).to_string(),
        ];

        if let Some(proxy) = &self.config.proxy {
            args.push("--proxy".to_string());
            args.push(proxy.clone());
        }

        args
    }

    /// Build metadata arguments; `format` must match the one used by `fetch`
    fn probe_args(&self, url: &str, format: &str, extra: &[String]) -> Vec<String> {
        let mut args = self.base_args(self.config.probe_timeout_secs);
        args.extend([
            "--dump-json".to_string(),
            "--skip-download".to_string(),
            "-f".to_string(),
            format.to_string(),
        ]);
        args.extend(extra.iter().cloned());
        args.push(url.to_string());
        args
    }

    /// Build download arguments writing to exactly `target`
    fn fetch_args(
        &self,
        url: &str,
        media: &MediaInfo,
        target: &Path,
        max_bytes: u64,
        format: &str,
        extra: &[String],
    ) -> Vec<String> {
        let mut args = self.base_args(self.config.fetch_timeout_secs);
        args.extend([
            "-f".to_string(),
            format.to_string(),
            "--max-filesize".to_string(),
            max_bytes.to_string(),
            "--no-part".to_string(),
            "--no-mtime".to_string(),
            "--force-overwrites".to_string(),
            "-o".to_string(),
            target.to_string_lossy().to_string(),
        ]);

        if let Some(index) = media.playlist_index {
            args.push("--playlist-items".to_string());
            args.push(index.to_string());
        }

        args.extend(extra.iter().cloned());
        args.push(url.to_string());
        args
    }

    /// Resolve all entries behind a URL (one per line of `--dump-json`)
    pub async fn probe(
        &self,
        url: &str,
        format: &str,
        extra: &[String],
    ) -> Result<Vec<MediaInfo>, DownloadError> {
        let args = self.probe_args(url, format, extra);
        debug!(program = %self.ytdlp_path, args = %args.join(" "), "probing media");

        let out = run_output_with_timeout(&self.ytdlp_path, &args, self.config.probe_timeout_secs)
            .await
            .map_err(DownloadError::Unknown)?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr).to_string();
            warn!(
                url = %url,
                reason = reason_label(&stderr),
                error = %error_summary(&stderr).unwrap_or_default(),
                "yt-dlp probe failed"
            );
            return Err(DownloadError::from(stderr));
        }

        parse_entries(&out.stdout)
    }

    /// Download one entry to `target`
    pub async fn fetch(
        &self,
        url: &str,
        media: &MediaInfo,
        target: &Path,
        max_bytes: u64,
        format: &str,
        extra: &[String],
    ) -> Result<(), DownloadError> {
        let args = self.fetch_args(url, media, target, max_bytes, format, extra);
        info!(url = %url, target = %target.display(), "starting yt-dlp download");

        let out = run_output_with_timeout(&self.ytdlp_path, &args, self.config.fetch_timeout_secs)
            .await
            .map_err(DownloadError::Unknown)?;

        let stdout = String::from_utf8_lossy(&out.stdout);
        let stderr = String::from_utf8_lossy(&out.stderr);

        // yt-dlp exits 0 when it skips a file over --max-filesize
        if is_max_filesize_abort(&stdout) || is_max_filesize_abort(&stderr) {
            return Err(DownloadError::ContentTooLarge {
                size: media.estimated_size().unwrap_or(0),
                limit: max_bytes,
            });
        }

        if !out.status.success() {
            warn!(
                url = %url,
                reason = reason_label(&stderr),
                error = %error_summary(&stderr).unwrap_or_default(),
                "yt-dlp download failed"
            );
            return Err(DownloadError::from(stderr.to_string()));
        }

        Ok(())
    }
}

fn reason_label(stderr: &str) -> &'static str {
    diagnose_error(stderr)
        .unwrap_or(FailureReason::Unknown)
        .description()
}

fn is_max_filesize_abort(output: &str) -> bool {
    output.to_lowercase().contains("larger than max-filesize")
}

/// Parse `--dump-json` output: one JSON object per line
pub fn parse_entries(stdout: &[u8]) -> Result<Vec<MediaInfo>, DownloadError> {
    let text = String::from_utf8_lossy(stdout);
    let mut entries = Vec::new();

    for line in text.lines().map(str::trim).filter(|l| l.starts_with('{')) {
        let entry: MediaInfo = serde_json::from_str(line)
            .map_err(|e| DownloadError::Unknown(format!("Invalid yt-dlp JSON: {}", e)))?;
        entries.push(entry);
    }

    if entries.is_empty() {
        return Err(DownloadError::InvalidLink(
            "yt-dlp returned no media entries".to_string(),
        ));
    }

    Ok(entries)
}
