// Helper functions for backend implementations

use std::io;
use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Run command with timeout, capturing stdout and stderr
pub async fn run_output_with_timeout(
    program: &str,
    args: &[String],
    timeout_secs: u64,
) -> Result<Output, String> {
    let mut child = TokioCommand::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| format!("Failed to start {}: {}", program, e))?;

    let mut stdout_pipe = child
        .stdout
        .take()
        .ok_or_else(|| format!("Failed to capture stdout from {}", program))?;
    let mut stderr_pipe = child
        .stderr
        .take()
        .ok_or_else(|| format!("Failed to capture stderr from {}", program))?;

    let stdout_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stdout_pipe
            .read_to_end(&mut buf)
            .await
            .map_err(|e| format!("Failed to read stdout: {}", e))?;
        Ok::<Vec<u8>, String>(buf)
    });
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stderr_pipe
            .read_to_end(&mut buf)
            .await
            .map_err(|e| format!("Failed to read stderr: {}", e))?;
        Ok::<Vec<u8>, String>(buf)
    });

    match timeout(Duration::from_secs(timeout_secs), child.wait()).await {
        Ok(status_res) => {
            let status = status_res.map_err(|e| format!("Failed to wait for {}: {}", program, e))?;
            let stdout = stdout_task
                .await
                .map_err(|e| format!("stdout task failed: {}", e))??;
            let stderr = stderr_task
                .await
                .map_err(|e| format!("stderr task failed: {}", e))??;
            Ok(Output { status, stdout, stderr })
        }
        Err(_) => {
            let _ = child.kill().await;
            stdout_task.abort();
            stderr_task.abort();
            Err(format!("Timed out after {}s", timeout_secs))
        }
    }
}

/// Find yt-dlp executable: explicit path, common install locations, then PATH
pub fn find_ytdlp(explicit: Option<&str>) -> String {
    if let Some(path) = explicit.map(str::trim).filter(|p| !p.is_empty()) {
        return path.to_string();
    }

    let common_paths = [
        "/opt/homebrew/bin/yt-dlp", // Homebrew on Apple Silicon
        "/usr/local/bin/yt-dlp",    // Homebrew on Intel Mac, pip --user installs
        "/usr/bin/yt-dlp",          // System installation
    ];

    for path in common_paths {
        if Path::new(path).exists() {
            return path.to_string();
        }
    }

    // Last resort: hope it's in PATH
    "yt-dlp".to_string()
}

/// Remove a file, treating an absent file as success
pub async fn remove_if_exists(path: &Path) -> io::Result<bool> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            debug!(path = %path.display(), "removed file");
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to remove file");
            Err(e)
        }
    }
}

/// Size of a file in bytes, `None` when it does not exist
pub async fn file_size(path: &Path) -> io::Result<Option<u64>> {
    match tokio::fs::metadata(path).await {
        Ok(meta) => Ok(Some(meta.len())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_ytdlp_prefers_explicit() {
        assert_eq!(find_ytdlp(Some("/opt/tools/yt-dlp")), "/opt/tools/yt-dlp");
        assert_ne!(find_ytdlp(Some("  ")), "");
    }

    #[tokio::test]
    async fn test_remove_if_exists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        tokio::fs::write(&path, b"data").await.unwrap();

        assert!(remove_if_exists(&path).await.unwrap());
        assert!(!path.exists());
        assert!(!remove_if_exists(&path).await.unwrap());
    }

    #[tokio::test]
    async fn test_file_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        assert_eq!(file_size(&path).await.unwrap(), None);
        tokio::fs::write(&path, b"12345").await.unwrap();
        assert_eq!(file_size(&path).await.unwrap(), Some(5));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_output_captures_stdout() {
        let out = run_output_with_timeout("sh", &["-c".to_string(), "echo hi".to_string()], 5)
            .await
            .unwrap();
        assert!(out.status.success());
        assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "hi");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_output_times_out() {
        let err = run_output_with_timeout("sh", &["-c".to_string(), "sleep 5".to_string()], 1)
            .await
            .unwrap_err();
        assert!(err.contains("Timed out"));
    }

    #[tokio::test]
    async fn test_run_output_missing_program() {
        let err = run_output_with_timeout("definitely-not-a-real-binary-xyz", &[], 5)
            .await
            .unwrap_err();
        assert!(err.contains("Failed to start"));
    }
}
