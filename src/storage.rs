// Download directory and per-request file allocation

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::downloader::utils::remove_if_exists;

/// Directory holding in-flight downloads.
///
/// Names are `{prefix}_{YYYYmmdd_HHMMSS}_{seq}.{ext}`; the counter keeps
/// names distinct even when several requests land in the same second.
#[derive(Debug)]
pub struct DownloadDir {
    root: PathBuf,
    seq: AtomicU64,
}

impl DownloadDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            seq: AtomicU64::new(0),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory if absent
    pub async fn ensure(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Reserve a fresh path for one request
    pub fn allocate(&self, prefix: &str, ext: &str) -> LocalMedia {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let name = format!("{}_{}_{}.{}", prefix, timestamp(OffsetDateTime::now_utc()), seq, ext);
        let path = self.root.join(name);
        debug!(path = %path.display(), "allocated download path");
        LocalMedia {
            path,
            released: false,
        }
    }
}

fn timestamp(now: OffsetDateTime) -> String {
    format!(
        "{:04}{:02}{:02}_{:02}{:02}{:02}",
        now.year(),
        u8::from(now.month()),
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    )
}

/// Exclusive owner of one downloaded file path.
///
/// `release` removes the file; if the owner is dropped without releasing,
/// the file is removed synchronously on drop.
#[derive(Debug)]
pub struct LocalMedia {
    path: PathBuf,
    released: bool,
}

impl LocalMedia {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the file. Absent files are fine.
    pub async fn release(mut self) {
        self.released = true;
        if let Err(e) = remove_if_exists(&self.path).await {
            warn!(path = %self.path.display(), error = %e, "could not clean up download");
        }
    }
}

impl Drop for LocalMedia {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "removed download on drop"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "could not clean up download"),
        }
    }
}
