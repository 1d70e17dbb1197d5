//! Scratch directory for captured screenshots.
//!
//! Files are named after the capture time and removed again after a delay.
//! Removal is best-effort: a file that outlives the process is harmless.

use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Give up looking for a free file name after this many suffixes.
const MAX_NAME_ATTEMPTS: u32 = 100;

#[derive(Debug, Clone)]
pub struct ScratchDir {
    root: PathBuf,
}

impl ScratchDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Writes PNG bytes to a fresh, timestamped file.
    ///
    /// The directory is created if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Extraction`] if the directory or file cannot be
    /// written.
    pub async fn persist(&self, png: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.root).await.map_err(|e| {
            AppError::extraction(format!("Failed to create {}: {}", self.root.display(), e))
        })?;

        let stem = file_stem(Utc::now());
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = if attempt == 0 {
                format!("{stem}.png")
            } else {
                format!("{stem}-{attempt}.png")
            };
            let path = self.root.join(name);

            let mut file = match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(AppError::extraction(format!(
                        "Failed to create {}: {}",
                        path.display(),
                        e
                    )));
                }
            };

            let write_err =
                |e: std::io::Error| AppError::extraction(format!("Failed to write {}: {}", path.display(), e));
            file.write_all(png).await.map_err(write_err)?;
            file.flush().await.map_err(write_err)?;

            log::debug!("saved screenshot to {}", path.display());
            return Ok(path);
        }

        Err(AppError::extraction(format!(
            "No free screenshot name in {}",
            self.root.display()
        )))
    }

    /// Deletes `path` after `delay` on the current tokio runtime.
    pub fn schedule_cleanup(&self, path: PathBuf, delay: Duration) {
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match fs::remove_file(&path).await {
                Ok(()) => log::debug!("removed {}", path.display()),
                Err(e) => log::warn!("Failed to delete screenshot {}: {}", path.display(), e),
            }
        });
    }
}

/// `screenshot-2024-05-01T12-30-45-123Z`
fn file_stem(now: DateTime<Utc>) -> String {
    let stamp = now
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("screenshot-{stamp}")
}
