//! Delivery: handing merged bytes to the host's save mechanism.
//!
//! A [`SaveTarget`] is whatever the host uses to put a file in front of
//! the user. [`DirectoryTarget`] writes into a directory:
//! - The bytes go to a temporary file next to the destination first
//! - The temporary file is persisted onto the destination name
//! - On any failure the temporary file is removed
//!
//! # Examples
//!
//! ```no_run
//! use pdfjoin::io::{DirectoryTarget, deliver};
//! use pdfjoin::merge::MergedBytes;
//!
//! # async fn example(bytes: MergedBytes) -> Result<(), Box<dyn std::error::Error>> {
//! let target = DirectoryTarget::new("out");
//! let receipt = deliver(&target, bytes, "merged.pdf").await?;
//! println!("Saved {} bytes to {}", receipt.bytes_written, receipt.location);
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::task;
use tracing::{error, info};

use crate::config::validate_output_name;
use crate::error::{PdfJoinError, Result};
use crate::merge::MergedBytes;

/// Name under which merged documents are saved unless told otherwise.
pub const DEFAULT_FILENAME: &str = "merged.pdf";

/// Content type of every delivered document.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A file ready to be handed to a save mechanism.
#[derive(Debug, Clone)]
pub struct Download {
    /// File name offered to the user.
    pub filename: String,
    /// MIME type of the content.
    pub content_type: &'static str,
    /// File content.
    pub bytes: MergedBytes,
}

/// Outcome of a save reported by the target.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveReceipt {
    /// Where the file ended up, in the target's own terms.
    pub location: String,
    /// Number of bytes written.
    pub bytes_written: u64,
    /// MIME type of the saved content.
    pub content_type: &'static str,
    /// Time taken by the save.
    pub write_time: Duration,
}

/// The host environment's file-save mechanism.
pub trait SaveTarget {
    /// Save `download`.
    fn save(&self, download: Download) -> impl Future<Output = Result<SaveReceipt>> + Send;
}

/// Hand `bytes` to `target` as a PDF named `filename`.
///
/// # Errors
///
/// Returns [`PdfJoinError::InvalidConfig`] if `filename` is not a plain file
/// name, or whatever error the target reports.
pub async fn deliver<T: SaveTarget>(
    target: &T,
    bytes: MergedBytes,
    filename: &str,
) -> Result<SaveReceipt> {
    validate_output_name(filename).map_err(|e| PdfJoinError::invalid_config(e.to_string()))?;

    let download = Download {
        filename: filename.to_string(),
        content_type: PDF_CONTENT_TYPE,
        bytes,
    };

    match target.save(download).await {
        Ok(receipt) => {
            info!(
                location = %receipt.location,
                bytes = receipt.bytes_written,
                "delivered merged document"
            );
            Ok(receipt)
        }
        Err(err) => {
            error!(%filename, error = %err, "delivery failed");
            Err(err)
        }
    }
}

/// Saves downloads as files in a directory.
#[derive(Debug, Clone)]
pub struct DirectoryTarget {
    dir: PathBuf,
    overwrite: bool,
}

impl DirectoryTarget {
    /// Create a target that refuses to replace existing files.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            overwrite: false,
        }
    }

    /// Allow or forbid replacing an existing file.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Directory files are saved into.
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }
}

impl SaveTarget for DirectoryTarget {
    async fn save(&self, download: Download) -> Result<SaveReceipt> {
        let dir = self.dir.clone();
        let overwrite = self.overwrite;

        task::spawn_blocking(move || write_atomically(&dir, overwrite, &download))
            .await
            .map_err(|e| PdfJoinError::other(format!("Write task failed: {e}")))?
    }
}

fn write_atomically(
    dir: &std::path::Path,
    overwrite: bool,
    download: &Download,
) -> Result<SaveReceipt> {
    let start = Instant::now();
    let path = dir.join(&download.filename);

    if !overwrite && path.exists() {
        return Err(PdfJoinError::output_exists(path));
    }

    std::fs::create_dir_all(dir).map_err(|e| PdfJoinError::FailedToCreateOutput {
        path: dir.to_path_buf(),
        source: e,
    })?;

    // Dropping the temporary file deletes it, so an early return below never
    // leaves partial output behind.
    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
        PdfJoinError::FailedToCreateOutput {
            path: path.clone(),
            source: e,
        }
    })?;

    temp.write_all(download.bytes.as_bytes())
        .and_then(|()| temp.flush())
        .map_err(|e| PdfJoinError::FailedToWrite {
            path: temp.path().to_path_buf(),
            source: e,
        })?;

    if overwrite {
        temp.persist(&path)
    } else {
        temp.persist_noclobber(&path)
    }
    .map_err(|e| {
        if e.error.kind() == std::io::ErrorKind::AlreadyExists {
            PdfJoinError::output_exists(path.clone())
        } else {
            PdfJoinError::FailedToWrite {
                path: path.clone(),
                source: e.error,
            }
        }
    })?;

    Ok(SaveReceipt {
        location: path.display().to_string(),
        bytes_written: download.bytes.len() as u64,
        content_type: download.content_type,
        write_time: start.elapsed(),
    })
}

/// Keeps downloads in memory.
#[derive(Debug, Default)]
pub struct MemoryTarget {
    downloads: Mutex<Vec<Download>>,
}

impl MemoryTarget {
    /// Create an empty target.
    pub fn new() -> Self {
        Self::default()
    }

    /// Downloads saved so far, oldest first.
    pub fn downloads(&self) -> Vec<Download> {
        self.downloads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SaveTarget for MemoryTarget {
    async fn save(&self, download: Download) -> Result<SaveReceipt> {
        let receipt = SaveReceipt {
            location: format!("memory:{}", download.filename),
            bytes_written: download.bytes.len() as u64,
            content_type: download.content_type,
            write_time: Duration::ZERO,
        };
        self.downloads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(download);
        Ok(receipt)
    }
}
