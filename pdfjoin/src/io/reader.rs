//! Intake: reading selected file handles into entries.
//!
//! All handles are read before anything is handed back, so a selection
//! either yields one [`FileEntry`] per handle, in selection order, or an
//! error and no entries at all.
//!
//! # Examples
//!
//! ```no_run
//! use pdfjoin::entry::FileSource;
//! use pdfjoin::io::PdfReader;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let entries = reader
//!     .read_all(vec![FileSource::path("a.pdf"), FileSource::path("b.pdf")])
//!     .await?;
//! assert_eq!(entries.len(), 2);
//! # Ok(())
//! # }
//! ```

use futures::future::try_join_all;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

use crate::entry::{FileEntry, FileSource};
use crate::error::{PdfJoinError, Result};

/// Reader that turns file handles into immutable entries.
#[derive(Debug, Clone, Default)]
pub struct PdfReader;

impl PdfReader {
    /// Create a new reader.
    pub fn new() -> Self {
        Self
    }

    /// Read a single handle.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path does not exist
    /// - The path is a directory
    /// - The file cannot be read
    pub async fn read(&self, source: FileSource) -> Result<FileEntry> {
        let name = source.display_name();

        let bytes = match source {
            FileSource::Path(path) => read_path(&path).await?,
            FileSource::Memory { bytes, .. } => bytes,
        };

        debug!(name = %name, size = bytes.len(), "read selected file");
        Ok(FileEntry::new(name, bytes))
    }

    /// Read every handle, keeping selection order.
    ///
    /// Handles are read concurrently; the first failure aborts the whole
    /// intake.
    pub async fn read_all(&self, sources: Vec<FileSource>) -> Result<Vec<FileEntry>> {
        try_join_all(sources.into_iter().map(|source| self.read(source))).await
    }
}

async fn read_path(path: &Path) -> Result<Vec<u8>> {
    let metadata = tokio::fs::metadata(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => PdfJoinError::file_not_found(path.to_path_buf()),
        _ => PdfJoinError::FailedToRead {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    if !metadata.is_file() {
        return Err(PdfJoinError::not_a_file(path.to_path_buf()));
    }

    tokio::fs::read(path)
        .await
        .map_err(|e| PdfJoinError::FailedToRead {
            path: path.to_path_buf(),
            source: e,
        })
}
