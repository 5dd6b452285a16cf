//! Selected files and their identities.
//!
//! A [`FileEntry`] captures the bytes of one selected file at intake time.
//! The buffer is immutable and shared between clones, so previews and merges
//! always see the content that was selected, no matter how the list is
//! reordered or replaced afterwards.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// Stable unique key of a list entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A raw handle to a file the user selected.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// A file on disk, read during intake.
    Path(PathBuf),
    /// Bytes already in memory, e.g. handed over by an embedding host.
    Memory {
        /// Name shown to the user.
        name: String,
        /// File content.
        bytes: Vec<u8>,
    },
}

impl FileSource {
    /// Create a handle for a file on disk.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// Create a handle for in-memory content.
    pub fn memory(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::Memory {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Name shown to the user for this handle.
    pub fn display_name(&self) -> String {
        match self {
            Self::Path(path) => display_name_for_path(path),
            Self::Memory { name, .. } => name.clone(),
        }
    }
}

fn display_name_for_path(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// One selected file, frozen at intake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    id: EntryId,
    name: String,
    bytes: Arc<[u8]>,
}

impl FileEntry {
    /// Create an entry with a freshly generated identifier.
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            id: EntryId::new(),
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Unique identifier of this entry.
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// Display name, usually the file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Content captured at intake.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size of the content in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}
