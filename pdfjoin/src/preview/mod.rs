//! Per-entry previews of the selected files.
//!
//! Previews decode every entry independently. A file that cannot be decoded
//! gets a [`PreviewStatus::Failed`] status and a warning in the log; the other
//! previews are unaffected. Only the merge itself treats a bad file as fatal.
//!
//! # Examples
//!
//! ```no_run
//! use pdfjoin::entry::FileEntry;
//! use pdfjoin::preview::{PreviewReport, Previewer};
//!
//! # fn example(entries: Vec<FileEntry>) {
//! let previewer = Previewer::default();
//! let report = PreviewReport::from_previews(previewer.preview_all(&entries));
//! println!("{} pages in {} ready files", report.total_pages, report.ready);
//! # }
//! ```

use serde::Serialize;
use tokio::task;
use tracing::{debug, warn};

use crate::codec::{LopdfCodec, PdfCodec};
use crate::entry::{EntryId, FileEntry};
use crate::utils::format_file_size;

/// Outcome of previewing one entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum PreviewStatus {
    /// The entry decoded successfully.
    #[serde(rename_all = "camelCase")]
    Ready {
        /// Number of pages.
        page_count: usize,
        /// PDF version.
        version: String,
        /// Number of indirect objects.
        object_count: usize,
        /// Width and height of the first page in points, if known.
        page_dimensions: Option<(f32, f32)>,
    },

    /// The entry could not be decoded.
    Failed {
        /// Reason reported by the codec.
        reason: String,
    },
}

/// Preview of a single entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPreview {
    /// Entry identifier.
    pub id: EntryId,
    /// Display name.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Decode outcome.
    #[serde(flatten)]
    pub status: PreviewStatus,
}

impl EntryPreview {
    /// Page count, if the entry decoded.
    pub fn page_count(&self) -> Option<usize> {
        match self.status {
            PreviewStatus::Ready { page_count, .. } => Some(page_count),
            PreviewStatus::Failed { .. } => None,
        }
    }

    /// Check whether the entry decoded.
    pub fn is_ready(&self) -> bool {
        matches!(self.status, PreviewStatus::Ready { .. })
    }
}

/// Summary of previews for the whole list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewReport {
    /// Individual previews, in list order.
    pub previews: Vec<EntryPreview>,

    /// Total number of pages across ready entries.
    pub total_pages: usize,

    /// Total size of all entries in bytes.
    pub total_size: u64,

    /// Number of entries that decoded.
    pub ready: usize,

    /// Number of entries that failed to decode.
    pub failed: usize,
}

impl PreviewReport {
    /// Create a report from individual previews.
    pub fn from_previews(previews: Vec<EntryPreview>) -> Self {
        let total_pages = previews.iter().filter_map(EntryPreview::page_count).sum();
        let total_size = previews.iter().map(|p| p.size).sum();
        let ready = previews.iter().filter(|p| p.is_ready()).count();
        let failed = previews.len() - ready;

        Self {
            previews,
            total_pages,
            total_size,
            ready,
            failed,
        }
    }

    /// Check if every entry decoded.
    pub fn all_ready(&self) -> bool {
        self.failed == 0
    }

    /// Format total size as human-readable string.
    pub fn format_total_size(&self) -> String {
        format_file_size(self.total_size)
    }
}

/// Builds previews using a codec.
#[derive(Debug, Clone)]
pub struct Previewer<C> {
    codec: C,
}

impl Default for Previewer<LopdfCodec> {
    fn default() -> Self {
        Self::new(LopdfCodec::default())
    }
}

impl<C: PdfCodec> Previewer<C> {
    /// Create a previewer over `codec`.
    pub fn new(codec: C) -> Self {
        Self { codec }
    }

    /// Preview a single entry.
    pub fn preview_entry(&self, entry: &FileEntry) -> EntryPreview {
        let status = match self.codec.decode(entry.bytes()) {
            Ok(doc) => {
                let info = self.codec.inspect(&doc);
                debug!(name = entry.name(), pages = info.page_count, "previewed entry");
                PreviewStatus::Ready {
                    page_count: info.page_count,
                    version: info.version,
                    object_count: info.object_count,
                    page_dimensions: info.page_dimensions,
                }
            }
            Err(e) => {
                warn!(entry = %entry.id(), name = entry.name(), error = %e, "preview failed");
                PreviewStatus::Failed {
                    reason: e.to_string(),
                }
            }
        };

        EntryPreview {
            id: entry.id(),
            name: entry.name().to_string(),
            size: entry.size(),
            status,
        }
    }

    /// Preview every entry, in order.
    pub fn preview_all(&self, entries: &[FileEntry]) -> Vec<EntryPreview> {
        entries.iter().map(|entry| self.preview_entry(entry)).collect()
    }
}

impl<C> Previewer<C>
where
    C: PdfCodec + Clone + Send + 'static,
{
    /// Preview `entries` on the blocking thread pool.
    ///
    /// Never fails: if the preview task itself dies, every entry is reported
    /// as failed.
    pub async fn preview(&self, entries: Vec<FileEntry>) -> Vec<EntryPreview> {
        let previewer = self.clone();
        let fallback: Vec<(EntryId, String, u64)> = entries
            .iter()
            .map(|e| (e.id(), e.name().to_string(), e.size()))
            .collect();

        match task::spawn_blocking(move || previewer.preview_all(&entries)).await {
            Ok(previews) => previews,
            Err(e) => {
                warn!(error = %e, "preview task failed");
                fallback
                    .into_iter()
                    .map(|(id, name, size)| EntryPreview {
                        id,
                        name,
                        size,
                        status: PreviewStatus::Failed {
                            reason: format!("preview task failed: {e}"),
                        },
                    })
                    .collect()
            }
        }
    }
}
