//! Core PDF merging implementation.
//!
//! Entries are decoded one at a time, in list order, and their pages are
//! appended to a fresh accumulator document. A single bad entry fails the
//! whole merge: the accumulator is dropped and no bytes are produced.

use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};
use tokio::task;
use tracing::{debug, error, info};

use crate::codec::{LopdfCodec, PdfCodec};
use crate::config::CompressionLevel;
use crate::entry::{EntryId, FileEntry};
use crate::error::{PdfJoinError, Result};
use crate::utils::format_file_size;

/// Encoded bytes of a merged document.
#[derive(Clone, PartialEq, Eq)]
pub struct MergedBytes(Vec<u8>);

impl MergedBytes {
    /// Borrow the encoded document.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether there are no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Take ownership of the encoded document.
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for MergedBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for MergedBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for MergedBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MergedBytes")
            .field(&format_args!("{} bytes", self.0.len()))
            .finish()
    }
}

/// Page count contributed by one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPages {
    /// Entry the pages came from.
    pub id: EntryId,
    /// Display name of the entry.
    pub name: String,
    /// Number of pages appended.
    pub page_count: usize,
}

/// Statistics about a merge operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeStatistics {
    /// Number of entries merged.
    pub files_merged: usize,

    /// Total number of pages in the merged document.
    pub total_pages: usize,

    /// Pages contributed by each entry, in merge order.
    pub pages_per_entry: Vec<EntryPages>,

    /// Total size of the inputs.
    pub input_size: u64,

    /// Size of the encoded output.
    pub output_size: u64,

    /// Total time taken for the merge.
    pub merge_time: Duration,

    /// Compression applied to the output.
    pub compression: CompressionLevel,
}

impl MergeStatistics {
    /// Format input size as human-readable string.
    pub fn format_input_size(&self) -> String {
        format_file_size(self.input_size)
    }

    /// Format output size as human-readable string.
    pub fn format_output_size(&self) -> String {
        format_file_size(self.output_size)
    }
}

/// Result of a merge operation.
#[derive(Debug, Clone)]
pub struct MergeOutput {
    /// The encoded merged document.
    pub bytes: MergedBytes,

    /// Statistics about the merge.
    pub statistics: MergeStatistics,
}

/// PDF merger that combines entries into one document.
#[derive(Debug, Clone)]
pub struct Merger<C> {
    codec: C,
}

impl Default for Merger<LopdfCodec> {
    fn default() -> Self {
        Self::new(LopdfCodec::default())
    }
}

impl<C: PdfCodec> Merger<C> {
    /// Create a merger over `codec`.
    pub fn new(codec: C) -> Self {
        Self { codec }
    }

    /// The codec used for decoding and encoding.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Merge `entries`, in order, into a single encoded document.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `entries` is empty ([`PdfJoinError::EmptyInput`])
    /// - An entry cannot be decoded or its pages copied
    ///   ([`PdfJoinError::DecodeFailure`])
    /// - Pages cannot be attached to the output ([`PdfJoinError::MergeFailed`])
    /// - The output cannot be serialized ([`PdfJoinError::EncodeFailed`])
    pub fn merge_entries(&self, entries: &[FileEntry]) -> Result<MergeOutput> {
        if entries.is_empty() {
            return Err(PdfJoinError::EmptyInput);
        }

        let start = Instant::now();
        let mut merged = self.codec.create_empty();
        let mut pages_per_entry = Vec::with_capacity(entries.len());

        for entry in entries {
            let page_count = self.append_entry(&mut merged, entry).inspect_err(|e| {
                error!(entry = %entry.id(), name = entry.name(), error = %e, "merge aborted");
            })?;

            debug!(name = entry.name(), pages = page_count, "appended entry");
            pages_per_entry.push(EntryPages {
                id: entry.id(),
                name: entry.name().to_string(),
                page_count,
            });
        }

        let total_pages = self.codec.page_count(&merged);
        let bytes = self
            .codec
            .encode(merged)
            .map_err(|e| PdfJoinError::EncodeFailed {
                reason: e.to_string(),
            })?;

        let statistics = MergeStatistics {
            files_merged: entries.len(),
            total_pages,
            pages_per_entry,
            input_size: entries.iter().map(FileEntry::size).sum(),
            output_size: bytes.len() as u64,
            merge_time: start.elapsed(),
            compression: self.codec.compression(),
        };

        info!(
            files = statistics.files_merged,
            pages = statistics.total_pages,
            output_size = statistics.output_size,
            "merge complete"
        );

        Ok(MergeOutput {
            bytes: MergedBytes(bytes),
            statistics,
        })
    }

    /// Decode `entry` and append all of its pages to `merged`.
    fn append_entry(&self, merged: &mut C::Document, entry: &FileEntry) -> Result<usize> {
        let decode_failure =
            |reason: String| PdfJoinError::decode_failure(entry.id(), entry.name(), reason);

        let doc = self
            .codec
            .decode(entry.bytes())
            .map_err(|e| decode_failure(e.to_string()))?;

        let indices: Vec<usize> = (0..self.codec.page_count(&doc)).collect();
        let pages = self
            .codec
            .copy_pages(merged, &doc, &indices)
            .map_err(|e| decode_failure(e.to_string()))?;

        self.codec
            .append(merged, pages)
            .map_err(|e| PdfJoinError::merge_failed(format!("{}: {e}", entry.name())))?;

        Ok(indices.len())
    }
}

impl<C> Merger<C>
where
    C: PdfCodec + Clone + Send + 'static,
{
    /// Merge `entries` without blocking the async runtime.
    ///
    /// Decoding and encoding run on the blocking thread pool; the caller is
    /// suspended until the merge has finished.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfjoin::merge::Merger;
    /// # use pdfjoin::entry::FileEntry;
    /// # async fn example(entries: Vec<FileEntry>) -> Result<(), Box<dyn std::error::Error>> {
    /// let merger = Merger::default();
    /// let output = merger.merge(entries).await?;
    /// println!("Merged {} files into {} pages",
    ///          output.statistics.files_merged,
    ///          output.statistics.total_pages);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn merge(&self, entries: Vec<FileEntry>) -> Result<MergeOutput> {
        let merger = self.clone();
        task::spawn_blocking(move || merger.merge_entries(&entries))
            .await
            .map_err(|e| PdfJoinError::merge_failed(format!("merge task failed: {e}")))?
    }
}
