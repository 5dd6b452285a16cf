//! The merge session: selected files, their order, previews and merging.
//!
//! A [`MergeSession`] owns the ordered list of selected files. While a
//! merge is running the list is frozen: selecting new files, reordering and
//! starting another merge are all rejected with
//! [`PdfJoinError::MergeInProgress`].
//!
//! # Examples
//!
//! ```no_run
//! use pdfjoin::entry::FileSource;
//! use pdfjoin::io::{DEFAULT_FILENAME, DirectoryTarget};
//! use pdfjoin::session::MergeSession;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = MergeSession::default();
//! session
//!     .select_files(vec![FileSource::path("a.pdf"), FileSource::path("b.pdf")])
//!     .await?;
//! session.move_entry(1, 0).await?;
//!
//! let target = DirectoryTarget::new(".");
//! session.merge_and_deliver(&target, DEFAULT_FILENAME).await?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::codec::{LopdfCodec, PdfCodec};
use crate::entry::{EntryId, FileEntry, FileSource};
use crate::error::{PdfJoinError, Result};
use crate::io::{PdfReader, SaveReceipt, SaveTarget, deliver};
use crate::list::OrderedFileList;
use crate::merge::{MergeOutput, Merger};
use crate::preview::{EntryPreview, Previewer};

/// Outcome of [`MergeSession::merge_and_deliver`].
#[derive(Debug, Clone)]
pub struct Delivered {
    /// The merge result.
    pub output: MergeOutput,
    /// What the save target reported.
    pub receipt: SaveReceipt,
}

/// Clears the in-flight flag when dropped.
struct MergeGuard<'a>(&'a AtomicBool);

impl<'a> MergeGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| PdfJoinError::MergeInProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for MergeGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owns the selected files and drives merges over them.
pub struct MergeSession<C: PdfCodec = LopdfCodec> {
    entries: RwLock<OrderedFileList>,
    previews: RwLock<HashMap<EntryId, EntryPreview>>,
    reader: PdfReader,
    merger: Merger<C>,
    previewer: Previewer<C>,
    merging: AtomicBool,
}

impl Default for MergeSession<LopdfCodec> {
    fn default() -> Self {
        Self::new(LopdfCodec::default())
    }
}

impl<C> MergeSession<C>
where
    C: PdfCodec + Clone + Send + 'static,
{
    /// Create an empty session over `codec`.
    pub fn new(codec: C) -> Self {
        Self {
            entries: RwLock::new(OrderedFileList::new()),
            previews: RwLock::new(HashMap::new()),
            reader: PdfReader::new(),
            merger: Merger::new(codec.clone()),
            previewer: Previewer::new(codec),
            merging: AtomicBool::new(false),
        }
    }

    /// Check whether a merge is running.
    pub fn is_merging(&self) -> bool {
        self.merging.load(Ordering::Acquire)
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.is_merging() {
            return Err(PdfJoinError::MergeInProgress);
        }
        Ok(())
    }

    /// Replace the selection with `sources`, in the order given.
    ///
    /// Every source is read before the list changes: if any read fails the
    /// previous selection stays in place.
    ///
    /// # Errors
    ///
    /// Returns [`PdfJoinError::MergeInProgress`] while a merge runs, or the
    /// first read error.
    pub async fn select_files(&self, sources: Vec<FileSource>) -> Result<Vec<FileEntry>> {
        self.ensure_idle()?;
        let entries = self.reader.read_all(sources).await?;

        let mut list = self.entries.write().await;
        self.ensure_idle()?;
        *list = OrderedFileList::from_entries(entries);
        self.previews.write().await.clear();

        info!(files = list.len(), "selected files");
        Ok(list.as_slice().to_vec())
    }

    /// Move the entry at `from` so that it ends up at `to`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfJoinError::MergeInProgress`] while a merge runs and
    /// [`PdfJoinError::IndexOutOfBounds`] for a position outside the list.
    pub async fn move_entry(&self, from: usize, to: usize) -> Result<()> {
        self.ensure_idle()?;
        let mut list = self.entries.write().await;
        self.ensure_idle()?;

        list.move_entry(from, to)?;
        debug!(from, to, "moved entry");
        Ok(())
    }

    /// Snapshot of the current selection, in order.
    pub async fn entries(&self) -> Vec<FileEntry> {
        self.entries.read().await.as_slice().to_vec()
    }

    /// Previews of the current selection, in order.
    ///
    /// Previews are computed once per entry and cached; reordering reuses
    /// them. The selection cannot change while previews are computed, so
    /// the cache only ever holds entries of the current selection.
    pub async fn previews(&self) -> Vec<EntryPreview> {
        let list = self.entries.read().await;
        let entries = list.as_slice();

        let missing: Vec<FileEntry> = {
            let cache = self.previews.read().await;
            entries
                .iter()
                .filter(|entry| !cache.contains_key(&entry.id()))
                .cloned()
                .collect()
        };

        let mut cache = self.previews.write().await;
        if !missing.is_empty() {
            for preview in self.previewer.preview(missing).await {
                cache.insert(preview.id, preview);
            }
        }

        entries
            .iter()
            .filter_map(|entry| cache.get(&entry.id()).cloned())
            .collect()
    }

    /// Merge the current selection.
    ///
    /// The list is read, never changed. The returned bytes are not saved
    /// anywhere.
    ///
    /// # Errors
    ///
    /// Returns [`PdfJoinError::MergeInProgress`] if another merge is running,
    /// otherwise any error from [`Merger::merge`].
    pub async fn merge(&self) -> Result<MergeOutput> {
        let _guard = MergeGuard::acquire(&self.merging)?;
        let entries = self.entries.read().await.as_slice().to_vec();

        self.merger.merge(entries).await.inspect_err(|e| {
            warn!(error = %e, "merge failed; selection left unchanged");
        })
    }

    /// Merge the current selection and deliver it to `target`.
    ///
    /// Nothing is delivered if the merge fails.
    pub async fn merge_and_deliver<T: SaveTarget>(
        &self,
        target: &T,
        filename: &str,
    ) -> Result<Delivered> {
        let output = self.merge().await?;
        let receipt = deliver(target, output.bytes.clone(), filename).await?;
        Ok(Delivered { output, receipt })
    }
}
