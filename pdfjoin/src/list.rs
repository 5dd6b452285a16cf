//! The user-ordered list of selected files.

use crate::entry::{EntryId, FileEntry};
use crate::error::{PdfJoinError, Result};

/// Selected files in presentation order.
///
/// The order starts as the selection order and changes only through
/// [`OrderedFileList::move_entry`], which permutes entries without ever
/// duplicating or dropping one.
#[derive(Debug, Clone, Default)]
pub struct OrderedFileList {
    entries: Vec<FileEntry>,
}

impl OrderedFileList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a list holding `entries` in the given order.
    pub fn from_entries(entries: Vec<FileEntry>) -> Self {
        Self { entries }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in list order.
    pub fn iter(&self) -> std::slice::Iter<'_, FileEntry> {
        self.entries.iter()
    }

    /// Entries as a slice, in list order.
    pub fn as_slice(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Identifiers in list order.
    pub fn ids(&self) -> Vec<EntryId> {
        self.entries.iter().map(FileEntry::id).collect()
    }

    /// Move the entry at `from` so that it ends up at `to`.
    ///
    /// Entries between the two positions shift by one; all others keep
    /// their place. Moving an entry onto its own position is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`PdfJoinError::IndexOutOfBounds`] if either index is not
    /// below [`len`](Self::len). The list is left untouched in that case.
    pub fn move_entry(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.entries.len();
        for index in [from, to] {
            if index >= len {
                return Err(PdfJoinError::IndexOutOfBounds { index, len });
            }
        }

        if from == to {
            return Ok(());
        }

        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        Ok(())
    }
}

impl<'a> IntoIterator for &'a OrderedFileList {
    type Item = &'a FileEntry;
    type IntoIter = std::slice::Iter<'a, FileEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
