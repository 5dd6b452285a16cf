//! The PDF codec contract.
//!
//! The merge pipeline never touches a PDF library directly. It talks to a
//! [`PdfCodec`], which decodes bytes into documents, copies pages between
//! documents and encodes the result. [`LopdfCodec`] is the implementation
//! backed by `lopdf`.

mod lopdf_codec;

pub use lopdf_codec::{LopdfCodec, LopdfPage};

use serde::Serialize;

use crate::config::CompressionLevel;

/// Errors reported by a codec.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The bytes are not a parsable PDF document.
    #[error("not a valid PDF document: {0}")]
    Malformed(String),

    /// The document is encrypted.
    #[error("PDF is encrypted and cannot be processed")]
    Encrypted,

    /// A requested page does not exist.
    #[error("page index {index} is out of range for a document with {page_count} page(s)")]
    PageOutOfRange {
        /// Requested page index (0-based).
        index: usize,
        /// Number of pages in the document.
        page_count: usize,
    },

    /// The page tree is missing or damaged.
    #[error("damaged page tree: {0}")]
    PageTree(String),

    /// The document could not be serialized.
    #[error("serialization failed: {0}")]
    Encode(String),
}

/// Facts about a decoded document, used for previews.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    /// Number of pages.
    pub page_count: usize,

    /// PDF version as declared in the header, e.g. `"1.7"`.
    pub version: String,

    /// Number of indirect objects.
    pub object_count: usize,

    /// Width and height of the first page in points, if known.
    pub page_dimensions: Option<(f32, f32)>,
}

/// Capability to decode, combine and encode PDF documents.
///
/// Page indices are 0-based and follow the document's own page order.
pub trait PdfCodec {
    /// A decoded, mutable document.
    type Document;

    /// A page copied into a target document but not yet attached to its
    /// page tree.
    type Page;

    /// Decode `bytes` into a document.
    fn decode(&self, bytes: &[u8]) -> Result<Self::Document, CodecError>;

    /// Create a document with no pages.
    fn create_empty(&self) -> Self::Document;

    /// Number of pages in `doc`.
    fn page_count(&self, doc: &Self::Document) -> usize;

    /// Copy the pages at `indices` from `source` into `target`.
    ///
    /// Page content, including every resource it uses, is copied by value:
    /// nothing in `target` shares mutable state with `source`.
    fn copy_pages(
        &self,
        target: &mut Self::Document,
        source: &Self::Document,
        indices: &[usize],
    ) -> Result<Vec<Self::Page>, CodecError>;

    /// Append `pages` to the end of `target`, in the given order.
    fn append(&self, target: &mut Self::Document, pages: Vec<Self::Page>)
    -> Result<(), CodecError>;

    /// Serialize `doc` to bytes.
    fn encode(&self, doc: Self::Document) -> Result<Vec<u8>, CodecError>;

    /// Compression applied by [`encode`](Self::encode).
    fn compression(&self) -> CompressionLevel {
        CompressionLevel::None
    }

    /// Describe `doc`.
    fn inspect(&self, doc: &Self::Document) -> DocumentInfo;
}
