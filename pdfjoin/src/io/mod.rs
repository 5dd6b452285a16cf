//! File intake and delivery.

pub mod reader;
pub mod writer;

pub use reader::PdfReader;
pub use writer::{
    DEFAULT_FILENAME, DirectoryTarget, Download, MemoryTarget, PDF_CONTENT_TYPE, SaveReceipt,
    SaveTarget, deliver,
};
