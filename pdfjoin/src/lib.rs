//! pdfjoin - Combine selected PDF files into a single document.
//!
//! The library keeps an ordered list of selected files, lets it be
//! reordered, and merges the files in that order into one PDF that is handed
//! to a save target as `merged.pdf`. It provides:
//!
//! - Intake of files from paths or memory
//! - Reordering with bounds-checked moves
//! - Per-file previews where failures stay isolated
//! - All-or-nothing merging behind a pluggable PDF codec
//! - Atomic delivery to a directory
//!
//! # Examples
//!
//! ## Session
//!
//! ```no_run
//! use pdfjoin::entry::FileSource;
//! use pdfjoin::io::{DEFAULT_FILENAME, DirectoryTarget};
//! use pdfjoin::session::MergeSession;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = MergeSession::default();
//! session
//!     .select_files(vec![
//!         FileSource::path("a.pdf"),
//!         FileSource::path("b.pdf"),
//!         FileSource::path("c.pdf"),
//!     ])
//!     .await?;
//!
//! // Put c.pdf first.
//! session.move_entry(2, 0).await?;
//!
//! let delivered = session
//!     .merge_and_deliver(&DirectoryTarget::new("."), DEFAULT_FILENAME)
//!     .await?;
//! println!("Created {} page document", delivered.output.statistics.total_pages);
//! # Ok(())
//! # }
//! ```
//!
//! ## Using Individual Components
//!
//! ```no_run
//! use pdfjoin::entry::FileSource;
//! use pdfjoin::io::PdfReader;
//! use pdfjoin::merge::Merger;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let entries = PdfReader::new()
//!     .read_all(vec![FileSource::path("a.pdf"), FileSource::path("b.pdf")])
//!     .await?;
//! let output = Merger::default().merge(entries).await?;
//! std::fs::write("merged.pdf", output.bytes.as_bytes())?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod config;
pub mod entry;
pub mod error;
pub mod io;
pub mod list;
pub mod merge;
pub mod output;
pub mod preview;
pub mod session;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::Config;
pub use entry::{EntryId, FileEntry, FileSource};
pub use error::{PdfJoinError, Result};
pub use list::OrderedFileList;
pub use session::MergeSession;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
