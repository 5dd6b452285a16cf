//! Error types for pdfjoin.
//!
//! Every fallible operation in the crate returns [`PdfJoinError`]. The
//! variants fall into a few groups:
//!
//! - **Intake errors**: a selected file cannot be read
//! - **List errors**: an invalid reorder request
//! - **Merge errors**: nothing selected, an undecodable entry, encoding failures
//! - **Delivery errors**: the merged bytes cannot be saved
//! - **Configuration errors**: invalid arguments
//!
//! Merge errors are global: when one is raised no output is produced and
//! the selected list is left exactly as it was.

use std::io;
use std::path::PathBuf;

use crate::entry::EntryId;

/// Result type alias for pdfjoin operations.
pub type Result<T> = std::result::Result<T, PdfJoinError>;

/// Main error type for pdfjoin operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfJoinError {
    /// A merge was requested with no files selected.
    #[error("No input files selected for merging")]
    EmptyInput,

    /// A reorder request referenced a position outside the list.
    #[error("Position {index} is out of bounds for a list of {len} file(s)")]
    IndexOutOfBounds {
        /// The offending index (0-based).
        index: usize,
        /// Length of the list at the time of the request.
        len: usize,
    },

    /// One selected file could not be decoded as a PDF document.
    #[error("Failed to decode PDF: {name} (entry {entry_id})\n  Reason: {reason}")]
    DecodeFailure {
        /// Identifier of the entry that failed.
        entry_id: EntryId,
        /// Display name of the entry that failed.
        name: String,
        /// Reason reported by the codec.
        reason: String,
    },

    /// The list cannot be changed, or merged again, while a merge runs.
    #[error("A merge is already in progress; try again once it has finished")]
    MergeInProgress,

    /// Pages could not be attached to the output document.
    #[error("Merge operation failed: {reason}")]
    MergeFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// The merged document could not be serialized.
    #[error("Failed to encode merged PDF: {reason}")]
    EncodeFailed {
        /// Reason reported by the codec.
        reason: String,
    },

    /// Input file was not found.
    #[error("File not found: {}", .path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input path exists but is not a regular file.
    #[error("Not a file: {}", .path.display())]
    NotAFile {
        /// Path that is not a file.
        path: PathBuf,
    },

    /// Input file could not be read.
    #[error("Cannot read file: {}\n  Reason: {source}", .path.display())]
    FailedToRead {
        /// Path to the unreadable file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to read input list file.
    #[error("Failed to read input list file: {}\n  Reason: {source}", .path.display())]
    FailedToReadInputList {
        /// Path to the input list file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Input list file contains an invalid entry.
    #[error(
        "Invalid entry in input list file: {} at line {line_number}\n  Details: {details}",
        .path.display()
    )]
    InvalidInputList {
        /// Path to the input list file.
        path: PathBuf,
        /// Line number with the error.
        line_number: usize,
        /// Details about what's invalid.
        details: String,
    },

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  Use --force to overwrite or choose a different output path",
        .path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to create output file.
    #[error("Failed to create output file: {}\n  Reason: {source}", .path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write to output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", .path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<lopdf::Error> for PdfJoinError {
    fn from(err: lopdf::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl From<anyhow::Error> for PdfJoinError {
    fn from(err: anyhow::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl PdfJoinError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: PathBuf) -> Self {
        Self::NotAFile { path }
    }

    /// Create a DecodeFailure error for the given entry.
    pub fn decode_failure(
        entry_id: EntryId,
        name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::DecodeFailure {
            entry_id,
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create a MergeFailed error.
    pub fn merge_failed(reason: impl Into<String>) -> Self {
        Self::MergeFailed {
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Identifier of the entry that caused a decode failure, if any.
    pub fn failed_entry(&self) -> Option<EntryId> {
        match self {
            Self::DecodeFailure { entry_id, .. } => Some(*entry_id),
            _ => None,
        }
    }

    /// Check if this error aborts a merge as a whole.
    ///
    /// Fatal errors never leave partial output behind.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput
                | Self::DecodeFailure { .. }
                | Self::MergeFailed { .. }
                | Self::EncodeFailed { .. }
                | Self::OutputExists { .. }
                | Self::FailedToCreateOutput { .. }
                | Self::FailedToWrite { .. }
                | Self::Cancelled
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::EmptyInput => 1,
            Self::IndexOutOfBounds { .. } => 1,
            Self::DecodeFailure { .. } => 3,
            Self::MergeInProgress => 1,
            Self::MergeFailed { .. } => 6,
            Self::EncodeFailed { .. } => 6,
            Self::FileNotFound { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::FailedToRead { .. } => 2,
            Self::FailedToReadInputList { .. } => 2,
            Self::InvalidInputList { .. } => 1,
            Self::OutputExists { .. } => 4,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::InvalidConfig { .. } => 1,
            Self::Cancelled => 130, // Standard exit code for SIGINT
            Self::Io { .. } => 5,
            Self::Other { .. } => 1,
        }
    }
}
