//! Integration tests for error handling and edge cases.

use pdfjoin::entry::FileSource;
use pdfjoin::error::PdfJoinError;
use pdfjoin::io::{DEFAULT_FILENAME, DirectoryTarget};
use pdfjoin::session::MergeSession;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::common::{dir_listing, memory_pdf, write_pdf};

#[tokio::test]
async fn test_error_empty_selection() {
    let temp_dir = TempDir::new().unwrap();
    let session = MergeSession::default();

    let result = session
        .merge_and_deliver(&DirectoryTarget::new(temp_dir.path()), DEFAULT_FILENAME)
        .await;

    assert!(matches!(result, Err(PdfJoinError::EmptyInput)));
    assert!(dir_listing(temp_dir.path()).is_empty());
}

#[tokio::test]
async fn test_error_nonexistent_input() {
    let session = MergeSession::default();

    let result = session
        .select_files(vec![FileSource::path(PathBuf::from("/nonexistent/file.pdf"))])
        .await;

    assert!(matches!(result, Err(PdfJoinError::FileNotFound { .. })));
    assert!(session.entries().await.is_empty());
}

#[tokio::test]
async fn test_error_invalid_pdf_fails_whole_merge() {
    let temp_dir = TempDir::new().unwrap();
    let good = write_pdf(temp_dir.path(), "good.pdf", "G", 2);
    let bad = temp_dir.path().join("bad.pdf");
    std::fs::write(&bad, b"This is not a PDF file").unwrap();
    let out_dir = temp_dir.path().join("out");

    let session = MergeSession::default();
    session
        .select_files(vec![FileSource::path(&good), FileSource::path(&bad)])
        .await
        .unwrap();
    let before = session.entries().await;

    let err = session
        .merge_and_deliver(&DirectoryTarget::new(&out_dir), DEFAULT_FILENAME)
        .await
        .unwrap_err();

    assert!(matches!(err, PdfJoinError::DecodeFailure { .. }));
    assert_eq!(err.failed_entry(), Some(before[1].id()));
    assert!(err.to_string().contains("bad.pdf"));
    assert!(!out_dir.join("merged.pdf").exists(), "No output on failure");
    assert_eq!(session.entries().await, before);
}

#[tokio::test]
async fn test_error_directory_as_input() {
    let temp_dir = TempDir::new().unwrap();
    let session = MergeSession::default();

    let result = session
        .select_files(vec![FileSource::path(temp_dir.path())])
        .await;

    assert!(matches!(result, Err(PdfJoinError::NotAFile { .. })));
}

#[tokio::test]
async fn test_reselect_after_failure() {
    let session = MergeSession::default();
    session
        .select_files(vec![FileSource::memory("bad.pdf", b"garbage".to_vec())])
        .await
        .unwrap();
    assert!(session.merge().await.is_err());

    session
        .select_files(vec![memory_pdf("a.pdf", "A", 1)])
        .await
        .unwrap();
    assert!(session.merge().await.is_ok());
}
