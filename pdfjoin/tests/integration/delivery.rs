//! Integration tests for saving merged output.

use pdfjoin::error::PdfJoinError;
use pdfjoin::io::{DEFAULT_FILENAME, DirectoryTarget};
use pdfjoin::session::MergeSession;
use tempfile::TempDir;

use crate::common::{dir_listing, file_page_markers, memory_pdf};

async fn session() -> MergeSession {
    let session = MergeSession::default();
    session
        .select_files(vec![memory_pdf("a.pdf", "A", 1), memory_pdf("b.pdf", "B", 1)])
        .await
        .unwrap();
    session
}

#[tokio::test]
async fn test_output_named_merged_pdf() {
    let temp_dir = TempDir::new().unwrap();

    session()
        .await
        .merge_and_deliver(&DirectoryTarget::new(temp_dir.path()), DEFAULT_FILENAME)
        .await
        .unwrap();

    assert_eq!(dir_listing(temp_dir.path()), ["merged.pdf"]);
}

#[tokio::test]
async fn test_existing_output_is_kept_without_overwrite() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("merged.pdf");
    std::fs::write(&output, b"previous").unwrap();

    let result = session()
        .await
        .merge_and_deliver(&DirectoryTarget::new(temp_dir.path()), DEFAULT_FILENAME)
        .await;

    assert!(matches!(result, Err(PdfJoinError::OutputExists { .. })));
    assert_eq!(std::fs::read(&output).unwrap(), b"previous");
    assert_eq!(dir_listing(temp_dir.path()), ["merged.pdf"]);
}

#[tokio::test]
async fn test_existing_output_is_replaced_with_overwrite() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("merged.pdf");
    std::fs::write(&output, b"previous").unwrap();

    session()
        .await
        .merge_and_deliver(
            &DirectoryTarget::new(temp_dir.path()).overwrite(true),
            DEFAULT_FILENAME,
        )
        .await
        .unwrap();

    assert_eq!(file_page_markers(&output), ["A1", "B1"]);
}

#[tokio::test]
async fn test_custom_file_name() {
    let temp_dir = TempDir::new().unwrap();

    let delivered = session()
        .await
        .merge_and_deliver(&DirectoryTarget::new(temp_dir.path()), "book.pdf")
        .await
        .unwrap();

    assert!(delivered.receipt.location.ends_with("book.pdf"));
    assert_eq!(file_page_markers(&temp_dir.path().join("book.pdf")), ["A1", "B1"]);
}

#[tokio::test]
async fn test_file_name_with_path_is_rejected() {
    let temp_dir = TempDir::new().unwrap();

    let result = session()
        .await
        .merge_and_deliver(&DirectoryTarget::new(temp_dir.path()), "../merged.pdf")
        .await;

    assert!(matches!(result, Err(PdfJoinError::InvalidConfig { .. })));
    assert!(dir_listing(temp_dir.path()).is_empty());
}
