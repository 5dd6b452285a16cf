//! Integration tests for reordering before a merge.

use pdfjoin::error::PdfJoinError;
use pdfjoin::session::MergeSession;

use crate::common::{memory_pdf, page_markers};

async fn abc_session() -> MergeSession {
    let session = MergeSession::default();
    session
        .select_files(vec![
            memory_pdf("A.pdf", "A", 2),
            memory_pdf("B.pdf", "B", 3),
            memory_pdf("C.pdf", "C", 1),
        ])
        .await
        .unwrap();
    session
}

async fn names(session: &MergeSession) -> Vec<String> {
    session
        .entries()
        .await
        .iter()
        .map(|entry| entry.name().to_string())
        .collect()
}

#[tokio::test]
async fn test_merge_in_selection_order() {
    let session = abc_session().await;

    let output = session.merge().await.unwrap();

    assert_eq!(
        page_markers(output.bytes.as_bytes()),
        ["A1", "A2", "B1", "B2", "B3", "C1"]
    );
}

#[tokio::test]
async fn test_move_last_to_front() {
    let session = abc_session().await;

    session.move_entry(2, 0).await.unwrap();

    assert_eq!(names(&session).await, ["C.pdf", "A.pdf", "B.pdf"]);
    let output = session.merge().await.unwrap();
    assert_eq!(
        page_markers(output.bytes.as_bytes()),
        ["C1", "A1", "A2", "B1", "B2", "B3"]
    );
    assert_eq!(output.statistics.total_pages, 6);
}

#[tokio::test]
async fn test_successive_moves_compose() {
    let session = abc_session().await;

    // A B C -> B A C -> B C A
    session.move_entry(0, 1).await.unwrap();
    session.move_entry(1, 2).await.unwrap();

    assert_eq!(names(&session).await, ["B.pdf", "C.pdf", "A.pdf"]);
    let output = session.merge().await.unwrap();
    assert_eq!(
        page_markers(output.bytes.as_bytes()),
        ["B1", "B2", "B3", "C1", "A1", "A2"]
    );
}

#[tokio::test]
async fn test_move_back_restores_order() {
    let session = abc_session().await;
    let original = session.entries().await;

    session.move_entry(0, 2).await.unwrap();
    session.move_entry(2, 0).await.unwrap();

    assert_eq!(session.entries().await, original);
}

#[tokio::test]
async fn test_move_onto_itself_is_a_no_op() {
    let session = abc_session().await;
    let original = session.entries().await;

    session.move_entry(1, 1).await.unwrap();

    assert_eq!(session.entries().await, original);
}

#[tokio::test]
async fn test_move_out_of_bounds() {
    let session = abc_session().await;
    let original = session.entries().await;

    let from_err = session.move_entry(5, 0).await.unwrap_err();
    let to_err = session.move_entry(0, 3).await.unwrap_err();

    assert!(matches!(
        from_err,
        PdfJoinError::IndexOutOfBounds { index: 5, len: 3 }
    ));
    assert!(matches!(
        to_err,
        PdfJoinError::IndexOutOfBounds { index: 3, len: 3 }
    ));
    assert_eq!(session.entries().await, original);
}

#[tokio::test]
async fn test_move_on_empty_selection() {
    let session = MergeSession::default();
    assert!(matches!(
        session.move_entry(0, 0).await,
        Err(PdfJoinError::IndexOutOfBounds { index: 0, len: 0 })
    ));
}
