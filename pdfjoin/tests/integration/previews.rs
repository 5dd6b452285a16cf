//! Integration tests for previews of the selection.

use pdfjoin::entry::FileSource;
use pdfjoin::preview::{PreviewReport, PreviewStatus};
use pdfjoin::session::MergeSession;

use crate::common::memory_pdf;

#[tokio::test]
async fn test_previews_report_page_counts() {
    let session = MergeSession::default();
    session
        .select_files(vec![memory_pdf("a.pdf", "A", 2), memory_pdf("b.pdf", "B", 5)])
        .await
        .unwrap();

    let report = PreviewReport::from_previews(session.previews().await);

    assert_eq!(report.total_pages, 7);
    assert_eq!(report.ready, 2);
    assert!(report.all_ready());
    match &report.previews[0].status {
        PreviewStatus::Ready {
            page_dimensions, ..
        } => assert_eq!(*page_dimensions, Some((612.0, 792.0))),
        other => panic!("expected a ready preview, got {other:?}"),
    }
}

#[tokio::test]
async fn test_preview_failure_is_isolated() {
    let session = MergeSession::default();
    session
        .select_files(vec![
            memory_pdf("a.pdf", "A", 1),
            FileSource::memory("notes.txt", b"just some text".to_vec()),
            memory_pdf("c.pdf", "C", 3),
        ])
        .await
        .unwrap();

    let previews = session.previews().await;

    assert_eq!(previews.len(), 3);
    assert_eq!(previews[0].page_count(), Some(1));
    assert!(matches!(previews[1].status, PreviewStatus::Failed { .. }));
    assert_eq!(previews[2].page_count(), Some(3));
}

#[tokio::test]
async fn test_previews_follow_list_order() {
    let session = MergeSession::default();
    session
        .select_files(vec![memory_pdf("a.pdf", "A", 1), memory_pdf("b.pdf", "B", 2)])
        .await
        .unwrap();
    session.previews().await;

    session.move_entry(1, 0).await.unwrap();
    let previews = session.previews().await;

    let names: Vec<&str> = previews.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["b.pdf", "a.pdf"]);
}

#[tokio::test]
async fn test_previews_of_empty_selection() {
    let session = MergeSession::default();
    let report = PreviewReport::from_previews(session.previews().await);

    assert!(report.previews.is_empty());
    assert_eq!(report.total_pages, 0);
}
