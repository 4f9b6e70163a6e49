//! Integration tests for the content feed assembler.

mod helpers;

use bytes::Bytes;
use helpers::TestStack;
use roomdrop_entity::feed::{FeedEntry, DELETED_LABEL};
use roomdrop_storage::layout;

#[tokio::test]
async fn test_messages_are_keyed_by_ordinal_with_flattened_text() {
    let stack = TestStack::new().await;
    stack.room("talk").await;

    stack.messages.post("talk", "hello\nworld").await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    stack.messages.post("talk", "second").await.unwrap();

    let snapshot = stack.feed.snapshot("talk").await.unwrap();
    assert_eq!(
        snapshot.entries.get("msg0"),
        Some(&FeedEntry::Text("hello world".to_string()))
    );
    assert_eq!(
        snapshot.entries.get("msg1"),
        Some(&FeedEntry::Text("second".to_string()))
    );
}

#[tokio::test]
async fn test_empty_message_is_ignored() {
    let stack = TestStack::new().await;
    stack.room("quiet").await;

    assert!(stack.messages.post("quiet", "").await.unwrap().is_none());
    let snapshot = stack.feed.snapshot("quiet").await.unwrap();
    assert!(snapshot.entries.is_empty());
}

#[tokio::test]
async fn test_version_folders_surface_latest_version() {
    let stack = TestStack::new().await;
    stack.room("files").await;

    stack.upload_version("files", "report.pdf", b"one", "v1").await;
    stack.upload_version("files", "report.pdf", b"two", "v2").await;

    let snapshot = stack.feed.snapshot("files").await.unwrap();
    assert_eq!(
        snapshot.entries.get("report.pdf: Version 2"),
        Some(&FeedEntry::Path("rooms/files/report-pdf".to_string()))
    );
}

#[tokio::test]
async fn test_standalone_files_map_name_to_path() {
    let stack = TestStack::new().await;
    stack.room("misc").await;

    stack
        .provider
        .write(&layout::room_entry("misc", "readme.txt"), Bytes::from("hi"))
        .await
        .unwrap();

    let snapshot = stack.feed.snapshot("misc").await.unwrap();
    assert_eq!(
        snapshot.entries.get("readme.txt"),
        Some(&FeedEntry::Path("rooms/misc/readme.txt".to_string()))
    );
}

#[tokio::test]
async fn test_missing_room_reports_deleted_sentinel() {
    let stack = TestStack::new().await;

    let snapshot = stack.feed.snapshot("gone").await.unwrap();
    assert!(snapshot.room_deleted());
    assert!(snapshot.entries.contains_key(DELETED_LABEL));
    assert_eq!(snapshot.entries.len(), 1);
}

#[tokio::test]
async fn test_mid_upload_folder_is_skipped_not_fatal() {
    let stack = TestStack::new().await;
    stack.room("racing").await;

    // A version folder with no parsable blob yet, as a reader racing an
    // in-flight first upload would see it.
    stack
        .provider
        .create_dir(&layout::version_dir("racing", "draft-txt"))
        .await
        .unwrap();

    let snapshot = stack.feed.snapshot("racing").await.unwrap();
    assert!(snapshot.entries.is_empty());
}
