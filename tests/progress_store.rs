mod common;

use common::date;
use tempfile::TempDir;

use dou_watcher::domain::repositories::ProgressRepository;
use dou_watcher::infrastructure::persistence::FileProgressRepository;

#[tokio::test]
async fn test_marker_survives_a_new_store_instance() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("last_processed_date.txt");

    FileProgressRepository::new(&path)
        .save(date(2024, 11, 29))
        .await
        .unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "29-11-2024");
    assert_eq!(
        FileProgressRepository::new(&path).load().await.unwrap(),
        Some(date(2024, 11, 29))
    );
}

#[tokio::test]
async fn test_hand_edited_marker_is_accepted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("last_processed_date.txt");
    std::fs::write(&path, "  05-11-2024\n").unwrap();

    let store = FileProgressRepository::new(&path);

    assert_eq!(store.load().await.unwrap(), Some(date(2024, 11, 5)));
}

#[tokio::test]
async fn test_corrupt_marker_is_absent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("last_processed_date.txt");
    std::fs::write(&path, "2024-11-05").unwrap();

    let result = FileProgressRepository::new(&path).load().await;

    assert_eq!(result.unwrap(), None);
}

#[tokio::test]
async fn test_clear_then_load_is_absent() {
    let dir = TempDir::new().unwrap();
    let store = FileProgressRepository::new(dir.path().join("marker.txt"));

    store.save(date(2024, 11, 4)).await.unwrap();
    store.clear().await.unwrap();

    assert_eq!(store.load().await.unwrap(), None);
    assert!(store.clear().await.is_ok());
}
