use bytes::Bytes;

use papyrus::application::ports::{StagingStore, StagingStoreError};
use papyrus::domain::{JobId, StoragePath};
use papyrus::infrastructure::storage::LocalStagingStore;

fn create_test_store() -> (tempfile::TempDir, LocalStagingStore) {
    let dir = tempfile::TempDir::new().unwrap();
    let store = LocalStagingStore::new(dir.path().to_path_buf()).unwrap();
    (dir, store)
}

#[tokio::test]
async fn given_bytes_when_storing_then_returns_size_and_file_is_on_disk() {
    let (dir, store) = create_test_store();
    let path = StoragePath::for_upload(&JobId::new(), "scan.png");

    let size = store.store(&path, Bytes::from("hello world")).await.unwrap();

    assert_eq!(size, 11);
    let on_disk = std::fs::read(dir.path().join(path.as_str())).unwrap();
    assert_eq!(on_disk, b"hello world");
}

#[tokio::test]
async fn given_stored_file_when_fetching_then_bytes_match_original() {
    let (_dir, store) = create_test_store();
    let path = StoragePath::for_artifact(&JobId::new());

    store
        .store(&path, Bytes::from_static(b"test content"))
        .await
        .unwrap();

    let fetched = store.fetch(&path).await.unwrap();
    assert_eq!(fetched, b"test content");
}

#[tokio::test]
async fn given_existing_file_when_storing_again_then_content_is_replaced() {
    let (_dir, store) = create_test_store();
    let path = StoragePath::for_artifact(&JobId::new());

    store.store(&path, Bytes::from("first")).await.unwrap();
    store.store(&path, Bytes::from("second")).await.unwrap();

    assert_eq!(store.fetch(&path).await.unwrap(), b"second");
}

#[tokio::test]
async fn given_stored_file_when_deleting_then_fetch_returns_not_found() {
    let (_dir, store) = create_test_store();
    let path = StoragePath::for_artifact(&JobId::new());

    store.store(&path, Bytes::from("data")).await.unwrap();
    store.delete(&path).await.unwrap();

    let result = store.fetch(&path).await;
    assert!(matches!(result, Err(StagingStoreError::NotFound(_))));
}

#[tokio::test]
async fn given_nonexistent_path_when_fetching_then_returns_not_found() {
    let (_dir, store) = create_test_store();
    let path = StoragePath::from_raw("nonexistent.txt");

    let result = store.fetch(&path).await;
    assert!(matches!(result, Err(StagingStoreError::NotFound(_))));
}

#[tokio::test]
async fn given_missing_base_directory_when_creating_store_then_directory_is_created() {
    let dir = tempfile::TempDir::new().unwrap();
    let nested = dir.path().join("var").join("uploads");

    LocalStagingStore::new(nested.clone()).unwrap();

    assert!(nested.is_dir());
}
