//! Tests for the listing and retrieval engine over an in-memory strategy.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use nimbus_blobstore::{
    BlobStoreErrorKind, CreateContainerOptions, GetOptions, ListContainerOptions,
    LocalBlobStore, LocalStorageStrategy,
};
use nimbus_core::{Blob, Location, StorageType};
use nimbus_error::{NimbusError, NimbusErrorKind, NimbusResult, StorageError, StorageErrorKind};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Map-backed strategy with a fixed `/` separator, so listing tests behave
/// the same on every platform.
#[derive(Default)]
struct MemoryStrategy {
    containers: Mutex<BTreeMap<String, BTreeMap<String, Blob>>>,
}

#[async_trait]
impl LocalStorageStrategy for MemoryStrategy {
    async fn container_exists(&self, container: &str) -> bool {
        self.containers.lock().unwrap().contains_key(container)
    }

    async fn create_container(
        &self,
        container: &str,
        _location: Option<&Location>,
    ) -> NimbusResult<bool> {
        let mut containers = self.containers.lock().unwrap();
        if containers.contains_key(container) {
            return Ok(false);
        }
        containers.insert(container.to_string(), BTreeMap::new());
        Ok(true)
    }

    async fn delete_container(&self, container: &str) -> NimbusResult<()> {
        self.containers.lock().unwrap().remove(container);
        Ok(())
    }

    async fn clear_container(&self, container: &str) -> NimbusResult<()> {
        if let Some(blobs) = self.containers.lock().unwrap().get_mut(container) {
            blobs.clear();
        }
        Ok(())
    }

    async fn all_container_names(&self) -> NimbusResult<Vec<String>> {
        Ok(self.containers.lock().unwrap().keys().cloned().collect())
    }

    async fn blob_keys_inside_container(&self, container: &str) -> NimbusResult<Vec<String>> {
        Ok(self
            .containers
            .lock()
            .unwrap()
            .get(container)
            .map(|blobs| blobs.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn blob_exists(&self, container: &str, key: &str) -> bool {
        self.containers
            .lock()
            .unwrap()
            .get(container)
            .is_some_and(|blobs| blobs.contains_key(key))
    }

    async fn get_blob(&self, container: &str, key: &str) -> NimbusResult<Blob> {
        self.containers
            .lock()
            .unwrap()
            .get(container)
            .and_then(|blobs| blobs.get(key))
            .cloned()
            .ok_or_else(|| {
                StorageError::new(StorageErrorKind::NotFound(format!("{}/{}", container, key)))
                    .into()
            })
    }

    async fn put_blob(&self, container: &str, blob: &Blob) -> NimbusResult<()> {
        let mut stored = blob.clone();
        stored.metadata.last_modified = Some(Utc::now());
        let mut containers = self.containers.lock().unwrap();
        let blobs = containers.get_mut(container).ok_or_else(|| {
            NimbusError::from(StorageError::new(StorageErrorKind::FileWrite(
                container.to_string(),
            )))
        })?;
        blobs.insert(stored.metadata.name.clone(), stored);
        Ok(())
    }

    async fn remove_blob(&self, container: &str, key: &str) -> NimbusResult<()> {
        if let Some(blobs) = self.containers.lock().unwrap().get_mut(container) {
            blobs.remove(key);
        }
        Ok(())
    }

    async fn location(&self, _container: &str) -> Option<Location> {
        None
    }

    fn separator(&self) -> char {
        '/'
    }
}

const CONTAINER: &str = "test-container";

async fn store_with(keys: &[&str]) -> LocalBlobStore {
    let store = LocalBlobStore::new(Arc::new(MemoryStrategy::default()));
    store
        .create_container_in_location(None, CONTAINER, &CreateContainerOptions::default())
        .await
        .unwrap();
    for key in keys {
        store
            .put_blob(CONTAINER, Blob::new(*key, format!("payload of {}", key)))
            .await
            .unwrap();
    }
    store
}

fn blobstore_kind(err: &NimbusError) -> &BlobStoreErrorKind {
    match err.kind() {
        NimbusErrorKind::BlobStore(e) => &e.kind,
        other => panic!("Expected blob store error, got {}", other),
    }
}

#[tokio::test]
async fn test_listing_is_sorted_by_name() {
    let store = store_with(&["delta", "alpha", "charlie", "bravo"]).await;

    let page = store
        .list_container(CONTAINER, &ListContainerOptions::default())
        .await
        .unwrap();

    let names: Vec<_> = page.iter().map(|md| md.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "bravo", "charlie", "delta"]);
}

#[tokio::test]
async fn test_listing_missing_container_fails() {
    let store = store_with(&[]).await;

    let err = store
        .list_container("no-such-container", &ListContainerOptions::default())
        .await
        .unwrap_err();

    match blobstore_kind(&err) {
        BlobStoreErrorKind::ContainerNotFound {
            container,
            known_containers,
        } => {
            assert_eq!(container, "no-such-container");
            assert_eq!(known_containers, &vec![CONTAINER.to_string()]);
        }
        other => panic!("Expected ContainerNotFound, got {}", other),
    }
}

#[tokio::test]
async fn test_pagination_reassembles_full_key_set() {
    let keys = ["a", "b", "c", "d", "e", "f", "g"];
    let store = store_with(&keys).await;

    let mut collected = Vec::new();
    let mut options = ListContainerOptions::default().with_max_results(3usize);
    loop {
        let page = store.list_container(CONTAINER, &options).await.unwrap();
        collected.extend(page.iter().map(|md| md.name.clone()));
        match page.next_marker() {
            Some(marker) => options = options.with_marker(marker.to_string()),
            None => break,
        }
    }

    assert_eq!(collected, keys);
}

#[tokio::test]
async fn test_no_marker_when_page_ends_at_namespace_end() {
    let store = store_with(&["a", "b", "c"]).await;

    let options = ListContainerOptions::default().with_max_results(3usize);
    let page = store.list_container(CONTAINER, &options).await.unwrap();

    // exactly-full page is indistinguishable from a complete listing
    assert_eq!(page.len(), 3);
    assert_eq!(page.next_marker(), None);
}

#[tokio::test]
async fn test_prefix_and_delimiter_roll_up() {
    let store = store_with(&["a/1/a", "a/1/b", "a/2/a", "a/2/b"]).await;

    let options = ListContainerOptions::default().with_prefix("a/");
    let page = store.list_container(CONTAINER, &options).await.unwrap();

    let names: Vec<_> = page.iter().map(|md| md.name.as_str()).collect();
    assert_eq!(names, vec!["1", "2"]);
    assert!(page.iter().all(|md| md.kind == StorageType::RelativePath));
}

#[tokio::test]
async fn test_recursive_listing_disables_roll_up() {
    let store = store_with(&["a/1/a", "a/1/b", "top"]).await;

    let options = ListContainerOptions::default().with_recursive(true);
    let page = store.list_container(CONTAINER, &options).await.unwrap();

    let names: Vec<_> = page.iter().map(|md| md.name.as_str()).collect();
    assert_eq!(names, vec!["a/1/a", "a/1/b", "top"]);
    assert!(page.iter().all(|md| md.kind == StorageType::Blob));
}

#[tokio::test]
async fn test_summary_listing_clears_user_metadata() {
    let store = store_with(&[]).await;
    let mut blob = Blob::new("with-metadata", "payload");
    blob.metadata
        .user_metadata
        .insert("Author".to_string(), "ada".to_string());
    store.put_blob(CONTAINER, blob).await.unwrap();

    let summary = store
        .list_container(CONTAINER, &ListContainerOptions::default())
        .await
        .unwrap();
    assert!(summary.iter().all(|md| md.user_metadata.is_empty()));

    let detailed = store
        .list_container(
            CONTAINER,
            &ListContainerOptions::default().with_detailed(true),
        )
        .await
        .unwrap();
    // detailed listings retain user metadata, keys lowercased
    let md = detailed.iter().next().unwrap();
    assert_eq!(md.user_metadata.get("author"), Some(&"ada".to_string()));
}

#[tokio::test]
async fn test_directory_marker_becomes_relative_path_entry() {
    let store = store_with(&["photos/"]).await;

    let page = store
        .list_container(CONTAINER, &ListContainerOptions::default())
        .await
        .unwrap();

    let md = page.iter().next().unwrap();
    assert_eq!(md.name, "photos");
    assert_eq!(md.kind, StorageType::RelativePath);
    assert_eq!(md.etag, None);
}

#[tokio::test]
async fn test_get_blob_missing_key_returns_none() {
    let store = store_with(&["present"]).await;

    let blob = store
        .get_blob(CONTAINER, "absent", &GetOptions::default())
        .await
        .unwrap();
    assert!(blob.is_none());

    let err = store
        .get_blob("no-such-container", "absent", &GetOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(
        blobstore_kind(&err),
        BlobStoreErrorKind::ContainerNotFound { .. }
    ));
}

#[tokio::test]
async fn test_if_none_match_on_current_etag_is_not_modified() {
    let store = store_with(&[]).await;
    let etag = store
        .put_blob(CONTAINER, Blob::new("key", "payload"))
        .await
        .unwrap();

    let err = store
        .get_blob(
            CONTAINER,
            "key",
            &GetOptions::default().with_if_none_match(etag),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        blobstore_kind(&err),
        BlobStoreErrorKind::NotModified(_)
    ));

    let blob = store
        .get_blob(
            CONTAINER,
            "key",
            &GetOptions::default().with_if_none_match("different-etag"),
        )
        .await
        .unwrap()
        .expect("Blob should be returned on etag mismatch");
    assert_eq!(blob.payload, b"payload");
}

#[tokio::test]
async fn test_if_match_on_stale_etag_is_precondition_failed() {
    let store = store_with(&[]).await;
    let etag = store
        .put_blob(CONTAINER, Blob::new("key", "payload"))
        .await
        .unwrap();

    let err = store
        .get_blob(
            CONTAINER,
            "key",
            &GetOptions::default().with_if_match("stale-etag"),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        blobstore_kind(&err),
        BlobStoreErrorKind::PreconditionFailed(_)
    ));

    let blob = store
        .get_blob(CONTAINER, "key", &GetOptions::default().with_if_match(etag))
        .await
        .unwrap();
    assert!(blob.is_some());
}

#[tokio::test]
async fn test_timestamp_conditions() {
    let store = store_with(&["key"]).await;
    let last_modified = store
        .blob_metadata(CONTAINER, "key")
        .await
        .unwrap()
        .unwrap()
        .last_modified
        .unwrap();

    // unchanged since a future instant: not modified
    let err = store
        .get_blob(
            CONTAINER,
            "key",
            &GetOptions::default().with_if_modified_since(last_modified + Duration::hours(1)),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        blobstore_kind(&err),
        BlobStoreErrorKind::NotModified(_)
    ));

    let blob = store
        .get_blob(
            CONTAINER,
            "key",
            &GetOptions::default().with_if_modified_since(last_modified - Duration::hours(1)),
        )
        .await
        .unwrap();
    assert!(blob.is_some());

    // changed after the given instant: precondition failed
    let err = store
        .get_blob(
            CONTAINER,
            "key",
            &GetOptions::default().with_if_unmodified_since(last_modified - Duration::hours(1)),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        blobstore_kind(&err),
        BlobStoreErrorKind::PreconditionFailed(_)
    ));

    let blob = store
        .get_blob(
            CONTAINER,
            "key",
            &GetOptions::default().with_if_unmodified_since(last_modified + Duration::hours(1)),
        )
        .await
        .unwrap();
    assert!(blob.is_some());
}

#[tokio::test]
async fn test_range_retrieval() {
    let store = store_with(&[]).await;
    store
        .put_blob(CONTAINER, Blob::new("digits", "0123456789"))
        .await
        .unwrap();

    let blob = store
        .get_blob(CONTAINER, "digits", &GetOptions::default().with_range(2, 4))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(blob.payload, b"234");
    assert_eq!(blob.metadata.content.content_length, 3);

    let blob = store
        .get_blob(CONTAINER, "digits", &GetOptions::default().with_tail(3))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(blob.payload, b"789");

    let blob = store
        .get_blob(CONTAINER, "digits", &GetOptions::default().with_start_at(8))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(blob.payload, b"89");
}

#[tokio::test]
async fn test_inverted_range_is_rejected() {
    let store = store_with(&[]).await;
    store
        .put_blob(CONTAINER, Blob::new("digits", "0123456789"))
        .await
        .unwrap();

    let err = store
        .get_blob(CONTAINER, "digits", &GetOptions::default().with_range(4, 2))
        .await
        .unwrap_err();
    assert!(matches!(
        blobstore_kind(&err),
        BlobStoreErrorKind::InvalidRange(_)
    ));
}

#[tokio::test]
async fn test_put_blob_returns_md5_etag() {
    let store = store_with(&[]).await;

    let etag = store
        .put_blob(CONTAINER, Blob::new("greeting", "hello world"))
        .await
        .unwrap();
    assert_eq!(etag, "5eb63bbbe01eeed093cb22bb8f5acdc3");

    // same etag is observed on retrieval and in listings
    let blob = store
        .get_blob(CONTAINER, "greeting", &GetOptions::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(blob.metadata.etag.as_deref(), Some(etag.as_str()));

    let page = store
        .list_container(CONTAINER, &ListContainerOptions::default())
        .await
        .unwrap();
    assert_eq!(
        page.iter().next().unwrap().etag.as_deref(),
        Some(etag.as_str())
    );
}

#[tokio::test]
async fn test_put_blob_into_missing_container_fails() {
    let store = store_with(&[]).await;

    let err = store
        .put_blob("no-such-container", Blob::new("key", "payload"))
        .await
        .unwrap_err();
    assert!(matches!(
        blobstore_kind(&err),
        BlobStoreErrorKind::ContainerNotFound { .. }
    ));
}

#[tokio::test]
async fn test_remove_blob_is_idempotent() {
    let store = store_with(&["keep", "remove"]).await;

    store.remove_blob(CONTAINER, "remove").await.unwrap();
    store.remove_blob(CONTAINER, "remove").await.unwrap();
    store.remove_blob(CONTAINER, "never-existed").await.unwrap();

    let page = store
        .list_container(CONTAINER, &ListContainerOptions::default())
        .await
        .unwrap();
    let names: Vec<_> = page.iter().map(|md| md.name.as_str()).collect();
    assert_eq!(names, vec!["keep"]);

    let err = store
        .remove_blob("no-such-container", "key")
        .await
        .unwrap_err();
    assert!(matches!(
        blobstore_kind(&err),
        BlobStoreErrorKind::ContainerNotFound { .. }
    ));
}

#[tokio::test]
async fn test_blob_metadata_lowercases_user_metadata() {
    let store = store_with(&[]).await;
    let mut blob = Blob::new("key", "payload");
    blob.metadata
        .user_metadata
        .insert("X-Custom-Tag".to_string(), "value".to_string());
    store.put_blob(CONTAINER, blob).await.unwrap();

    let md = store
        .blob_metadata(CONTAINER, "key")
        .await
        .unwrap()
        .expect("Metadata should be present");
    assert_eq!(md.user_metadata.get("x-custom-tag"), Some(&"value".to_string()));

    assert!(store
        .blob_metadata(CONTAINER, "absent")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_public_read_containers_are_unsupported() {
    let store = store_with(&[]).await;

    let err = store
        .create_container_in_location(
            None,
            "public",
            &CreateContainerOptions::default().with_public_read(true),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        blobstore_kind(&err),
        BlobStoreErrorKind::UnsupportedOperation(_)
    ));
    assert!(!store.container_exists("public").await);
}

#[tokio::test]
async fn test_list_containers_returns_container_entries() {
    let store = store_with(&[]).await;
    store
        .create_container_in_location(None, "another", &CreateContainerOptions::default())
        .await
        .unwrap();

    let page = store.list_containers().await.unwrap();
    let names: Vec<_> = page.iter().map(|md| md.name.as_str()).collect();
    assert_eq!(names, vec!["another", CONTAINER]);
    assert!(page.iter().all(|md| md.kind == StorageType::Container));
}

#[tokio::test]
async fn test_clear_container_keeps_the_container() {
    let store = store_with(&["a", "b"]).await;

    store.clear_container(CONTAINER).await.unwrap();

    assert!(store.container_exists(CONTAINER).await);
    let page = store
        .list_container(CONTAINER, &ListContainerOptions::default())
        .await
        .unwrap();
    assert!(page.is_empty());
}
