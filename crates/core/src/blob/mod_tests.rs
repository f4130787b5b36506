// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::db::Database;
use tempfile::tempdir;

fn native(dir: &tempfile::TempDir) -> Arc<dyn BlobStoreDriver> {
    Arc::new(NativeBlobDriver::open(dir.path().join("blobs")).unwrap())
}

fn object_store() -> Arc<dyn BlobStoreDriver> {
    Arc::new(ObjectStoreDriver::new(Database::open_in_memory().unwrap()))
}

#[tokio::test]
async fn saves_through_primary_driver() {
    let dir = tempdir().unwrap();
    let store = BlobStore::new(native(&dir)).with_driver(object_store());

    let blob = store.save("pending_1_abc", b"data").await.unwrap();
    assert_eq!(blob.scheme, Scheme::Native);
    assert_eq!(store.primary_scheme(), Scheme::Native);
    assert_eq!(store.load(&blob).await.unwrap(), b"data");
}

#[tokio::test]
async fn dispatches_on_reference_scheme() {
    let dir = tempdir().unwrap();
    let idb = object_store();
    let old = idb.save("pending_1_old", b"from before").await.unwrap();

    let store = BlobStore::new(native(&dir)).with_driver(Arc::clone(&idb));
    assert_eq!(store.load(&old).await.unwrap(), b"from before");

    store.delete(&old).await.unwrap();
    assert!(store.keys(Scheme::Idb).await.unwrap().is_empty());
}

#[tokio::test]
async fn unregistered_scheme_is_an_error() {
    let store = BlobStore::new(object_store());
    let err = store
        .load(&BlobRef::new(Scheme::Native, "pending_1_abc"))
        .await
        .unwrap_err();
    assert!(matches!(err, BlobError::UnsupportedScheme(Scheme::Native)));
}

#[test]
fn primary_keeps_its_scheme() {
    let primary = object_store();
    let store = BlobStore::new(Arc::clone(&primary)).with_driver(object_store());
    assert_eq!(store.schemes(), vec![Scheme::Idb]);
    assert!(Arc::ptr_eq(store.driver_for(Scheme::Idb).unwrap(), &primary));
}
