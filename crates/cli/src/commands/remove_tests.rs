// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::testing::open_test_queue;
use pb_core::DraftAttachment;
use tempfile::TempDir;

#[tokio::test]
async fn test_remove_deletes_blob() {
    let temp = TempDir::new().unwrap();
    let queue = open_test_queue(temp.path(), false).await;
    let id = queue
        .enqueue_attach_to_entity(DraftAttachment::new("u1", "Ada", b"x".to_vec()), "loc-1")
        .await
        .unwrap();

    let out = run_impl(&queue, &id).await.unwrap();

    assert_eq!(out, format!("Removed {}\n", id));
    assert!(queue.list().await.is_empty());
    assert!(!temp.path().join("pending_blobs").join(&id).exists());
}

#[tokio::test]
async fn test_remove_twice_is_ok() {
    let temp = TempDir::new().unwrap();
    let queue = open_test_queue(temp.path(), false).await;
    let id = queue.enqueue_delete_attachment("att-1", "loc-1").await.unwrap();

    run_impl(&queue, &id).await.unwrap();
    let out = run_impl(&queue, &id).await.unwrap();

    assert!(out.contains("nothing to remove"));
}
