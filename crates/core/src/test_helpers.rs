// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for queue tests.

use chrono::{DateTime, Utc};

use crate::mutation::{
    BlobRef, DraftAttachment, DraftEntity, MutationKind, Payload, PendingMutation, Scheme,
};

/// Fixed creation time for test records.
pub fn test_time() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(1_718_000_000_000).unwrap_or_default()
}

/// Create a delete-attachment record.
pub fn make_delete(id: &str) -> PendingMutation {
    PendingMutation::new(
        id,
        test_time(),
        MutationKind::DeleteAttachment {
            attachment_id: format!("att-{}", id),
            owner_id: "loc-1".to_string(),
        },
    )
}

/// Create an attach record whose payload already points at a blob.
pub fn make_attach_ref(id: &str, scheme: Scheme) -> PendingMutation {
    let mut attachment = make_attachment(b"unused");
    attachment.payload = Payload::Blob(BlobRef::new(scheme, id));
    PendingMutation::new(
        id,
        test_time(),
        MutationKind::AttachToEntity {
            draft_attachment: attachment,
            target_entity_id: "loc-1".to_string(),
        },
    )
}

/// Create an attachment draft carrying `data` inline.
pub fn make_attachment(data: &[u8]) -> DraftAttachment {
    DraftAttachment::new("user-1", "Ada", data.to_vec())
}

/// Create a location draft.
pub fn make_entity(name: &str) -> DraftEntity {
    DraftEntity::new(name, 53.35, -6.26)
}
