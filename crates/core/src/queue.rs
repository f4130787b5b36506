// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The offline mutation queue.
//!
//! [`MutationQueue`] is the only writer of the blob store and the metadata
//! store. Every operation holds one async lock for its whole
//! read-modify-write, including the blob I/O and the final persist, so
//! overlapping calls cannot lose each other's changes.
//!
//! Enqueue order is fixed: store the payload blob, swap the inline payload
//! for its reference, append, persist. Persisted metadata therefore never
//! holds a payload inline.
//!
//! Failure handling:
//!
//! - enqueue fails as a whole; nothing stays queued and the error surfaces
//! - hydrate drops a record whose blob cannot be read and returns `None`
//! - remove ignores blob deletion failures (logged)
//! - a failed persist after a removal keeps the in-memory list as the truth
//!   and is retried by the next mutating call, [`flush`](MutationQueue::flush),
//!   or [`shutdown`](MutationQueue::shutdown)
//!
//! Stored records this version cannot parse are carried along untouched:
//! they are written back on every persist and their blobs are never swept.
//! If the stored list could not be read at all, sweeping is suspended.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::{Mutex, MutexGuard};

use crate::blob::BlobStore;
use crate::error::{Error, Result};
use crate::id::generate_unique_id;
use crate::metadata::{MetadataResult, MetadataStore};
use crate::mutation::{
    BlobRef, DraftAttachment, DraftEntity, MutationKind, Payload, PendingMutation,
};
use crate::network::NetworkMonitor;

/// Blobs deleted by [`MutationQueue::reconcile`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub removed: Vec<BlobRef>,
    /// Nothing was swept because the stored list could not be read.
    pub suspended: bool,
}

#[derive(Default)]
struct QueueState {
    pending: Vec<PendingMutation>,
    /// Stored records this version cannot parse.
    unknown: Vec<Value>,
    /// Blobs referenced from `unknown`.
    unknown_blobs: HashSet<BlobRef>,
    unknown_ids: HashSet<String>,
    /// In-memory list differs from what was last persisted.
    dirty: bool,
    /// Storage held an unreadable list; blob references are not all known.
    sweep_suspended: bool,
    closed: bool,
}

/// Durable queue of mutations made while offline.
pub struct MutationQueue {
    state: Mutex<QueueState>,
    blobs: BlobStore,
    metadata: Arc<dyn MetadataStore>,
    network: Arc<NetworkMonitor>,
    /// Held for the length of a replay pass.
    replay: Mutex<()>,
}

impl MutationQueue {
    /// Load the persisted queue and collect orphaned blobs.
    ///
    /// Records that still hold an inline payload cannot have been written by
    /// this queue and are dropped.
    pub async fn initialize(
        blobs: BlobStore,
        metadata: Arc<dyn MetadataStore>,
        network: Arc<NetworkMonitor>,
    ) -> Self {
        let stored = metadata.load().await;
        let unknown_blobs = stored.unknown_blobs();
        let unknown_ids: HashSet<String> = stored.unknown_ids().into_iter().collect();
        if !stored.unknown.is_empty() {
            tracing::warn!(
                count = stored.unknown.len(),
                "keeping pending mutations this version cannot read"
            );
        }
        if stored.quarantined {
            tracing::warn!("stored pending queue was unreadable, orphaned blob sweep suspended");
        }

        let mut pending = Vec::with_capacity(stored.mutations.len());
        let mut dirty = false;
        for mutation in stored.mutations {
            if mutation.has_inline_payload() {
                tracing::warn!(id = %mutation.id, "dropping persisted mutation with inline payload");
                dirty = true;
            } else if pending.iter().any(|m: &PendingMutation| m.id == mutation.id) {
                tracing::warn!(id = %mutation.id, "dropping duplicate persisted mutation");
                dirty = true;
            } else {
                pending.push(mutation);
            }
        }

        let queue = MutationQueue {
            state: Mutex::new(QueueState {
                pending,
                unknown: stored.unknown,
                unknown_blobs,
                unknown_ids,
                dirty,
                sweep_suspended: stored.quarantined,
                closed: false,
            }),
            blobs,
            metadata,
            network,
            replay: Mutex::new(()),
        };

        {
            let mut state = queue.state.lock().await;
            if state.dirty {
                if let Err(e) = queue.persist_locked(&mut state).await {
                    tracing::error!(error = %e, "failed to rewrite pending queue on load");
                }
            }
            if let Err(e) = queue.reconcile_locked(&state).await {
                tracing::warn!(error = %e, "blob reconciliation failed");
            }
            tracing::info!(
                pending = state.pending.len(),
                scheme = %queue.blobs.primary_scheme(),
                "mutation queue initialized"
            );
        }

        queue
    }

    /// The connectivity monitor this queue reports pending work against.
    pub fn network(&self) -> &Arc<NetworkMonitor> {
        &self.network
    }

    /// Exclusive right to replay this queue. Passes never overlap, so a
    /// mutation is not handed to the remote service twice at once.
    pub(crate) async fn replay_guard(&self) -> MutexGuard<'_, ()> {
        self.replay.lock().await
    }

    /// Queue a new location together with its first photo.
    pub async fn enqueue_create_entity(
        &self,
        draft_entity: DraftEntity,
        draft_attachment: DraftAttachment,
    ) -> Result<String> {
        if draft_entity.name.trim().is_empty() {
            return Err(Error::InvalidDraft("location name is required".to_string()));
        }
        self.enqueue(MutationKind::CreateEntity {
            draft_entity,
            draft_attachment,
        })
        .await
    }

    /// Queue a photo for an existing location.
    pub async fn enqueue_attach_to_entity(
        &self,
        draft_attachment: DraftAttachment,
        target_entity_id: impl Into<String>,
    ) -> Result<String> {
        let target_entity_id = required("target entity id", target_entity_id.into())?;
        self.enqueue(MutationKind::AttachToEntity {
            draft_attachment,
            target_entity_id,
        })
        .await
    }

    /// Queue a replacement for an existing photo.
    pub async fn enqueue_replace_attachment(
        &self,
        draft_attachment: DraftAttachment,
        attachment_id: impl Into<String>,
        target_entity_id: impl Into<String>,
    ) -> Result<String> {
        let attachment_id = required("attachment id", attachment_id.into())?;
        let target_entity_id = required("target entity id", target_entity_id.into())?;
        self.enqueue(MutationKind::ReplaceAttachment {
            draft_attachment,
            attachment_id,
            target_entity_id,
        })
        .await
    }

    /// Queue the deletion of a photo.
    pub async fn enqueue_delete_attachment(
        &self,
        attachment_id: impl Into<String>,
        owner_id: impl Into<String>,
    ) -> Result<String> {
        let attachment_id = required("attachment id", attachment_id.into())?;
        let owner_id = required("owner id", owner_id.into())?;
        self.enqueue(MutationKind::DeleteAttachment {
            attachment_id,
            owner_id,
        })
        .await
    }

    async fn enqueue(&self, kind: MutationKind) -> Result<String> {
        let mut state = self.open_state().await?;

        let created_at = Utc::now();
        let id = generate_unique_id(&created_at, |candidate| {
            state.unknown_ids.contains(candidate)
                || state.pending.iter().any(|m| m.id == candidate)
        });
        let mut mutation = PendingMutation::new(id.clone(), created_at, kind);

        let saved = match mutation.draft_attachment_mut() {
            Some(attachment) => {
                let blob = match &attachment.payload {
                    Payload::Inline(data) => self
                        .blobs
                        .save(&id, data)
                        .await
                        .map_err(|source| Error::BlobWrite {
                            id: id.clone(),
                            source,
                        })?,
                    Payload::Blob(blob) => {
                        return Err(Error::InvalidDraft(format!(
                            "attachment payload is already stored as {}",
                            blob
                        )));
                    }
                };
                attachment.payload = Payload::Blob(blob.clone());
                Some(blob)
            }
            None => None,
        };

        let kind_name = mutation.kind.name();
        state.pending.push(mutation);

        if let Err(e) = self.persist_locked(&mut state).await {
            state.pending.pop();
            tracing::error!(%id, error = %e, "failed to persist pending queue, enqueue rolled back");
            if let Some(blob) = &saved {
                if let Err(e) = self.blobs.delete(blob).await {
                    tracing::warn!(%blob, error = %e, "failed to delete blob of rolled back enqueue");
                }
            }
            return Err(Error::MetadataPersist(e));
        }

        tracing::info!(%id, kind = kind_name, "queued mutation");
        Ok(id)
    }

    /// All pending mutations, with payloads left as blob references.
    pub async fn list(&self) -> Vec<PendingMutation> {
        self.state.lock().await.pending.clone()
    }

    /// Number of pending mutations.
    pub async fn len(&self) -> usize {
        self.state.lock().await.pending.len()
    }

    /// Check if nothing is pending.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// True when online with at least one mutation waiting.
    pub async fn has_pending_work(&self) -> bool {
        self.network.is_online() && !self.is_empty().await
    }

    /// Return a copy of the mutation with its payload read back from the
    /// blob store.
    ///
    /// Returns `Ok(None)` if no such mutation is queued. A mutation whose
    /// blob is missing or unreadable is removed from the queue and also
    /// yields `Ok(None)`, so replay loops can skip it.
    pub async fn hydrate(&self, id: &str) -> Result<Option<PendingMutation>> {
        let mut state = self.open_state().await?;

        let Some(mut mutation) = state.pending.iter().find(|m| m.id == id).cloned() else {
            return Ok(None);
        };
        let Some(blob) = mutation.blob_ref().cloned() else {
            return Ok(Some(mutation));
        };

        match self.blobs.load(&blob).await {
            Ok(data) => {
                if let Some(attachment) = mutation.draft_attachment_mut() {
                    attachment.payload = Payload::Inline(data);
                }
                Ok(Some(mutation))
            }
            Err(e) => {
                tracing::warn!(
                    %id,
                    %blob,
                    error = %e,
                    "payload unreadable, discarding pending mutation"
                );
                self.remove_locked(&mut state, id).await;
                Ok(None)
            }
        }
    }

    /// Remove a mutation and its blob. Removing an unknown id is a no-op.
    pub async fn remove(&self, id: &str) -> Result<()> {
        let mut state = self.open_state().await?;
        self.remove_locked(&mut state, id).await;
        Ok(())
    }

    /// Retry a persist that failed earlier, if any.
    pub async fn flush(&self) -> Result<()> {
        let mut state = self.open_state().await?;
        if state.dirty {
            self.persist_locked(&mut state)
                .await
                .map_err(Error::MetadataPersist)?;
        }
        Ok(())
    }

    /// Delete blobs of the primary driver that no pending mutation
    /// references.
    ///
    /// Collects payloads left behind by a crash between storing a blob and
    /// persisting the record that points at it. Secondary drivers are left
    /// alone since their blobs may belong to another platform's queue.
    pub async fn reconcile(&self) -> Result<ReconcileReport> {
        let state = self.open_state().await?;
        self.reconcile_locked(&state).await
    }

    /// Persist outstanding changes, refuse further calls, and stop the
    /// network monitor.
    pub async fn shutdown(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.closed {
            return Ok(());
        }

        let flushed = if state.dirty {
            self.persist_locked(&mut state).await
        } else {
            Ok(())
        };
        state.closed = true;
        drop(state);

        self.network.shutdown().await;
        tracing::info!("mutation queue shut down");
        flushed.map_err(Error::MetadataPersist)
    }

    async fn open_state(&self) -> Result<MutexGuard<'_, QueueState>> {
        let state = self.state.lock().await;
        if state.closed {
            return Err(Error::Closed);
        }
        Ok(state)
    }

    async fn remove_locked(&self, state: &mut QueueState, id: &str) {
        let Some(index) = state.pending.iter().position(|m| m.id == id) else {
            tracing::debug!(%id, "no pending mutation to remove");
            if state.dirty {
                if let Err(e) = self.persist_locked(state).await {
                    tracing::error!(error = %e, "failed to persist pending queue, will retry");
                }
            }
            return;
        };

        if let Some(blob) = state.pending[index].blob_ref() {
            if let Err(e) = self.blobs.delete(blob).await {
                tracing::warn!(%id, %blob, error = %e, "failed to delete blob, leaving it behind");
            }
        }

        state.pending.remove(index);
        if let Err(e) = self.persist_locked(state).await {
            tracing::error!(%id, error = %e, "failed to persist pending queue, will retry");
        }
        tracing::info!(%id, "removed pending mutation");
    }

    async fn persist_locked(&self, state: &mut QueueState) -> MetadataResult<()> {
        match self.metadata.persist(&state.pending, &state.unknown).await {
            Ok(()) => {
                state.dirty = false;
                Ok(())
            }
            Err(e) => {
                state.dirty = true;
                Err(e)
            }
        }
    }

    async fn reconcile_locked(&self, state: &QueueState) -> Result<ReconcileReport> {
        if state.sweep_suspended {
            tracing::warn!("skipping orphaned blob sweep, stored pending queue was unreadable");
            return Ok(ReconcileReport {
                removed: Vec::new(),
                suspended: true,
            });
        }

        let referenced: HashSet<&BlobRef> = state
            .pending
            .iter()
            .filter_map(|m| m.blob_ref())
            .chain(state.unknown_blobs.iter())
            .collect();
        let scheme = self.blobs.primary_scheme();
        let keys = self
            .blobs
            .keys(scheme)
            .await
            .map_err(|source| Error::BlobRead {
                reference: format!("{}:*", scheme),
                source,
            })?;

        let mut report = ReconcileReport::default();
        for key in keys {
            let blob = BlobRef::new(scheme, key);
            if referenced.contains(&blob) {
                continue;
            }
            match self.blobs.delete(&blob).await {
                Ok(()) => {
                    tracing::info!(%blob, "deleted orphaned blob");
                    report.removed.push(blob);
                }
                Err(e) => {
                    tracing::warn!(%blob, error = %e, "failed to delete orphaned blob");
                }
            }
        }

        Ok(report)
    }
}

fn required(field: &str, value: String) -> Result<String> {
    if value.trim().is_empty() {
        return Err(Error::InvalidDraft(format!("{} is required", field)));
    }
    Ok(value)
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
