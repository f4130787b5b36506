// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable storage for the pending mutation list.
//!
//! The whole list is rewritten on every change; queues are expected to hold
//! a handful of records, so there is no incremental format. Two backends:
//!
//! - [`FileMetadataStore`] - a JSON array file, replaced atomically
//! - [`KvMetadataStore`] - one row in the embedded database's `kv` table
//!
//! Loading never fails. Records that cannot be parsed (for example a
//! mutation kind written by a newer version) are kept verbatim in
//! [`StoredQueue::unknown`] and written back by every persist. Storage that
//! cannot be read as a list at all is copied aside under a `.corrupt` name
//! and reported as [`StoredQueue::quarantined`].

use std::collections::HashSet;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use rusqlite::{params, OptionalExtension};
use serde_json::Value;
use tokio::io::AsyncWriteExt;

use crate::db::{Database, DatabaseError};
use crate::mutation::{BlobRef, PendingMutation};

/// Key the pending list is stored under in the `kv` table.
pub const DEFAULT_KV_KEY: &str = "pending_mutations";

/// Error type for metadata operations.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Embedded database error.
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// A record still holds its payload inline and must not be persisted.
    #[error("refusing to persist inline payload for {0}")]
    InlinePayload(String),
}

/// Result type for metadata operations.
pub type MetadataResult<T> = Result<T, MetadataError>;

/// Boxed future returned by metadata store operations.
pub type MetadataFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Contents read back from a metadata store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredQueue {
    pub mutations: Vec<PendingMutation>,
    /// Records this version cannot parse, kept as stored.
    pub unknown: Vec<Value>,
    /// Stored content could not be read as a list, now or on an earlier
    /// load, and a copy of it is kept aside. Blobs it may reference are
    /// unknown.
    pub quarantined: bool,
}

impl StoredQueue {
    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty() && self.unknown.is_empty()
    }

    /// Blob references found anywhere inside the unknown records.
    pub fn unknown_blobs(&self) -> HashSet<BlobRef> {
        unknown_blobs(&self.unknown)
    }

    /// Ids of the unknown records that carry one.
    pub fn unknown_ids(&self) -> Vec<String> {
        unknown_ids(&self.unknown)
    }
}

/// Durable store for the full pending mutation list.
pub trait MetadataStore: Send + Sync {
    /// Replace the stored list with `list` followed by the `unknown` records.
    fn persist<'a>(
        &'a self,
        list: &'a [PendingMutation],
        unknown: &'a [Value],
    ) -> MetadataFuture<'a, MetadataResult<()>>;

    /// Read the stored list. Missing storage yields an empty queue.
    fn load(&self) -> MetadataFuture<'_, StoredQueue>;
}

/// Serialize a pending list, rejecting records with inline payloads.
///
/// Unknown records are appended unchanged.
pub fn encode(list: &[PendingMutation], unknown: &[Value]) -> MetadataResult<String> {
    if let Some(inline) = list.iter().find(|m| m.has_inline_payload()) {
        return Err(MetadataError::InlinePayload(inline.id.clone()));
    }
    let mut values = list
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;
    values.extend(unknown.iter().cloned());
    Ok(serde_json::to_string(&values)?)
}

/// Parse a stored pending list.
///
/// Fails only when the text is not a JSON array. Records that do not parse
/// as a [`PendingMutation`] land in [`StoredQueue::unknown`].
pub fn decode(text: &str) -> serde_json::Result<StoredQueue> {
    if text.trim().is_empty() {
        return Ok(StoredQueue::default());
    }

    let values: Vec<Value> = serde_json::from_str(text)?;
    let mut stored = StoredQueue::default();
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<PendingMutation>(value.clone()) {
            Ok(mutation) => stored.mutations.push(mutation),
            Err(e) => {
                tracing::warn!(index, error = %e, "keeping unreadable pending mutation as stored");
                stored.unknown.push(value);
            }
        }
    }
    Ok(stored)
}

/// Collect every `"blob": "<scheme>:<key>"` string inside `values`.
pub fn unknown_blobs(values: &[Value]) -> HashSet<BlobRef> {
    fn walk(value: &Value, found: &mut HashSet<BlobRef>) {
        match value {
            Value::Object(map) => {
                for (key, inner) in map {
                    if let (true, Value::String(text)) = (key == "blob", inner) {
                        if let Ok(blob) = text.parse::<BlobRef>() {
                            found.insert(blob);
                        }
                    }
                    walk(inner, found);
                }
            }
            Value::Array(items) => items.iter().for_each(|item| walk(item, found)),
            _ => {}
        }
    }

    let mut found = HashSet::new();
    values.iter().for_each(|value| walk(value, &mut found));
    found
}

fn unknown_ids(values: &[Value]) -> Vec<String> {
    values
        .iter()
        .filter_map(|value| value.get("id").and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}

/// Decode, logging when the text cannot be read as a list.
fn decode_or_quarantine(text: &str) -> Option<StoredQueue> {
    match decode(text) {
        Ok(stored) => Some(stored),
        Err(e) => {
            tracing::warn!(error = %e, "pending queue is unreadable, starting empty");
            None
        }
    }
}

/// Pending list stored as a JSON array file.
pub struct FileMetadataStore {
    path: PathBuf,
}

impl FileMetadataStore {
    /// Opens the store, creating the parent directory if needed.
    pub fn open(path: impl AsRef<Path>) -> MetadataResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        Ok(FileMetadataStore { path })
    }

    /// Returns the path to the queue file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn tmp_path(&self) -> PathBuf {
        self.sibling(".tmp")
    }

    /// Copies kept of content that could not be read, oldest first.
    pub fn quarantine_paths(&self) -> Vec<PathBuf> {
        let first = self.sibling(".corrupt");
        let mut paths = Vec::new();
        if first.exists() {
            paths.push(first);
        }
        for n in 1.. {
            let path = self.sibling(&format!(".corrupt.{}", n));
            if !path.exists() {
                break;
            }
            paths.push(path);
        }
        paths
    }

    async fn quarantine(&self) {
        let taken = self.quarantine_paths().len();
        let target = match taken {
            0 => self.sibling(".corrupt"),
            n => self.sibling(&format!(".corrupt.{}", n)),
        };
        match tokio::fs::copy(&self.path, &target).await {
            Ok(_) => tracing::warn!(copy = %target.display(), "kept a copy of the unreadable pending queue"),
            Err(e) => tracing::error!(error = %e, copy = %target.display(), "failed to copy unreadable pending queue"),
        }
    }

    async fn write_all(&self, list: &[PendingMutation], unknown: &[Value]) -> MetadataResult<()> {
        let json = encode(list, unknown)?;
        let tmp = self.tmp_path();

        let written: std::io::Result<()> = async {
            let mut file = tokio::fs::File::create(&tmp).await?;
            file.write_all(json.as_bytes()).await?;
            file.sync_all().await?;
            drop(file);
            tokio::fs::rename(&tmp, &self.path).await
        }
        .await;

        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        tracing::debug!(
            count = list.len(),
            unknown = unknown.len(),
            path = %self.path.display(),
            "persisted pending queue"
        );
        Ok(())
    }

    async fn read_all(&self) -> StoredQueue {
        let mut stored = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => match decode_or_quarantine(&text) {
                Some(stored) => stored,
                None => {
                    self.quarantine().await;
                    StoredQueue {
                        quarantined: true,
                        ..StoredQueue::default()
                    }
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => StoredQueue::default(),
            Err(e) => {
                tracing::warn!(error = %e, path = %self.path.display(), "failed to read pending queue");
                StoredQueue {
                    quarantined: true,
                    ..StoredQueue::default()
                }
            }
        };
        if !self.quarantine_paths().is_empty() {
            stored.quarantined = true;
        }
        stored
    }
}

impl MetadataStore for FileMetadataStore {
    fn persist<'a>(
        &'a self,
        list: &'a [PendingMutation],
        unknown: &'a [Value],
    ) -> MetadataFuture<'a, MetadataResult<()>> {
        Box::pin(self.write_all(list, unknown))
    }

    fn load(&self) -> MetadataFuture<'_, StoredQueue> {
        Box::pin(self.read_all())
    }
}

/// Pending list stored as a single value in the `kv` table.
#[derive(Clone)]
pub struct KvMetadataStore {
    db: Database,
    key: String,
}

impl KvMetadataStore {
    pub fn new(db: Database) -> Self {
        Self::with_key(db, DEFAULT_KV_KEY)
    }

    pub fn with_key(db: Database, key: impl Into<String>) -> Self {
        KvMetadataStore {
            db,
            key: key.into(),
        }
    }

    fn quarantine_prefix(&self) -> String {
        format!("{}.corrupt", self.key)
    }

    /// Number of copies kept of values that could not be read.
    pub async fn quarantine_count(&self) -> Result<usize, DatabaseError> {
        let prefix = self.quarantine_prefix();
        self.db
            .call(move |conn| count_quarantined(conn, &prefix))
            .await
            .map(|count| usize::try_from(count).unwrap_or(0))
    }

    async fn quarantine(&self, text: String) {
        let prefix = self.quarantine_prefix();
        let copied = self
            .db
            .call(move |conn| {
                let taken = count_quarantined(conn, &prefix)?;
                let key = match taken {
                    0 => prefix,
                    n => format!("{}.{}", prefix, n),
                };
                conn.execute(
                    "INSERT INTO kv (key, value) VALUES (?1, ?2)",
                    params![key, text],
                )?;
                Ok(key)
            })
            .await;
        match copied {
            Ok(key) => tracing::warn!(copy = %key, "kept a copy of the unreadable pending queue"),
            Err(e) => tracing::error!(error = %e, "failed to copy unreadable pending queue"),
        }
    }

    async fn write_all(&self, list: &[PendingMutation], unknown: &[Value]) -> MetadataResult<()> {
        let json = encode(list, unknown)?;
        let key = self.key.clone();
        self.db
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO kv (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    params![key, json],
                )
            })
            .await?;
        tracing::debug!(
            count = list.len(),
            unknown = unknown.len(),
            key = %self.key,
            "persisted pending queue"
        );
        Ok(())
    }

    async fn read_all(&self) -> StoredQueue {
        let key = self.key.clone();
        let stored: Result<Option<String>, DatabaseError> = self
            .db
            .call(move |conn| {
                conn.query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                    row.get(0)
                })
                .optional()
            })
            .await;

        let quarantined = StoredQueue {
            quarantined: true,
            ..StoredQueue::default()
        };
        let mut loaded = match stored {
            Ok(Some(text)) => match decode_or_quarantine(&text) {
                Some(loaded) => loaded,
                None => {
                    self.quarantine(text).await;
                    quarantined
                }
            },
            Ok(None) => StoredQueue::default(),
            Err(e) => {
                tracing::warn!(error = %e, key = %self.key, "failed to read pending queue");
                quarantined
            }
        };
        match self.quarantine_count().await {
            Ok(0) => {}
            Ok(_) => loaded.quarantined = true,
            Err(e) => {
                tracing::warn!(error = %e, key = %self.key, "failed to look for quarantined copies");
                loaded.quarantined = true;
            }
        }
        loaded
    }
}

/// Rows named `prefix` or `prefix.<n>`.
fn count_quarantined(conn: &rusqlite::Connection, prefix: &str) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM kv
         WHERE key = ?1 OR substr(key, 1, length(?1) + 1) = ?1 || '.'",
        params![prefix],
        |row| row.get(0),
    )
}

impl MetadataStore for KvMetadataStore {
    fn persist<'a>(
        &'a self,
        list: &'a [PendingMutation],
        unknown: &'a [Value],
    ) -> MetadataFuture<'a, MetadataResult<()>> {
        Box::pin(self.write_all(list, unknown))
    }

    fn load(&self) -> MetadataFuture<'_, StoredQueue> {
        Box::pin(self.read_all())
    }
}

#[cfg(test)]
#[path = "metadata_tests.rs"]
mod tests;
