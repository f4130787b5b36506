// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Object-store blob driver backed by the embedded database.
//!
//! Mirrors a browser object store: a single `blobs` table keyed by blob key,
//! holding the base64 payload string and the time it was stored. A save is a
//! single upsert statement, so it is atomic.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use super::{BlobError, BlobFuture, BlobRecord, BlobResult, BlobStoreDriver};
use crate::db::Database;
use crate::id::validate_key;
use crate::mutation::{BlobRef, Scheme};

/// Blob driver storing payloads in the `blobs` table.
#[derive(Clone)]
pub struct ObjectStoreDriver {
    db: Database,
}

impl ObjectStoreDriver {
    pub fn new(db: Database) -> Self {
        ObjectStoreDriver { db }
    }

    /// Opens (or creates) the database file at `path`.
    pub fn open(path: &Path) -> BlobResult<Self> {
        Ok(Self::new(Database::open(path)?))
    }

    fn check_key(key: &str) -> BlobResult<()> {
        if !validate_key(key) {
            return Err(BlobError::InvalidKey(key.to_string()));
        }
        Ok(())
    }

    fn check_scheme(blob: &BlobRef) -> BlobResult<()> {
        if blob.scheme != Scheme::Idb {
            return Err(BlobError::UnsupportedScheme(blob.scheme));
        }
        Ok(())
    }

    async fn put(&self, key: &str, data: &[u8]) -> BlobResult<BlobRef> {
        Self::check_key(key)?;
        let owned_key = key.to_string();
        let encoded = STANDARD.encode(data);
        let stored_at = Utc::now().to_rfc3339();

        self.db
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO blobs (key, data, stored_at) VALUES (?1, ?2, ?3)
                     ON CONFLICT(key) DO UPDATE SET data = excluded.data,
                     stored_at = excluded.stored_at",
                    params![owned_key, encoded, stored_at],
                )
            })
            .await?;

        tracing::debug!(key, bytes = data.len(), "saved object store blob");
        Ok(BlobRef::new(Scheme::Idb, key))
    }

    async fn get(&self, blob: &BlobRef) -> BlobResult<BlobRecord> {
        Self::check_scheme(blob)?;
        Self::check_key(&blob.key)?;
        let key = blob.key.clone();

        let row: Option<(String, String)> = self
            .db
            .call(move |conn| {
                conn.query_row(
                    "SELECT data, stored_at FROM blobs WHERE key = ?1",
                    params![key],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()
            })
            .await?;

        let (encoded, stored_at) = row.ok_or_else(|| BlobError::NotFound(blob.key.clone()))?;
        let corrupt = |reason: String| BlobError::Decode {
            key: blob.key.clone(),
            reason,
        };

        let data = STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| corrupt(e.to_string()))?;
        let stored_at = DateTime::parse_from_rfc3339(&stored_at)
            .map_err(|e| corrupt(e.to_string()))?
            .with_timezone(&Utc);

        Ok(BlobRecord {
            key: blob.key.clone(),
            data,
            stored_at,
        })
    }

    async fn remove(&self, blob: &BlobRef) -> BlobResult<()> {
        Self::check_scheme(blob)?;
        let key = blob.key.clone();
        let deleted = self
            .db
            .call(move |conn| conn.execute("DELETE FROM blobs WHERE key = ?1", params![key]))
            .await?;
        if deleted > 0 {
            tracing::debug!(key = %blob.key, "deleted object store blob");
        }
        Ok(())
    }

    async fn list_keys(&self) -> BlobResult<Vec<String>> {
        let keys = self
            .db
            .call(|conn| {
                let mut stmt = conn.prepare("SELECT key FROM blobs ORDER BY key")?;
                let keys = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<rusqlite::Result<Vec<String>>>()?;
                Ok(keys)
            })
            .await?;
        Ok(keys)
    }
}

impl BlobStoreDriver for ObjectStoreDriver {
    fn scheme(&self) -> Scheme {
        Scheme::Idb
    }

    fn save<'a>(&'a self, key: &'a str, data: &'a [u8]) -> BlobFuture<'a, BlobRef> {
        Box::pin(self.put(key, data))
    }

    fn load<'a>(&'a self, blob: &'a BlobRef) -> BlobFuture<'a, BlobRecord> {
        Box::pin(self.get(blob))
    }

    fn delete<'a>(&'a self, blob: &'a BlobRef) -> BlobFuture<'a, ()> {
        Box::pin(self.remove(blob))
    }

    fn keys(&self) -> BlobFuture<'_, Vec<String>> {
        Box::pin(self.list_keys())
    }
}

#[cfg(test)]
#[path = "object_store_tests.rs"]
mod tests;
