// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! File-per-key blob driver for native platforms.
//!
//! Each blob is written as base64 text to `<dir>/<key>`. Writes go to a hidden
//! temp file that is fsynced and then renamed over the target, so a failed
//! save never leaves a partial blob under the key.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use tokio::io::AsyncWriteExt;

use super::{BlobError, BlobFuture, BlobRecord, BlobResult, BlobStoreDriver};
use crate::id::validate_key;
use crate::mutation::{BlobRef, Scheme};

const TMP_SUFFIX: &str = ".tmp";

/// Blob driver storing one file per key.
pub struct NativeBlobDriver {
    dir: PathBuf,
}

impl NativeBlobDriver {
    /// Opens the driver, creating the blob directory if needed.
    pub fn open(dir: impl AsRef<Path>) -> BlobResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(NativeBlobDriver { dir })
    }

    /// Returns the blob directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> BlobResult<PathBuf> {
        if !validate_key(key) {
            return Err(BlobError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }

    fn check_scheme(blob: &BlobRef) -> BlobResult<()> {
        if blob.scheme != Scheme::Native {
            return Err(BlobError::UnsupportedScheme(blob.scheme));
        }
        Ok(())
    }

    async fn write_blob(&self, key: &str, data: &[u8]) -> BlobResult<BlobRef> {
        let path = self.path_for(key)?;
        let tmp = self.dir.join(format!(".{}{}", key, TMP_SUFFIX));
        let encoded = STANDARD.encode(data);

        let written: std::io::Result<()> = async {
            let mut file = tokio::fs::File::create(&tmp).await?;
            file.write_all(encoded.as_bytes()).await?;
            file.sync_all().await?;
            drop(file);
            tokio::fs::rename(&tmp, &path).await
        }
        .await;

        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        tracing::debug!(key, bytes = data.len(), "saved native blob");
        Ok(BlobRef::new(Scheme::Native, key))
    }

    async fn read_blob(&self, blob: &BlobRef) -> BlobResult<BlobRecord> {
        Self::check_scheme(blob)?;
        let path = self.path_for(&blob.key)?;

        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(BlobError::NotFound(blob.key.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        let data = STANDARD
            .decode(text.trim().as_bytes())
            .map_err(|e| BlobError::Decode {
                key: blob.key.clone(),
                reason: e.to_string(),
            })?;

        let stored_at = tokio::fs::metadata(&path)
            .await
            .and_then(|m| m.modified())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        Ok(BlobRecord {
            key: blob.key.clone(),
            data,
            stored_at,
        })
    }

    async fn remove_blob(&self, blob: &BlobRef) -> BlobResult<()> {
        Self::check_scheme(blob)?;
        let path = self.path_for(&blob.key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(key = %blob.key, "deleted native blob");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_keys(&self) -> BlobResult<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut keys = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            // Temp files are hidden and fail validation
            if let Some(name) = entry.file_name().to_str() {
                if validate_key(name) {
                    keys.push(name.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

impl BlobStoreDriver for NativeBlobDriver {
    fn scheme(&self) -> Scheme {
        Scheme::Native
    }

    fn save<'a>(&'a self, key: &'a str, data: &'a [u8]) -> BlobFuture<'a, BlobRef> {
        Box::pin(self.write_blob(key, data))
    }

    fn load<'a>(&'a self, blob: &'a BlobRef) -> BlobFuture<'a, BlobRecord> {
        Box::pin(self.read_blob(blob))
    }

    fn delete<'a>(&'a self, blob: &'a BlobRef) -> BlobFuture<'a, ()> {
        Box::pin(self.remove_blob(blob))
    }

    fn keys(&self) -> BlobFuture<'_, Vec<String>> {
        Box::pin(self.list_keys())
    }
}

#[cfg(test)]
#[path = "native_tests.rs"]
mod tests;
