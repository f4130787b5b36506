// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Blob storage for queued payloads.
//!
//! Photos are kept out of the queue metadata and stored here under the id of
//! the mutation that owns them. Two drivers implement [`BlobStoreDriver`]:
//!
//! - [`NativeBlobDriver`] - one base64 text file per key in a cache directory
//! - [`ObjectStoreDriver`] - a key/value table in the embedded database
//!
//! [`BlobStore`] saves through the primary driver chosen for the platform and
//! dispatches loads and deletes on the scheme carried by each [`BlobRef`].

mod native;
mod object_store;

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::db::DatabaseError;
use crate::mutation::{BlobRef, Scheme};

pub use native::NativeBlobDriver;
pub use object_store::ObjectStoreDriver;

/// Error type for blob operations.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    /// No blob is stored under the key.
    #[error("blob not found: {0}")]
    NotFound(String),

    /// The key cannot be used as a storage name.
    #[error("invalid blob key '{0}'")]
    InvalidKey(String),

    /// No registered driver handles the scheme.
    #[error("no blob driver registered for scheme '{0}'")]
    UnsupportedScheme(Scheme),

    /// Stored data could not be decoded.
    #[error("corrupt blob {key}: {reason}")]
    Decode { key: String, reason: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Embedded database error.
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
}

/// Result type for blob operations.
pub type BlobResult<T> = Result<T, BlobError>;

/// Boxed future returned by driver operations.
pub type BlobFuture<'a, T> = Pin<Box<dyn Future<Output = BlobResult<T>> + Send + 'a>>;

/// One stored binary and when it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobRecord {
    pub key: String,
    pub data: Vec<u8>,
    pub stored_at: DateTime<Utc>,
}

/// Storage driver for payload blobs.
///
/// `save` either fully succeeds and returns a usable reference, or fails and
/// leaves nothing behind under the key. `delete` of a missing key succeeds.
pub trait BlobStoreDriver: Send + Sync {
    /// Scheme written into references produced by this driver.
    fn scheme(&self) -> Scheme;

    /// Store `data` under `key`, replacing any previous blob.
    fn save<'a>(&'a self, key: &'a str, data: &'a [u8]) -> BlobFuture<'a, BlobRef>;

    /// Read a stored blob back.
    ///
    /// Returns [`BlobError::NotFound`] if nothing is stored under the key.
    fn load<'a>(&'a self, blob: &'a BlobRef) -> BlobFuture<'a, BlobRecord>;

    /// Delete a stored blob. Missing keys are not an error.
    fn delete<'a>(&'a self, blob: &'a BlobRef) -> BlobFuture<'a, ()>;

    /// List every key currently stored.
    fn keys(&self) -> BlobFuture<'_, Vec<String>>;
}

/// Blob storage dispatching on reference scheme.
#[derive(Clone)]
pub struct BlobStore {
    primary: Arc<dyn BlobStoreDriver>,
    drivers: BTreeMap<Scheme, Arc<dyn BlobStoreDriver>>,
}

impl BlobStore {
    /// Create a store that saves through `primary`.
    pub fn new(primary: Arc<dyn BlobStoreDriver>) -> Self {
        let mut drivers = BTreeMap::new();
        drivers.insert(primary.scheme(), Arc::clone(&primary));
        BlobStore { primary, drivers }
    }

    /// Register an additional driver for loading and deleting blobs written
    /// under a different platform.
    ///
    /// The primary driver keeps its scheme; a second driver for the same
    /// scheme is ignored.
    pub fn with_driver(mut self, driver: Arc<dyn BlobStoreDriver>) -> Self {
        self.drivers.entry(driver.scheme()).or_insert(driver);
        self
    }

    /// Scheme of the driver new blobs are saved with.
    pub fn primary_scheme(&self) -> Scheme {
        self.primary.scheme()
    }

    /// Schemes with a registered driver.
    pub fn schemes(&self) -> Vec<Scheme> {
        self.drivers.keys().copied().collect()
    }

    fn driver_for(&self, scheme: Scheme) -> BlobResult<&Arc<dyn BlobStoreDriver>> {
        self.drivers
            .get(&scheme)
            .ok_or(BlobError::UnsupportedScheme(scheme))
    }

    pub async fn save(&self, key: &str, data: &[u8]) -> BlobResult<BlobRef> {
        self.primary.save(key, data).await
    }

    pub async fn load(&self, blob: &BlobRef) -> BlobResult<Vec<u8>> {
        let record = self.driver_for(blob.scheme)?.load(blob).await?;
        Ok(record.data)
    }

    pub async fn delete(&self, blob: &BlobRef) -> BlobResult<()> {
        self.driver_for(blob.scheme)?.delete(blob).await
    }

    /// List stored keys for one scheme.
    pub async fn keys(&self, scheme: Scheme) -> BlobResult<Vec<String>> {
        self.driver_for(scheme)?.keys().await
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
