// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Storage backend selection.
//!
//! The platform is resolved once and decides which blob driver new payloads
//! go to and where the pending list lives:
//!
//! | platform | blobs                        | pending list                 |
//! |----------|------------------------------|------------------------------|
//! | native   | `native:` files in `blob_dir` | JSON file `metadata_file`    |
//! | browser  | `idb:` rows in the database   | `kv` row in the same database |
//!
//! The other platform's blob driver is registered as well when its storage
//! already exists, so records written before a platform switch still hydrate.

use std::path::Path;
use std::sync::Arc;

use crate::blob::{BlobStore, NativeBlobDriver, ObjectStoreDriver};
use crate::config::{Config, PlatformChoice};
use crate::db::Database;
use crate::error::{Error, Result};
use crate::metadata::{FileMetadataStore, KvMetadataStore, MetadataStore};
use crate::mutation::Scheme;
use crate::network::NetworkMonitor;
use crate::queue::MutationQueue;

/// Resolved storage platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Native,
    Browser,
}

impl Platform {
    /// Platform implied by the build target.
    pub fn detect() -> Self {
        if cfg!(target_arch = "wasm32") {
            Platform::Browser
        } else {
            Platform::Native
        }
    }

    pub fn resolve(choice: PlatformChoice) -> Self {
        match choice {
            PlatformChoice::Auto => Self::detect(),
            PlatformChoice::Native => Platform::Native,
            PlatformChoice::Browser => Platform::Browser,
        }
    }

    /// Scheme of blobs written on this platform.
    pub fn scheme(&self) -> Scheme {
        match self {
            Platform::Native => Scheme::Native,
            Platform::Browser => Scheme::Idb,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Native => "native",
            Platform::Browser => "browser",
        }
    }
}

/// Blob store and metadata store for one data directory.
pub struct Storage {
    pub platform: Platform,
    pub blobs: BlobStore,
    pub metadata: Arc<dyn MetadataStore>,
}

/// Open the storage backends for `platform` under `data_dir`.
pub fn open_storage(data_dir: &Path, config: &Config, platform: Platform) -> Result<Storage> {
    let blob_dir = data_dir.join(&config.blob_dir);
    let db_path = data_dir.join(&config.object_store_file);

    let storage = match platform {
        Platform::Native => {
            let native = NativeBlobDriver::open(&blob_dir).map_err(|e| storage_error(&blob_dir, e))?;
            let mut blobs = BlobStore::new(Arc::new(native));
            if db_path.is_file() {
                let idb = ObjectStoreDriver::open(&db_path).map_err(|e| storage_error(&db_path, e))?;
                blobs = blobs.with_driver(Arc::new(idb));
            }

            let metadata_path = data_dir.join(&config.metadata_file);
            let metadata = FileMetadataStore::open(&metadata_path)
                .map_err(|e| storage_error(&metadata_path, e))?;
            Storage {
                platform,
                blobs,
                metadata: Arc::new(metadata),
            }
        }
        Platform::Browser => {
            let db = Database::open(&db_path).map_err(|e| storage_error(&db_path, e))?;
            let mut blobs = BlobStore::new(Arc::new(ObjectStoreDriver::new(db.clone())));
            if blob_dir.is_dir() {
                let native =
                    NativeBlobDriver::open(&blob_dir).map_err(|e| storage_error(&blob_dir, e))?;
                blobs = blobs.with_driver(Arc::new(native));
            }
            Storage {
                platform,
                blobs,
                metadata: Arc::new(KvMetadataStore::new(db)),
            }
        }
    };

    tracing::debug!(
        platform = platform.as_str(),
        data_dir = %data_dir.display(),
        "opened storage"
    );
    Ok(storage)
}

/// Open storage and initialize a queue on top of it.
pub async fn open_queue(
    data_dir: &Path,
    config: &Config,
    platform: Platform,
    network: Arc<NetworkMonitor>,
) -> Result<MutationQueue> {
    let storage = open_storage(data_dir, config, platform)?;
    Ok(MutationQueue::initialize(storage.blobs, storage.metadata, network).await)
}

fn storage_error(path: &Path, err: impl std::fmt::Display) -> Error {
    Error::Storage {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
#[path = "platform_tests.rs"]
mod tests;
