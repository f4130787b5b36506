// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! pb-core: offline mutation queue for pinbox
//!
//! This crate provides the durable queue of changes made while offline, the
//! blob and metadata stores it writes to, the network monitor that decides
//! when replay may run, and the replay pass itself.

pub mod blob;
pub mod config;
pub mod db;
pub mod error;
pub mod id;
pub mod metadata;
pub mod mutation;
pub mod network;
pub mod platform;
pub mod queue;
pub mod sync;

#[cfg(test)]
mod test_helpers;

pub use blob::{BlobError, BlobStore, BlobStoreDriver, NativeBlobDriver, ObjectStoreDriver};
pub use config::{Config, PlatformChoice, ProbeConfig};
pub use db::Database;
pub use error::{Error, Result};
pub use metadata::{FileMetadataStore, KvMetadataStore, MetadataError, MetadataStore};
pub use mutation::{
    BlobRef, DraftAttachment, DraftEntity, MutationKind, Payload, PendingMutation, Scheme,
};
pub use network::{
    ConnectivitySource, HostConnectivity, MonitorConfig, NetworkError, NetworkMonitor,
    NetworkState, Subscription, TcpProbe,
};
pub use platform::{open_queue, open_storage, Platform, Storage};
pub use queue::{MutationQueue, ReconcileReport};
pub use sync::{replay_pending, ReplaySummary, ReplayTrigger, SyncDriver, SyncError};
