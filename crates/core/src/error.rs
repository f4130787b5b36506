// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for queue operations.

use thiserror::Error;

use crate::blob::BlobError;
use crate::metadata::MetadataError;
use crate::network::NetworkError;

/// All errors surfaced by the mutation queue and its collaborators.
///
/// Only enqueue-time failures reach the user; once a mutation is queued its
/// replay or self-healing removal never produces a second error for it.
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not queue change: failed to store payload for {id}: {source}\n  hint: check free space and try again")]
    BlobWrite {
        id: String,
        #[source]
        source: BlobError,
    },

    #[error("failed to read payload {reference}: {source}")]
    BlobRead {
        reference: String,
        #[source]
        source: BlobError,
    },

    #[error("could not queue change: failed to persist pending queue: {0}")]
    MetadataPersist(#[source] MetadataError),

    #[error("invalid draft: {0}")]
    InvalidDraft(String),

    #[error("mutation queue has been shut down")]
    Closed,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to open storage at {path}: {reason}")]
    Storage { path: String, reason: String },

    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for queue operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
