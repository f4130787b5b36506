// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::env::vars;

/// All possible errors that can occur in the pinbox CLI.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("pending mutation not found: {0}\n  hint: run 'pinbox list' to see queued ids")]
    MutationNotFound(String),

    #[error("pending mutation {0} has no photo payload")]
    NoPayload(String),

    #[error("could not determine data directory\n  hint: pass --data-dir or set {}", vars::PINBOX_DATA_DIR)]
    NoDataDir,

    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{field} cannot be empty")]
    FieldEmpty { field: &'static str },

    #[error("failed to start async runtime: {0}")]
    Runtime(std::io::Error),

    #[error(transparent)]
    Core(#[from] pb_core::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for pinbox commands.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
