// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Command implementations.
//!
//! Each command opens the queue, renders its output into a string through a
//! `run_impl` that tests call directly, shuts the queue down so pending
//! writes are flushed, and only then prints.

pub mod config;
pub mod enqueue;
pub mod list;
pub mod reconcile;
pub mod remove;
pub mod show;
pub mod status;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;

use pb_core::MutationQueue;

use crate::error::Result;

/// Shut the queue down, then print `output` if the command succeeded.
async fn finish(queue: MutationQueue, output: Result<String>) -> Result<()> {
    let closed = queue.shutdown().await;
    let output = output?;
    closed?;
    print!("{}", output);
    Ok(())
}
