// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use pb_core::MutationQueue;

use crate::context::Context;
use crate::error::Result;

pub async fn run(ctx: &Context, id: &str) -> Result<()> {
    let queue = ctx.open_offline_queue().await?;
    let rendered = run_impl(&queue, id).await;
    super::finish(queue, rendered).await
}

/// Internal implementation that accepts the queue for testing.
///
/// Removing an id that is not queued succeeds.
pub(crate) async fn run_impl(queue: &MutationQueue, id: &str) -> Result<String> {
    let queued = queue.list().await.iter().any(|m| m.id == id);
    queue.remove(id).await?;

    if queued {
        Ok(format!("Removed {}\n", id))
    } else {
        Ok(format!("{} is not queued, nothing to remove\n", id))
    }
}

#[cfg(test)]
#[path = "remove_tests.rs"]
mod tests;
