// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use pb_core::MutationQueue;

use crate::context::Context;
use crate::error::Result;

pub async fn run(ctx: &Context) -> Result<()> {
    let queue = ctx.open_offline_queue().await?;
    let rendered = run_impl(&queue).await;
    super::finish(queue, rendered).await
}

/// Internal implementation that accepts the queue for testing.
pub(crate) async fn run_impl(queue: &MutationQueue) -> Result<String> {
    let report = queue.reconcile().await?;
    if report.suspended {
        return Ok("Skipped: the stored pending list could not be read; \
                   a copy is kept beside it with a .corrupt suffix\n"
            .to_string());
    }

    let count = report.removed.len();
    let mut text = format!(
        "Removed {} orphaned blob{}\n",
        count,
        if count == 1 { "" } else { "s" }
    );
    for blob in &report.removed {
        text.push_str(&format!("  {}\n", blob));
    }
    Ok(text)
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
