// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use pb_core::MutationQueue;

use crate::cli::OutputFormat;
use crate::context::Context;
use crate::display::format_mutation_line;
use crate::error::Result;

pub async fn run(ctx: &Context, output: OutputFormat) -> Result<()> {
    let queue = ctx.open_offline_queue().await?;
    let rendered = run_impl(&queue, output).await;
    super::finish(queue, rendered).await
}

/// Internal implementation that accepts the queue for testing.
pub(crate) async fn run_impl(queue: &MutationQueue, output: OutputFormat) -> Result<String> {
    let pending = queue.list().await;

    match output {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string(&pending)?)),
        OutputFormat::Text => {
            if pending.is_empty() {
                return Ok("No pending mutations\n".to_string());
            }
            let mut text = String::new();
            for mutation in &pending {
                text.push_str(&format_mutation_line(mutation));
                text.push('\n');
            }
            Ok(text)
        }
    }
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
