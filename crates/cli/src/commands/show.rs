// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use pb_core::{MutationQueue, Payload};

use crate::cli::OutputFormat;
use crate::context::Context;
use crate::display::{format_mutation_details, format_size};
use crate::error::{Error, Result};

pub async fn run(ctx: &Context, id: &str, output: OutputFormat, out: Option<&Path>) -> Result<()> {
    let queue = ctx.open_offline_queue().await?;
    let rendered = run_impl(&queue, id, output, out).await;
    super::finish(queue, rendered).await
}

/// Internal implementation that accepts the queue for testing.
///
/// A mutation whose payload can no longer be read is dropped from the
/// queue by the hydrate and reported as not found.
pub(crate) async fn run_impl(
    queue: &MutationQueue,
    id: &str,
    output: OutputFormat,
    out: Option<&Path>,
) -> Result<String> {
    let mutation = queue
        .hydrate(id)
        .await?
        .ok_or_else(|| Error::MutationNotFound(id.to_string()))?;

    let mut written = None;
    if let Some(path) = out {
        let data = mutation
            .payload()
            .and_then(Payload::inline_data)
            .ok_or_else(|| Error::NoPayload(id.to_string()))?;
        std::fs::write(path, data).map_err(|source| Error::WriteFile {
            path: path.display().to_string(),
            source,
        })?;
        written = Some((path, data.len()));
    }

    match output {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string(&mutation)?)),
        OutputFormat::Text => {
            let mut text = format_mutation_details(&mutation);
            text.push('\n');
            if let Some((path, len)) = written {
                text.push_str(&format!("\nWrote {} to {}\n", format_size(len), path.display()));
            }
            Ok(text)
        }
    }
}

#[cfg(test)]
#[path = "show_tests.rs"]
mod tests;
