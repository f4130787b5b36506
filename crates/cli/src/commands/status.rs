// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use pb_core::{MutationQueue, NetworkMonitor, ProbeConfig};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::context::Context;
use crate::error::Result;

/// Snapshot printed by `pinbox status`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub pending: usize,
    /// "online", "offline", or "unknown" when no probe is configured.
    pub network: &'static str,
    pub has_pending_work: bool,
    pub platform: &'static str,
    pub data_dir: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe: Option<String>,
}

pub async fn run(ctx: &Context, probe: Option<String>, output: OutputFormat) -> Result<()> {
    let probe = resolve_probe(ctx, probe);
    let network = match &probe {
        Some(config) => {
            tracing::debug!(address = %config.address, "probing connectivity");
            NetworkMonitor::start(Arc::new(config.probe()), ctx.config.monitor_config()).await
        }
        None => NetworkMonitor::new(false),
    };

    let queue = ctx.open_queue(Arc::new(network)).await?;
    let rendered = run_impl(ctx, &queue, probe.as_ref(), output).await;
    super::finish(queue, rendered).await
}

/// The `--probe` flag overrides the configured address but keeps its timings.
pub(crate) fn resolve_probe(ctx: &Context, flag: Option<String>) -> Option<ProbeConfig> {
    match (flag, &ctx.config.probe) {
        (Some(address), Some(configured)) => Some(ProbeConfig {
            address,
            ..configured.clone()
        }),
        (Some(address), None) => Some(ProbeConfig::new(address)),
        (None, configured) => configured.clone(),
    }
}

/// Internal implementation that accepts the queue for testing.
pub(crate) async fn run_impl(
    ctx: &Context,
    queue: &MutationQueue,
    probe: Option<&ProbeConfig>,
    output: OutputFormat,
) -> Result<String> {
    let network = match (probe, queue.network().is_online()) {
        (None, _) => "unknown",
        (Some(_), true) => "online",
        (Some(_), false) => "offline",
    };
    let report = StatusReport {
        pending: queue.len().await,
        network,
        has_pending_work: queue.has_pending_work().await,
        platform: ctx.platform.as_str(),
        data_dir: ctx.data_dir().display().to_string(),
        probe: probe.map(|p| p.address.clone()),
    };

    match output {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string(&report)?)),
        OutputFormat::Text => Ok(format_status(&report)),
    }
}

fn format_status(report: &StatusReport) -> String {
    let mut text = format!("pending: {}\n", report.pending);
    match &report.probe {
        Some(address) => text.push_str(&format!("network: {} (probe {})\n", report.network, address)),
        None => text.push_str(&format!("network: {}\n", report.network)),
    }
    text.push_str(&format!(
        "pending work: {}\n",
        if report.has_pending_work { "yes" } else { "no" }
    ));
    text.push_str(&format!("platform: {}\n", report.platform));
    text.push_str(&format!("data dir: {}\n", report.data_dir));
    text
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
