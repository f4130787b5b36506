// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Replaying queued mutations against the remote service.
//!
//! The queue does not talk to the remote service itself. A [`SyncDriver`]
//! applies one hydrated mutation; [`replay_pending`] walks the queue once,
//! and [`ReplayTrigger`] runs a pass every time connectivity comes back.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::mutation::PendingMutation;
use crate::network::Subscription;
use crate::queue::MutationQueue;

/// Error returned by a sync driver.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The remote service refused the mutation.
    #[error("rejected by remote: {0}")]
    Rejected(String),

    /// The remote service could not be reached.
    #[error("remote unavailable: {0}")]
    Unavailable(String),
}

/// Boxed future returned by [`SyncDriver::apply`].
pub type SyncFuture<'a> = Pin<Box<dyn Future<Output = std::result::Result<(), SyncError>> + Send + 'a>>;

/// Applies a hydrated mutation to the remote service.
///
/// Retrying the remote call is up to the driver. A failed mutation stays
/// queued and is offered again on the next pass.
pub trait SyncDriver: Send + Sync {
    fn apply<'a>(&'a self, mutation: &'a PendingMutation) -> SyncFuture<'a>;
}

/// Outcome of one replay pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Applied remotely and removed from the queue.
    pub applied: usize,
    /// Rejected or unreachable; still queued.
    pub failed: usize,
    /// Dropped because the payload could not be read back.
    pub discarded: usize,
}

/// Replay every queued mutation once, in queue order.
///
/// Stops early if connectivity is lost mid-pass. A pass started while
/// another is running waits for it and then sees only what is left.
pub async fn replay_pending(queue: &MutationQueue, driver: &dyn SyncDriver) -> Result<ReplaySummary> {
    let _pass = queue.replay_guard().await;
    let mut summary = ReplaySummary::default();

    for pending in queue.list().await {
        if !queue.network().is_online() {
            tracing::debug!("offline, stopping replay");
            break;
        }

        let Some(mutation) = queue.hydrate(&pending.id).await? else {
            summary.discarded += 1;
            continue;
        };

        match driver.apply(&mutation).await {
            Ok(()) => {
                queue.remove(&mutation.id).await?;
                summary.applied += 1;
            }
            Err(e) => {
                tracing::warn!(id = %mutation.id, error = %e, "replay failed, keeping mutation");
                summary.failed += 1;
            }
        }
    }

    tracing::info!(
        applied = summary.applied,
        failed = summary.failed,
        discarded = summary.discarded,
        "replay pass finished"
    );
    Ok(summary)
}

/// Runs a replay pass whenever the network comes back online.
pub struct ReplayTrigger {
    cancel_token: CancellationToken,
    handle: Option<JoinHandle<()>>,
    _subscription: Subscription,
}

impl ReplayTrigger {
    /// Subscribe to the queue's network monitor and start the replay task.
    ///
    /// If the network is already online a first pass runs immediately.
    /// Must be called from within a tokio runtime.
    pub fn spawn(queue: Arc<MutationQueue>, driver: Arc<dyn SyncDriver>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        // Subscribe before sampling so a transition in between is not lost.
        let listener_tx = tx.clone();
        let subscription = queue.network().subscribe(move |state| {
            if state.is_online {
                let _ = listener_tx.send(());
            }
        });
        if queue.network().is_online() {
            let _ = tx.send(());
        }

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(run_replays(queue, driver, rx, cancel_token.clone()));

        ReplayTrigger {
            cancel_token,
            handle: Some(handle),
            _subscription: subscription,
        }
    }

    /// Stop the replay task, waiting for an in-flight pass to finish.
    pub async fn shutdown(mut self) {
        self.cancel_token.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for ReplayTrigger {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

async fn run_replays(
    queue: Arc<MutationQueue>,
    driver: Arc<dyn SyncDriver>,
    mut rx: mpsc::UnboundedReceiver<()>,
    cancel_token: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => break,
            signal = rx.recv() => {
                if signal.is_none() {
                    break;
                }
            }
        }
        // Coalesce a burst of reconnects into one pass.
        while rx.try_recv().is_ok() {}

        match replay_pending(&queue, driver.as_ref()).await {
            Ok(_) => {}
            Err(Error::Closed) => break,
            Err(e) => tracing::warn!(error = %e, "replay pass failed"),
        }
    }
    tracing::debug!("replay trigger stopped");
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
