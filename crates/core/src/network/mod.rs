// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity monitoring.
//!
//! The [`NetworkMonitor`] owns the process-wide online/offline flag. It is
//! fed by a [`ConnectivitySource`]: a push-based watch when the platform
//! provides one, and a recovery poll that keeps retrying the watch when it
//! fails to attach or is closed underneath us.
//!
//! ```text
//! ┌──────────────┐ watch  ┌──────────────┐ change only ┌─────────────┐
//! │ Connectivity │───────►│   Network    │────────────►│ Subscribers │
//! │    Source    │◄───────│   Monitor    │             └─────────────┘
//! └──────────────┘ retry  └──────────────┘
//!                  (recovery poll)
//! ```
//!
//! Subscribers hear about a transition only when the flag actually flips, so
//! a platform repeating "online" never produces duplicate notifications.

mod probe;
mod source;

use std::collections::VecDeque;
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub use probe::TcpProbe;
pub use source::HostConnectivity;

/// Default interval between attempts to re-attach a failed watch.
pub const RECOVERY_POLL_INTERVAL_MS: u64 = 1000;

/// Error type for connectivity sources.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// The platform refused access to connectivity information.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The platform connectivity API is not available right now.
    #[error("connectivity unavailable: {0}")]
    Unavailable(String),

    /// The connectivity watch was closed.
    #[error("connectivity watch closed")]
    Closed,
}

/// Result type for connectivity operations.
pub type NetworkResult<T> = Result<T, NetworkError>;

/// Boxed future returned by connectivity sources.
pub type NetworkFuture<'a, T> = Pin<Box<dyn Future<Output = NetworkResult<T>> + Send + 'a>>;

/// Online/offline state delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkState {
    pub is_online: bool,
}

/// Platform connectivity API.
pub trait ConnectivitySource: Send + Sync {
    /// Query the current connectivity.
    fn status(&self) -> NetworkFuture<'_, bool>;

    /// Attach a push-based watch.
    ///
    /// Each received value is the platform's latest connectivity reading;
    /// repeated values are allowed. The watch ends when the channel closes.
    fn watch(&self) -> NetworkResult<mpsc::UnboundedReceiver<bool>>;
}

/// Configuration for the network monitor.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Delay between attempts to re-attach the connectivity watch.
    pub recovery_poll_interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            recovery_poll_interval: Duration::from_millis(RECOVERY_POLL_INTERVAL_MS),
        }
    }
}

type Listener = Arc<dyn Fn(NetworkState) + Send + Sync>;

/// State shared between the monitor, its background task, and subscriptions.
struct Shared {
    online: AtomicBool,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_listener_id: AtomicU64,
    delivery: Mutex<Delivery>,
}

/// Transitions waiting to reach listeners, in the order the flag flipped.
#[derive(Default)]
struct Delivery {
    queue: VecDeque<NetworkState>,
    draining: bool,
}

impl Shared {
    /// Record a reading. Returns true if the state changed.
    ///
    /// Transitions are delivered one at a time in flip order. A report made
    /// while another caller is delivering (including from inside a listener)
    /// is queued and delivered by that caller.
    fn report(&self, online: bool) -> bool {
        let mut delivery = self.delivery.lock().unwrap_or_else(PoisonError::into_inner);
        if self.online.swap(online, Ordering::AcqRel) == online {
            return false;
        }

        if online {
            tracing::info!("network online");
        } else {
            tracing::info!("network offline");
        }
        delivery.queue.push_back(NetworkState { is_online: online });
        if delivery.draining {
            return true;
        }

        delivery.draining = true;
        while let Some(state) = delivery.queue.pop_front() {
            drop(delivery);
            self.notify(state);
            delivery = self.delivery.lock().unwrap_or_else(PoisonError::into_inner);
        }
        delivery.draining = false;
        true
    }

    fn notify(&self, state: NetworkState) {
        // Snapshot so listeners may subscribe or unsubscribe while being notified
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            if catch_unwind(AssertUnwindSafe(|| listener(state))).is_err() {
                tracing::error!(online = state.is_online, "network listener panicked");
            }
        }
    }

    fn remove_listener(&self, id: u64) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(listener_id, _)| *listener_id != id);
    }

    async fn refresh(&self, source: &dyn ConnectivitySource) {
        match source.status().await {
            Ok(online) => {
                self.report(online);
            }
            Err(NetworkError::PermissionDenied(reason)) => {
                tracing::warn!(%reason, "permission denied reading connectivity");
            }
            Err(e) => {
                tracing::debug!(error = %e, "connectivity status unavailable");
            }
        }
    }
}

/// Handle returned by [`NetworkMonitor::subscribe`].
///
/// The listener stays registered until this handle is dropped or
/// [`unsubscribe`](Subscription::unsubscribe) is called.
#[must_use = "dropping a Subscription unsubscribes the listener"]
pub struct Subscription {
    shared: Weak<Shared>,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.remove_listener(self.id);
        }
    }
}

/// Process-wide connectivity state with change notifications.
pub struct NetworkMonitor {
    shared: Arc<Shared>,
    cancel_token: CancellationToken,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl NetworkMonitor {
    /// Create a monitor with no platform source attached.
    ///
    /// State changes only through [`report`](Self::report).
    pub fn new(initially_online: bool) -> Self {
        NetworkMonitor {
            shared: Arc::new(Shared {
                online: AtomicBool::new(initially_online),
                listeners: Mutex::new(Vec::new()),
                next_listener_id: AtomicU64::new(0),
                delivery: Mutex::new(Delivery::default()),
            }),
            cancel_token: CancellationToken::new(),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Create a monitor driven by `source`.
    ///
    /// The initial state is read from the source before returning. A
    /// background task then follows the source's watch, falling back to the
    /// recovery poll whenever the watch cannot be attached.
    pub async fn start(source: Arc<dyn ConnectivitySource>, config: MonitorConfig) -> Self {
        let monitor = Self::new(false);
        monitor.shared.refresh(source.as_ref()).await;

        let shared = Arc::clone(&monitor.shared);
        let cancel_token = monitor.cancel_token.clone();
        let handle = tokio::spawn(async move {
            supervise_watch(shared, source, config, cancel_token).await;
        });
        monitor
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handle);

        monitor
    }

    /// Check if currently online.
    pub fn is_online(&self) -> bool {
        self.shared.online.load(Ordering::Acquire)
    }

    /// Get the current state.
    pub fn state(&self) -> NetworkState {
        NetworkState {
            is_online: self.is_online(),
        }
    }

    /// Feed a connectivity reading from the host platform.
    ///
    /// Subscribers are notified only if the reading changes the state.
    /// Returns true if it did.
    pub fn report(&self, online: bool) -> bool {
        self.shared.report(online)
    }

    /// Register a listener for state changes.
    ///
    /// A panicking listener is logged and does not prevent the others from
    /// being notified.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(NetworkState) + Send + Sync + 'static,
    {
        let id = self.shared.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.shared
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));
        Subscription {
            shared: Arc::downgrade(&self.shared),
            id,
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.shared
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if [`shutdown`](Self::shutdown) has been called.
    pub fn is_shut_down(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Stop the watch and the recovery poll and wait for them to finish.
    pub async fn shutdown(&self) {
        self.cancel_token.cancel();
        let tasks: Vec<JoinHandle<()>> = self
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        for task in tasks {
            let _ = task.await;
        }
        tracing::debug!("network monitor stopped");
    }
}

impl Drop for NetworkMonitor {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

/// Follow the source's watch, re-attaching on the recovery poll interval.
async fn supervise_watch(
    shared: Arc<Shared>,
    source: Arc<dyn ConnectivitySource>,
    config: MonitorConfig,
    cancel_token: CancellationToken,
) {
    loop {
        if cancel_token.is_cancelled() {
            return;
        }

        match source.watch() {
            Ok(mut events) => {
                tracing::debug!("connectivity watch attached");
                loop {
                    tokio::select! {
                        _ = cancel_token.cancelled() => return,
                        event = events.recv() => match event {
                            Some(online) => {
                                shared.report(online);
                            }
                            None => {
                                tracing::warn!("connectivity watch closed, starting recovery poll");
                                break;
                            }
                        },
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to attach connectivity watch, will retry");
            }
        }

        tokio::select! {
            _ = cancel_token.cancelled() => return,
            _ = tokio::time::sleep(config.recovery_poll_interval) => {}
        }

        // Keep state current while the watch is down
        shared.refresh(source.as_ref()).await;
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
