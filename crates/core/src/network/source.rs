// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity pushed by the embedding host.
//!
//! Hosts that receive platform callbacks (a native connectivity listener, or
//! browser `online`/`offline` events) forward each reading to
//! [`HostConnectivity::set_online`]. The monitor attaches to it like any
//! other [`ConnectivitySource`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc;

use super::{ConnectivitySource, NetworkFuture, NetworkResult};

/// Connectivity source fed by host callbacks.
pub struct HostConnectivity {
    online: AtomicBool,
    watchers: Mutex<Vec<mpsc::UnboundedSender<bool>>>,
}

impl HostConnectivity {
    pub fn new(initially_online: bool) -> Self {
        HostConnectivity {
            online: AtomicBool::new(initially_online),
            watchers: Mutex::new(Vec::new()),
        }
    }

    /// Record a reading and push it to every attached watch.
    ///
    /// Readings are forwarded as-is, including repeats.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Release);
        self.watchers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|tx| tx.send(online).is_ok());
    }

    /// Close every attached watch.
    pub fn close_watchers(&self) {
        self.watchers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl ConnectivitySource for HostConnectivity {
    fn status(&self) -> NetworkFuture<'_, bool> {
        let online = self.online.load(Ordering::Acquire);
        Box::pin(async move { Ok(online) })
    }

    fn watch(&self) -> NetworkResult<mpsc::UnboundedReceiver<bool>> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.watchers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        Ok(rx)
    }
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
