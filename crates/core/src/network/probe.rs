// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! TCP reachability probe for native platforms without a connectivity API.

use std::io::ErrorKind;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::sync::mpsc;

use super::{ConnectivitySource, NetworkError, NetworkFuture, NetworkResult};

/// Treats the network as online when a TCP connection to `address` succeeds.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    address: String,
    timeout: Duration,
    interval: Duration,
}

impl TcpProbe {
    pub fn new(address: impl Into<String>, timeout: Duration, interval: Duration) -> Self {
        TcpProbe {
            address: address.into(),
            timeout,
            interval,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Attempt one connection.
    pub async fn probe(&self) -> NetworkResult<bool> {
        match tokio::time::timeout(self.timeout, TcpStream::connect(&self.address)).await {
            Ok(Ok(_stream)) => Ok(true),
            Ok(Err(e)) if e.kind() == ErrorKind::PermissionDenied => {
                Err(NetworkError::PermissionDenied(e.to_string()))
            }
            Ok(Err(e)) => {
                tracing::debug!(address = %self.address, error = %e, "probe failed");
                Ok(false)
            }
            Err(_) => {
                tracing::debug!(address = %self.address, "probe timed out");
                Ok(false)
            }
        }
    }
}

impl ConnectivitySource for TcpProbe {
    fn status(&self) -> NetworkFuture<'_, bool> {
        Box::pin(self.probe())
    }

    /// Spawns a task probing every `interval` until the receiver is dropped.
    fn watch(&self) -> NetworkResult<mpsc::UnboundedReceiver<bool>> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| NetworkError::Unavailable(e.to_string()))?;

        let (tx, rx) = mpsc::unbounded_channel();
        let probe = self.clone();
        runtime.spawn(async move {
            loop {
                tokio::select! {
                    _ = tx.closed() => return,
                    _ = tokio::time::sleep(probe.interval) => {}
                }
                let online = match probe.probe().await {
                    Ok(online) => online,
                    Err(e) => {
                        tracing::warn!(error = %e, "probe watch stopped");
                        return;
                    }
                };
                if tx.send(online).is_err() {
                    return;
                }
            }
        });
        Ok(rx)
    }
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod tests;
