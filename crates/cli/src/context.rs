// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Resolves where the queue lives and how to open it.
//!
//! Precedence for each setting is command-line flag, then environment
//! variable, then `pinbox.toml`, then the built-in default.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use pb_core::config::default_data_dir;
use pb_core::{Config, MutationQueue, NetworkMonitor, Platform, PlatformChoice};

use crate::env;
use crate::error::{Error, Result};

/// Effective settings for one CLI invocation.
#[derive(Debug, Clone)]
pub struct Context {
    pub data_dir: PathBuf,
    pub config: Config,
    pub platform: Platform,
}

impl Context {
    /// Resolve from flags and the process environment.
    pub fn resolve(data_dir: Option<PathBuf>, platform: Option<PlatformChoice>) -> Result<Self> {
        Self::resolve_with(
            data_dir.or_else(env::data_dir).or_else(default_data_dir),
            platform,
            env::platform(),
        )
    }

    pub(crate) fn resolve_with(
        data_dir: Option<PathBuf>,
        flag_platform: Option<PlatformChoice>,
        env_platform: Option<String>,
    ) -> Result<Self> {
        let data_dir = data_dir.ok_or(Error::NoDataDir)?;
        let config = Config::load(&data_dir)?;

        let choice = match (flag_platform, env_platform) {
            (Some(choice), _) => choice,
            (None, Some(value)) => value.parse::<PlatformChoice>()?,
            (None, None) => config.platform,
        };

        Ok(Context {
            data_dir,
            config,
            platform: Platform::resolve(choice),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Open the queue with the given connectivity monitor.
    pub async fn open_queue(&self, network: Arc<NetworkMonitor>) -> Result<MutationQueue> {
        let queue = pb_core::open_queue(&self.data_dir, &self.config, self.platform, network).await?;
        Ok(queue)
    }

    /// Open the queue with a monitor that reports offline.
    ///
    /// Commands that only inspect or edit the queue never replay, so
    /// connectivity does not matter to them.
    pub async fn open_offline_queue(&self) -> Result<MutationQueue> {
        self.open_queue(Arc::new(NetworkMonitor::new(false))).await
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
