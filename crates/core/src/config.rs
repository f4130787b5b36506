// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queue configuration.
//!
//! Configuration is stored in `pinbox.toml` inside the data directory. Every
//! key is optional; a missing file means all defaults.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::id::validate_key;
use crate::network::{MonitorConfig, TcpProbe, RECOVERY_POLL_INTERVAL_MS};

const CONFIG_FILE_NAME: &str = "pinbox.toml";
const DATA_DIR_NAME: &str = "pinbox";

/// Which storage backends to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformChoice {
    /// Pick from the build target.
    #[default]
    Auto,
    /// Blob files plus a JSON metadata file.
    Native,
    /// Object store and key/value table in one database.
    Browser,
}

impl fmt::Display for PlatformChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlatformChoice::Auto => "auto",
            PlatformChoice::Native => "native",
            PlatformChoice::Browser => "browser",
        })
    }
}

impl FromStr for PlatformChoice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(PlatformChoice::Auto),
            "native" => Ok(PlatformChoice::Native),
            "browser" => Ok(PlatformChoice::Browser),
            other => Err(Error::Config(format!(
                "unknown platform '{}': expected auto, native, or browser",
                other
            ))),
        }
    }
}

/// Configuration stored in `pinbox.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub platform: PlatformChoice,
    /// Delay before retrying a failed connectivity watch (milliseconds).
    #[serde(default = "default_recovery_poll_interval_ms")]
    pub recovery_poll_interval_ms: u64,
    /// Directory under the data dir holding one file per blob.
    #[serde(default = "default_blob_dir")]
    pub blob_dir: String,
    /// JSON file under the data dir holding the pending list.
    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,
    /// SQLite file under the data dir for the object store backend.
    #[serde(default = "default_object_store_file")]
    pub object_store_file: String,
    /// Optional TCP reachability probe used as the connectivity source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe: Option<ProbeConfig>,
}

/// TCP reachability probe settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// `host:port` to connect to.
    pub address: String,
    /// Connect timeout in milliseconds (default: 2000).
    #[serde(default = "default_probe_timeout_ms")]
    pub timeout_ms: u64,
    /// Interval between probes in milliseconds (default: 5000).
    #[serde(default = "default_probe_interval_ms")]
    pub interval_ms: u64,
}

impl ProbeConfig {
    pub fn new(address: impl Into<String>) -> Self {
        ProbeConfig {
            address: address.into(),
            timeout_ms: default_probe_timeout_ms(),
            interval_ms: default_probe_interval_ms(),
        }
    }

    pub fn probe(&self) -> TcpProbe {
        TcpProbe::new(
            self.address.clone(),
            Duration::from_millis(self.timeout_ms),
            Duration::from_millis(self.interval_ms),
        )
    }
}

fn default_recovery_poll_interval_ms() -> u64 {
    RECOVERY_POLL_INTERVAL_MS
}

fn default_blob_dir() -> String {
    "pending_blobs".to_string()
}

fn default_metadata_file() -> String {
    "pending_mutations.json".to_string()
}

fn default_object_store_file() -> String {
    "pinbox.sqlite3".to_string()
}

fn default_probe_timeout_ms() -> u64 {
    2_000
}

fn default_probe_interval_ms() -> u64 {
    5_000
}

impl Default for Config {
    fn default() -> Self {
        Config {
            platform: PlatformChoice::default(),
            recovery_poll_interval_ms: default_recovery_poll_interval_ms(),
            blob_dir: default_blob_dir(),
            metadata_file: default_metadata_file(),
            object_store_file: default_object_store_file(),
            probe: None,
        }
    }
}

impl Config {
    /// Loads configuration from the data directory, falling back to defaults
    /// when no config file exists.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let config_path = config_path(data_dir);
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        Self::parse(&content)
    }

    /// Parses and validates configuration text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the data directory.
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::create_dir_all(data_dir)?;
        fs::write(config_path(data_dir), content)?;
        Ok(())
    }

    /// Checks values that would otherwise fail later at open time.
    pub fn validate(&self) -> Result<()> {
        if self.recovery_poll_interval_ms == 0 {
            return Err(Error::Config(
                "recovery_poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        for (field, value) in [
            ("blob_dir", &self.blob_dir),
            ("metadata_file", &self.metadata_file),
            ("object_store_file", &self.object_store_file),
        ] {
            if !validate_key(value) {
                return Err(Error::Config(format!(
                    "{} '{}' must be a plain file name",
                    field, value
                )));
            }
        }
        if let Some(probe) = &self.probe {
            if probe.address.trim().is_empty() {
                return Err(Error::Config("probe.address must not be empty".to_string()));
            }
            if probe.interval_ms == 0 {
                return Err(Error::Config(
                    "probe.interval_ms must be greater than zero".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Settings for the network monitor's recovery poll.
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            recovery_poll_interval: Duration::from_millis(self.recovery_poll_interval_ms),
        }
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))
    }
}

/// Path of the config file inside a data directory.
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE_NAME)
}

/// Per-user data directory, used when no other location is given.
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join(DATA_DIR_NAME))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
