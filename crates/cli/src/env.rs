// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All runtime environment variables used by the CLI are defined here
//! with typed accessor functions. The variable name constants are generated
//! by `build.rs` and live in the [`vars`] submodule.

use std::path::PathBuf;

/// Generated environment variable name constants.
pub mod vars {
    include!(concat!(env!("OUT_DIR"), "/env_vars.rs"));
}

/// Returns the value of `PINBOX_DATA_DIR` if set and non-empty.
pub fn data_dir() -> Option<PathBuf> {
    non_empty(vars::PINBOX_DATA_DIR).map(PathBuf::from)
}

/// Returns the value of `PINBOX_PLATFORM` if set and non-empty.
pub fn platform() -> Option<String> {
    non_empty(vars::PINBOX_PLATFORM)
}

/// Returns the value of `PINBOX_LOG` if set and non-empty.
pub fn log_filter() -> Option<String> {
    non_empty(vars::PINBOX_LOG)
}

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
