// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// `pinbox` pointed at `temp`, isolated from the caller's environment.
pub fn pinbox(temp: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("pinbox");
    cmd.arg("--data-dir")
        .arg(temp.path())
        .env_remove("PINBOX_DATA_DIR")
        .env_remove("PINBOX_PLATFORM")
        .env_remove("PINBOX_LOG");
    cmd
}

/// Write `data` as a photo file inside `temp`.
pub fn write_photo(temp: &TempDir, name: &str, data: &[u8]) -> std::path::PathBuf {
    let path = temp.path().join(name);
    std::fs::write(&path, data).unwrap();
    path
}

/// Run an enqueue subcommand and return the printed id.
pub fn enqueue(temp: &TempDir, args: &[&str]) -> String {
    let output = pinbox(temp).arg("enqueue").args(args).output().unwrap();
    assert!(
        output.status.success(),
        "enqueue failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}
