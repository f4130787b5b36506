// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for `pinbox config` and configuration precedence.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn pinbox() -> Command {
    let mut cmd = cargo_bin_cmd!("pinbox");
    cmd.env_remove("PINBOX_DATA_DIR")
        .env_remove("PINBOX_PLATFORM")
        .env_remove("PINBOX_LOG");
    cmd
}

#[test]
fn config_prints_defaults() {
    let temp = TempDir::new().unwrap();
    pinbox()
        .arg("--data-dir")
        .arg(temp.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("platform = \"auto\""))
        .stdout(predicate::str::contains("recovery_poll_interval_ms = 1000"))
        .stdout(predicate::str::contains("# platform: native"));
}

#[test]
fn config_file_is_read() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("pinbox.toml"),
        "platform = \"browser\"\n[probe]\naddress = \"example.com:443\"\n",
    )
    .unwrap();

    pinbox()
        .arg("--data-dir")
        .arg(temp.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("# platform: browser"))
        .stdout(predicate::str::contains("address = \"example.com:443\""));
}

#[test]
fn flag_beats_env_beats_file() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("pinbox.toml"), "platform = \"browser\"\n").unwrap();

    pinbox()
        .env("PINBOX_DATA_DIR", temp.path())
        .env("PINBOX_PLATFORM", "native")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("# platform: native"));

    pinbox()
        .env("PINBOX_DATA_DIR", temp.path())
        .env("PINBOX_PLATFORM", "native")
        .args(["--platform", "browser", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# platform: browser"));
}

#[test]
fn invalid_env_platform_fails() {
    let temp = TempDir::new().unwrap();
    pinbox()
        .env("PINBOX_PLATFORM", "android")
        .arg("--data-dir")
        .arg(temp.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown platform"));
}

#[test]
fn invalid_config_fails() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("pinbox.toml"), "blob_dir = \"../x\"\n").unwrap();

    pinbox()
        .arg("--data-dir")
        .arg(temp.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("blob_dir"));
}

#[test]
fn debug_logs_go_to_stderr() {
    let temp = TempDir::new().unwrap();
    pinbox()
        .env("PINBOX_LOG", "debug")
        .arg("--data-dir")
        .arg(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout("No pending mutations\n")
        .stderr(predicate::str::contains("resolved context"));
}
