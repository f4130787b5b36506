// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for the `pinbox status` command.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn pinbox(temp: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("pinbox");
    cmd.arg("--data-dir")
        .arg(temp.path())
        .env_remove("PINBOX_PLATFORM")
        .env_remove("PINBOX_LOG");
    cmd
}

#[test]
fn status_empty_queue() {
    let temp = TempDir::new().unwrap();
    pinbox(&temp)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("pending: 0\n"))
        .stdout(predicate::str::contains("network: unknown\n"))
        .stdout(predicate::str::contains("pending work: no\n"));
}

#[test]
fn status_probe_reachable() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap().to_string();
    let temp = TempDir::new().unwrap();
    pinbox(&temp)
        .args(["enqueue", "delete", "att-1", "loc-1"])
        .assert()
        .success();

    pinbox(&temp)
        .args(["status", "--probe", address.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("pending: 1\n"))
        .stdout(predicate::str::contains("network: online"))
        .stdout(predicate::str::contains("pending work: yes\n"));
}

#[test]
fn status_probe_unreachable_json() {
    // Bind then drop to get a port nothing listens on.
    let address = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().to_string()
    };
    let temp = TempDir::new().unwrap();

    let output = pinbox(&temp)
        .args(["status", "--probe", address.as_str(), "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(value["network"], "offline");
    assert_eq!(value["hasPendingWork"], false);
    assert_eq!(value["probe"], address.as_str());
}

#[test]
fn status_rejects_empty_probe() {
    let temp = TempDir::new().unwrap();
    pinbox(&temp)
        .args(["status", "--probe", " "])
        .assert()
        .failure();
}
