// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for the `pinbox list` command.

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

fn enqueue_delete(temp: &TempDir, attachment_id: &str) -> String {
    let output = pinbox(temp)
        .args(["enqueue", "delete", attachment_id, "loc-1"])
        .output()
        .unwrap();
    assert!(output.status.success());
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[test]
fn list_empty_queue() {
    let temp = TempDir::new().unwrap();
    pinbox(&temp)
        .arg("list")
        .assert()
        .success()
        .stdout("No pending mutations\n");
}

#[test]
fn list_shows_queued_in_order() {
    let temp = TempDir::new().unwrap();
    let first = enqueue_delete(&temp, "att-1");
    let second = enqueue_delete(&temp, "att-2");

    let output = pinbox(&temp).arg("list").output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();

    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with(&first));
    assert!(lines[0].contains("delete_attachment"));
    assert!(lines[1].starts_with(&second));
}

#[test]
fn list_json_is_array() {
    let temp = TempDir::new().unwrap();
    let id = enqueue_delete(&temp, "att-1");

    let output = pinbox(&temp).args(["list", "-o", "json"]).output().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    let items = value.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], id.as_str());
    assert_eq!(items[0]["kind"], "delete_attachment");
}

#[test]
fn list_removes_nothing() {
    let temp = TempDir::new().unwrap();
    enqueue_delete(&temp, "att-1");

    pinbox(&temp).arg("list").assert().success();
    pinbox(&temp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("att-1"));
}

#[test]
fn list_browser_platform_keeps_separate_queue() {
    let temp = TempDir::new().unwrap();
    enqueue_delete(&temp, "att-1");

    pinbox(&temp)
        .args(["--platform", "browser", "list"])
        .assert()
        .success()
        .stdout("No pending mutations\n");
    assert!(temp.path().join("pinbox.sqlite3").exists());
}
