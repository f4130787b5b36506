// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for the `pinbox enqueue` commands.

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

fn write_photo(temp: &TempDir, name: &str, data: &[u8]) -> String {
    let path = temp.path().join(name);
    std::fs::write(&path, data).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn create_prints_id_and_stores_blob() {
    let temp = TempDir::new().unwrap();
    let photo = write_photo(&temp, "mill.jpg", b"0123456789");

    let output = pinbox(&temp)
        .args(["enqueue", "create", "Old Mill", "--lat", "53.3", "--lon", "-6.2"])
        .args(["--file", photo.as_str(), "--user-id", "u1", "--user-name", "Ada"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let id = String::from_utf8_lossy(&output.stdout).trim().to_string();
    assert!(id.starts_with("pending_"));
    let blob = temp.path().join("pending_blobs").join(&id);
    assert_eq!(std::fs::read(blob).unwrap(), b"0123456789");

    let metadata = std::fs::read_to_string(temp.path().join("pending_mutations.json")).unwrap();
    assert!(metadata.contains(&format!("native:{}", id)));
    assert!(!metadata.contains("inline"));
}

#[test]
fn attach_defaults_user() {
    let temp = TempDir::new().unwrap();
    let photo = write_photo(&temp, "a.png", b"png");

    pinbox(&temp)
        .args(["enqueue", "attach", "loc-1", "-f", photo.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("pending_"));

    pinbox(&temp)
        .args(["list", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"userId\":\"local\""));
}

#[test]
fn replace_requires_file() {
    let temp = TempDir::new().unwrap();
    pinbox(&temp)
        .args(["enqueue", "replace", "att-1", "loc-1"])
        .assert()
        .failure();
}

#[test]
fn missing_photo_file_fails() {
    let temp = TempDir::new().unwrap();
    pinbox(&temp)
        .args(["enqueue", "attach", "loc-1", "-f"])
        .arg(temp.path().join("nope.jpg"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));

    pinbox(&temp)
        .arg("list")
        .assert()
        .success()
        .stdout("No pending mutations\n");
}

#[test]
fn create_rejects_out_of_range_latitude() {
    let temp = TempDir::new().unwrap();
    let photo = write_photo(&temp, "a.jpg", b"x");
    pinbox(&temp)
        .args(["enqueue", "create", "Mill", "--lat", "91", "--lon", "0", "-f", photo.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between -90 and 90"));
}

#[test]
fn delete_needs_no_photo() {
    let temp = TempDir::new().unwrap();
    pinbox(&temp)
        .args(["enqueue", "delete", "att-1", "loc-1"])
        .assert()
        .success();
    assert!(std::fs::read_dir(temp.path().join("pending_blobs"))
        .unwrap()
        .next()
        .is_none());
}

#[test]
fn browser_platform_stores_in_database() {
    let temp = TempDir::new().unwrap();
    let photo = write_photo(&temp, "a.jpg", b"x");

    pinbox(&temp)
        .args(["--platform", "browser", "enqueue", "attach", "loc-1", "-f", photo.as_str()])
        .assert()
        .success();

    assert!(temp.path().join("pinbox.sqlite3").is_file());
    assert!(!temp.path().join("pending_mutations.json").exists());
    pinbox(&temp)
        .args(["--platform", "browser", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("attach_to_entity"));
}
