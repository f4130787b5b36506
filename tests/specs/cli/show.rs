// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for the `pinbox show` and `pinbox remove` commands.

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

fn attach(temp: &TempDir, data: &[u8]) -> String {
    let photo = temp.path().join("photo.jpg");
    std::fs::write(&photo, data).unwrap();
    let output = pinbox(temp)
        .args(["enqueue", "attach", "loc-1", "--caption", "north wall", "-f"])
        .arg(&photo)
        .output()
        .unwrap();
    assert!(output.status.success());
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[test]
fn show_prints_details() {
    let temp = TempDir::new().unwrap();
    let id = attach(&temp, b"abc");

    pinbox(&temp)
        .args(["show", id.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("[attach_to_entity] {}", id)))
        .stdout(predicate::str::contains("Caption: north wall"))
        .stdout(predicate::str::contains("Type: image/jpeg"));
}

#[test]
fn show_json_carries_inline_bytes() {
    let temp = TempDir::new().unwrap();
    let id = attach(&temp, b"abc");

    let output = pinbox(&temp).args(["show", id.as_str(), "-o", "json"]).output().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(value["id"], id.as_str());
    assert_eq!(value["draftAttachment"]["payload"]["inline"], "YWJj");
}

#[test]
fn show_out_writes_payload() {
    let temp = TempDir::new().unwrap();
    let id = attach(&temp, b"photo bytes");
    let out = temp.path().join("copy.jpg");

    pinbox(&temp)
        .args(["show", id.as_str(), "--out"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 11 bytes"));
    assert_eq!(std::fs::read(out).unwrap(), b"photo bytes");
}

#[test]
fn show_unknown_id_fails_with_hint() {
    let temp = TempDir::new().unwrap();
    pinbox(&temp)
        .args(["show", "pending_1_abcdefghi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pending mutation not found"))
        .stderr(predicate::str::contains("hint: run 'pinbox list'"));
}

#[test]
fn show_drops_mutation_with_missing_blob() {
    let temp = TempDir::new().unwrap();
    let id = attach(&temp, b"abc");
    std::fs::remove_file(temp.path().join("pending_blobs").join(&id)).unwrap();

    pinbox(&temp).args(["show", id.as_str()]).assert().failure();
    pinbox(&temp)
        .arg("list")
        .assert()
        .success()
        .stdout("No pending mutations\n");
}

#[test]
fn remove_deletes_mutation_and_blob() {
    let temp = TempDir::new().unwrap();
    let id = attach(&temp, b"abc");

    pinbox(&temp)
        .args(["remove", id.as_str()])
        .assert()
        .success()
        .stdout(format!("Removed {}\n", id));
    assert!(!temp.path().join("pending_blobs").join(&id).exists());

    pinbox(&temp)
        .args(["remove", id.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to remove"));
}

#[test]
fn reconcile_removes_orphans() {
    let temp = TempDir::new().unwrap();
    let id = attach(&temp, b"abc");
    std::fs::write(temp.path().join("pending_blobs").join("stray"), b"old").unwrap();
    std::fs::write(temp.path().join("pending_mutations.json"), "[]").unwrap();

    // Opening the queue reconciles, so both blobs are already gone.
    pinbox(&temp)
        .arg("reconcile")
        .assert()
        .success()
        .stdout("Removed 0 orphaned blobs\n");
    assert!(!temp.path().join("pending_blobs").join(&id).exists());
    assert!(!temp.path().join("pending_blobs").join("stray").exists());
}
