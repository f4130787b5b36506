// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use tempfile::TempDir;
use yare::parameterized;

#[test]
fn missing_file_gives_defaults() {
    let temp = TempDir::new().unwrap();
    let config = Config::load(temp.path()).unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.platform, PlatformChoice::Auto);
    assert_eq!(config.recovery_poll_interval_ms, 1000);
    assert_eq!(config.blob_dir, "pending_blobs");
    assert_eq!(config.metadata_file, "pending_mutations.json");
    assert!(config.probe.is_none());
}

#[test]
fn empty_file_gives_defaults() {
    assert_eq!(Config::parse("").unwrap(), Config::default());
}

#[test]
fn parses_all_keys() {
    let config = Config::parse(
        r#"
platform = "browser"
recovery_poll_interval_ms = 250
blob_dir = "blobs"
metadata_file = "queue.json"
object_store_file = "store.db"

[probe]
address = "example.com:443"
timeout_ms = 100
"#,
    )
    .unwrap();

    assert_eq!(config.platform, PlatformChoice::Browser);
    assert_eq!(config.recovery_poll_interval_ms, 250);
    assert_eq!(config.blob_dir, "blobs");
    assert_eq!(config.metadata_file, "queue.json");
    assert_eq!(config.object_store_file, "store.db");
    let probe = config.probe.unwrap();
    assert_eq!(probe.address, "example.com:443");
    assert_eq!(probe.timeout_ms, 100);
    assert_eq!(probe.interval_ms, 5000);
}

#[parameterized(
    zero_poll = { "recovery_poll_interval_ms = 0" },
    nested_blob_dir = { "blob_dir = \"a/b\"" },
    parent_metadata = { "metadata_file = \"../queue.json\"" },
    unknown_platform = { "platform = \"android\"" },
    empty_probe = { "[probe]\naddress = \" \"" },
    zero_probe_interval = { "[probe]\naddress = \"h:1\"\ninterval_ms = 0" },
    not_toml = { "platform = " },
)]
fn rejects_invalid(text: &str) {
    let err = Config::parse(text).unwrap_err();
    assert!(matches!(err, Error::Config(_)), "{}", err);
}

#[test]
fn save_then_load() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("nested");
    let config = Config {
        platform: PlatformChoice::Native,
        probe: Some(ProbeConfig::new("10.0.0.1:80")),
        ..Config::default()
    };

    config.save(&dir).unwrap();

    assert!(config_path(&dir).exists());
    assert_eq!(Config::load(&dir).unwrap(), config);
}

#[test]
fn load_reports_parse_errors() {
    let temp = TempDir::new().unwrap();
    std::fs::write(config_path(temp.path()), "platform = 3").unwrap();

    let err = Config::load(temp.path()).unwrap_err();
    assert!(err.to_string().contains("failed to parse config"));
}

#[parameterized(
    auto = { "auto", PlatformChoice::Auto },
    native = { "native", PlatformChoice::Native },
    browser = { "Browser", PlatformChoice::Browser },
)]
fn platform_choice_parses(text: &str, expected: PlatformChoice) {
    assert_eq!(text.parse::<PlatformChoice>().unwrap(), expected);
}

#[test]
fn platform_choice_rejects_unknown() {
    assert!("ios".parse::<PlatformChoice>().is_err());
}

#[test]
fn monitor_config_uses_interval() {
    let config = Config {
        recovery_poll_interval_ms: 40,
        ..Config::default()
    };
    assert_eq!(
        config.monitor_config().recovery_poll_interval,
        Duration::from_millis(40)
    );
}

#[test]
fn probe_config_builds_probe() {
    let probe = ProbeConfig::new("localhost:9").probe();
    assert_eq!(probe.address(), "localhost:9");
}

#[test]
fn to_toml_omits_absent_probe() {
    let text = Config::default().to_toml().unwrap();
    assert!(text.contains("platform = \"auto\""));
    assert!(!text.contains("[probe]"));
}
