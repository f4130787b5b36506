// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use super::*;

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(args)
}

#[test]
fn test_show_default() {
    let cli = parse(&["pinbox", "show", "pending_1_abc"]).unwrap();
    match cli.command {
        Command::Show { id, output, out } => {
            assert_eq!(id, "pending_1_abc");
            assert_eq!(output, OutputFormat::Text);
            assert!(out.is_none());
        }
        other => panic!("Expected Show command, got {:?}", other),
    }
}

#[test]
fn test_show_with_out_file() {
    let cli = parse(&["pinbox", "show", "pending_1_abc", "--out", "photo.jpg", "-o", "json"]).unwrap();
    match cli.command {
        Command::Show { out, output, .. } => {
            assert_eq!(out, Some(PathBuf::from("photo.jpg")));
            assert_eq!(output, OutputFormat::Json);
        }
        other => panic!("Expected Show command, got {:?}", other),
    }
}

#[test]
fn test_show_requires_id() {
    assert!(parse(&["pinbox", "show"]).is_err());
}
