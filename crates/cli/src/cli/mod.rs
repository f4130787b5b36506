// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use pb_core::PlatformChoice;

pub use args::PhotoArgs;

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

fn latitude(s: &str) -> Result<f64, String> {
    coordinate(s, 90.0)
}

fn longitude(s: &str) -> Result<f64, String> {
    coordinate(s, 180.0)
}

fn coordinate(s: &str, limit: f64) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if !value.is_finite() || value.abs() > limit {
        return Err(format!("must be between -{} and {}", limit, limit));
    }
    Ok(value)
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Storage platform selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PlatformArg {
    Auto,
    Native,
    Browser,
}

impl From<PlatformArg> for PlatformChoice {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Auto => PlatformChoice::Auto,
            PlatformArg::Native => PlatformChoice::Native,
            PlatformArg::Browser => PlatformChoice::Browser,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "pinbox")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect and manage the offline mutation queue")]
#[command(
    long_about = "Inspect and manage the offline mutation queue.\n\n\
    Changes made while offline are queued with their photos stored as blobs until they can be replayed."
)]
pub struct Cli {
    /// Data directory holding the queue (default: per-user data dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Storage platform to open
    #[arg(long, global = true, value_enum)]
    pub platform: Option<PlatformArg>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List pending mutations
    List {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Show a pending mutation with its payload
    #[command(arg_required_else_help = true)]
    Show {
        /// Mutation id
        id: String,

        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,

        /// Write the payload bytes to this file
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Remove a pending mutation and its payload
    #[command(arg_required_else_help = true)]
    Remove {
        /// Mutation id
        id: String,
    },

    /// Queue a change
    #[command(subcommand)]
    Enqueue(EnqueueCommand),

    /// Show queue size and connectivity
    Status {
        /// Probe this host:port to decide connectivity
        #[arg(long, value_name = "HOST:PORT", value_parser = non_empty_string)]
        probe: Option<String>,

        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Delete stored payloads no pending mutation refers to
    Reconcile,

    /// Print the effective configuration
    Config,
}

#[derive(Subcommand, Debug)]
pub enum EnqueueCommand {
    /// Queue a new location with its first photo
    #[command(arg_required_else_help = true)]
    Create {
        /// Location name
        #[arg(value_parser = non_empty_string)]
        name: String,

        /// Latitude in degrees
        #[arg(long, allow_negative_numbers = true, value_parser = latitude)]
        lat: f64,

        /// Longitude in degrees
        #[arg(long, allow_negative_numbers = true, value_parser = longitude)]
        lon: f64,

        /// Location description
        #[arg(long)]
        description: Option<String>,

        #[command(flatten)]
        photo: PhotoArgs,
    },

    /// Queue a photo for an existing location
    #[command(arg_required_else_help = true)]
    Attach {
        /// Location id
        #[arg(value_parser = non_empty_string)]
        entity_id: String,

        #[command(flatten)]
        photo: PhotoArgs,
    },

    /// Queue a replacement for an existing photo
    #[command(arg_required_else_help = true)]
    Replace {
        /// Photo id to replace
        #[arg(value_parser = non_empty_string)]
        attachment_id: String,

        /// Location the photo belongs to
        #[arg(value_parser = non_empty_string)]
        entity_id: String,

        #[command(flatten)]
        photo: PhotoArgs,
    },

    /// Queue the deletion of a photo
    #[command(arg_required_else_help = true)]
    Delete {
        /// Photo id
        #[arg(value_parser = non_empty_string)]
        attachment_id: String,

        /// Location the photo belongs to
        #[arg(value_parser = non_empty_string)]
        owner_id: String,
    },
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
