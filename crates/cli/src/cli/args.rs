// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared argument structs for CLI commands.

use std::path::PathBuf;

use clap::Args;

/// Photo arguments shared by the enqueue commands that carry a payload.
#[derive(Args, Clone, Debug)]
pub struct PhotoArgs {
    /// Photo file to queue
    #[arg(long, short = 'f', value_name = "FILE")]
    pub file: PathBuf,

    /// Id of the user taking the photo
    #[arg(long, default_value = "local")]
    pub user_id: String,

    /// Display name of the user taking the photo
    #[arg(long, default_value = "local")]
    pub user_name: String,

    /// Photo caption
    #[arg(long)]
    pub caption: Option<String>,

    /// MIME type (guessed from the file extension when omitted)
    #[arg(long)]
    pub content_type: Option<String>,
}
