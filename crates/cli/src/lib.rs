// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! pbrs - command-line access to the pinbox offline mutation queue.
//!
//! This crate backs the `pinbox` binary. It resolves where the queue lives
//! ([`Context`]), parses commands ([`Cli`]), and runs each one against a
//! [`pb_core::MutationQueue`] opened for the duration of the command.
//!
//! ```rust,ignore
//! use clap::Parser;
//! use pbrs::Cli;
//!
//! let cli = Cli::parse_from(["pinbox", "--data-dir", "/tmp/pinbox", "list"]);
//! pbrs::run(cli)?;
//! ```

mod cli;
mod commands;
mod context;
mod display;

pub mod env;
pub mod error;

pub use cli::{Cli, Command, EnqueueCommand, OutputFormat, PhotoArgs, PlatformArg};
pub use context::Context;
pub use error::{Error, Result};

/// Run a parsed command line to completion on a current-thread runtime.
pub fn run(cli: Cli) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(Error::Runtime)?;
    runtime.block_on(run_async(cli))
}

/// Resolve the context for `cli` and dispatch its command.
pub async fn run_async(cli: Cli) -> Result<()> {
    let ctx = Context::resolve(cli.data_dir, cli.platform.map(Into::into))?;
    tracing::debug!(
        data_dir = %ctx.data_dir().display(),
        platform = ctx.platform.as_str(),
        "resolved context"
    );

    match cli.command {
        Command::List { output } => commands::list::run(&ctx, output).await,
        Command::Show { id, output, out } => {
            commands::show::run(&ctx, &id, output, out.as_deref()).await
        }
        Command::Remove { id } => commands::remove::run(&ctx, &id).await,
        Command::Enqueue(command) => commands::enqueue::run(&ctx, command).await,
        Command::Status { probe, output } => commands::status::run(&ctx, probe, output).await,
        Command::Reconcile => commands::reconcile::run(&ctx).await,
        Command::Config => commands::config::run(&ctx),
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
