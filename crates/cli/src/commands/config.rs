// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::context::Context;
use crate::error::Result;

pub fn run(ctx: &Context) -> Result<()> {
    print!("{}", run_impl(ctx)?);
    Ok(())
}

/// Effective configuration as TOML, headed by the resolved location.
pub(crate) fn run_impl(ctx: &Context) -> Result<String> {
    Ok(format!(
        "# data dir: {}\n# platform: {}\n{}",
        ctx.data_dir().display(),
        ctx.platform.as_str(),
        ctx.config.to_toml()?
    ))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
