//! Platform command implementation.

use anyhow::{Context as _, Result};
use clap::Args;

use super::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct PlatformArgs {
    /// Print compact JSON
    #[arg(long)]
    pub compact: bool,
}

pub async fn run(ctx: &Context, args: PlatformArgs) -> Result<()> {
    let session = ctx.session().await?;

    let platform = session
        .read_platform()
        .await
        .context("Failed to read platform")?;

    output::document(&platform, args.compact)
}
