//! Branch subcommands.

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};

use super::{Context, PageArgs, parse_object_or_empty};
use crate::output;

#[derive(Args, Debug)]
pub struct BranchCommand {
    #[command(subcommand)]
    pub command: BranchSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum BranchSubcommand {
    /// List the branches of a repository
    List {
        /// Repository ID
        #[arg(short, long)]
        repository: String,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Read a branch
    Read {
        /// Repository ID
        #[arg(short, long)]
        repository: String,

        /// Branch ID
        branch: String,
    },

    /// Create a branch
    Create {
        /// Repository ID
        #[arg(short, long)]
        repository: String,

        /// Branch to fork from
        #[arg(long)]
        parent: Option<String>,

        /// Changeset to root the branch at
        #[arg(long)]
        changeset: Option<String>,

        /// Branch properties as JSON, or @file
        #[arg(long)]
        data: Option<String>,
    },
}

pub async fn handle(ctx: &Context, cmd: BranchCommand) -> Result<()> {
    let session = ctx.session().await?;

    match cmd.command {
        BranchSubcommand::List { repository, page } => {
            let listing = session
                .list_branches(&repository, page.pagination()?.as_ref())
                .await
                .context("Failed to list branches")?;
            output::listing(&listing, page.envelope)
        }
        BranchSubcommand::Read { repository, branch } => {
            let branch = session
                .read_branch(&repository, &branch)
                .await
                .context("Failed to read branch")?;
            output::json_pretty(&branch)
        }
        BranchSubcommand::Create {
            repository,
            parent,
            changeset,
            data,
        } => {
            let obj = parse_object_or_empty(data.as_deref())?;
            let branch = session
                .create_branch(&repository, parent.as_deref(), changeset.as_deref(), &obj)
                .await
                .context("Failed to create branch")?;
            if let Some(id) = branch.id() {
                output::success(&format!("Created branch {id}"));
            }
            output::json_pretty(&branch)
        }
    }
}
