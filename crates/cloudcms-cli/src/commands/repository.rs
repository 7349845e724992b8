//! Repository subcommands.

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};

use super::{Context, PageArgs, parse_object, parse_object_or_empty};
use crate::output;

#[derive(Args, Debug)]
pub struct RepositoryCommand {
    #[command(subcommand)]
    pub command: RepositorySubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RepositorySubcommand {
    /// List repositories, optionally filtered by a query
    List {
        /// Query as JSON (default: all repositories)
        #[arg(long)]
        query: Option<String>,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Read a repository
    Read {
        /// Repository ID
        repository: String,
    },

    /// Create a repository
    Create {
        /// Repository properties as JSON, or @file
        #[arg(long)]
        data: Option<String>,
    },

    /// Delete a repository
    Delete {
        /// Repository ID
        repository: String,
    },
}

pub async fn handle(ctx: &Context, cmd: RepositoryCommand) -> Result<()> {
    let session = ctx.session().await?;

    match cmd.command {
        RepositorySubcommand::List { query, page } => {
            let query = parse_object_or_empty(query.as_deref())?;
            let listing = session
                .query_repositories(&query, page.pagination()?.as_ref())
                .await
                .context("Failed to query repositories")?;
            output::listing(&listing, page.envelope)
        }
        RepositorySubcommand::Read { repository } => {
            let repository = session
                .read_repository(&repository)
                .await
                .context("Failed to read repository")?;
            output::json_pretty(&repository)
        }
        RepositorySubcommand::Create { data } => {
            let obj = data.as_deref().map(parse_object).transpose()?;
            let repository = session
                .create_repository(obj.as_ref())
                .await
                .context("Failed to create repository")?;
            if let Some(id) = repository.id() {
                output::success(&format!("Created repository {id}"));
            }
            output::json_pretty(&repository)
        }
        RepositorySubcommand::Delete { repository } => {
            session
                .delete_repository(&repository)
                .await
                .context("Failed to delete repository")?;
            output::success(&format!("Deleted repository {repository}"));
            Ok(())
        }
    }
}
