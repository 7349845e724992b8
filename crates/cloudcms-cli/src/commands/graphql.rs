//! GraphQL subcommands.

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};

use super::{BranchRef, Context, parse_object};
use crate::output;

#[derive(Args, Debug)]
pub struct GraphqlCommand {
    #[command(flatten)]
    pub target: BranchRef,

    #[command(subcommand)]
    pub command: GraphqlSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum GraphqlSubcommand {
    /// Run a query
    Query {
        /// GraphQL query text, or @file
        query: String,

        /// Operation to run when the document defines several
        #[arg(long)]
        operation: Option<String>,

        /// Variables as JSON, or @file
        #[arg(long)]
        variables: Option<String>,
    },

    /// Print the branch schema (SDL)
    Schema,
}

pub async fn handle(ctx: &Context, cmd: GraphqlCommand) -> Result<()> {
    let BranchRef { repository, branch } = cmd.target;

    match cmd.command {
        GraphqlSubcommand::Query {
            query,
            operation,
            variables,
        } => {
            let query = match query.strip_prefix('@') {
                Some(path) => std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {path}"))?,
                None => query,
            };
            let variables = variables.as_deref().map(parse_object).transpose()?;

            let session = ctx.session().await?;
            let result = session
                .graphql_query(
                    &repository,
                    &branch,
                    &query,
                    operation.as_deref(),
                    variables.as_ref(),
                )
                .await
                .context("GraphQL query failed")?;
            output::json_pretty(&result)
        }
        GraphqlSubcommand::Schema => {
            let session = ctx.session().await?;
            let schema = session
                .graphql_schema(&repository, &branch)
                .await
                .context("Failed to fetch schema")?;
            print!("{schema}");
            Ok(())
        }
    }
}
