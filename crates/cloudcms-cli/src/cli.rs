//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{
    attachment::AttachmentCommand, branch::BranchCommand, graphql::GraphqlCommand,
    job::JobCommand, node::NodeCommand, platform::PlatformArgs, project::ProjectCommand,
    repository::RepositoryCommand,
};

/// Cloud CMS command-line client.
#[derive(Parser, Debug)]
#[command(name = "cloudcms")]
#[command(author, version = env!("CLOUDCMS_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Config file (defaults to gitana.json or cloudcms.json in the
    /// working directory)
    #[arg(long, global = true, env = "CLOUDCMS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the platform document
    Platform(PlatformArgs),

    /// Repository operations
    Repository(RepositoryCommand),

    /// Branch operations
    Branch(BranchCommand),

    /// Node (content item) operations
    Node(NodeCommand),

    /// Node attachment transfer
    Attachment(AttachmentCommand),

    /// Background job inspection
    Job(JobCommand),

    /// GraphQL queries against a branch
    Graphql(GraphqlCommand),

    /// Project operations
    Project(ProjectCommand),
}
