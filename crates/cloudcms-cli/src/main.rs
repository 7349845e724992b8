//! cloudcms - command-line access to a Cloud CMS tenant.
//!
//! A thin wrapper over `cloudcms-http`: every subcommand connects with the
//! discovered (or `--config`) credentials, makes one API call and prints the
//! JSON result on stdout.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{
    Context, attachment, branch, graphql, job, node, platform, project, repository,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let ctx = Context::new(cli.config);
    match cli.command {
        Commands::Platform(args) => platform::run(&ctx, args).await,
        Commands::Repository(cmd) => repository::handle(&ctx, cmd).await,
        Commands::Branch(cmd) => branch::handle(&ctx, cmd).await,
        Commands::Node(cmd) => node::handle(&ctx, cmd).await,
        Commands::Attachment(cmd) => attachment::handle(&ctx, cmd).await,
        Commands::Job(cmd) => job::handle(&ctx, cmd).await,
        Commands::Graphql(cmd) => graphql::handle(&ctx, cmd).await,
        Commands::Project(cmd) => project::handle(&ctx, cmd).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs share stderr with status lines so stdout stays pure JSON.
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
