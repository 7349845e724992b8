//! Job subcommands.

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};

use cloudcms_core::JobState;

use super::{Context, WaitArgs};
use crate::output;

#[derive(Args, Debug)]
pub struct JobCommand {
    #[command(subcommand)]
    pub command: JobSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum JobSubcommand {
    /// Read a job document
    Read {
        /// Job ID
        job: String,
    },

    /// Wait for a job to finish and print its final document
    Wait {
        /// Job ID
        job: String,

        #[command(flatten)]
        wait: WaitArgs,
    },
}

pub async fn handle(ctx: &Context, cmd: JobCommand) -> Result<()> {
    let session = ctx.session().await?;

    match cmd.command {
        JobSubcommand::Read { job } => {
            let doc = session
                .read_job(&job)
                .await
                .context("Failed to read job")?;
            output::field("State", &format!("{:?}", JobState::from_job(&doc)));
            output::json_pretty(&doc)
        }
        JobSubcommand::Wait { job, wait } => {
            output::note(&format!("Waiting for job {job}..."));
            let doc = session
                .wait_for_job(&job, &wait.policy())
                .await
                .with_context(|| format!("Job {job} did not finish"))?;
            output::success(&format!("Job {job} finished"));
            output::json_pretty(&doc)
        }
    }
}
