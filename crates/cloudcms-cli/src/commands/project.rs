//! Project subcommands.

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use serde_json::json;

use super::{Context, WaitArgs, parse_object};
use crate::output;

#[derive(Args, Debug)]
pub struct ProjectCommand {
    #[command(subcommand)]
    pub command: ProjectSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProjectSubcommand {
    /// Read a project
    Read {
        /// Project ID
        project: String,
    },

    /// Start creating a project
    Create {
        /// Project properties as JSON, or @file
        #[arg(long)]
        data: String,

        /// Wait for the creation job and print the new project
        #[arg(long)]
        wait: bool,

        #[command(flatten)]
        poll: WaitArgs,
    },
}

pub async fn handle(ctx: &Context, cmd: ProjectCommand) -> Result<()> {
    let session = ctx.session().await?;

    match cmd.command {
        ProjectSubcommand::Read { project } => {
            let project = session
                .read_project(&project)
                .await
                .context("Failed to read project")?;
            output::json_pretty(&project)
        }
        ProjectSubcommand::Create { data, wait, poll } => {
            let obj = parse_object(&data)?;
            let job_id = session
                .start_create_project(&obj)
                .await
                .context("Failed to start project creation")?;
            output::field("Job", &job_id);

            if !wait {
                return output::json(&json!({ "job": job_id }));
            }

            let job = session
                .wait_for_job(&job_id, &poll.policy())
                .await
                .with_context(|| format!("Project creation job {job_id} did not finish"))?;
            let project_id = job
                .get_str("created-project-id")
                .context("Finished job does not name the created project")?;
            output::success(&format!("Created project {project_id}"));

            let project = session
                .read_project(project_id)
                .await
                .context("Failed to read project")?;
            output::json_pretty(&project)
        }
    }
}
