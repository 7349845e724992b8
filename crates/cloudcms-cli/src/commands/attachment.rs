//! Attachment subcommands.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use tokio::fs::File;
use tokio::io::stdout;

use cloudcms_http::DEFAULT_ATTACHMENT;

use super::{BranchRef, Context};
use crate::output;

#[derive(Args, Debug)]
pub struct AttachmentCommand {
    #[command(flatten)]
    pub target: BranchRef,

    #[command(subcommand)]
    pub command: AttachmentSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AttachmentSubcommand {
    /// Upload a file as a node attachment
    Upload {
        /// Node ID
        node: String,

        /// File to upload
        file: PathBuf,

        /// Attachment ID
        #[arg(long, default_value = DEFAULT_ATTACHMENT)]
        id: String,

        /// MIME type of the file
        #[arg(long, default_value = "application/octet-stream")]
        content_type: String,

        /// File name to record (defaults to the attachment ID)
        #[arg(long)]
        filename: Option<String>,
    },

    /// Download an attachment to a file or stdout
    Download {
        /// Node ID
        node: String,

        /// Attachment ID
        #[arg(long, default_value = DEFAULT_ATTACHMENT)]
        id: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List a node's attachments
    List {
        /// Node ID
        node: String,
    },

    /// Delete an attachment
    Delete {
        /// Node ID
        node: String,

        /// Attachment ID
        #[arg(long, default_value = DEFAULT_ATTACHMENT)]
        id: String,
    },
}

pub async fn handle(ctx: &Context, cmd: AttachmentCommand) -> Result<()> {
    let BranchRef { repository, branch } = cmd.target;
    let session = ctx.session().await?;

    match cmd.command {
        AttachmentSubcommand::Upload {
            node,
            file,
            id,
            content_type,
            filename,
        } => {
            let source = File::open(&file)
                .await
                .with_context(|| format!("Failed to open {}", file.display()))?;
            session
                .upload_attachment(
                    &repository,
                    &branch,
                    &node,
                    Some(id.as_str()),
                    source,
                    &content_type,
                    filename.as_deref(),
                )
                .await
                .context("Failed to upload attachment")?;
            output::success(&format!("Uploaded {} as {node}/{id}", file.display()));
            Ok(())
        }
        AttachmentSubcommand::Download {
            node,
            id,
            output: dest,
        } => {
            let stream = session
                .download_attachment(&repository, &branch, &node, Some(id.as_str()))
                .await
                .context("Failed to download attachment")?;

            match dest {
                Some(path) => {
                    let mut file = File::create(&path)
                        .await
                        .with_context(|| format!("Failed to create {}", path.display()))?;
                    let written = stream
                        .write_to(&mut file)
                        .await
                        .context("Failed to write attachment")?;
                    output::success(&format!("Wrote {written} bytes to {}", path.display()));
                }
                None => {
                    stream
                        .write_to(&mut stdout())
                        .await
                        .context("Failed to write attachment")?;
                }
            }
            Ok(())
        }
        AttachmentSubcommand::List { node } => {
            let listing = session
                .list_attachments(&repository, &branch, &node)
                .await
                .context("Failed to list attachments")?;
            output::listing(&listing, false)
        }
        AttachmentSubcommand::Delete { node, id } => {
            session
                .delete_attachment(&repository, &branch, &node, Some(id.as_str()))
                .await
                .context("Failed to delete attachment")?;
            output::success(&format!("Deleted attachment {node}/{id}"));
            Ok(())
        }
    }
}
