//! Node subcommands.

use anyhow::{Context as _, Result, bail};
use clap::{Args, Subcommand};

use cloudcms_http::CreateNodeOptions;

use super::{BranchRef, Context, PageArgs, parse_object, parse_object_or_empty};
use crate::output;

#[derive(Args, Debug)]
pub struct NodeCommand {
    #[command(flatten)]
    pub target: BranchRef,

    #[command(subcommand)]
    pub command: NodeSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum NodeSubcommand {
    /// Read a node by ID
    Read {
        /// Node ID
        node: String,
    },

    /// Print a node's folder path
    Path {
        /// Node ID
        node: String,

        /// Print every path, keyed by root node ID
        #[arg(long)]
        all: bool,
    },

    /// Create a node and print its ID
    Create {
        /// Node properties as JSON, or @file
        #[arg(long)]
        data: String,

        /// Folder to create the node in
        #[arg(long)]
        parent_folder_path: Option<String>,

        /// Full path for the new node
        #[arg(long)]
        file_path: Option<String>,

        /// File name within the parent folder
        #[arg(long)]
        file_name: Option<String>,

        /// Root node the paths are relative to
        #[arg(long)]
        root_node_id: Option<String>,

        /// Association type linking the node to its folder
        #[arg(long)]
        association_type: Option<String>,
    },

    /// Query nodes with a MongoDB-style query
    Query {
        /// Query as JSON, or @file (default: all nodes)
        query: Option<String>,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Full-text search
    Search {
        /// Search text
        text: String,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Delete one or more nodes
    Delete {
        /// Node IDs
        #[arg(required = true)]
        nodes: Vec<String>,
    },
}

pub async fn handle(ctx: &Context, cmd: NodeCommand) -> Result<()> {
    let BranchRef { repository, branch } = cmd.target;
    let session = ctx.session().await?;

    match cmd.command {
        NodeSubcommand::Read { node } => {
            let node = session
                .read_node(&repository, &branch, &node)
                .await
                .context("Failed to read node")?;
            output::json_pretty(&node)
        }
        NodeSubcommand::Path { node, all: false } => {
            let path = session
                .resolve_node_path(&repository, &branch, &node)
                .await
                .context("Failed to resolve node path")?;
            output::json(&path)
        }
        NodeSubcommand::Path { node, all: true } => {
            let paths = session
                .resolve_node_paths(&repository, &branch, &node)
                .await
                .context("Failed to resolve node paths")?;
            output::json_pretty(&paths)
        }
        NodeSubcommand::Create {
            data,
            parent_folder_path,
            file_path,
            file_name,
            root_node_id,
            association_type,
        } => {
            let obj = parse_object(&data)?;
            let options = CreateNodeOptions {
                root_node_id,
                parent_folder_path,
                file_path,
                file_name,
                association_type,
            };
            let id = session
                .create_node(&repository, &branch, &obj, &options)
                .await
                .context("Failed to create node")?;
            output::success(&format!("Created node {id}"));
            output::json(&serde_json::json!({ "_doc": id }))
        }
        NodeSubcommand::Query { query, page } => {
            let query = parse_object_or_empty(query.as_deref())?;
            let listing = session
                .query_nodes(&repository, &branch, &query, page.pagination()?.as_ref())
                .await
                .context("Failed to query nodes")?;
            output::listing(&listing, page.envelope)
        }
        NodeSubcommand::Search { text, page } => {
            let listing = session
                .search_nodes(&repository, &branch, &text, page.pagination()?.as_ref())
                .await
                .context("Failed to search nodes")?;
            output::listing(&listing, page.envelope)
        }
        NodeSubcommand::Delete { nodes } => match nodes.as_slice() {
            [] => bail!("No node IDs given"),
            [node] => {
                session
                    .delete_node(&repository, &branch, node)
                    .await
                    .context("Failed to delete node")?;
                output::success(&format!("Deleted node {node}"));
                Ok(())
            }
            many => {
                let ids: Vec<&str> = many.iter().map(String::as_str).collect();
                let deleted = session
                    .delete_nodes(&repository, &branch, &ids)
                    .await
                    .context("Failed to delete nodes")?;
                output::success(&format!("Deleted {} nodes", deleted.len()));
                output::json(&deleted)
            }
        },
    }
}
