//! Node endpoints.

use std::collections::BTreeMap;

use reqwest::Method;
use serde_json::{Value, json};
use tracing::instrument;

use cloudcms_core::error::ProtocolError;
use cloudcms_core::json::type_name;
use cloudcms_core::{Error, JsonObject, QueryParams, Result, ResultMap};

use crate::{CloudCmsSession, paths};

/// Placement options for [`CloudCmsSession::create_node`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateNodeOptions {
    pub root_node_id: Option<String>,
    pub parent_folder_path: Option<String>,
    pub file_path: Option<String>,
    pub file_name: Option<String>,
    /// Association type linking the new node to its parent folder.
    pub association_type: Option<String>,
}

impl CreateNodeOptions {
    fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.add_opt("rootNodeId", self.root_node_id.as_deref());
        params.add_opt("parentFolderPath", self.parent_folder_path.as_deref());
        params.add_opt("filePath", self.file_path.as_deref());
        params.add_opt("fileName", self.file_name.as_deref());
        params.add_opt("associationTypeString", self.association_type.as_deref());
        params
    }
}

/// Options for [`CloudCmsSession::node_tree`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeOptions {
    /// Expand the tree down to this path.
    pub leaf: Option<String>,
    /// Path the tree is rooted at.
    pub base: Option<String>,
    /// Only include container nodes.
    pub containers: Option<bool>,
    /// Include node properties.
    pub properties: Option<bool>,
    pub depth: Option<u32>,
    /// Query restricting the nodes included.
    pub query: Option<JsonObject>,
    /// Full-text search restricting the nodes included.
    pub search: Option<Value>,
}

impl TreeOptions {
    fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.add_opt("leaf", self.leaf.as_deref());
        params.add_opt("base", self.base.as_deref());
        if let Some(containers) = self.containers {
            params.add("containers", containers.to_string());
        }
        if let Some(properties) = self.properties {
            params.add("properties", properties.to_string());
        }
        if let Some(depth) = self.depth {
            params.add("depth", depth.to_string());
        }
        params
    }

    fn to_body(&self) -> JsonObject {
        let mut body = JsonObject::new();
        if let Some(query) = &self.query {
            body.insert("query".to_string(), query.clone().into());
        }
        if let Some(search) = &self.search {
            body.insert("search".to_string(), search.clone());
        }
        body
    }
}

impl CloudCmsSession {
    #[instrument(skip(self))]
    pub async fn read_node(&self, repository_id: &str, branch_id: &str, node_id: &str) -> Result<JsonObject> {
        self.get(&paths::node(repository_id, branch_id, node_id), QueryParams::new())
            .await
    }

    /// Create a node. Returns the new node's id.
    #[instrument(skip(self, obj))]
    pub async fn create_node(
        &self,
        repository_id: &str,
        branch_id: &str,
        obj: &JsonObject,
        options: &CreateNodeOptions,
    ) -> Result<String> {
        self.start(
            "create_node",
            &paths::nodes(repository_id, branch_id),
            options.to_params(),
            Some(obj),
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_node(&self, repository_id: &str, branch_id: &str, node_id: &str) -> Result<()> {
        self.delete(&paths::node(repository_id, branch_id, node_id), QueryParams::new())
            .await?;
        Ok(())
    }

    /// Delete several nodes in one call. Returns the ids the server deleted.
    #[instrument(skip(self, node_ids), fields(count = node_ids.len()))]
    pub async fn delete_nodes(
        &self,
        repository_id: &str,
        branch_id: &str,
        node_ids: &[&str],
    ) -> Result<Vec<String>> {
        let path = format!("{}/delete", paths::nodes(repository_id, branch_id));
        let body = JsonObject::try_from(json!({ "_docs": node_ids }))?;
        let response = self.post(&path, QueryParams::new(), Some(&body)).await?;

        let Some(docs) = response.get_array("_docs") else {
            return Ok(Vec::new());
        };
        docs.iter()
            .map(|doc| {
                doc.as_str().map(str::to_string).ok_or_else(|| {
                    Error::from(ProtocolError::UnexpectedField {
                        field: "_docs".to_string(),
                        reason: format!("element is {}, expected string", type_name(doc)),
                    })
                })
            })
            .collect()
    }

    /// Write `node` back to the server. The node must carry its `_doc`.
    #[instrument(skip(self, node))]
    pub async fn update_node(&self, repository_id: &str, branch_id: &str, node: &JsonObject) -> Result<JsonObject> {
        let node_id = node.require_id("node")?;
        self.put(
            &paths::node(repository_id, branch_id, node_id),
            QueryParams::new(),
            Some(node),
        )
        .await
    }

    /// Apply a JSON patch document to a node.
    #[instrument(skip(self, patch))]
    pub async fn patch_node(
        &self,
        repository_id: &str,
        branch_id: &str,
        node_id: &str,
        patch: &JsonObject,
    ) -> Result<JsonObject> {
        self.patch(
            &paths::node(repository_id, branch_id, node_id),
            QueryParams::new(),
            Some(patch),
        )
        .await
    }

    /// Ask the server to recompute a node's derived state. The node must
    /// carry its `_doc`.
    #[instrument(skip(self, node))]
    pub async fn refresh_node(&self, repository_id: &str, branch_id: &str, node: &JsonObject) -> Result<()> {
        let node_id = node.require_id("node")?;
        let path = format!("{}/refresh", paths::node(repository_id, branch_id, node_id));
        self.post(&path, QueryParams::new(), Some(node)).await?;
        Ok(())
    }

    #[instrument(skip(self, query, pagination))]
    pub async fn query_nodes(
        &self,
        repository_id: &str,
        branch_id: &str,
        query: &JsonObject,
        pagination: Option<&JsonObject>,
    ) -> Result<ResultMap> {
        let path = format!("{}/query", paths::nodes(repository_id, branch_id));
        self.listing(
            Method::POST,
            &path,
            QueryParams::from_optional([pagination]),
            Some(query),
        )
        .await
    }

    /// Returns the first node matching `query`, if any.
    pub async fn query_one_node(
        &self,
        repository_id: &str,
        branch_id: &str,
        query: &JsonObject,
    ) -> Result<Option<JsonObject>> {
        let pagination = JsonObject::try_from(json!({ "limit": 1 }))?;
        let listing = self
            .query_nodes(repository_id, branch_id, query, Some(&pagination))
            .await?;
        Ok(listing.into_iter().next())
    }

    /// Full-text search.
    #[instrument(skip(self, pagination))]
    pub async fn search_nodes(
        &self,
        repository_id: &str,
        branch_id: &str,
        text: &str,
        pagination: Option<&JsonObject>,
    ) -> Result<ResultMap> {
        let path = format!("{}/search", paths::nodes(repository_id, branch_id));
        let mut params = QueryParams::from_optional([pagination]);
        params.add("text", text);
        self.listing(Method::GET, &path, params, None).await
    }

    /// Combined query, search and traversal lookup.
    #[instrument(skip(self, config, pagination))]
    pub async fn find_nodes(
        &self,
        repository_id: &str,
        branch_id: &str,
        config: &JsonObject,
        pagination: Option<&JsonObject>,
    ) -> Result<ResultMap> {
        let path = format!("{}/find", paths::nodes(repository_id, branch_id));
        self.listing(
            Method::POST,
            &path,
            QueryParams::from_optional([pagination]),
            Some(config),
        )
        .await
    }

    #[instrument(skip(self, config))]
    pub async fn add_node_feature(
        &self,
        repository_id: &str,
        branch_id: &str,
        node_id: &str,
        feature_id: &str,
        config: Option<&JsonObject>,
    ) -> Result<()> {
        let path = paths::feature(repository_id, branch_id, node_id, feature_id);
        let empty = JsonObject::new();
        self.post(&path, QueryParams::new(), Some(config.unwrap_or(&empty)))
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn remove_node_feature(
        &self,
        repository_id: &str,
        branch_id: &str,
        node_id: &str,
        feature_id: &str,
    ) -> Result<()> {
        let path = paths::feature(repository_id, branch_id, node_id, feature_id);
        self.delete(&path, QueryParams::new()).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn change_node_qname(
        &self,
        repository_id: &str,
        branch_id: &str,
        node_id: &str,
        qname: &str,
    ) -> Result<()> {
        let path = format!("{}/change_qname", paths::node(repository_id, branch_id, node_id));
        self.post(&path, QueryParams::new().with("qname", qname), None)
            .await?;
        Ok(())
    }

    /// Read the folder tree below a node.
    #[instrument(skip(self, options))]
    pub async fn node_tree(
        &self,
        repository_id: &str,
        branch_id: &str,
        node_id: &str,
        options: &TreeOptions,
    ) -> Result<JsonObject> {
        let path = format!("{}/tree", paths::node(repository_id, branch_id, node_id));
        self.post(&path, options.to_params(), Some(&options.to_body()))
            .await
    }

    /// Returns the node's primary path.
    #[instrument(skip(self))]
    pub async fn resolve_node_path(
        &self,
        repository_id: &str,
        branch_id: &str,
        node_id: &str,
    ) -> Result<String> {
        let path = format!("{}/path", paths::node(repository_id, branch_id, node_id));
        let response = self.get(&path, QueryParams::new()).await?;
        match response.get("path") {
            Some(Value::String(p)) => Ok(p.clone()),
            Some(other) => Err(ProtocolError::UnexpectedField {
                field: "path".to_string(),
                reason: format!("is {}, expected string", type_name(other)),
            }
            .into()),
            None => Err(ProtocolError::UnexpectedField {
                field: "path".to_string(),
                reason: "is missing".to_string(),
            }
            .into()),
        }
    }

    /// Returns every path of the node, keyed by root node id.
    #[instrument(skip(self))]
    pub async fn resolve_node_paths(
        &self,
        repository_id: &str,
        branch_id: &str,
        node_id: &str,
    ) -> Result<BTreeMap<String, String>> {
        let path = format!("{}/paths", paths::node(repository_id, branch_id, node_id));
        let response = self.get(&path, QueryParams::new()).await?;
        let paths = response
            .get_object("paths")
            .unwrap_or_default()
            .into_map()
            .into_iter()
            .map(|(root, value)| {
                let value = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (root, value)
            })
            .collect();
        Ok(paths)
    }

    /// Run a graph traversal starting at a node.
    #[instrument(skip(self, config))]
    pub async fn traverse_node(
        &self,
        repository_id: &str,
        branch_id: &str,
        node_id: &str,
        config: &JsonObject,
    ) -> Result<JsonObject> {
        let path = format!("{}/traverse", paths::node(repository_id, branch_id, node_id));
        let mut body = JsonObject::new();
        body.insert("traverse".to_string(), config.clone().into());
        self.post(&path, QueryParams::new(), Some(&body)).await
    }
}
