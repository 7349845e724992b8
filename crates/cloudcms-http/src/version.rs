//! Node version endpoints.

use reqwest::Method;
use tracing::instrument;

use cloudcms_core::{JsonObject, QueryParams, Result, ResultMap};

use crate::{CloudCmsSession, paths};

impl CloudCmsSession {
    /// List the versions of a node, newest first.
    #[instrument(skip(self, options, pagination))]
    pub async fn list_versions(
        &self,
        repository_id: &str,
        branch_id: &str,
        node_id: &str,
        options: Option<&JsonObject>,
        pagination: Option<&JsonObject>,
    ) -> Result<ResultMap> {
        let path = format!("{}/versions", paths::node(repository_id, branch_id, node_id));
        self.listing(
            Method::GET,
            &path,
            QueryParams::from_optional([options, pagination]),
            None,
        )
        .await
    }

    /// Read a node as it was at `changeset_id`.
    #[instrument(skip(self, options))]
    pub async fn read_version(
        &self,
        repository_id: &str,
        branch_id: &str,
        node_id: &str,
        changeset_id: &str,
        options: Option<&JsonObject>,
    ) -> Result<JsonObject> {
        let path = paths::version(repository_id, branch_id, node_id, changeset_id);
        self.get(&path, QueryParams::from_optional([options])).await
    }

    /// Restore a node to its state at `changeset_id`.
    #[instrument(skip(self))]
    pub async fn restore_version(
        &self,
        repository_id: &str,
        branch_id: &str,
        node_id: &str,
        changeset_id: &str,
    ) -> Result<JsonObject> {
        let path = format!(
            "{}/restore",
            paths::version(repository_id, branch_id, node_id, changeset_id)
        );
        self.post(&path, QueryParams::new(), None).await
    }
}
