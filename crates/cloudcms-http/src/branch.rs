//! Branch endpoints.

use reqwest::Method;
use tracing::instrument;

use cloudcms_core::{JsonObject, QueryParams, Result, ResultMap};

use crate::{CloudCmsSession, paths};

impl CloudCmsSession {
    #[instrument(skip(self, pagination))]
    pub async fn list_branches(
        &self,
        repository_id: &str,
        pagination: Option<&JsonObject>,
    ) -> Result<ResultMap> {
        let mut params = QueryParams::from_optional([pagination]);
        params.add("full", "true");
        self.listing(Method::GET, &paths::branches(repository_id), params, None)
            .await
    }

    #[instrument(skip(self, query, pagination))]
    pub async fn query_branches(
        &self,
        repository_id: &str,
        query: &JsonObject,
        pagination: Option<&JsonObject>,
    ) -> Result<ResultMap> {
        let path = format!("{}/query", paths::branches(repository_id));
        self.listing(
            Method::POST,
            &path,
            QueryParams::from_optional([pagination]),
            Some(query),
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn read_branch(&self, repository_id: &str, branch_id: &str) -> Result<JsonObject> {
        self.get(&paths::branch(repository_id, branch_id), QueryParams::new())
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_branch(&self, repository_id: &str, branch_id: &str) -> Result<()> {
        self.delete(&paths::branch(repository_id, branch_id), QueryParams::new())
            .await?;
        Ok(())
    }

    /// Create a branch, optionally rooted at `parent_branch_id` and
    /// `changeset_id`.
    #[instrument(skip(self, obj))]
    pub async fn create_branch(
        &self,
        repository_id: &str,
        parent_branch_id: Option<&str>,
        changeset_id: Option<&str>,
        obj: &JsonObject,
    ) -> Result<JsonObject> {
        let mut params = QueryParams::new();
        params.add_opt("changeset", changeset_id);
        params.add_opt("branch", parent_branch_id);
        self.post(&paths::branches(repository_id), params, Some(obj))
            .await
    }

    /// Write `branch` back to the server. The branch must carry its `_doc`.
    #[instrument(skip(self, branch))]
    pub async fn update_branch(&self, repository_id: &str, branch: &JsonObject) -> Result<JsonObject> {
        let branch_id = branch.require_id("branch")?;
        self.put(
            &paths::branch(repository_id, branch_id),
            QueryParams::new(),
            Some(branch),
        )
        .await
    }

    /// Start resetting a branch to `changeset_id`. Returns the job id.
    #[instrument(skip(self))]
    pub async fn start_reset_branch(
        &self,
        repository_id: &str,
        branch_id: &str,
        changeset_id: &str,
    ) -> Result<String> {
        let path = format!("{}/reset/start", paths::branch(repository_id, branch_id));
        self.start(
            "start_reset_branch",
            &path,
            QueryParams::new().with("id", changeset_id),
            None,
        )
        .await
    }

    /// Start computing a branch's changeset history. Returns the job id.
    #[instrument(skip(self, config))]
    pub async fn start_changeset_history(
        &self,
        repository_id: &str,
        branch_id: &str,
        config: Option<&JsonObject>,
    ) -> Result<String> {
        let path = format!("{}/history/start", paths::branch(repository_id, branch_id));
        self.start(
            "start_changeset_history",
            &path,
            QueryParams::from_optional([config]),
            None,
        )
        .await
    }
}
