//! Repository endpoints.

use reqwest::Method;
use tracing::instrument;

use cloudcms_core::{JsonObject, QueryParams, Result, ResultMap};

use crate::{CloudCmsSession, paths};

impl CloudCmsSession {
    /// Create a repository. `None` creates one with server defaults.
    #[instrument(skip(self, obj))]
    pub async fn create_repository(&self, obj: Option<&JsonObject>) -> Result<JsonObject> {
        let empty = JsonObject::new();
        self.post("/repositories", QueryParams::new(), Some(obj.unwrap_or(&empty)))
            .await
    }

    #[instrument(skip(self))]
    pub async fn read_repository(&self, repository_id: &str) -> Result<JsonObject> {
        self.get(&paths::repository(repository_id), QueryParams::new())
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_repository(&self, repository_id: &str) -> Result<()> {
        self.delete(&paths::repository(repository_id), QueryParams::new())
            .await?;
        Ok(())
    }

    /// Query repositories with a MongoDB-style query.
    #[instrument(skip(self, query, pagination))]
    pub async fn query_repositories(
        &self,
        query: &JsonObject,
        pagination: Option<&JsonObject>,
    ) -> Result<ResultMap> {
        self.listing(
            Method::POST,
            "/repositories/query",
            QueryParams::from_optional([pagination]),
            Some(query),
        )
        .await
    }
}
