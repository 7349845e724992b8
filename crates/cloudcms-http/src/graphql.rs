//! GraphQL endpoints.

use tracing::instrument;

use cloudcms_core::error::InvalidInputError;
use cloudcms_core::{JsonObject, QueryParams, Result};

use crate::{CloudCmsSession, paths};

impl CloudCmsSession {
    /// Run a GraphQL query against a branch.
    #[instrument(skip(self, query, variables))]
    pub async fn graphql_query(
        &self,
        repository_id: &str,
        branch_id: &str,
        query: &str,
        operation_name: Option<&str>,
        variables: Option<&JsonObject>,
    ) -> Result<JsonObject> {
        let path = format!("{}/graphql", paths::branch(repository_id, branch_id));
        let mut params = QueryParams::new().with("query", query);
        params.add_opt("operationName", operation_name);
        if let Some(variables) = variables {
            let encoded = serde_json::to_string(variables).map_err(|e| InvalidInputError::Other {
                message: format!("unencodable GraphQL variables: {e}"),
            })?;
            params.add("variables", encoded);
        }
        self.get(&path, params).await
    }

    /// Returns the branch's GraphQL schema in SDL form.
    #[instrument(skip(self))]
    pub async fn graphql_schema(&self, repository_id: &str, branch_id: &str) -> Result<String> {
        let path = format!("{}/graphql/schema", paths::branch(repository_id, branch_id));
        self.download_text(&path, QueryParams::new()).await
    }
}
