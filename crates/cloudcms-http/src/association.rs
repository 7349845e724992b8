//! Association endpoints.

use reqwest::Method;
use tracing::instrument;

use cloudcms_core::{Direction, Directionality, JsonObject, QueryParams, Result, ResultMap};

use crate::{CloudCmsSession, paths};

/// The parent/child association type.
pub const CHILD_ASSOCIATION: &str = "a:child";

impl CloudCmsSession {
    /// Query the nodes related to `node_id` through `association_type`.
    #[allow(clippy::too_many_arguments)]
    #[instrument(skip(self, query, pagination))]
    pub async fn query_node_relatives(
        &self,
        repository_id: &str,
        branch_id: &str,
        node_id: &str,
        association_type: &str,
        direction: Direction,
        query: &JsonObject,
        pagination: Option<&JsonObject>,
    ) -> Result<ResultMap> {
        let path = format!("{}/relatives/query", paths::node(repository_id, branch_id, node_id));
        let mut params = QueryParams::from_optional([pagination]);
        params.add("type", association_type);
        params.add("direction", direction.as_str());
        self.listing(Method::POST, &path, params, Some(query)).await
    }

    /// Query the children of a folder node.
    pub async fn query_node_children(
        &self,
        repository_id: &str,
        branch_id: &str,
        node_id: &str,
        query: &JsonObject,
        pagination: Option<&JsonObject>,
    ) -> Result<ResultMap> {
        self.query_node_relatives(
            repository_id,
            branch_id,
            node_id,
            CHILD_ASSOCIATION,
            Direction::Outgoing,
            query,
            pagination,
        )
        .await
    }

    /// List the associations attached to a node.
    #[instrument(skip(self, pagination))]
    pub async fn list_node_associations(
        &self,
        repository_id: &str,
        branch_id: &str,
        node_id: &str,
        association_type: Option<&str>,
        direction: Option<Direction>,
        pagination: Option<&JsonObject>,
    ) -> Result<ResultMap> {
        let path = format!("{}/associations", paths::node(repository_id, branch_id, node_id));
        let mut params = QueryParams::from_optional([pagination]);
        params.add_opt("type", association_type);
        params.add_opt("direction", direction.map(|d| d.as_str()));
        self.listing(Method::GET, &path, params, None).await
    }

    pub async fn list_outgoing_associations(
        &self,
        repository_id: &str,
        branch_id: &str,
        node_id: &str,
        association_type: Option<&str>,
        pagination: Option<&JsonObject>,
    ) -> Result<ResultMap> {
        self.list_node_associations(
            repository_id,
            branch_id,
            node_id,
            association_type,
            Some(Direction::Outgoing),
            pagination,
        )
        .await
    }

    pub async fn list_incoming_associations(
        &self,
        repository_id: &str,
        branch_id: &str,
        node_id: &str,
        association_type: Option<&str>,
        pagination: Option<&JsonObject>,
    ) -> Result<ResultMap> {
        self.list_node_associations(
            repository_id,
            branch_id,
            node_id,
            association_type,
            Some(Direction::Incoming),
            pagination,
        )
        .await
    }

    /// Associate `node_id` with `other_node_id`. Returns the association.
    #[allow(clippy::too_many_arguments)]
    #[instrument(skip(self, obj))]
    pub async fn associate(
        &self,
        repository_id: &str,
        branch_id: &str,
        node_id: &str,
        other_node_id: &str,
        association_type: Option<&str>,
        directionality: Option<Directionality>,
        obj: Option<&JsonObject>,
    ) -> Result<JsonObject> {
        let path = format!("{}/associate", paths::node(repository_id, branch_id, node_id));
        let params = association_params(other_node_id, association_type, directionality);
        let empty = JsonObject::new();
        self.post(&path, params, Some(obj.unwrap_or(&empty))).await
    }

    /// Remove the association between `node_id` and `other_node_id`.
    #[instrument(skip(self))]
    pub async fn unassociate(
        &self,
        repository_id: &str,
        branch_id: &str,
        node_id: &str,
        other_node_id: &str,
        association_type: Option<&str>,
        directionality: Option<Directionality>,
    ) -> Result<()> {
        let path = format!("{}/unassociate", paths::node(repository_id, branch_id, node_id));
        let params = association_params(other_node_id, association_type, directionality);
        self.post(&path, params, Some(&JsonObject::new())).await?;
        Ok(())
    }

    /// Make `child_node_id` a child of the folder `node_id`.
    pub async fn associate_child(
        &self,
        repository_id: &str,
        branch_id: &str,
        node_id: &str,
        child_node_id: &str,
        obj: Option<&JsonObject>,
    ) -> Result<JsonObject> {
        self.associate(
            repository_id,
            branch_id,
            node_id,
            child_node_id,
            Some(CHILD_ASSOCIATION),
            Some(Directionality::Directed),
            obj,
        )
        .await
    }

    pub async fn unassociate_child(
        &self,
        repository_id: &str,
        branch_id: &str,
        node_id: &str,
        child_node_id: &str,
    ) -> Result<()> {
        self.unassociate(
            repository_id,
            branch_id,
            node_id,
            child_node_id,
            Some(CHILD_ASSOCIATION),
            Some(Directionality::Directed),
        )
        .await
    }
}

fn association_params(
    other_node_id: &str,
    association_type: Option<&str>,
    directionality: Option<Directionality>,
) -> QueryParams {
    let mut params = QueryParams::new().with("node", other_node_id);
    params.add_opt("type", association_type);
    params.add_opt("directionality", directionality.map(|d| d.as_str()));
    params
}
