//! Project endpoints.

use tracing::instrument;

use cloudcms_core::{JsonObject, QueryParams, Result};

use crate::{CloudCmsSession, paths};

impl CloudCmsSession {
    #[instrument(skip(self))]
    pub async fn read_project(&self, project_id: &str) -> Result<JsonObject> {
        self.get(&paths::project(project_id), QueryParams::new()).await
    }

    /// Start creating a project. Returns the job id; see
    /// [`wait_for_job`](Self::wait_for_job).
    #[instrument(skip(self, obj))]
    pub async fn start_create_project(&self, obj: &JsonObject) -> Result<String> {
        self.start("start_create_project", "/projects/start", QueryParams::new(), Some(obj))
            .await
    }
}
