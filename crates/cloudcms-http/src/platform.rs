//! Platform endpoint.

use tracing::instrument;

use cloudcms_core::{JsonObject, QueryParams, Result};

use crate::CloudCmsSession;

impl CloudCmsSession {
    /// Read the platform document for the authenticated tenant.
    #[instrument(skip(self))]
    pub async fn read_platform(&self) -> Result<JsonObject> {
        self.get("/", QueryParams::new()).await
    }
}
