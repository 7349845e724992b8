//! Job source trait.

use async_trait::async_trait;

use crate::{JsonObject, Result};

/// Anything that can read a job document by id.
///
/// The session implements this; tests substitute scripted sources.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Read the current job document.
    async fn read_job(&self, job_id: &str) -> Result<JsonObject>;
}
