//! Attachment endpoints.

use reqwest::{Method, multipart};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, instrument};

use cloudcms_core::error::{InvalidInputError, TransportError};
use cloudcms_core::{QueryParams, Result, ResultMap};

use crate::stream::ByteStream;
use crate::{CloudCmsSession, paths};

/// Attachment id used when none is given.
pub const DEFAULT_ATTACHMENT: &str = "default";

impl CloudCmsSession {
    /// Upload `source` as an attachment of a node.
    ///
    /// `attachment_id` defaults to `default` and `filename` to the
    /// attachment id. The source is read fully into memory first.
    #[allow(clippy::too_many_arguments)]
    #[instrument(skip(self, source))]
    pub async fn upload_attachment<R>(
        &self,
        repository_id: &str,
        branch_id: &str,
        node_id: &str,
        attachment_id: Option<&str>,
        mut source: R,
        content_type: &str,
        filename: Option<&str>,
    ) -> Result<()>
    where
        R: AsyncRead + Unpin + Send,
    {
        let attachment_id = attachment_id.unwrap_or(DEFAULT_ATTACHMENT);
        let filename = filename.unwrap_or(attachment_id);

        let mut data = Vec::new();
        source
            .read_to_end(&mut data)
            .await
            .map_err(|e| TransportError::Io {
                message: e.to_string(),
            })?;
        debug!(bytes = data.len(), "read attachment source");

        let part = multipart::Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|e| InvalidInputError::ContentType {
                value: content_type.to_string(),
                reason: e.to_string(),
            })?;
        let form = multipart::Form::new().part(attachment_id.to_string(), part);

        self.upload(
            &paths::attachment(repository_id, branch_id, node_id, attachment_id),
            QueryParams::new(),
            form,
        )
        .await
    }

    /// Stream an attachment's bytes. `attachment_id` defaults to `default`.
    #[instrument(skip(self))]
    pub async fn download_attachment(
        &self,
        repository_id: &str,
        branch_id: &str,
        node_id: &str,
        attachment_id: Option<&str>,
    ) -> Result<ByteStream> {
        let attachment_id = attachment_id.unwrap_or(DEFAULT_ATTACHMENT);
        self.download(
            &paths::attachment(repository_id, branch_id, node_id, attachment_id),
            QueryParams::new(),
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn list_attachments(
        &self,
        repository_id: &str,
        branch_id: &str,
        node_id: &str,
    ) -> Result<ResultMap> {
        let path = format!("{}/attachments", paths::node(repository_id, branch_id, node_id));
        self.listing(Method::GET, &path, QueryParams::new(), None)
            .await
    }

    /// Delete an attachment. `attachment_id` defaults to `default`.
    #[instrument(skip(self))]
    pub async fn delete_attachment(
        &self,
        repository_id: &str,
        branch_id: &str,
        node_id: &str,
        attachment_id: Option<&str>,
    ) -> Result<()> {
        let attachment_id = attachment_id.unwrap_or(DEFAULT_ATTACHMENT);
        self.delete(
            &paths::attachment(repository_id, branch_id, node_id, attachment_id),
            QueryParams::new(),
        )
        .await?;
        Ok(())
    }
}
