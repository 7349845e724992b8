//! Authenticated Cloud CMS session.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, multipart};
use serde_json::Value;
use tracing::{debug, info, instrument};

use cloudcms_core::error::ProtocolError;
use cloudcms_core::{
    BaseUrl, CloudcmsConfig, JobSource, JsonObject, NoopObserver, QueryParams, RequestObserver,
    Result, ResultMap, TokenState,
};

use crate::auth::Authenticator;
use crate::client::{HttpClient, decode_text};
use crate::observer::TracingObserver;
use crate::stream::ByteStream;

/// A connection to one Cloud CMS tenant.
///
/// Cheap to clone; clones share the HTTP connection pool and token state.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> cloudcms_core::Result<()> {
/// use cloudcms_http::CloudCmsSession;
///
/// let session = CloudCmsSession::connect_default().await?;
/// let platform = session.read_platform().await?;
/// println!("{:?}", platform.id());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CloudCmsSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    config: CloudcmsConfig,
    client: HttpClient,
    auth: Authenticator,
}

impl CloudCmsSession {
    /// Connect and run the password grant.
    ///
    /// Installs a [`TracingObserver`] when `config.debug` is set.
    pub async fn connect(config: CloudcmsConfig) -> Result<Self> {
        let observer: Arc<dyn RequestObserver> = if config.debug {
            Arc::new(TracingObserver::new())
        } else {
            Arc::new(NoopObserver)
        };
        Self::connect_with_observer(config, observer).await
    }

    /// Connect with a caller-supplied request observer.
    #[instrument(skip_all, fields(base_url = %config.base_url, username = %config.username))]
    pub async fn connect_with_observer(
        config: CloudcmsConfig,
        observer: Arc<dyn RequestObserver>,
    ) -> Result<Self> {
        let base = config.base_url()?;
        let client = HttpClient::new(base, observer)?;
        let auth = Authenticator::new(config.credentials());

        auth.access_token(&client).await?;
        info!("Connected");

        Ok(Self {
            inner: Arc::new(SessionInner {
                config,
                client,
                auth,
            }),
        })
    }

    /// Connect using the first config file found in the working directory.
    pub async fn connect_default() -> Result<Self> {
        Self::connect(CloudcmsConfig::load_default()?).await
    }

    /// Returns the configuration this session was created from.
    pub fn config(&self) -> &CloudcmsConfig {
        &self.inner.config
    }

    /// Returns the API base URL.
    pub fn base_url(&self) -> &BaseUrl {
        self.inner.client.base()
    }

    /// Renew the access token now, with the refresh grant when possible.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<()> {
        info!("Refreshing session");
        self.inner.auth.refresh(&self.inner.client).await
    }

    /// Snapshot of the token state.
    pub async fn token_state(&self) -> TokenState {
        self.inner.auth.state().await
    }

    /// Send a JSON request to an arbitrary API path.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        params: QueryParams,
        body: Option<&JsonObject>,
    ) -> Result<JsonObject> {
        let body = body.map(|b| Value::Object(b.clone().into_map()));
        self.send(method, path, params, body.as_ref()).await
    }

    /// GET an arbitrary API path.
    pub async fn get(&self, path: &str, params: QueryParams) -> Result<JsonObject> {
        self.send(Method::GET, path, params, None).await
    }

    /// DELETE an arbitrary API path.
    pub async fn delete(&self, path: &str, params: QueryParams) -> Result<JsonObject> {
        self.send(Method::DELETE, path, params, None).await
    }

    /// POST to an arbitrary API path.
    pub async fn post(
        &self,
        path: &str,
        params: QueryParams,
        body: Option<&JsonObject>,
    ) -> Result<JsonObject> {
        self.request(Method::POST, path, params, body).await
    }

    /// PUT to an arbitrary API path.
    pub async fn put(
        &self,
        path: &str,
        params: QueryParams,
        body: Option<&JsonObject>,
    ) -> Result<JsonObject> {
        self.request(Method::PUT, path, params, body).await
    }

    /// PATCH an arbitrary API path.
    pub async fn patch(
        &self,
        path: &str,
        params: QueryParams,
        body: Option<&JsonObject>,
    ) -> Result<JsonObject> {
        self.request(Method::PATCH, path, params, body).await
    }

    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        params: QueryParams,
        body: Option<&Value>,
    ) -> Result<JsonObject> {
        let token = self.inner.auth.access_token(&self.inner.client).await?;
        self.inner
            .client
            .request_json(method, path, params, body, &token)
            .await
    }

    /// Send a request and decode the listing envelope it returns.
    pub(crate) async fn listing(
        &self,
        method: Method,
        path: &str,
        params: QueryParams,
        body: Option<&JsonObject>,
    ) -> Result<ResultMap> {
        let response = self.request(method, path, params, body).await?;
        ResultMap::from_object(response)
    }

    /// Send a request whose response must carry a `_doc` identifier.
    pub(crate) async fn start(
        &self,
        operation: &'static str,
        path: &str,
        params: QueryParams,
        body: Option<&JsonObject>,
    ) -> Result<String> {
        let response = self.request(Method::POST, path, params, body).await?;
        let id = response
            .id()
            .ok_or(ProtocolError::MissingId { operation })?
            .to_string();
        debug!(operation, %id, "started");
        Ok(id)
    }

    pub(crate) async fn download(&self, path: &str, params: QueryParams) -> Result<ByteStream> {
        let token = self.inner.auth.access_token(&self.inner.client).await?;
        self.inner.client.download(path, params, &token).await
    }

    pub(crate) async fn download_text(&self, path: &str, params: QueryParams) -> Result<String> {
        let bytes = self.download(path, params).await?.into_bytes().await?;
        decode_text(bytes)
    }

    pub(crate) async fn upload(
        &self,
        path: &str,
        params: QueryParams,
        form: multipart::Form,
    ) -> Result<()> {
        let token = self.inner.auth.access_token(&self.inner.client).await?;
        self.inner.client.multipart(path, params, form, &token).await
    }
}

#[async_trait]
impl JobSource for CloudCmsSession {
    async fn read_job(&self, job_id: &str) -> Result<JsonObject> {
        CloudCmsSession::read_job(self, job_id).await
    }
}

impl std::fmt::Debug for CloudCmsSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudCmsSession")
            .field("base_url", self.inner.client.base())
            .field("auth", &self.inner.auth)
            .finish()
    }
}
