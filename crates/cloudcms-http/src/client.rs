//! Request/response executor.

use std::sync::Arc;

use bytes::Bytes;
use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::{Method, RequestBuilder, Response, multipart};
use serde_json::Value;
use tracing::{debug, instrument, trace};

use cloudcms_core::error::{DecodeError, HttpError, TransportError};
use cloudcms_core::json::type_name;
use cloudcms_core::{AccessToken, BaseUrl, Error, JsonObject, QueryParams, RequestInfo, RequestObserver, Result};

use crate::stream::ByteStream;

/// HTTP client bound to one base URL.
///
/// Every exchange goes through [`HttpClient::execute`], so the observer sees
/// token grants as well as API calls.
#[derive(Clone)]
pub(crate) struct HttpClient {
    client: reqwest::Client,
    base: BaseUrl,
    observer: Arc<dyn RequestObserver>,
}

impl HttpClient {
    /// Create a new client for the given base URL.
    pub(crate) fn new(base: BaseUrl, observer: Arc<dyn RequestObserver>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("cloudcms-rust/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(transport_error)?;

        Ok(Self {
            client,
            base,
            observer,
        })
    }

    /// Returns the base URL this client is configured for.
    pub(crate) fn base(&self) -> &BaseUrl {
        &self.base
    }

    /// Send an authenticated request and decode the JSON object it returns.
    ///
    /// `full=true` and `metadata=true` are appended unless `params` already
    /// carries those keys.
    #[instrument(skip(self, params, body, token), fields(base = %self.base))]
    pub(crate) async fn request_json(
        &self,
        method: Method,
        path: &str,
        params: QueryParams,
        body: Option<&Value>,
        token: &AccessToken,
    ) -> Result<JsonObject> {
        let params = with_projection(params);
        debug!(%method, path, "API request");
        trace!(params = ?params.pairs(), "query parameters");

        let mut builder = self
            .client
            .request(method, self.base.endpoint(path))
            .query(params.pairs())
            .bearer_auth(token.as_str())
            .header(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = self.execute(builder).await?;
        let bytes = success_body(response).await?;
        decode_object(&bytes)
    }

    /// Send an authenticated GET and hand the body back as a stream.
    ///
    /// Only the caller's parameters are sent.
    #[instrument(skip(self, params, token), fields(base = %self.base))]
    pub(crate) async fn download(
        &self,
        path: &str,
        params: QueryParams,
        token: &AccessToken,
    ) -> Result<ByteStream> {
        debug!(path, "API download");

        let builder = self
            .client
            .get(self.base.endpoint(path))
            .query(params.pairs())
            .bearer_auth(token.as_str());

        let response = self.execute(builder).await?;
        let response = ensure_success(response).await?;
        Ok(ByteStream::from_response(response))
    }

    /// Send an authenticated multipart POST, draining the response.
    ///
    /// Only the caller's parameters are sent.
    #[instrument(skip(self, params, form, token), fields(base = %self.base))]
    pub(crate) async fn multipart(
        &self,
        path: &str,
        params: QueryParams,
        form: multipart::Form,
        token: &AccessToken,
    ) -> Result<()> {
        debug!(path, "API multipart upload");

        let builder = self
            .client
            .post(self.base.endpoint(path))
            .query(params.pairs())
            .bearer_auth(token.as_str())
            .multipart(form);

        let response = self.execute(builder).await?;
        success_body(response).await?;
        Ok(())
    }

    /// POST a form to the token endpoint, returning the status and raw body.
    ///
    /// No status check happens here; grant rejections are classified by the
    /// caller.
    pub(crate) async fn token_request(&self, form: &[(&str, &str)]) -> Result<(u16, Bytes)> {
        let builder = self
            .client
            .post(self.base.token_url())
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .form(form);

        let response = self.execute(builder).await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(transport_error)?;
        Ok((status, bytes))
    }

    /// Send a request, reporting it to the observer.
    async fn execute(&self, builder: RequestBuilder) -> Result<Response> {
        let request = builder.build().map_err(transport_error)?;
        let mut info = RequestInfo {
            method: request.method().to_string(),
            url: request.url().to_string(),
            version: None,
        };
        self.observer.on_request(&info);

        match self.client.execute(request).await {
            Ok(response) => {
                let status = response.status();
                info.version = Some(format!("{:?}", response.version()));
                trace!(status = %status, "API response");
                self.observer.on_response(&info, status.as_u16());
                Ok(response)
            }
            Err(err) => {
                let err = transport_error(err);
                self.observer.on_failure(&info, &err);
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

/// Append the projection flags the server needs to return whole documents.
pub(crate) fn with_projection(mut params: QueryParams) -> QueryParams {
    if !params.has("full") {
        params.add("full", "true");
    }
    if !params.has("metadata") {
        params.add("metadata", "true");
    }
    params
}

/// Classify a reqwest failure.
pub(crate) fn transport_error(err: reqwest::Error) -> Error {
    let message = err.to_string();
    let err = if err.is_timeout() {
        TransportError::Timeout { message }
    } else if err.is_connect() {
        TransportError::Connection { message }
    } else if err.is_body() || err.is_decode() {
        TransportError::Io { message }
    } else {
        TransportError::Http { message }
    };
    Error::Transport(err)
}

/// Fail with the full body text on a non-2xx status.
async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.map_err(|e| {
        debug!(status = status.as_u16(), error = %e, "failed to read API error body");
        transport_error(e)
    })?;
    debug!(status = status.as_u16(), "API error response");
    Err(HttpError::new(status.as_u16(), body).into())
}

/// Read a successful response to completion.
async fn success_body(response: Response) -> Result<Bytes> {
    let response = ensure_success(response).await?;
    response.bytes().await.map_err(transport_error)
}

/// Decode a response body as a JSON object. An empty body is an empty object.
pub(crate) fn decode_object(bytes: &[u8]) -> Result<JsonObject> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(JsonObject::new());
    }

    let malformed = |reason: String| -> Error {
        DecodeError::Json {
            reason,
            body: String::from_utf8_lossy(bytes).into_owned(),
        }
        .into()
    };

    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(JsonObject::from(map)),
        Ok(other) => Err(malformed(format!(
            "expected a JSON object, got {}",
            type_name(&other)
        ))),
        Err(e) => Err(malformed(e.to_string())),
    }
}

/// Decode a response body as UTF-8 text.
pub(crate) fn decode_text(bytes: Bytes) -> Result<String> {
    String::from_utf8(bytes.to_vec()).map_err(|e| {
        DecodeError::Utf8 {
            reason: e.to_string(),
        }
        .into()
    })
}
