//! Error types for the Cloud CMS client.
//!
//! A single [`Error`] enum with one variant per failure class, so callers can
//! tell configuration, authentication, transport, HTTP status, decoding and
//! precondition failures apart without string matching.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// The unified error type for Cloud CMS operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Local configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The token endpoint rejected the credentials or returned garbage.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with a status outside 200-299.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// A response body that should have been JSON was not.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A write was attempted on a document without a usable identifier.
    #[error("precondition failed: {0}")]
    Precondition(#[from] PreconditionError),

    /// The server response does not match the wire contract.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// An asynchronous server job failed or did not finish in time.
    #[error("job error: {0}")]
    Job(#[from] JobError),

    /// Caller-supplied input could not be used to build a request.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Returns the HTTP status code if this is an HTTP status error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http(err) => Some(err.status),
            _ => None,
        }
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// None of the conventional config files exist.
    #[error("could not locate any of {searched:?} in {}", .dir.display())]
    NotFound { dir: PathBuf, searched: Vec<String> },

    /// The file exists but could not be read or parsed.
    #[error("malformed config file {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    /// The configured base URL is unusable.
    #[error("invalid base URL '{value}': {reason}")]
    InvalidBaseUrl { value: String, reason: String },
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token endpoint refused the grant.
    #[error("token grant rejected (HTTP {status}): {body}")]
    GrantRejected { status: u16, body: String },

    /// The token endpoint answered 2xx but without a usable token.
    #[error("invalid token response: {reason}")]
    InvalidTokenResponse { reason: String },

    /// No token has been acquired yet.
    #[error("session is not authenticated")]
    NotAuthenticated,
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// Reading a request source or response body failed.
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Generic HTTP client error.
    #[error("HTTP client error: {message}")]
    Http { message: String },
}

/// A non-2xx response, with the raw body text the server sent.
#[derive(Debug)]
pub struct HttpError {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body, read in full.
    pub body: String,
}

impl HttpError {
    /// Create a new HTTP status error.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Check if the server reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status)?;
        if !self.body.is_empty() {
            write!(f, ": {}", self.body)?;
        }
        Ok(())
    }
}

impl std::error::Error for HttpError {}

/// Response body decoding errors.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body is not valid JSON or not a JSON object.
    #[error("malformed JSON response: {reason}")]
    Json { reason: String, body: String },

    /// The body is not valid UTF-8 text.
    #[error("response is not valid UTF-8: {reason}")]
    Utf8 { reason: String },
}

/// Precondition failures detected before a request is sent.
#[derive(Debug, Error)]
pub enum PreconditionError {
    /// The `_doc` identifier is absent.
    #[error("failed to determine {entity} ID: `_doc` is missing")]
    MissingId { entity: &'static str },

    /// The `_doc` identifier is present but not a string.
    #[error("failed to determine {entity} ID: `_doc` is not a string")]
    InvalidId { entity: &'static str },
}

/// Violations of the client/server wire contract.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A listing envelope has the wrong shape.
    #[error("malformed listing envelope: field `{field}` {reason}")]
    MalformedListing { field: &'static str, reason: String },

    /// A response that must carry an identifier does not.
    #[error("response from {operation} carries no `_doc` identifier")]
    MissingId { operation: &'static str },

    /// A response field has an unexpected type.
    #[error("unexpected value for `{field}`: {reason}")]
    UnexpectedField { field: String, reason: String },
}

/// Asynchronous job failures.
#[derive(Debug, Error)]
pub enum JobError {
    /// The job reached the `ERROR` state.
    #[error("job failed: {job_id}{}", suffix(.message))]
    Failed {
        job_id: String,
        message: Option<String>,
    },

    /// The job did not reach a terminal state within the wait policy's timeout.
    #[error("timed out after {elapsed:?} waiting for job {job_id}")]
    Timeout { job_id: String, elapsed: Duration },
}

fn suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(" ({m})"))
        .unwrap_or_default()
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// The value is not a JSON object where one is required.
    #[error("expected a JSON object, got {found}")]
    NotAnObject { found: &'static str },

    /// Invalid MIME type for an attachment.
    #[error("invalid content type '{value}': {reason}")]
    ContentType { value: String, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_display_includes_status_and_body() {
        let err = Error::from(HttpError::new(404, "{\"message\":\"not found\"}"));
        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("not found"));
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn job_failed_display_carries_message() {
        let err = JobError::Failed {
            job_id: "job1".to_string(),
            message: Some("boom".to_string()),
        };
        assert_eq!(err.to_string(), "job failed: job1 (boom)");

        let err = JobError::Failed {
            job_id: "job2".to_string(),
            message: None,
        };
        assert_eq!(err.to_string(), "job failed: job2");
    }

    #[test]
    fn non_http_errors_have_no_status() {
        let err = Error::from(AuthError::NotAuthenticated);
        assert_eq!(err.status(), None);
    }
}
