//! Request observer trait.

use crate::Error;

/// What an observer sees of an outgoing request.
#[derive(Debug, Clone)]
pub struct RequestInfo {
    /// HTTP method, upper case.
    pub method: String,
    /// Absolute URL including the query string.
    pub url: String,
    /// Protocol version as negotiated (`HTTP/1.1`, `HTTP/2.0`), once known.
    pub version: Option<String>,
}

/// Hook invoked around every HTTP exchange, including token grants.
///
/// All methods default to doing nothing. Observers must not block.
pub trait RequestObserver: Send + Sync {
    /// Called before the request is sent.
    fn on_request(&self, _request: &RequestInfo) {}

    /// Called once response headers arrive, whatever the status.
    fn on_response(&self, _request: &RequestInfo, _status: u16) {}

    /// Called when the exchange fails before a response arrives.
    fn on_failure(&self, _request: &RequestInfo, _error: &Error) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RequestObserver for NoopObserver {}
