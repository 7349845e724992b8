//! Request logging observer.

use std::backtrace::Backtrace;

use tracing::{info, warn};

use cloudcms_core::{Error, RequestInfo, RequestObserver};

/// Logs every exchange through `tracing`.
///
/// Installed by [`CloudCmsSession::connect`](crate::CloudCmsSession::connect)
/// when the config's `debug` flag is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl TracingObserver {
    pub fn new() -> Self {
        Self
    }
}

impl RequestObserver for TracingObserver {
    fn on_request(&self, request: &RequestInfo) {
        info!(method = %request.method, url = %request.url, "sending request");
    }

    fn on_response(&self, request: &RequestInfo, status: u16) {
        info!(
            method = %request.method,
            url = %request.url,
            version = request.version.as_deref().unwrap_or("unknown"),
            status,
            "received response"
        );
    }

    fn on_failure(&self, request: &RequestInfo, error: &Error) {
        let backtrace = Backtrace::force_capture();
        warn!(
            method = %request.method,
            url = %request.url,
            %error,
            %backtrace,
            "request failed"
        );
    }
}
