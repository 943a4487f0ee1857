//! Observation capability for requests, responses and errors

use tracing::{debug, info, warn};
use url::Url;

use crate::{error::RestApiError, headers::HeaderMap, request::RequestType, response::RawResponse};

/// Observes a call; never alters its control flow
pub trait RestLogger: Send + Sync {
    /// Outgoing request, after headers are composed
    fn on_request(
        &self,
        _method: RequestType,
        _url: &Url,
        _headers: &HeaderMap,
        _body: Option<&str>,
    ) {
    }

    /// Raw response, before interceptors run
    fn on_response(&self, _response: &RawResponse) {}

    /// Error about to be signaled to the caller
    fn on_error(&self, _error: &RestApiError) {}
}

/// Logger emitting `tracing` events
///
/// Header values are never logged, only their names.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl RestLogger for TracingLogger {
    fn on_request(
        &self,
        method: RequestType,
        url: &Url,
        headers: &HeaderMap,
        body: Option<&str>,
    ) {
        let names: Vec<&str> = headers.keys().map(String::as_str).collect();
        info!(
            method = %method,
            url = %url,
            headers = ?names,
            body_bytes = body.map(str::len).unwrap_or(0),
            "Sending request"
        );
    }

    fn on_response(&self, response: &RawResponse) {
        debug!(
            status = response.status,
            headers = response.headers.len(),
            body_bytes = response.body.as_deref().map(str::len).unwrap_or(0),
            "Received response"
        );
    }

    fn on_error(&self, error: &RestApiError) {
        warn!(class = ?error.class(), phase = ?error.phase(), "Request failed: {error}");
    }
}
