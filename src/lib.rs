//! Shared fixtures for the restwire end-to-end tests

use std::sync::{Mutex, Once};

use restwire_http::{HeaderMap, RawResponse, RequestType, RestApiError, RestLogger, Url};

/// Logged request as seen by [`RecordingLogger`]
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedRequest {
    pub method: RequestType,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

/// Logger that keeps every observation for later assertions
#[derive(Debug, Default)]
pub struct RecordingLogger {
    requests: Mutex<Vec<LoggedRequest>>,
    responses: Mutex<Vec<RawResponse>>,
    errors: Mutex<Vec<RestApiError>>,
}

impl RecordingLogger {
    pub fn requests(&self) -> Vec<LoggedRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn responses(&self) -> Vec<RawResponse> {
        self.responses.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn errors(&self) -> Vec<RestApiError> {
        self.errors.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl RestLogger for RecordingLogger {
    fn on_request(
        &self,
        method: RequestType,
        url: &Url,
        headers: &HeaderMap,
        body: Option<&str>,
    ) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(LoggedRequest {
                method,
                url: url.to_string(),
                headers: headers.clone(),
                body: body.map(str::to_string),
            });
        }
    }

    fn on_response(&self, response: &RawResponse) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push(response.clone());
        }
    }

    fn on_error(&self, error: &RestApiError) {
        if let Ok(mut errors) = self.errors.lock() {
            errors.push(error.clone());
        }
    }
}

/// Install a test-friendly tracing subscriber once per process
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}
