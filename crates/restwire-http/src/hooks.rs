//! Extension points invoked once per call

use crate::{error::RestApiError, response::RestResponse};

/// Decides what the caller receives when a call fails.
///
/// Invoked exactly once per failed call, after the logger has seen the error.
pub trait ErrorHook: Send + Sync {
    fn handle_error(&self, error: RestApiError) -> RestApiError;
}

/// Signals the error to the caller unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct PropagateError;

impl ErrorHook for PropagateError {
    fn handle_error(&self, error: RestApiError) -> RestApiError {
        error
    }
}

/// Observes every successfully normalized response exactly once
pub trait ResponseHook: Send + Sync {
    fn on_response(&self, response: &RestResponse);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopResponseHook;

impl ResponseHook for NoopResponseHook {
    fn on_response(&self, _response: &RestResponse) {}
}
