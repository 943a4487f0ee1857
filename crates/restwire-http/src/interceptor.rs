//! Post-response interceptor chain

use std::sync::Arc;

use async_trait::async_trait;

use crate::{client::RestClient, error::Result, response::RawResponse, transport::Transport};

/// Transforms a received response before it is normalized.
///
/// An interceptor can pass the response through, rewrite it, or replace it
/// entirely, e.g. by re-issuing the request through `transport` after
/// refreshing credentials.
#[async_trait]
pub trait RestApiInterceptor: Send + Sync {
    async fn intercept(
        &self,
        client: &RestClient,
        transport: &dyn Transport,
        response: RawResponse,
    ) -> Result<RawResponse>;
}

/// Run `interceptors` in order, feeding each the previous one's output
pub async fn apply_interceptors(
    client: &RestClient,
    transport: &dyn Transport,
    response: RawResponse,
    interceptors: &[Arc<dyn RestApiInterceptor>],
) -> Result<RawResponse> {
    let mut response = response;
    for interceptor in interceptors {
        response = interceptor.intercept(client, transport, response).await?;
    }
    Ok(response)
}
