//! Network transport capability and its reqwest implementation

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use thiserror::Error;
use tracing::{debug, trace};
use url::Url;

use crate::{
    config::RestConfig,
    error::{RestApiError, Result},
    headers::HeaderMap,
    request::RequestType,
    response::RawResponse,
};

/// Everything a transport needs to perform one round-trip
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: RequestType,
    pub url: Url,
    pub headers: HeaderMap,
    /// Serialized body, only ever set for POST and PUT
    pub body: Option<String>,
}

/// Transport-level failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Host could not be reached
    #[error("connection failed: {0}")]
    Connect(String),

    /// Any other failure while sending or reading the response
    #[error("{0}")]
    Other(String),
}

/// Performs the actual network call
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request; `Ok(None)` means the transport produced no response
    async fn send(&self, request: &TransportRequest)
        -> std::result::Result<Option<RawResponse>, TransportError>;
}

/// Creates a fresh transport for every call that has no shared override
pub trait TransportFactory: Send + Sync {
    fn create(&self) -> Result<Box<dyn Transport>>;
}

/// Transport held for the duration of one call.
///
/// An ephemeral transport is dropped, and with it its connections, when the
/// lease goes out of scope on both the success and the failure path. A shared
/// transport is only borrowed; its owner decides when it goes away.
pub enum TransportLease {
    Ephemeral(Box<dyn Transport>),
    Shared(Arc<dyn Transport>),
}

impl TransportLease {
    pub fn transport(&self) -> &dyn Transport {
        match self {
            TransportLease::Ephemeral(transport) => transport.as_ref(),
            TransportLease::Shared(transport) => transport.as_ref(),
        }
    }

    pub fn is_shared(&self) -> bool {
        matches!(self, TransportLease::Shared(_))
    }
}

impl Drop for TransportLease {
    fn drop(&mut self) {
        if let TransportLease::Ephemeral(_) = self {
            trace!("Releasing per-call transport");
        }
    }
}

/// Transport backed by a `reqwest::Client`
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    /// Wrap an existing client
    pub fn new(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    /// Build a client from connection settings
    pub fn with_settings(user_agent: &str, connect_timeout: Duration) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(user_agent)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| RestApiError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { inner })
    }

    /// Get underlying reqwest client
    pub fn inner(&self) -> &reqwest::Client {
        &self.inner
    }
}

fn to_method(request_type: RequestType) -> Method {
    match request_type {
        RequestType::Get => Method::GET,
        RequestType::Post => Method::POST,
        RequestType::Put => Method::PUT,
        RequestType::Delete => Method::DELETE,
    }
}

fn classify(error: reqwest::Error) -> TransportError {
    if error.is_connect() || error.is_timeout() {
        TransportError::Connect(error.to_string())
    } else {
        TransportError::Other(error.to_string())
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: &TransportRequest,
    ) -> std::result::Result<Option<RawResponse>, TransportError> {
        debug!("HTTP {}: {}", request.method, request.url);

        let mut builder = self
            .inner
            .request(to_method(request.method), request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            let has_content_type = request
                .headers
                .keys()
                .any(|name| name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()));
            if !has_content_type {
                builder = builder.header(CONTENT_TYPE, "application/json");
            }
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(classify)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().await.map_err(classify)?;

        Ok(Some(RawResponse {
            status,
            headers,
            body: Some(body),
        }))
    }
}

/// Default factory: a new reqwest client per call
#[derive(Debug, Clone)]
pub struct ReqwestTransportFactory {
    user_agent: String,
    connect_timeout: Duration,
}

impl ReqwestTransportFactory {
    pub fn new(user_agent: impl Into<String>, connect_timeout: Duration) -> Self {
        Self {
            user_agent: user_agent.into(),
            connect_timeout,
        }
    }

    pub fn from_config(config: &RestConfig) -> Self {
        Self::new(config.user_agent.clone(), config.connect_timeout)
    }
}

impl TransportFactory for ReqwestTransportFactory {
    fn create(&self) -> Result<Box<dyn Transport>> {
        Ok(Box::new(ReqwestTransport::with_settings(
            &self.user_agent,
            self.connect_timeout,
        )?))
    }
}
