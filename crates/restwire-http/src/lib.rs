//! Client-side REST request orchestrator
//!
//! Builds, dispatches and normalizes GET/POST/PUT/DELETE calls against a base
//! address, with pluggable collaborators around the core pipeline.
//!
//! ## Features
//!
//! - **Header providers**: default providers first, per-call providers second, later wins
//! - **Interceptor chain**: sequential post-response transforms, replaceable per call
//! - **Timeouts**: dispatch bounded per call, expiry reported as a connection failure
//! - **Uniform errors**: every failure is logged and passed to the error hook exactly once
//! - **Transports**: per-call reqwest transport by default, or one shared override
//! - **Testing support**: every collaborator is a trait, easy to mock
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use restwire_http::{CallOptions, RestClient, RestConfig, StaticHeaders, TracingLogger};
//!
//! # async fn run() -> restwire_http::Result<()> {
//! let client = RestClient::builder(RestConfig::new("https://api.example.com"))
//!     .header_provider(Arc::new(StaticHeaders::single("Accept", "application/json")))
//!     .logger(Arc::new(TracingLogger))
//!     .build()?;
//!
//! let response = client
//!     .get("/items", CallOptions::new().query("page", "1"))
//!     .await?;
//! println!("{} {:?}", response.status_code(), response.body());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod headers;
pub mod hooks;
pub mod interceptor;
pub mod logger;
pub mod request;
pub mod response;
pub mod transport;
pub mod url_builder;

pub use client::{RestClient, RestClientBuilder};
pub use codec::{BodyCodec, JsonCodec};
pub use config::RestConfig;
pub use error::{CallPhase, ConnectionFailure, ErrorClass, RestApiError, Result};
pub use headers::{compose_headers, HeaderMap, HeaderProvider, StaticHeaders};
pub use hooks::{ErrorHook, NoopResponseHook, PropagateError, ResponseHook};
pub use interceptor::{apply_interceptors, RestApiInterceptor};
pub use logger::{RestLogger, TracingLogger};
pub use request::{CallOptions, RequestType, RestApiRequest};
pub use response::{Header, RawResponse, RestResponse};
pub use transport::{
    ReqwestTransport, ReqwestTransportFactory, Transport, TransportError, TransportFactory,
    TransportLease, TransportRequest,
};
pub use url_builder::{build_query_parameters, build_url};

/// Re-export commonly used types
pub use serde_json::Value;
pub use url::Url;
