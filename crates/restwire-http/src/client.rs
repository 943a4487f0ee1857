//! REST request orchestrator

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;
use url::Url;

use crate::{
    codec::{BodyCodec, JsonCodec},
    config::RestConfig,
    error::{ConnectionFailure, RestApiError, Result},
    headers::{compose_headers, HeaderProvider},
    hooks::{ErrorHook, NoopResponseHook, PropagateError, ResponseHook},
    interceptor::{apply_interceptors, RestApiInterceptor},
    logger::RestLogger,
    request::{CallOptions, RequestType, RestApiRequest},
    response::{Header, RawResponse, RestResponse},
    transport::{
        ReqwestTransportFactory, Transport, TransportError, TransportFactory, TransportLease,
        TransportRequest,
    },
    url_builder::build_url,
};

struct ClientInner {
    config: RestConfig,
    header_providers: Vec<Arc<dyn HeaderProvider>>,
    interceptors: Vec<Arc<dyn RestApiInterceptor>>,
    logger: Option<Arc<dyn RestLogger>>,
    transport: Option<Arc<dyn Transport>>,
    transport_factory: Arc<dyn TransportFactory>,
    codec: Arc<dyn BodyCodec>,
    error_hook: Arc<dyn ErrorHook>,
    response_hook: Arc<dyn ResponseHook>,
}

/// Builds, dispatches and normalizes REST calls against one base address.
///
/// The client only holds immutable configuration, so clones share it and
/// concurrent calls never observe each other.
#[derive(Clone)]
pub struct RestClient {
    inner: Arc<ClientInner>,
}

impl RestClient {
    /// Client with default collaborators
    pub fn new(config: RestConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    pub fn builder(config: RestConfig) -> RestClientBuilder {
        RestClientBuilder::new(config)
    }

    /// Get configuration
    pub fn config(&self) -> &RestConfig {
        &self.inner.config
    }

    pub async fn get(&self, endpoint: &str, options: CallOptions) -> Result<RestResponse> {
        self.call(RequestType::Get, endpoint, options).await
    }

    pub async fn post(&self, endpoint: &str, options: CallOptions) -> Result<RestResponse> {
        self.call(RequestType::Post, endpoint, options).await
    }

    pub async fn put(&self, endpoint: &str, options: CallOptions) -> Result<RestResponse> {
        self.call(RequestType::Put, endpoint, options).await
    }

    pub async fn delete(&self, endpoint: &str, options: CallOptions) -> Result<RestResponse> {
        self.call(RequestType::Delete, endpoint, options).await
    }

    async fn call(
        &self,
        request_type: RequestType,
        endpoint: &str,
        options: CallOptions,
    ) -> Result<RestResponse> {
        let CallOptions {
            body,
            query_parameters,
            headers,
            interceptors,
        } = options;
        let request = RestApiRequest::new(request_type, endpoint, body, query_parameters, headers);
        self.execute(request, interceptors).await
    }

    /// Run a prepared request.
    ///
    /// `interceptors`, when given, replace the client's defaults for this call.
    /// Every failure goes through the logger and the error hook exactly once;
    /// every success goes through the response hook exactly once.
    pub async fn execute(
        &self,
        request: RestApiRequest,
        interceptors: Option<Vec<Arc<dyn RestApiInterceptor>>>,
    ) -> Result<RestResponse> {
        match self.run(&request, interceptors.as_deref()).await {
            Ok(response) => {
                self.inner.response_hook.on_response(&response);
                Ok(response)
            }
            Err(error) => Err(self.handle_error(error)),
        }
    }

    async fn run(
        &self,
        request: &RestApiRequest,
        interceptors: Option<&[Arc<dyn RestApiInterceptor>]>,
    ) -> Result<RestResponse> {
        let method = request.request_type();
        let url = build_url(
            &self.inner.config.base_url,
            request.endpoint(),
            request.query_parameters(),
        )?;
        let headers =
            compose_headers(&self.inner.header_providers, request.header_providers()).await?;
        let body = match request.body() {
            Some(body) if method.carries_body() => Some(self.inner.codec.serialize(body)?),
            _ => None,
        };

        if let Some(logger) = &self.inner.logger {
            logger.on_request(method, &url, &headers, body.as_deref());
        }

        let lease = self.lease_transport()?;
        let transport_request = TransportRequest {
            method,
            url,
            headers,
            body,
        };
        let raw = self
            .dispatch(lease.transport(), &transport_request)
            .await?
            .ok_or_else(|| RestApiError::NoResponse {
                url: transport_request.url.to_string(),
            })?;

        if let Some(logger) = &self.inner.logger {
            logger.on_response(&raw);
        }

        let chain = interceptors.unwrap_or(self.inner.interceptors.as_slice());
        let raw = apply_interceptors(self, lease.transport(), raw, chain).await?;

        self.normalize(raw)
    }

    fn lease_transport(&self) -> Result<TransportLease> {
        match &self.inner.transport {
            Some(shared) => Ok(TransportLease::Shared(Arc::clone(shared))),
            None => Ok(TransportLease::Ephemeral(
                self.inner.transport_factory.create()?,
            )),
        }
    }

    async fn dispatch(
        &self,
        transport: &dyn Transport,
        request: &TransportRequest,
    ) -> Result<Option<RawResponse>> {
        let timeout = self.inner.config.timeout;
        debug!("REST {}: {}", request.method, request.url);

        match tokio::time::timeout(timeout, transport.send(request)).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(TransportError::Connect(reason))) => Err(no_connection(
                &request.url,
                ConnectionFailure::Unreachable(reason),
            )),
            Ok(Err(TransportError::Other(reason))) => Err(RestApiError::Transport(reason)),
            Err(_) => Err(no_connection(
                &request.url,
                ConnectionFailure::TimedOut(timeout),
            )),
        }
    }

    fn normalize(&self, raw: RawResponse) -> Result<RestResponse> {
        let body = match raw.body.as_deref() {
            Some(text) if !text.is_empty() => Some(self.inner.codec.parse(text)?),
            _ => None,
        };
        let headers: HashSet<Header> = raw
            .headers
            .iter()
            .map(|(name, value)| Header::new(name.clone(), value.clone()))
            .collect();

        Ok(RestResponse::new(raw.status, body, headers, raw))
    }

    fn handle_error(&self, error: RestApiError) -> RestApiError {
        if let Some(logger) = &self.inner.logger {
            logger.on_error(&error);
        }
        self.inner.error_hook.handle_error(error)
    }
}

fn no_connection(url: &Url, failure: ConnectionFailure) -> RestApiError {
    RestApiError::NoConnection {
        url: url.to_string(),
        failure,
    }
}

/// Collects configuration and collaborators for a [`RestClient`]
pub struct RestClientBuilder {
    config: RestConfig,
    header_providers: Vec<Arc<dyn HeaderProvider>>,
    interceptors: Vec<Arc<dyn RestApiInterceptor>>,
    logger: Option<Arc<dyn RestLogger>>,
    transport: Option<Arc<dyn Transport>>,
    transport_factory: Option<Arc<dyn TransportFactory>>,
    codec: Arc<dyn BodyCodec>,
    error_hook: Arc<dyn ErrorHook>,
    response_hook: Arc<dyn ResponseHook>,
}

impl RestClientBuilder {
    pub fn new(config: RestConfig) -> Self {
        Self {
            config,
            header_providers: Vec::new(),
            interceptors: Vec::new(),
            logger: None,
            transport: None,
            transport_factory: None,
            codec: Arc::new(JsonCodec),
            error_hook: Arc::new(PropagateError),
            response_hook: Arc::new(NoopResponseHook),
        }
    }

    /// Add a default header provider, consulted before per-call providers
    pub fn header_provider(mut self, provider: Arc<dyn HeaderProvider>) -> Self {
        self.header_providers.push(provider);
        self
    }

    /// Add a default interceptor
    pub fn interceptor(mut self, interceptor: Arc<dyn RestApiInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn logger(mut self, logger: Arc<dyn RestLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Share one transport across all calls; its lifecycle stays with the caller
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Factory for per-call transports, used when no shared transport is set
    pub fn transport_factory(mut self, factory: Arc<dyn TransportFactory>) -> Self {
        self.transport_factory = Some(factory);
        self
    }

    pub fn codec(mut self, codec: Arc<dyn BodyCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn error_hook(mut self, hook: Arc<dyn ErrorHook>) -> Self {
        self.error_hook = hook;
        self
    }

    pub fn response_hook(mut self, hook: Arc<dyn ResponseHook>) -> Self {
        self.response_hook = hook;
        self
    }

    pub fn build(self) -> Result<RestClient> {
        self.config.validate()?;

        let transport_factory = match self.transport_factory {
            Some(factory) => factory,
            None => Arc::new(ReqwestTransportFactory::from_config(&self.config)),
        };

        Ok(RestClient {
            inner: Arc::new(ClientInner {
                config: self.config,
                header_providers: self.header_providers,
                interceptors: self.interceptors,
                logger: self.logger,
                transport: self.transport,
                transport_factory,
                codec: self.codec,
                error_hook: self.error_hook,
                response_hook: self.response_hook,
            }),
        })
    }
}
