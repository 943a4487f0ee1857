//! End-to-end scenarios for the REST orchestrator over real HTTP

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use restwire_http::{
    build_url, CallOptions, ErrorClass, ErrorHook, HeaderMap, HeaderProvider, RawResponse,
    RequestType, RestApiError, RestApiInterceptor, RestClient, RestConfig, RestResponse,
    ResponseHook, StaticHeaders, TracingLogger, Transport, TransportRequest,
};
use restwire_integration_tests::{init_tracing, RecordingLogger};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Hands out a token that changes after every refresh
struct RotatingToken {
    generation: AtomicUsize,
}

#[async_trait]
impl HeaderProvider for RotatingToken {
    async fn headers(&self) -> restwire_http::Result<Vec<(String, String)>> {
        let generation = self.generation.load(Ordering::SeqCst);
        Ok(vec![(
            "authorization".to_string(),
            format!("Bearer token-{generation}"),
        )])
    }
}

/// Re-issues a GET once with a fresh token when the server answers 401
struct RefreshOnUnauthorized {
    token: Arc<RotatingToken>,
    endpoint: &'static str,
}

#[async_trait]
impl RestApiInterceptor for RefreshOnUnauthorized {
    async fn intercept(
        &self,
        client: &RestClient,
        transport: &dyn Transport,
        response: RawResponse,
    ) -> restwire_http::Result<RawResponse> {
        if response.status != 401 {
            return Ok(response);
        }

        self.token.generation.fetch_add(1, Ordering::SeqCst);
        let mut headers = HeaderMap::new();
        for (name, value) in self.token.headers().await? {
            headers.insert(name, value);
        }
        let retry = TransportRequest {
            method: RequestType::Get,
            url: build_url(&client.config().base_url, self.endpoint, None)?,
            headers,
            body: None,
        };

        transport
            .send(&retry)
            .await
            .map_err(|e| RestApiError::Interceptor(e.to_string()))?
            .ok_or_else(|| RestApiError::Interceptor("refresh produced no response".to_string()))
    }
}

#[derive(Default)]
struct CountingHooks {
    responses: AtomicUsize,
    errors: AtomicUsize,
}

impl ResponseHook for CountingHooks {
    fn on_response(&self, _response: &RestResponse) {
        self.responses.fetch_add(1, Ordering::SeqCst);
    }
}

impl ErrorHook for CountingHooks {
    fn handle_error(&self, error: RestApiError) -> RestApiError {
        self.errors.fetch_add(1, Ordering::SeqCst);
        error
    }
}

#[tokio::test]
async fn test_interceptor_refreshes_credentials() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/secure"))
        .and(header("authorization", "Bearer token-0"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/secure"))
        .and(header("authorization", "Bearer token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"secret": 42})))
        .expect(1)
        .mount(&server)
        .await;

    let token = Arc::new(RotatingToken {
        generation: AtomicUsize::new(0),
    });
    let client = RestClient::builder(RestConfig::new(server.uri()))
        .header_provider(token.clone())
        .interceptor(Arc::new(RefreshOnUnauthorized {
            token: token.clone(),
            endpoint: "/secure",
        }))
        .logger(Arc::new(TracingLogger))
        .build()
        .unwrap();

    let response = client.get("/secure", CallOptions::new()).await.unwrap();
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.body(), Some(&json!({"secret": 42})));
}

#[tokio::test]
async fn test_logger_and_hooks_observe_each_call_once() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "o-1"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let logger = Arc::new(RecordingLogger::default());
    let hooks = Arc::new(CountingHooks::default());
    let client = RestClient::builder(RestConfig::new(server.uri()))
        .header_provider(Arc::new(StaticHeaders::single("x-env", "prod")))
        .logger(logger.clone())
        .response_hook(hooks.clone())
        .error_hook(hooks.clone())
        .build()
        .unwrap();

    let created = client
        .post(
            "/orders",
            CallOptions::new()
                .body(json!({"sku": "A-1", "qty": 2}))
                .header(Arc::new(StaticHeaders::single("x-env", "staging"))),
        )
        .await
        .unwrap();
    assert_eq!(created.body(), Some(&json!({"id": "o-1"})));

    let err = client.get("/broken", CallOptions::new()).await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::Data);

    let requests = logger.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, RequestType::Post);
    assert_eq!(requests[0].url, format!("{}/orders", server.uri()));
    assert_eq!(
        requests[0].headers.get("x-env").map(String::as_str),
        Some("staging")
    );
    let sent: serde_json::Value =
        serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(sent, json!({"sku": "A-1", "qty": 2}));
    assert_eq!(requests[1].body, None);

    assert_eq!(logger.responses().len(), 2);
    assert_eq!(logger.errors().len(), 1);
    assert_eq!(hooks.responses.load(Ordering::SeqCst), 1);
    assert_eq!(hooks.errors.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_concurrent_calls_on_cloned_clients() {
    init_tracing();
    let server = MockServer::start().await;
    for id in 0..8 {
        Mock::given(method("GET"))
            .and(path(format!("/items/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": id})))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = RestClient::new(RestConfig::new(server.uri())).unwrap();
    let handles: Vec<_> = (0..8)
        .map(|id| {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .get(&format!("/items/{id}"), CallOptions::new())
                    .await
                    .map(|response| (id, response))
            })
        })
        .collect();

    for handle in handles {
        let (id, response) = handle.await.unwrap().unwrap();
        assert_eq!(response.body(), Some(&json!({"id": id})));
    }
}
