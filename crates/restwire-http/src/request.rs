//! Per-call request description

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::headers::HeaderProvider;
use crate::interceptor::RestApiInterceptor;

/// HTTP verb of a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestType {
    Get,
    Post,
    Put,
    Delete,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Get => "GET",
            RequestType::Post => "POST",
            RequestType::Put => "PUT",
            RequestType::Delete => "DELETE",
        }
    }

    /// Whether a body is sent for this verb
    pub fn carries_body(&self) -> bool {
        matches!(self, RequestType::Post | RequestType::Put)
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional per-call parameters
///
/// ```
/// use restwire_http::CallOptions;
/// use serde_json::json;
///
/// let options = CallOptions::new()
///     .body(json!({"name": "widget"}))
///     .query("page", "2")
///     .query("sort", "name");
/// ```
#[derive(Clone, Default)]
pub struct CallOptions {
    pub body: Option<Value>,
    pub query_parameters: Option<Vec<(String, String)>>,
    /// Consulted after the client's default providers
    pub headers: Vec<Arc<dyn HeaderProvider>>,
    /// Replaces the client's default interceptors when set
    pub interceptors: Option<Vec<Arc<dyn RestApiInterceptor>>>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the structured body (sent by POST and PUT only)
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Append one query parameter
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_parameters
            .get_or_insert_with(Vec::new)
            .push((key.into(), value.into()));
        self
    }

    /// Replace all query parameters
    pub fn query_parameters<I, K, V>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query_parameters = Some(
            parameters
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Add a per-call header provider
    pub fn header(mut self, provider: Arc<dyn HeaderProvider>) -> Self {
        self.headers.push(provider);
        self
    }

    /// Use exactly these interceptors for the call
    pub fn interceptors(mut self, interceptors: Vec<Arc<dyn RestApiInterceptor>>) -> Self {
        self.interceptors = Some(interceptors);
        self
    }
}

impl fmt::Debug for CallOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallOptions")
            .field("body", &self.body)
            .field("query_parameters", &self.query_parameters)
            .field("headers", &self.headers.len())
            .field("interceptors", &self.interceptors.as_ref().map(Vec::len))
            .finish()
    }
}

/// Fully specified description of one call
#[derive(Clone)]
pub struct RestApiRequest {
    request_type: RequestType,
    endpoint: String,
    body: Option<Value>,
    query_parameters: Option<Vec<(String, String)>>,
    header_providers: Vec<Arc<dyn HeaderProvider>>,
}

impl RestApiRequest {
    pub fn new(
        request_type: RequestType,
        endpoint: impl Into<String>,
        body: Option<Value>,
        query_parameters: Option<Vec<(String, String)>>,
        header_providers: Vec<Arc<dyn HeaderProvider>>,
    ) -> Self {
        Self {
            request_type,
            endpoint: endpoint.into(),
            body,
            query_parameters,
            header_providers,
        }
    }

    pub fn request_type(&self) -> RequestType {
        self.request_type
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn query_parameters(&self) -> Option<&[(String, String)]> {
        self.query_parameters.as_deref()
    }

    pub fn header_providers(&self) -> &[Arc<dyn HeaderProvider>] {
        &self.header_providers
    }
}

impl fmt::Debug for RestApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestApiRequest")
            .field("request_type", &self.request_type)
            .field("endpoint", &self.endpoint)
            .field("body", &self.body)
            .field("query_parameters", &self.query_parameters)
            .field("header_providers", &self.header_providers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_only_post_and_put_carry_bodies() {
        assert!(!RequestType::Get.carries_body());
        assert!(RequestType::Post.carries_body());
        assert!(RequestType::Put.carries_body());
        assert!(!RequestType::Delete.carries_body());
    }

    #[test]
    fn test_call_options_query_order() {
        let options = CallOptions::new().query("z", "1").query("a", "2");
        assert_eq!(
            options.query_parameters,
            Some(vec![
                ("z".to_string(), "1".to_string()),
                ("a".to_string(), "2".to_string())
            ])
        );
    }

    #[test]
    fn test_call_options_defaults() {
        let options = CallOptions::new().body(json!({"id": 1}));
        assert!(options.headers.is_empty());
        assert!(options.interceptors.is_none());
        assert!(options.query_parameters.is_none());
        assert_eq!(options.body, Some(json!({"id": 1})));
    }
}
