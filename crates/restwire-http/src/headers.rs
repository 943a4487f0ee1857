//! Header providers and header composition

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::trace;

use crate::error::Result;

/// Effective request headers, keyed by name
pub type HeaderMap = BTreeMap<String, String>;

/// Asynchronously contributes header entries to a request
///
/// Implementations that need I/O (token refresh, secret lookup) do it here;
/// a failure aborts the call before anything is dispatched.
#[async_trait]
pub trait HeaderProvider: Send + Sync {
    /// Header name/value pairs this provider contributes
    async fn headers(&self) -> Result<Vec<(String, String)>>;
}

/// Provider returning a fixed list of headers
#[derive(Debug, Clone, Default)]
pub struct StaticHeaders {
    entries: Vec<(String, String)>,
}

impl StaticHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider with a single entry
    pub fn single(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new().with(name, value)
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((name.into(), value.into()));
        self
    }
}

#[async_trait]
impl HeaderProvider for StaticHeaders {
    async fn headers(&self) -> Result<Vec<(String, String)>> {
        Ok(self.entries.clone())
    }
}

/// Merge contributions of default providers, then per-call providers.
///
/// Providers are awaited one at a time in that order; a later contribution
/// for the same name, compared case-insensitively, replaces an earlier one
/// including its spelling.
pub async fn compose_headers(
    default_providers: &[Arc<dyn HeaderProvider>],
    per_call_providers: &[Arc<dyn HeaderProvider>],
) -> Result<HeaderMap> {
    let mut composed = HeaderMap::new();
    for provider in default_providers.iter().chain(per_call_providers) {
        for (name, value) in provider.headers().await? {
            let existing = composed
                .keys()
                .find(|key| key.eq_ignore_ascii_case(&name))
                .cloned();
            if let Some(existing) = existing {
                composed.remove(&existing);
                trace!(header = %name, "Header overridden");
            }
            composed.insert(name, value);
        }
    }
    Ok(composed)
}
