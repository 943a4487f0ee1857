//! REST client configuration

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{RestApiError, Result};

/// Environment variable prefix read by [`RestConfig::load`]
pub const ENV_PREFIX: &str = "RESTWIRE";

/// REST client configuration
///
/// Set once when the client is built and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestConfig {
    /// Base address every endpoint is appended to
    pub base_url: String,

    /// Upper bound for the dispatch step of each call, whole seconds in config sources
    #[serde(default = "default_timeout", with = "duration_secs")]
    pub timeout: Duration,

    /// Connection timeout for transports that support one, whole seconds in config sources
    #[serde(default = "default_connect_timeout", with = "duration_secs")]
    pub connect_timeout: Duration,

    /// User agent sent by the default transport
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl RestConfig {
    /// Create a config for the given base address with defaults
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: default_timeout(),
            connect_timeout: default_connect_timeout(),
            user_agent: default_user_agent(),
        }
    }

    /// Load configuration from an optional file and `RESTWIRE_*` environment variables.
    ///
    /// Environment variables win over the file, e.g. `RESTWIRE_TIMEOUT=5`.
    /// Timeouts are given in whole seconds.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .try_parsing(true),
        );

        let config: RestConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| RestApiError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations a client cannot be built from
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(RestApiError::InvalidConfig(
                "base address must not be empty".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(RestApiError::InvalidConfig(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Set dispatch timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

// Default value functions for serde
fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_user_agent() -> String {
    format!("restwire/{}", env!("CARGO_PKG_VERSION"))
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
