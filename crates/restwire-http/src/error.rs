//! REST call error types

use std::time::Duration;

use thiserror::Error;

/// Result type for REST operations
pub type Result<T> = std::result::Result<T, RestApiError>;

/// Why the transport could not be reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionFailure {
    /// Host unreachable, connection refused, DNS failure, ...
    Unreachable(String),
    /// Dispatch exceeded the configured timeout
    TimedOut(Duration),
}

impl std::fmt::Display for ConnectionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionFailure::Unreachable(reason) => write!(f, "{reason}"),
            ConnectionFailure::TimedOut(after) => write!(f, "timed out after {after:?}"),
        }
    }
}

/// Broad error classes, used by callers to decide how to react
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Connectivity,
    Protocol,
    Data,
    Configuration,
}

/// Phase of a call in which an error was raised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPhase {
    /// URL construction, header composition, body serialization
    Build,
    /// Network round-trip
    Dispatch,
    /// Interceptor chain
    Intercept,
    /// Raw response to `RestResponse` conversion
    Normalize,
    /// Client construction, never raised by a call
    Construct,
}

/// REST call errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RestApiError {
    /// Transport unreachable or dispatch timed out
    #[error("No connection to {url}: {failure}")]
    NoConnection {
        url: String,
        failure: ConnectionFailure,
    },

    /// Transport returned no response object
    #[error("No response received from {url}")]
    NoResponse { url: String },

    /// Body is not valid structured data
    #[error("Body parse error: {message}")]
    BodyParse { message: String, body: String },

    /// Outgoing body could not be serialized
    #[error("Body serialization error: {0}")]
    BodySerialize(String),

    /// Transport failure that is not connectivity related
    #[error("Transport error: {0}")]
    Transport(String),

    /// Encoded request target is not a valid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A header provider failed to produce its contributions
    #[error("Header provider failed: {0}")]
    HeaderProvider(String),

    /// An interceptor rejected or failed to transform the response
    #[error("Interceptor failed: {0}")]
    Interceptor(String),

    /// Client configuration rejected at construction
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RestApiError {
    /// Classify the error
    pub fn class(&self) -> ErrorClass {
        match self {
            RestApiError::NoConnection { .. } => ErrorClass::Connectivity,
            RestApiError::NoResponse { .. }
            | RestApiError::Transport(_)
            | RestApiError::HeaderProvider(_)
            | RestApiError::Interceptor(_) => ErrorClass::Protocol,
            RestApiError::BodyParse { .. }
            | RestApiError::BodySerialize(_)
            | RestApiError::InvalidUrl(_) => ErrorClass::Data,
            RestApiError::InvalidConfig(_) => ErrorClass::Configuration,
        }
    }

    /// Phase of the call that produced the error
    pub fn phase(&self) -> CallPhase {
        match self {
            RestApiError::NoConnection { .. } | RestApiError::Transport(_) => CallPhase::Dispatch,
            RestApiError::InvalidUrl(_)
            | RestApiError::HeaderProvider(_)
            | RestApiError::BodySerialize(_) => CallPhase::Build,
            RestApiError::Interceptor(_) => CallPhase::Intercept,
            RestApiError::NoResponse { .. } | RestApiError::BodyParse { .. } => {
                CallPhase::Normalize
            }
            RestApiError::InvalidConfig(_) => CallPhase::Construct,
        }
    }

    /// True for unreachable hosts and timeouts
    pub fn is_connectivity(&self) -> bool {
        self.class() == ErrorClass::Connectivity
    }

    /// True when the dispatch step ran out of time
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            RestApiError::NoConnection {
                failure: ConnectionFailure::TimedOut(_),
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_is_connectivity_class() {
        let err = RestApiError::NoConnection {
            url: "https://api.test/items".to_string(),
            failure: ConnectionFailure::TimedOut(Duration::from_secs(30)),
        };
        assert_eq!(err.class(), ErrorClass::Connectivity);
        assert_eq!(err.phase(), CallPhase::Dispatch);
        assert!(err.is_timeout());
        assert_eq!(
            err.to_string(),
            "No connection to https://api.test/items: timed out after 30s"
        );
    }

    #[test]
    fn test_classification() {
        let no_response = RestApiError::NoResponse {
            url: "https://api.test".to_string(),
        };
        assert_eq!(no_response.class(), ErrorClass::Protocol);
        assert_eq!(no_response.phase(), CallPhase::Normalize);

        let parse = RestApiError::BodyParse {
            message: "expected value".to_string(),
            body: "<html>".to_string(),
        };
        assert_eq!(parse.class(), ErrorClass::Data);
        assert!(!parse.is_connectivity());

        let config = RestApiError::InvalidConfig("empty base url".to_string());
        assert_eq!(config.class(), ErrorClass::Configuration);
    }
}
