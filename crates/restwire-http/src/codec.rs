//! Body codec capability

use serde_json::Value;

use crate::error::{RestApiError, Result};

/// Converts between body text and structured values
pub trait BodyCodec: Send + Sync {
    /// Parse raw body text
    fn parse(&self, text: &str) -> Result<Value>;

    /// Serialize an outgoing body
    fn serialize(&self, value: &Value) -> Result<String>;
}

/// JSON codec backed by `serde_json`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl BodyCodec for JsonCodec {
    fn parse(&self, text: &str) -> Result<Value> {
        serde_json::from_str(text).map_err(|e| RestApiError::BodyParse {
            message: e.to_string(),
            body: text.to_string(),
        })
    }

    fn serialize(&self, value: &Value) -> Result<String> {
        serde_json::to_string(value).map_err(|e| RestApiError::BodySerialize(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_object() {
        let value = JsonCodec.parse(r#"{"id":7,"tags":["a"]}"#).unwrap();
        assert_eq!(value, json!({"id": 7, "tags": ["a"]}));
    }

    #[test]
    fn test_parse_invalid_keeps_body() {
        let err = JsonCodec.parse("{not json").unwrap_err();
        match err {
            RestApiError::BodyParse { body, .. } => assert_eq!(body, "{not json"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_serialize() {
        let text = JsonCodec.serialize(&json!({"name": "widget"})).unwrap();
        assert_eq!(text, r#"{"name":"widget"}"#);
    }
}
