//! JSON-RPC error objects for the MCP line protocol
//!
//! Every failure that reaches the wire is an [`RpcError`]. Handler-side error
//! types convert into it so the dispatcher never has to inspect them.

use serde::{Deserialize, Serialize};

use crate::embeddable::EmbeddableError;

/// Malformed inbound envelope
pub const PARSE_ERROR: i32 = -32700;
/// Request named a method the server does not implement
pub const METHOD_NOT_FOUND: i32 = -32601;
/// Handler failed (bad arguments, unknown tool, execution error)
pub const INTERNAL_ERROR: i32 = -32603;

/// The `error` member of a JSON-RPC response envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
}

impl RpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn parse_error(detail: impl std::fmt::Display) -> Self {
        Self::new(PARSE_ERROR, format!("Parse error: {}", detail))
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(INTERNAL_ERROR, message)
    }
}

impl std::fmt::Display for RpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for RpcError {}

// Handler failures are all reported as internal errors; the message carries
// the detail the agent needs to correct its call.
impl From<EmbeddableError> for RpcError {
    fn from(err: EmbeddableError) -> Self {
        RpcError::internal(err.to_string())
    }
}

impl From<serde_json::Error> for RpcError {
    fn from(err: serde_json::Error) -> Self {
        RpcError::internal(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_not_found_maps_to_internal_error() {
        let err: RpcError = EmbeddableError::ToolNotFound("frobnicate".to_string()).into();
        assert_eq!(err.code, INTERNAL_ERROR);
        assert!(err.message.contains("frobnicate"));
    }

    #[test]
    fn test_method_not_found_names_method() {
        let err = RpcError::method_not_found("tools/destroy");
        assert_eq!(err.code, METHOD_NOT_FOUND);
        assert_eq!(err.message, "Method not found: tools/destroy");
    }

    #[test]
    fn test_serializes_without_extra_members() {
        let value = serde_json::to_value(RpcError::parse_error("eof")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"code": -32700, "message": "Parse error: eof"})
        );
    }
}
