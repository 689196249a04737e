//! Envelope types for newline-delimited JSON-RPC 2.0
//!
//! One line on stdin is one envelope. [`parse_line`] classifies it as a
//! request (needs exactly one reply), a notification (never replied to) or a
//! stray response (ignored). Replies are built with [`Response`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::RpcError;

pub const JSONRPC_VERSION: &str = "2.0";

/// Methods under this prefix are notifications regardless of `id`
pub const NOTIFICATION_PREFIX: &str = "notifications/";

/// An inbound envelope exactly as it appears on the wire
#[derive(Debug, Clone, Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    #[allow(dead_code)]
    jsonrpc: Option<String>,
    /// `None` when absent; an explicit `null` is `Some(Value::Null)`
    #[serde(default, deserialize_with = "present")]
    id: Option<Value>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    params: Option<Value>,
}

/// A classified inbound envelope
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// Carries an id; exactly one correlated response must be written
    Request {
        id: Value,
        method: String,
        params: Value,
    },
    /// No response is ever written
    Notification { method: String, params: Value },
    /// A response or error object sent to us; the server has no outbound
    /// requests, so these are dropped
    Response { id: Option<Value> },
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// Parse and classify one line of input
///
/// Anything that is not a JSON object with a well-typed `method` is a parse
/// error; the caller answers it with `id: null`.
pub fn parse_line(line: &str) -> Result<Inbound, RpcError> {
    let value: Value = serde_json::from_str(line).map_err(RpcError::parse_error)?;
    if !value.is_object() {
        return Err(RpcError::parse_error("envelope must be a JSON object"));
    }

    let raw: RawEnvelope = serde_json::from_value(value).map_err(RpcError::parse_error)?;
    let params = raw.params.unwrap_or_else(|| Value::Object(Default::default()));

    let Some(method) = raw.method else {
        return Ok(Inbound::Response { id: raw.id });
    };

    match raw.id {
        Some(id) if !method.starts_with(NOTIFICATION_PREFIX) => Ok(Inbound::Request {
            id,
            method,
            params,
        }),
        _ => Ok(Inbound::Notification { method, params }),
    }
}

/// An outbound response envelope
///
/// `id` is always serialized; it is `null` only for parse errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl Response {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }

    pub fn from_outcome(id: Value, outcome: Result<Value, RpcError>) -> Self {
        match outcome {
            Ok(result) => Self::success(id, result),
            Err(error) => Self::failure(id, error),
        }
    }

    /// Serialize to a single line, without the trailing newline
    pub fn to_line(&self) -> String {
        // A Response holds only Values and strings, which always serialize.
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                r#"{{"jsonrpc":"2.0","id":null,"error":{{"code":{},"message":"response serialization failed"}}}}"#,
                crate::error::INTERNAL_ERROR
            )
        })
    }
}
