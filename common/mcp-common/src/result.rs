//! Result helpers for tool responses
//!
//! Tool payloads are always a single text content item; structured data is
//! pretty-printed JSON inside that text.

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;

use crate::embeddable::EmbeddableResult;

/// Create a successful response holding pretty-printed JSON
///
/// Non-ASCII text is emitted as-is, never as `\u` escapes.
///
/// ```rust,ignore
/// let todos: Vec<TaskRecord> = ...;
/// json_success(&todos)
/// ```
pub fn json_success<T: Serialize>(data: &T) -> EmbeddableResult<CallToolResult> {
    let json = serde_json::to_string_pretty(data)?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Create a successful plain text response
pub fn text_success(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}
