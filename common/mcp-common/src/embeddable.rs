//! The handler seam between the line protocol and a concrete server
//!
//! [`crate::dispatch::serve`] owns the wire; anything implementing
//! [`EmbeddableMcp`] owns the tools. The same trait lets a host call tools
//! in-process without going through stdio at all.
//!
//! ```rust,ignore
//! use mcp_common::EmbeddableMcp;
//!
//! let tools = server.list_tools();
//! let result = server.call_tool("show_all_todos", serde_json::json!({})).await?;
//! ```

use async_trait::async_trait;
use rmcp::model::{CallToolResult, Tool};
use serde_json::Value;

/// Error type for tool invocation
///
/// All variants reach the wire as `-32603` with the display text as message.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddableError {
    /// Tool was not found in the server
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// Arguments missing, empty or of the wrong type
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// Tool ran but could not complete
    #[error("tool execution failed: {0}")]
    ExecutionError(String),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

/// Result type for tool invocation
pub type EmbeddableResult<T> = Result<T, EmbeddableError>;

/// A tool server that can be driven by the stdio dispatcher or in-process
///
/// Implementations must be `Send + Sync`: each request is executed on its own
/// task and several may be in flight at once.
#[async_trait]
pub trait EmbeddableMcp: Send + Sync {
    /// Name reported in `initialize` as `serverInfo.name`
    fn server_name(&self) -> &str;

    /// All tools, in the order `tools/list` should report them
    fn list_tools(&self) -> Vec<Tool>;

    /// Execute a tool by name with the raw `arguments` object
    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult>;

    /// Best-effort hook for `notifications/*` messages
    ///
    /// Nothing the hook does is ever reported back to the client.
    async fn on_notification(&self, method: &str, _params: Value) {
        tracing::debug!("Received notification: {}", method);
    }

    fn server_description(&self) -> Option<&str> {
        None
    }

    fn server_version(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestServer;

    #[async_trait]
    impl EmbeddableMcp for TestServer {
        fn server_name(&self) -> &str {
            "test-server"
        }

        fn list_tools(&self) -> Vec<Tool> {
            vec![]
        }

        async fn call_tool(&self, name: &str, _params: Value) -> EmbeddableResult<CallToolResult> {
            Err(EmbeddableError::ToolNotFound(name.to_string()))
        }
    }

    #[test]
    fn test_defaults() {
        let server = TestServer;
        assert_eq!(server.server_name(), "test-server");
        assert!(server.server_version().is_none());
        assert!(server.list_tools().is_empty());
    }

    #[test]
    fn test_notification_hook_is_a_no_op() {
        let server = TestServer;
        tokio_test::block_on(server.on_notification("notifications/initialized", Value::Null));
    }

    #[tokio::test]
    async fn test_call_unknown_tool() {
        let server = TestServer;
        let result = server.call_tool("unknown", serde_json::json!({})).await;
        assert!(matches!(result, Err(EmbeddableError::ToolNotFound(ref n)) if n == "unknown"));
    }
}
