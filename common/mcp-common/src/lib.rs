//! MCP Common - Shared plumbing for stdio MCP servers
//!
//! - **Protocol**: newline-delimited JSON-RPC 2.0 envelopes ([`protocol`])
//! - **Dispatch**: the read/route/respond loop ([`dispatch::serve`])
//! - **Embeddable**: the [`EmbeddableMcp`] trait a server implements to be served
//! - **Errors**: [`RpcError`] and the standard JSON-RPC codes
//! - **Results**: helpers for building `CallToolResult` payloads
//! - **Init**: stderr tracing setup
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     mcp_common::init_tracing("my_mcp")?;
//!     let server = Arc::new(MyServer::new());
//!     mcp_common::serve_stdio(server).await
//! }
//! ```

pub mod dispatch;
pub mod embeddable;
pub mod error;
pub mod init;
pub mod protocol;
pub mod result;

// Re-export commonly used items at crate root
pub use dispatch::{serve, serve_stdio};
pub use embeddable::{EmbeddableError, EmbeddableMcp, EmbeddableResult};
pub use error::{RpcError, INTERNAL_ERROR, METHOD_NOT_FOUND, PARSE_ERROR};
pub use init::init_tracing;
pub use result::{json_success, text_success};

// Re-export rmcp types that are commonly needed
pub use rmcp::model::{CallToolResult, Content, Tool};

// Re-export async_trait for implementing EmbeddableMcp
pub use async_trait::async_trait;
