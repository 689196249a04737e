//! MCP server for a Notion TODO database
//!
//! This module holds the server state and wires it to the stdio dispatcher.
//! Tool implementations are in the handlers module.

use mcp_common::{async_trait, CallToolResult, EmbeddableMcp, EmbeddableResult, Tool};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::handlers;
use crate::notion::{NotionClient, RemoteError, TodoStore};
use crate::registry::ToolRegistry;

/// The main Notion TODO MCP server
pub struct NotionTodoServer {
    store: Arc<dyn TodoStore>,
    registry: ToolRegistry,
    database_id: String,
    /// Last existence probe; `None` until the first one
    exists_cache: Mutex<Option<bool>>,
}

impl NotionTodoServer {
    pub fn new(config: &Config) -> Result<Self, RemoteError> {
        let client = NotionClient::new(config.notion.clone())?;
        Ok(Self::with_store(
            Arc::new(client),
            config.notion.database_id.clone(),
        ))
    }

    /// Build a server over any store, e.g. an in-memory one in tests
    pub fn with_store(store: Arc<dyn TodoStore>, database_id: impl Into<String>) -> Self {
        Self {
            store,
            registry: ToolRegistry::new(),
            database_id: database_id.into(),
            exists_cache: Mutex::new(None),
        }
    }

    pub fn store(&self) -> &dyn TodoStore {
        self.store.as_ref()
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn database_id(&self) -> &str {
        &self.database_id
    }

    /// Whether the configured database is reachable
    ///
    /// A positive answer is remembered for the life of the process. A negative
    /// one is probed again next time, since the database may be created or
    /// shared with the integration in the meantime.
    pub async fn database_exists(&self) -> bool {
        let mut cached = self.exists_cache.lock().await;
        if *cached == Some(true) {
            return true;
        }

        let exists = self.store.exists(&self.database_id).await;
        tracing::debug!("Database {} exists: {}", self.database_id, exists);
        *cached = Some(exists);
        exists
    }
}

#[async_trait]
impl EmbeddableMcp for NotionTodoServer {
    fn server_name(&self) -> &str {
        "notion-todo"
    }

    fn server_description(&self) -> Option<&str> {
        Some(
            "Notion TODO MCP Server - add, list and update tasks in a Notion \
             database, filtered by tag, priority or status.",
        )
    }

    fn server_version(&self) -> Option<&str> {
        Some(env!("CARGO_PKG_VERSION"))
    }

    fn list_tools(&self) -> Vec<Tool> {
        self.registry.tools()
    }

    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
        handlers::call(self, name, params).await
    }
}
