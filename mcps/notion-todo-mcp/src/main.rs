//! Notion TODO MCP Server
//!
//! Notion-backed TODO list served over stdio.
//!
//! # Configuration
//! Set `NOTION_API_KEY` and `NOTION_DATABASE_ID` env vars or configure them in
//! `~/.binks/notion-todo.toml`

use std::sync::Arc;

use notion_todo_mcp::{Config, NotionTodoServer};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    mcp_common::init_tracing("notion_todo_mcp")?;

    tracing::info!("Starting Notion TODO MCP Server");

    let config = Config::load()?;
    tracing::info!("Notion database: {}", config.notion.database_id);

    let server = NotionTodoServer::new(&config)?;

    tracing::info!("Server running, waiting for requests...");
    mcp_common::serve_stdio(Arc::new(server)).await?;

    tracing::info!("Server shutting down");
    Ok(())
}
