//! Notion TODO MCP Library
//!
//! Manage a TODO database in Notion through MCP tools: add tasks, list them by
//! tag, priority or status, update their status, and create a correctly
//! shaped database when none exists.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use notion_todo_mcp::{Config, NotionTodoServer};
//!
//! let config = Config::load()?;
//! let server = NotionTodoServer::new(&config)?;
//! // Serve via stdio, or call tools in-process through EmbeddableMcp
//! ```
//!
//! # Configuration
//! Set `NOTION_API_KEY` and `NOTION_DATABASE_ID`, or configure them in
//! `~/.binks/notion-todo.toml`

pub mod config;
pub mod filter;
pub mod format;
pub mod handlers;
pub mod notion;
pub mod params;
pub mod registry;
pub mod server;

// Re-export main server type
pub use config::Config;
pub use server::NotionTodoServer;

// Re-export the store seam for alternative backends
pub use notion::{RemoteError, TodoStore};
