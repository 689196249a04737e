//! Remote store access
//!
//! [`TodoStore`] is the narrow set of Notion operations the tools need;
//! [`NotionClient`] implements it over HTTP. Calls are single-shot: a failure
//! surfaces immediately as a [`RemoteError`] and retry policy is left to the
//! caller.

use async_trait::async_trait;
use serde_json::Value;

use crate::filter::Filter;

pub mod client;
pub mod types;

pub use client::NotionClient;
pub use types::{DatabaseSchema, Page, Sort};

/// A failed call to the remote store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Notion API error{}: {}", status_suffix(.status_code), .message)]
pub struct RemoteError {
    /// HTTP status, when the failure got far enough to have one
    pub status_code: Option<u16>,
    pub message: String,
}

impl RemoteError {
    pub fn new(status_code: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
        }
    }

    /// Build from an error response, preferring Notion's own `message` field
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| body.trim().to_string());
        Self::new(Some(status), message)
    }
}

fn status_suffix(status_code: &Option<u16>) -> String {
    status_code.map(|code| format!(" {}", code)).unwrap_or_default()
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.status().map(|s| s.as_u16()), err.to_string())
    }
}

/// The remote task store
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Query a database; results follow `sorts`
    async fn query(
        &self,
        database_id: &str,
        filter: Option<&Filter>,
        sorts: &[Sort],
    ) -> Result<Vec<Page>, RemoteError>;

    /// Create a row in a database
    async fn create_page(&self, database_id: &str, properties: Value) -> Result<Page, RemoteError>;

    /// Patch a row's properties
    async fn update_page(&self, page_id: &str, properties: Value) -> Result<Page, RemoteError>;

    /// Fetch a database's title and property types
    async fn get_schema(&self, database_id: &str) -> Result<DatabaseSchema, RemoteError>;

    /// Search the workspace for objects of one type (`"page"` or `"database"`)
    async fn search(&self, object_type: &str) -> Result<Vec<Page>, RemoteError>;

    /// Create a database under a page; returns the new database id
    async fn create_database(
        &self,
        parent_page_id: &str,
        title: &str,
        properties: Value,
    ) -> Result<String, RemoteError>;

    /// Whether the database is reachable with the current credentials
    ///
    /// Advisory only: any failure, including network and auth errors, is
    /// reported as `false`.
    async fn exists(&self, database_id: &str) -> bool {
        match self.get_schema(database_id).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("Database {} not accessible: {}", database_id, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_uses_notion_message() {
        let body = r#"{"object":"error","status":404,"code":"object_not_found","message":"Could not find database"}"#;
        let err = RemoteError::from_response(404, body);
        assert_eq!(err.status_code, Some(404));
        assert_eq!(err.message, "Could not find database");
        assert_eq!(err.to_string(), "Notion API error 404: Could not find database");
    }

    #[test]
    fn test_remote_error_falls_back_to_body() {
        let err = RemoteError::from_response(502, "  Bad Gateway \n");
        assert_eq!(err.message, "Bad Gateway");
    }

    #[test]
    fn test_remote_error_without_status() {
        let err = RemoteError::new(None, "connection refused");
        assert_eq!(err.to_string(), "Notion API error: connection refused");
    }
}
