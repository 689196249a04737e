//! Notion HTTP client
//!
//! See: https://developers.notion.com/reference/intro

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use super::types::{rich_text, DatabaseSchema, Page, PageList, RawDatabase, Sort};
use super::{RemoteError, TodoStore};
use crate::config::NotionConfig;
use crate::filter::Filter;

/// Notion caps search results per call; setup only needs a candidate parent
const SEARCH_PAGE_SIZE: u32 = 10;

/// Notion API client
pub struct NotionClient {
    client: Client,
    config: NotionConfig,
}

impl NotionClient {
    pub fn new(config: NotionConfig) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .user_agent(concat!("notion-todo-mcp/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);
        self.client
            .request(method, url)
            .bearer_auth(&self.config.api_key)
            .header("Notion-Version", &self.config.api_version)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, RemoteError> {
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(RemoteError::from_response(status.as_u16(), &text));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl TodoStore for NotionClient {
    async fn query(
        &self,
        database_id: &str,
        filter: Option<&Filter>,
        sorts: &[Sort],
    ) -> Result<Vec<Page>, RemoteError> {
        let path = format!("databases/{}/query", database_id);
        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = Map::new();
            body.insert("sorts".to_string(), json!(sorts));
            if let Some(filter) = filter {
                body.insert("filter".to_string(), filter.to_notion());
            }
            if let Some(cursor) = &cursor {
                body.insert("start_cursor".to_string(), json!(cursor));
            }

            let batch: PageList = self
                .send(self.request(Method::POST, &path).json(&body))
                .await?;
            pages.extend(batch.results);

            match batch.next_cursor {
                Some(next) if batch.has_more => cursor = Some(next),
                _ => break,
            }
        }

        tracing::debug!("Query on {} returned {} pages", database_id, pages.len());
        Ok(pages)
    }

    async fn create_page(&self, database_id: &str, properties: Value) -> Result<Page, RemoteError> {
        let body = json!({
            "parent": { "database_id": database_id },
            "properties": properties,
        });
        self.send(self.request(Method::POST, "pages").json(&body))
            .await
    }

    async fn update_page(&self, page_id: &str, properties: Value) -> Result<Page, RemoteError> {
        let body = json!({ "properties": properties });
        self.send(
            self.request(Method::PATCH, &format!("pages/{}", page_id))
                .json(&body),
        )
        .await
    }

    async fn get_schema(&self, database_id: &str) -> Result<DatabaseSchema, RemoteError> {
        let raw: RawDatabase = self
            .send(self.request(Method::GET, &format!("databases/{}", database_id)))
            .await?;
        Ok(raw.into())
    }

    async fn search(&self, object_type: &str) -> Result<Vec<Page>, RemoteError> {
        let body = json!({
            "filter": { "value": object_type, "property": "object" },
            "page_size": SEARCH_PAGE_SIZE,
        });
        let list: PageList = self
            .send(self.request(Method::POST, "search").json(&body))
            .await?;
        Ok(list.results)
    }

    async fn create_database(
        &self,
        parent_page_id: &str,
        title: &str,
        properties: Value,
    ) -> Result<String, RemoteError> {
        let body = json!({
            "parent": { "type": "page_id", "page_id": parent_page_id },
            "title": rich_text(title),
            "properties": properties,
        });
        let created: Value = self
            .send(self.request(Method::POST, "databases").json(&body))
            .await?;

        created
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| RemoteError::new(None, "create database response has no id"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn config_for(base_url: String) -> NotionConfig {
        NotionConfig {
            api_key: "secret_test".to_string(),
            database_id: "db-1".to_string(),
            base_url,
            ..Default::default()
        }
    }

    /// Serve one canned HTTP response and hand back the raw request text
    async fn one_shot_server(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request).to_string();
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text
                        .lines()
                        .find_map(|l| {
                            let lower = l.to_ascii_lowercase();
                            lower
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                        })
                        .unwrap_or(0);
                    if request.len() >= end + 4 + length || n == 0 {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).to_string()
        });

        (format!("http://{}", addr), handle)
    }

    #[tokio::test]
    async fn test_query_sends_headers_filter_and_sort() {
        let (base, server) = one_shot_server(
            "200 OK",
            r#"{"object":"list","results":[{"object":"page","id":"p-1","created_time":"2024-01-01T00:00:00.000Z","properties":{}}],"has_more":false,"next_cursor":null}"#,
        )
        .await;
        let client = NotionClient::new(config_for(base)).unwrap();

        let filter = crate::filter::by_tag("Work");
        let pages = client
            .query("db-1", Some(&filter), &[Sort::newest_first()])
            .await
            .unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].id, "p-1");

        let request = server.await.unwrap();
        let lower = request.to_ascii_lowercase();
        assert!(request.starts_with("POST /databases/db-1/query "));
        assert!(lower.contains("authorization: bearer secret_test"));
        assert!(lower.contains("notion-version: 2022-06-28"));
        assert!(request.contains("\"Travaux\""));
        assert!(request.contains("\"created_time\""));
    }

    #[tokio::test]
    async fn test_error_status_becomes_remote_error() {
        let (base, server) = one_shot_server(
            "401 Unauthorized",
            r#"{"object":"error","status":401,"code":"unauthorized","message":"API token is invalid."}"#,
        )
        .await;
        let client = NotionClient::new(config_for(base)).unwrap();

        let err = client
            .update_page("p-1", json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.status_code, Some(401));
        assert_eq!(err.message, "API token is invalid.");

        let request = server.await.unwrap();
        assert!(request.starts_with("PATCH /pages/p-1 "));
    }

    #[tokio::test]
    async fn test_exists_is_false_when_unreachable() {
        // Bind then drop to get a port with nothing listening.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = NotionClient::new(config_for(format!("http://{}", addr))).unwrap();
        assert!(!client.exists("db-1").await);

        let err = client.get_schema("db-1").await.unwrap_err();
        assert_eq!(err.status_code, None);
    }
}
