//! Wire types for the subset of the Notion API this server uses

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// A page (database row) as returned by query, create, update and search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub created_time: String,
    #[serde(default)]
    pub parent: Value,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl Page {
    /// `parent.type`, e.g. `"database_id"`, `"page_id"` or `"workspace"`
    pub fn parent_type(&self) -> Option<&str> {
        self.parent.get("type").and_then(Value::as_str)
    }
}

/// One page of a paginated list response
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PageList {
    #[serde(default)]
    pub results: Vec<Page>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// A database's title and its property name -> property type map
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSchema {
    pub title: String,
    pub properties: BTreeMap<String, String>,
}

impl DatabaseSchema {
    pub fn property_type(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawDatabase {
    #[serde(default)]
    pub title: Vec<RichText>,
    #[serde(default)]
    pub properties: BTreeMap<String, RawProperty>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawProperty {
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RichText {
    #[serde(default)]
    pub plain_text: Option<String>,
    #[serde(default)]
    pub text: Option<TextContent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TextContent {
    #[serde(default)]
    pub content: String,
}

impl RichText {
    fn content(&self) -> &str {
        self.plain_text
            .as_deref()
            .or_else(|| self.text.as_ref().map(|t| t.content.as_str()))
            .unwrap_or_default()
    }
}

impl From<RawDatabase> for DatabaseSchema {
    fn from(raw: RawDatabase) -> Self {
        let title: String = raw.title.iter().map(RichText::content).collect();
        Self {
            title: if title.is_empty() {
                "Unknown".to_string()
            } else {
                title
            },
            properties: raw
                .properties
                .into_iter()
                .map(|(name, prop)| (name, prop.kind))
                .collect(),
        }
    }
}

/// Query ordering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sort {
    pub timestamp: String,
    pub direction: String,
}

impl Sort {
    pub fn newest_first() -> Self {
        Self {
            timestamp: "created_time".to_string(),
            direction: "descending".to_string(),
        }
    }
}

/// Notion's `[{ "type": "text", "text": { "content": ... } }]` rich text array
pub fn rich_text(content: &str) -> Value {
    json!([{ "type": "text", "text": { "content": content } }])
}
