//! Record formatter
//!
//! A database may name the same column differently depending on how it was
//! set up (English, French, or a generic name), so each field is looked up
//! through an ordered list of candidate property names. The first candidate
//! holding a non-empty value wins. Missing or unexpected properties never
//! cause an error; the field falls back to its default.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::notion::Page;

pub const TITLE_CANDIDATES: [&str; 4] = ["Tâche", "Task", "Name", "Title"];
pub const TAGS_CANDIDATES: [&str; 3] = ["Tags", "Labels", "Categories"];
pub const STATUS_CANDIDATES: [&str; 3] = ["Status", "État", "State"];
pub const PRIORITY_CANDIDATES: [&str; 3] = ["Priorité", "Priority", "Importance"];
pub const DUE_DATE_CANDIDATES: [&str; 4] = ["Date butoire", "Due date", "Due Date", "Deadline"];

/// Placeholder for an unset status or priority
pub const UNKNOWN: &str = "Unknown";

/// Normalized view of one task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub task: String,
    pub tags: Vec<String>,
    pub status: String,
    pub priority: String,
    pub created: String,
    pub due_date: Option<String>,
}

/// Map a raw page to a [`TaskRecord`]
pub fn format_todo(page: &Page) -> TaskRecord {
    let props = &page.properties;

    let task = first_match(props, &TITLE_CANDIDATES, |p| {
        let fragments = p.get("title")?.as_array()?;
        let first = fragments.first()?;
        first
            .pointer("/text/content")
            .or_else(|| first.get("plain_text"))
            .and_then(Value::as_str)
            .map(str::to_string)
    })
    .unwrap_or_default();

    let tags = first_match(props, &TAGS_CANDIDATES, |p| {
        let options = p.get("multi_select")?.as_array()?;
        let names: Vec<String> = options
            .iter()
            .filter_map(|o| o.get("name").and_then(Value::as_str))
            .map(str::to_string)
            .collect();
        (!names.is_empty()).then_some(names)
    })
    .unwrap_or_default();

    let status = first_match(props, &STATUS_CANDIDATES, |p| named_option(p, "status"))
        .unwrap_or_else(|| UNKNOWN.to_string());

    let priority = first_match(props, &PRIORITY_CANDIDATES, |p| named_option(p, "select"))
        .unwrap_or_else(|| UNKNOWN.to_string());

    let due_date = first_match(props, &DUE_DATE_CANDIDATES, |p| {
        p.pointer("/date/start")
            .and_then(Value::as_str)
            .map(str::to_string)
    });

    TaskRecord {
        id: page.id.clone(),
        task,
        tags,
        status,
        priority,
        created: page.created_time.clone(),
        due_date,
    }
}

/// Try each candidate in order; the first one that yields a non-empty value wins
fn first_match<T, F>(
    props: &serde_json::Map<String, Value>,
    candidates: &[&str],
    extract: F,
) -> Option<T>
where
    F: Fn(&Value) -> Option<T>,
    T: NonEmpty,
{
    candidates
        .iter()
        .filter_map(|name| props.get(*name))
        .filter_map(&extract)
        .find(|value| !value.is_empty())
}

/// `{ "<kind>": { "name": ... } }`, as used by status and select properties
fn named_option(prop: &Value, kind: &str) -> Option<String> {
    prop.get(kind)?
        .get("name")?
        .as_str()
        .map(str::to_string)
}

trait NonEmpty {
    fn is_empty(&self) -> bool;
}

impl NonEmpty for String {
    fn is_empty(&self) -> bool {
        str::is_empty(self)
    }
}

impl NonEmpty for Vec<String> {
    fn is_empty(&self) -> bool {
        <[String]>::is_empty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(properties: Value) -> Page {
        serde_json::from_value(json!({
            "object": "page",
            "id": "page-1",
            "created_time": "2024-03-01T10:00:00.000Z",
            "properties": properties,
        }))
        .unwrap()
    }

    fn title(content: &str) -> Value {
        json!({ "type": "title", "title": [{ "type": "text", "text": { "content": content }, "plain_text": content }] })
    }

    #[test]
    fn test_title_only_record() {
        let record = format_todo(&page(json!({ "Title": title("Water the plants") })));
        assert_eq!(record.task, "Water the plants");
        assert_eq!(record.status, "Unknown");
        assert_eq!(record.priority, "Unknown");
        assert!(record.tags.is_empty());
        assert_eq!(record.due_date, None);
        assert_eq!(record.id, "page-1");
        assert_eq!(record.created, "2024-03-01T10:00:00.000Z");
    }

    #[test]
    fn test_candidate_order_wins() {
        let record = format_todo(&page(json!({
            "Name": title("generic"),
            "Tâche": title("french"),
        })));
        assert_eq!(record.task, "french");
    }

    #[test]
    fn test_empty_candidates_are_skipped() {
        let record = format_todo(&page(json!({
            "Tâche": { "type": "title", "title": [] },
            "Task": title("fallback"),
            "Tags": { "type": "multi_select", "multi_select": [] },
            "Labels": { "type": "multi_select", "multi_select": [{ "name": "Famille" }] },
            "Status": { "type": "status", "status": null },
            "État": { "type": "status", "status": { "name": "En cours" } },
        })));
        assert_eq!(record.task, "fallback");
        assert_eq!(record.tags, vec!["Famille"]);
        assert_eq!(record.status, "En cours");
    }

    #[test]
    fn test_full_french_record() {
        let record = format_todo(&page(json!({
            "Tâche": title("Remplir la déclaration"),
            "Tags": { "type": "multi_select", "multi_select": [{ "name": "Administratif" }, { "name": "Rapide à terminer" }] },
            "Status": { "type": "status", "status": { "name": "To do" } },
            "Priorité": { "type": "select", "select": { "name": "Critical" } },
            "Date butoire": { "type": "date", "date": { "start": "2024-04-15", "end": null } },
            "Unrelated": { "type": "number", "number": 3 },
        })));
        assert_eq!(
            record,
            TaskRecord {
                id: "page-1".to_string(),
                task: "Remplir la déclaration".to_string(),
                tags: vec!["Administratif".to_string(), "Rapide à terminer".to_string()],
                status: "To do".to_string(),
                priority: "Critical".to_string(),
                created: "2024-03-01T10:00:00.000Z".to_string(),
                due_date: Some("2024-04-15".to_string()),
            }
        );
    }

    #[test]
    fn test_wrongly_typed_properties_degrade_to_defaults() {
        let record = format_todo(&page(json!({
            "Task": "not an object",
            "Tags": { "multi_select": "oops" },
            "Priority": { "select": { "id": "x" } },
        })));
        assert_eq!(record.task, "");
        assert!(record.tags.is_empty());
        assert_eq!(record.priority, "Unknown");
    }
}
