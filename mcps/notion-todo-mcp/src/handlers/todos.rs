//! Task queries and writes

use mcp_common::{json_success, text_success};
use serde_json::{json, Map, Value};

use super::{HandlerError, HandlerResult};
use crate::filter::{self, Filter};
use crate::format::{format_todo, TaskRecord};
use crate::notion::types::rich_text;
use crate::notion::Sort;
use crate::params::*;
use crate::server::NotionTodoServer;

pub const URGENT_PRIORITIES: [&str; 2] = ["Critical", "Important"];
pub const INITIAL_STATUS: &str = "To do";

// ============================================================================
// Writes
// ============================================================================

pub async fn add_todo(server: &NotionTodoServer, params: AddTodoParams) -> HandlerResult {
    let mut properties = Map::new();
    properties.insert("Task".to_string(), json!({ "title": rich_text(&params.task) }));
    properties.insert(
        "Status".to_string(),
        json!({ "status": { "name": INITIAL_STATUS } }),
    );
    properties.insert(
        "Priority".to_string(),
        json!({ "select": { "name": params.priority } }),
    );
    if !params.tags.is_empty() {
        let options: Vec<Value> = params.tags.iter().map(|t| json!({ "name": t })).collect();
        properties.insert("Tags".to_string(), json!({ "multi_select": options }));
    }

    let page = server
        .store()
        .create_page(server.database_id(), Value::Object(properties))
        .await?;
    tracing::info!("Created todo {}", page.id);

    let tags_text = if params.tags.is_empty() {
        String::new()
    } else {
        format!(" with tags: {}", params.tags.join(", "))
    };
    Ok(text_success(format!(
        "Added todo: {} (priority: {}){}",
        params.task, params.priority, tags_text
    )))
}

pub async fn update_task_status(
    server: &NotionTodoServer,
    params: UpdateStatusParams,
) -> HandlerResult {
    let properties = json!({ "Status": { "status": { "name": params.status } } });
    server
        .store()
        .update_page(&params.task_id, properties)
        .await?;
    tracing::info!("Task {} moved to {}", params.task_id, params.status);

    Ok(text_success(format!(
        "Updated task status to: {} (ID: {})",
        params.status, params.task_id
    )))
}

// ============================================================================
// Queries
// ============================================================================

pub async fn show_all_todos(server: &NotionTodoServer) -> HandlerResult {
    list(server, filter::combined(None, None, None)).await
}

pub async fn show_pro_tasks(server: &NotionTodoServer) -> HandlerResult {
    list(server, filter::by_tag("Pro")).await
}

pub async fn show_family_tasks(server: &NotionTodoServer) -> HandlerResult {
    list(server, filter::by_tag("Family")).await
}

pub async fn show_admin_tasks(server: &NotionTodoServer) -> HandlerResult {
    list(server, filter::by_tag("Administrative")).await
}

pub async fn show_quick_tasks(server: &NotionTodoServer) -> HandlerResult {
    list(server, filter::by_tag("Quick to finish")).await
}

pub async fn show_urgent_tasks(server: &NotionTodoServer) -> HandlerResult {
    list(server, filter::by_priority(&URGENT_PRIORITIES)).await
}

pub async fn show_blocked_tasks(server: &NotionTodoServer) -> HandlerResult {
    let blocked = ["Blocked".to_string()];
    list(server, filter::combined(None, None, Some(&blocked[..]))).await
}

pub async fn show_tasks_by_tag(server: &NotionTodoServer, params: TagParams) -> HandlerResult {
    list(server, filter::by_tag(&params.tag)).await
}

pub async fn show_tasks_by_priority(
    server: &NotionTodoServer,
    params: PriorityParams,
) -> HandlerResult {
    list(server, filter::by_priority(&[params.priority])).await
}

/// Query with `filter`, newest first, and render the records as JSON text
async fn list(server: &NotionTodoServer, filter: Filter) -> HandlerResult {
    let pages = server
        .store()
        .query(server.database_id(), Some(&filter), &[Sort::newest_first()])
        .await?;

    let records: Vec<TaskRecord> = pages.iter().map(format_todo).collect();
    json_success(&records).map_err(HandlerError::from)
}
