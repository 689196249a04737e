//! Database setup and health check

use mcp_common::{text_success, EmbeddableError};
use serde_json::{json, Value};

use super::HandlerResult;
use crate::format::{PRIORITY_CANDIDATES, STATUS_CANDIDATES, TAGS_CANDIDATES, TITLE_CANDIDATES};
use crate::notion::{DatabaseSchema, Page, TodoStore};
use crate::params::SetupParams;
use crate::server::NotionTodoServer;

/// Category name, accepted property names, and the Notion type they must have
const REQUIRED_PROPERTIES: [(&str, &[&str], &str); 4] = [
    ("title", &TITLE_CANDIDATES, "title"),
    ("tags", &TAGS_CANDIDATES, "multi_select"),
    ("status", &STATUS_CANDIDATES, "status"),
    ("priority", &PRIORITY_CANDIDATES, "select"),
];

const TAG_PALETTE: [(&str, &str); 8] = [
    ("Administrative", "red"),
    ("Family", "green"),
    ("IT", "blue"),
    ("Productivity", "purple"),
    ("Project", "orange"),
    ("Quick to finish", "yellow"),
    ("Pro", "gray"),
    ("Work", "brown"),
];

const STATUS_PALETTE: [(&str, &str); 7] = [
    ("To describe", "gray"),
    ("To validate", "yellow"),
    ("To do", "red"),
    ("Blocked", "orange"),
    ("In progress", "blue"),
    ("Done", "green"),
    ("Killed", "default"),
];

const PRIORITY_PALETTE: [(&str, &str); 4] = [
    ("Critical", "red"),
    ("Important", "orange"),
    ("Moderate", "yellow"),
    ("Non-essential", "gray"),
];

pub async fn check_setup(server: &NotionTodoServer) -> HandlerResult {
    if !server.database_exists().await {
        return Ok(text_success(format!(
            "TODO database not found or not accessible.\n\n\
             Database ID: {}\n\n\
             Options:\n\
             1. Run 'setup_todo_database' to create a new database\n\
             2. Check your NOTION_DATABASE_ID setting\n\
             3. Verify integration permissions in Notion settings",
            server.database_id()
        )));
    }

    let schema = match server.store().get_schema(server.database_id()).await {
        Ok(schema) => schema,
        Err(e) => {
            tracing::error!("Failed to read database schema: {}", e);
            return Ok(text_success(format!(
                "Error checking database configuration: {}\n\n\
                 Please verify your NOTION_DATABASE_ID and integration permissions.",
                e
            )));
        }
    };

    let missing = missing_categories(&schema);
    if !missing.is_empty() {
        return Ok(text_success(format!(
            "Database exists but missing required properties: {}\n\n\
             Run 'setup_todo_database' to create a properly configured database.",
            missing.join(", ")
        )));
    }

    Ok(text_success(format!(
        "TODO database '{}' is properly configured!\n\n\
         Database ID: {}\n\
         Required properties: all present\n\n\
         You can now use all TODO commands like 'show_family_tasks', 'add_todo', etc.",
        schema.title,
        server.database_id()
    )))
}

pub async fn setup_todo_database(server: &NotionTodoServer, params: SetupParams) -> HandlerResult {
    if server.database_exists().await {
        return Ok(text_success(format!(
            "Database already exists!\n\n\
             Database ID: {}\n\n\
             Run 'check_setup' to verify the configuration.",
            server.database_id()
        )));
    }

    let parent = find_parent_page(server.store()).await?;
    let created = server
        .store()
        .create_database(&parent, &params.database_name, default_schema())
        .await;

    let new_id = match created {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Error creating database: {}", e);
            return Ok(text_success(format!(
                "Error creating database: {}\n\n\
                 Please check:\n\
                 1. Your Notion integration has permission to create databases\n\
                 2. You have write access to your workspace\n\
                 3. Your API token is valid",
                e
            )));
        }
    };
    tracing::info!("Created database {} under page {}", new_id, parent);

    Ok(text_success(format!(
        "Successfully created TODO database '{name}'!\n\n\
         Database ID: {id}\n\n\
         Next steps:\n\
         1. Set NOTION_DATABASE_ID={id}\n\
         2. Restart the MCP server\n\
         3. Run 'check_setup' to verify everything works\n\n\
         Your database includes:\n\
         - Tags: {tags}\n\
         - Status: {statuses}\n\
         - Priority: {priorities}\n\
         - Due date and Assignee fields",
        name = params.database_name,
        id = new_id,
        tags = option_names(&TAG_PALETTE),
        statuses = option_names(&STATUS_PALETTE),
        priorities = option_names(&PRIORITY_PALETTE),
    )))
}

/// Categories with no accepted property name of the right type
fn missing_categories(schema: &DatabaseSchema) -> Vec<&'static str> {
    REQUIRED_PROPERTIES
        .iter()
        .filter(|(_, names, kind)| {
            !names
                .iter()
                .any(|name| schema.property_type(name) == Some(*kind))
        })
        .map(|(category, _, _)| *category)
        .collect()
}

/// Pick a page to hold the new database, preferring one outside any database
async fn find_parent_page(store: &dyn TodoStore) -> Result<String, super::HandlerError> {
    let pages = store.search("page").await?;
    pick_parent(&pages).ok_or_else(|| {
        EmbeddableError::ExecutionError(
            "No accessible pages found. Please create a page in your Notion workspace \
             and share it with the integration first."
                .to_string(),
        )
        .into()
    })
}

fn pick_parent(pages: &[Page]) -> Option<String> {
    pages
        .iter()
        .find(|p| p.parent_type() != Some("database_id"))
        .or_else(|| pages.first())
        .map(|p| p.id.clone())
}

fn options(palette: &[(&str, &str)]) -> Value {
    let options: Vec<Value> = palette
        .iter()
        .map(|(name, color)| json!({ "name": name, "color": color }))
        .collect();
    json!({ "options": options })
}

fn option_names(palette: &[(&str, &str)]) -> String {
    palette
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Property definitions for a freshly created TODO database
pub fn default_schema() -> Value {
    json!({
        "Task": { "title": {} },
        "Tags": { "multi_select": options(&TAG_PALETTE) },
        "Status": { "status": options(&STATUS_PALETTE) },
        "Priority": { "select": options(&PRIORITY_PALETTE) },
        "Due date": { "date": {} },
        "Assignee": { "people": {} },
    })
}
