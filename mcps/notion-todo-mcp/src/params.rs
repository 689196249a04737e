//! Parameter definitions for notion-todo-mcp tools

use serde::{Deserialize, Serialize};

use crate::registry::DEFAULT_DATABASE_NAME;

pub const DEFAULT_PRIORITY: &str = "Moderate";

// ============================================================================
// Write Operations
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTodoParams {
    pub task: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_priority")]
    pub priority: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusParams {
    /// Notion page id of the task
    pub task_id: String,
    pub status: String,
}

// ============================================================================
// Queries
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagParams {
    pub tag: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityParams {
    pub priority: String,
}

// ============================================================================
// Setup
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupParams {
    #[serde(default = "default_database_name")]
    pub database_name: String,
}

fn default_priority() -> String {
    DEFAULT_PRIORITY.to_string()
}

fn default_database_name() -> String {
    DEFAULT_DATABASE_NAME.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_todo_defaults() {
        let params: AddTodoParams =
            serde_json::from_value(json!({ "task": "Call the bank" })).unwrap();
        assert_eq!(params.priority, "Moderate");
        assert!(params.tags.is_empty());
    }

    #[test]
    fn test_setup_default_name() {
        let params: SetupParams = serde_json::from_value(json!({})).unwrap();
        assert_eq!(params.database_name, "TODO Database");
    }
}
