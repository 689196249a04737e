//! Tool registry
//!
//! The fixed catalog of operations this server exposes. Descriptors are
//! declared by hand so each field can carry its closed set of allowed values.

use rmcp::model::{JsonObject, Tool};
use serde_json::{json, Value};
use std::sync::Arc;

pub const TAG_CHOICES: [&str; 8] = [
    "Administrative",
    "Family",
    "IT",
    "Productivity",
    "Project",
    "Quick to finish",
    "Pro",
    "Work",
];

pub const PRIORITY_CHOICES: [&str; 4] = ["Critical", "Important", "Moderate", "Non-essential"];

pub const STATUS_CHOICES: [&str; 7] = [
    "To describe",
    "To validate",
    "To do",
    "Blocked",
    "In progress",
    "Killed",
    "Done",
];

pub const DEFAULT_DATABASE_NAME: &str = "TODO Database";

/// JSON type of an argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    StringArray,
}

impl FieldKind {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::StringArray => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::StringArray => "array",
        }
    }
}

/// One argument of an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub description: &'static str,
    pub required: bool,
    pub choices: &'static [&'static str],
    pub default: Option<&'static str>,
}

impl FieldSpec {
    fn required(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::String,
            description,
            required: true,
            choices: &[],
            default: None,
        }
    }

    fn optional(name: &'static str, description: &'static str) -> Self {
        Self {
            required: false,
            ..Self::required(name, description)
        }
    }

    fn kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    fn choices(mut self, choices: &'static [&'static str]) -> Self {
        self.choices = choices;
        self
    }

    fn default_value(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    fn to_schema(&self) -> Value {
        let mut schema = json!({
            "type": self.kind.type_name(),
            "description": self.description,
        });
        if self.kind == FieldKind::StringArray {
            schema["items"] = json!({ "type": "string" });
        }
        if !self.choices.is_empty() {
            schema["enum"] = json!(self.choices);
        }
        if let Some(default) = self.default {
            schema["default"] = json!(default);
        }
        schema
    }
}

/// Name, description and argument schema of one operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub fields: Vec<FieldSpec>,
}

impl OperationDescriptor {
    fn new(name: &'static str, description: &'static str, fields: Vec<FieldSpec>) -> Self {
        Self {
            name,
            description,
            fields,
        }
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }

    /// `{"type":"object","properties":{...},"required":[...]}`
    pub fn input_schema(&self) -> JsonObject {
        let properties: serde_json::Map<String, Value> = self
            .fields
            .iter()
            .map(|f| (f.name.to_string(), f.to_schema()))
            .collect();
        let required: Vec<&str> = self.required_fields().map(|f| f.name).collect();

        let mut schema = JsonObject::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        schema.insert("required".to_string(), json!(required));
        schema
    }

    pub fn to_tool(&self) -> Tool {
        Tool::new(self.name, self.description, Arc::new(self.input_schema()))
    }
}

/// The ordered tool catalog
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    operations: Vec<OperationDescriptor>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        let no_args = Vec::new;

        let operations = vec![
            OperationDescriptor::new(
                "add_todo",
                "Add a new todo item with tags and priority",
                vec![
                    FieldSpec::required("task", "The todo task description"),
                    FieldSpec::optional(
                        "tags",
                        "Tags for the task (Administrative, Family, IT, Productivity, \
                         Project, Quick to finish, Pro, Work)",
                    )
                    .kind(FieldKind::StringArray),
                    FieldSpec::optional("priority", "Priority level").choices(&PRIORITY_CHOICES),
                ],
            ),
            OperationDescriptor::new("show_all_todos", "Show all active todo items from Notion", no_args()),
            OperationDescriptor::new(
                "show_pro_tasks",
                "Show professional tasks (Pro tag)",
                no_args(),
            ),
            OperationDescriptor::new(
                "show_family_tasks",
                "Show family tasks (Family tag)",
                no_args(),
            ),
            OperationDescriptor::new(
                "show_admin_tasks",
                "Show administrative tasks (Administrative tag)",
                no_args(),
            ),
            OperationDescriptor::new(
                "show_quick_tasks",
                "Show quick tasks (Quick to finish tag)",
                no_args(),
            ),
            OperationDescriptor::new(
                "show_urgent_tasks",
                "Show urgent tasks (Critical and Important priorities)",
                no_args(),
            ),
            OperationDescriptor::new("show_blocked_tasks", "Show blocked tasks", no_args()),
            OperationDescriptor::new(
                "show_tasks_by_tag",
                "Show tasks filtered by specific tag",
                vec![FieldSpec::required("tag", "Tag to filter by").choices(&TAG_CHOICES)],
            ),
            OperationDescriptor::new(
                "show_tasks_by_priority",
                "Show tasks filtered by priority level",
                vec![
                    FieldSpec::required("priority", "Priority to filter by")
                        .choices(&PRIORITY_CHOICES),
                ],
            ),
            OperationDescriptor::new(
                "update_task_status",
                "Update task status",
                vec![
                    FieldSpec::required("task_id", "The ID of the todo task to update"),
                    FieldSpec::required("status", "New status").choices(&STATUS_CHOICES),
                ],
            ),
            OperationDescriptor::new(
                "check_setup",
                "Check if the TODO database is properly configured and accessible",
                no_args(),
            ),
            OperationDescriptor::new(
                "setup_todo_database",
                "Create a new TODO database with proper schema if none exists",
                vec![FieldSpec::optional("database_name", "Name for the new TODO database")
                    .default_value(DEFAULT_DATABASE_NAME)],
            ),
        ];

        Self { operations }
    }

    pub fn list(&self) -> &[OperationDescriptor] {
        &self.operations
    }

    pub fn get(&self, name: &str) -> Option<&OperationDescriptor> {
        self.operations.iter().find(|op| op.name == name)
    }

    pub fn tools(&self) -> Vec<Tool> {
        self.operations.iter().map(OperationDescriptor::to_tool).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order() {
        let registry = ToolRegistry::new();
        let names: Vec<&str> = registry.list().iter().map(|op| op.name).collect();
        assert_eq!(
            names,
            vec![
                "add_todo",
                "show_all_todos",
                "show_pro_tasks",
                "show_family_tasks",
                "show_admin_tasks",
                "show_quick_tasks",
                "show_urgent_tasks",
                "show_blocked_tasks",
                "show_tasks_by_tag",
                "show_tasks_by_priority",
                "update_task_status",
                "check_setup",
                "setup_todo_database",
            ]
        );
    }

    #[test]
    fn test_required_fields() {
        let registry = ToolRegistry::new();
        let required = |name: &str| -> Vec<&str> {
            registry
                .get(name)
                .unwrap()
                .required_fields()
                .map(|f| f.name)
                .collect()
        };
        assert_eq!(required("add_todo"), vec!["task"]);
        assert_eq!(required("show_tasks_by_tag"), vec!["tag"]);
        assert_eq!(required("show_tasks_by_priority"), vec!["priority"]);
        assert_eq!(required("update_task_status"), vec!["task_id", "status"]);
        assert!(required("setup_todo_database").is_empty());
        assert!(required("show_all_todos").is_empty());
        assert!(registry.get("delete_everything").is_none());
    }

    #[test]
    fn test_add_todo_schema() {
        let registry = ToolRegistry::new();
        let schema = Value::Object(registry.get("add_todo").unwrap().input_schema());
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["task"]));
        assert_eq!(schema["properties"]["tags"]["type"], "array");
        assert_eq!(schema["properties"]["tags"]["items"]["type"], "string");
        assert_eq!(
            schema["properties"]["priority"]["enum"],
            json!(["Critical", "Important", "Moderate", "Non-essential"])
        );
    }

    #[test]
    fn test_rendered_tools() {
        let tools = ToolRegistry::new().tools();
        assert_eq!(tools.len(), 13);

        let setup = serde_json::to_value(&tools[12]).unwrap();
        assert_eq!(setup["name"], "setup_todo_database");
        assert_eq!(
            setup["inputSchema"]["properties"]["database_name"]["default"],
            "TODO Database"
        );

        let status = serde_json::to_value(&tools[10]).unwrap();
        assert_eq!(
            status["inputSchema"]["properties"]["status"]["enum"]
                .as_array()
                .unwrap()
                .len(),
            7
        );
    }

    #[test]
    fn test_field_kind_matches() {
        assert!(FieldKind::String.matches(&json!("x")));
        assert!(!FieldKind::String.matches(&json!(3)));
        assert!(FieldKind::StringArray.matches(&json!(["a", "b"])));
        assert!(!FieldKind::StringArray.matches(&json!(["a", 1])));
        assert!(!FieldKind::StringArray.matches(&json!("a")));
    }
}
