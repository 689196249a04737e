//! Handler implementations for notion-todo-mcp tools
//!
//! [`call`] validates arguments against the registry, runs the matching
//! handler and turns remote failures into an explanatory text payload. Only
//! local failures (unknown tool, bad arguments, nothing to work with) reach
//! the client as protocol errors.

use mcp_common::{text_success, CallToolResult, EmbeddableError, EmbeddableResult};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::notion::RemoteError;
use crate::registry::OperationDescriptor;
use crate::server::NotionTodoServer;

pub mod setup;
pub mod todos;

/// Failure inside a handler
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Tool(#[from] EmbeddableError),
}

pub type HandlerResult = Result<CallToolResult, HandlerError>;

/// Run one tool by name
pub async fn call(
    server: &NotionTodoServer,
    name: &str,
    arguments: Value,
) -> EmbeddableResult<CallToolResult> {
    let descriptor = server
        .registry()
        .get(name)
        .ok_or_else(|| EmbeddableError::ToolNotFound(name.to_string()))?;

    let arguments = without_nulls(arguments)?;
    validate_arguments(descriptor, &arguments)?;
    tracing::debug!("Calling tool {}", name);

    let outcome = match name {
        "add_todo" => todos::add_todo(server, parse(arguments)?).await,
        "show_all_todos" => todos::show_all_todos(server).await,
        "show_pro_tasks" => todos::show_pro_tasks(server).await,
        "show_family_tasks" => todos::show_family_tasks(server).await,
        "show_admin_tasks" => todos::show_admin_tasks(server).await,
        "show_quick_tasks" => todos::show_quick_tasks(server).await,
        "show_urgent_tasks" => todos::show_urgent_tasks(server).await,
        "show_blocked_tasks" => todos::show_blocked_tasks(server).await,
        "show_tasks_by_tag" => todos::show_tasks_by_tag(server, parse(arguments)?).await,
        "show_tasks_by_priority" => {
            todos::show_tasks_by_priority(server, parse(arguments)?).await
        }
        "update_task_status" => todos::update_task_status(server, parse(arguments)?).await,
        "check_setup" => setup::check_setup(server).await,
        "setup_todo_database" => setup::setup_todo_database(server, parse(arguments)?).await,
        other => return Err(EmbeddableError::ToolNotFound(other.to_string())),
    };

    match outcome {
        Ok(result) => Ok(result),
        Err(HandlerError::Remote(e)) => {
            tracing::error!("Notion API error in {}: {}", name, e);
            Ok(text_success(format!(
                "Error with Notion API: {}\n\
                 Please make sure your Notion integration is properly set up \
                 and has access to the database.",
                e
            )))
        }
        Err(HandlerError::Tool(e)) => Err(e),
    }
}

/// Check required fields are present, non-empty and of the declared type
///
/// Optional fields are type-checked only when supplied. Values are not
/// checked against a field's choices: localized tag names are accepted too.
pub fn validate_arguments(
    descriptor: &OperationDescriptor,
    arguments: &Value,
) -> EmbeddableResult<()> {
    let Some(args) = arguments.as_object() else {
        return Err(EmbeddableError::InvalidParams(format!(
            "{}: arguments must be an object",
            descriptor.name
        )));
    };

    for field in &descriptor.fields {
        let value = match args.get(field.name) {
            Some(value) if !value.is_null() => value,
            _ if field.required => {
                return Err(EmbeddableError::InvalidParams(format!(
                    "{}: missing required field '{}'",
                    descriptor.name, field.name
                )))
            }
            _ => continue,
        };

        if !field.kind.matches(value) {
            return Err(EmbeddableError::InvalidParams(format!(
                "{}: field '{}' must be of type {}",
                descriptor.name,
                field.name,
                field.kind.type_name()
            )));
        }

        if field.required && is_blank(value) {
            return Err(EmbeddableError::InvalidParams(format!(
                "{}: field '{}' must not be empty",
                descriptor.name, field.name
            )));
        }
    }

    Ok(())
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Absent arguments become `{}` and explicit nulls count as not supplied
fn without_nulls(arguments: Value) -> EmbeddableResult<Value> {
    match arguments {
        Value::Null => Ok(Value::Object(Map::new())),
        Value::Object(map) => Ok(Value::Object(
            map.into_iter().filter(|(_, v)| !v.is_null()).collect(),
        )),
        _ => Err(EmbeddableError::InvalidParams(
            "arguments must be an object".to_string(),
        )),
    }
}

fn parse<T: DeserializeOwned>(arguments: Value) -> EmbeddableResult<T> {
    Ok(serde_json::from_value(arguments)?)
}
