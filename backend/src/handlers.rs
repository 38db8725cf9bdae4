//! One handler per collection operation. Each validates its input, makes a
//! single store call and shapes the response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::{DeserializeOwned, Error as _};
use serde_json::Value;
use todo_shared::{CreateTodoRequest, UpdateTodoRequest, DEFAULT_STATUS};

use crate::error::{ApiError, ApiResult};
use crate::store::{NewTodo, TodoChanges, TodoStore};

pub async fn list_todos(store: &dyn TodoStore) -> ApiResult<Response> {
    let todos = store.list().await?;
    Ok(Json(todos).into_response())
}

pub async fn create_todo(store: &dyn TodoStore, body: &[u8]) -> ApiResult<Response> {
    let request: CreateTodoRequest = decode_body(body)?;
    let todo = NewTodo {
        task: required_task(request.task.as_deref())?,
        status: request.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
    };

    let created = store.insert(todo).await?;
    tracing::debug!(id = %created.id, "Created todo");
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

pub async fn update_todo(
    store: &dyn TodoStore,
    id: Option<&str>,
    body: &[u8],
) -> ApiResult<Response> {
    let id = id.ok_or(ApiError::MissingId)?;
    let request: UpdateTodoRequest = decode_body(body)?;
    let changes = TodoChanges {
        task: request
            .task
            .as_deref()
            .map(|task| required_task(Some(task)))
            .transpose()?,
        status: request.status,
    };

    let updated = store.update(id, changes).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(updated).into_response())
}

pub async fn delete_todo(store: &dyn TodoStore, id: Option<&str>) -> ApiResult<Response> {
    let id = id.ok_or(ApiError::MissingId)?;
    let deleted = store.delete(id).await?.ok_or(ApiError::NotFound)?;
    tracing::debug!(id = %deleted.id, "Deleted todo");
    Ok(Json(deleted).into_response())
}

/// Trimmed task text, rejecting missing or blank values.
fn required_task(task: Option<&str>) -> ApiResult<String> {
    match task.map(str::trim) {
        Some(task) if !task.is_empty() => Ok(task.to_string()),
        _ => Err(ApiError::MissingTask),
    }
}

/// Decode a JSON object request body. A blank body reads as `{}`.
fn decode_body<T>(body: &[u8]) -> ApiResult<T>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    // Derived struct impls also accept sequences; only objects are valid here.
    let value: Value = serde_json::from_slice(body).map_err(ApiError::InvalidBody)?;
    match value {
        object @ Value::Object(_) => serde_json::from_value(object).map_err(ApiError::InvalidBody),
        _ => Err(ApiError::InvalidBody(serde_json::Error::custom(
            "request body must be a JSON object",
        ))),
    }
}
