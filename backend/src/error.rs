//! Request-level errors and their HTTP rendering.

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use todo_shared::ErrorBody;

use crate::store::StoreError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Task is required")]
    MissingTask,

    #[error("Todo ID is required")]
    MissingId,

    #[error("Invalid todo ID")]
    InvalidId,

    #[error("Invalid request body")]
    InvalidBody(#[source] serde_json::Error),

    #[error("Todo not found")]
    NotFound,

    #[error("Method {method} Not Allowed")]
    MethodNotAllowed {
        method: Method,
        allow: &'static str,
    },

    #[error("Database operation failed")]
    Store(#[source] StoreError),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidId(_) => ApiError::InvalidId,
            other => ApiError::Store(other),
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingTask
            | ApiError::MissingId
            | ApiError::InvalidId
            | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            ApiError::Store(err) => tracing::error!(error = %err, "Database error"),
            ApiError::InvalidBody(err) => tracing::debug!(error = %err, "Rejected request body"),
            _ => {}
        }

        if let ApiError::MethodNotAllowed { allow, .. } = &self {
            return (
                status,
                [(header::ALLOW, HeaderValue::from_static(*allow))],
                self.to_string(),
            )
                .into_response();
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
