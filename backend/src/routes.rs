//! HTTP surface: method dispatch for the collection and item routes.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use todo_shared::ErrorBody;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::error::{ApiError, ApiResult};
use crate::handlers;
use crate::AppState;

pub const COLLECTION_PATH: &str = "/api/todos";
pub const ITEM_PATH: &str = "/api/todos/:id";

/// Where a request landed, which decides the supported methods and where
/// the identifier comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/api/todos`, identifier taken from `?id=`.
    Collection,
    /// `/api/todos/:id`, identifier taken from the path.
    Item,
}

impl Route {
    pub fn allow(self) -> &'static str {
        match self {
            Route::Collection => "GET, POST, PUT, DELETE",
            Route::Item => "PUT, DELETE",
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(COLLECTION_PATH, any(collection))
        .route(ITEM_PATH, any(item))
        .fallback(fallback)
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn collection(
    State(state): State<AppState>,
    method: Method,
    Query(mut params): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    dispatch(&state, Route::Collection, method, params.remove("id"), body).await
}

async fn item(
    State(state): State<AppState>,
    method: Method,
    Path(id): Path<String>,
    body: Bytes,
) -> Response {
    dispatch(&state, Route::Item, method, Some(id), body).await
}

async fn fallback(method: Method) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    let body = ErrorBody {
        error: "Not found".to_string(),
    };
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

/// Answer preflights directly; everything else needs the store.
pub async fn dispatch(
    state: &AppState,
    route: Route,
    method: Method,
    id: Option<String>,
    body: Bytes,
) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    let id = id.filter(|id| !id.is_empty());
    match handle(state, route, method, id.as_deref(), &body).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

async fn handle(
    state: &AppState,
    route: Route,
    method: Method,
    id: Option<&str>,
    body: &[u8],
) -> ApiResult<Response> {
    let store = state.connections.ensure_connected().await?;
    let store = store.as_ref();

    match (route, &method) {
        (Route::Collection, &Method::GET) => handlers::list_todos(store).await,
        (Route::Collection, &Method::POST) => handlers::create_todo(store, body).await,
        (_, &Method::PUT) => handlers::update_todo(store, id, body).await,
        (_, &Method::DELETE) => handlers::delete_todo(store, id).await,
        _ => Err(ApiError::MethodNotAllowed {
            allow: route.allow(),
            method: method.clone(),
        }),
    }
}
