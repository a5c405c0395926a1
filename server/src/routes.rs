//! Axum handlers for the `/todos` resource.
//!
//! Handlers validate, call the service, and shape the response. Bodies are
//! taken as raw JSON so the validation layer, not serde, decides what a bad
//! field looks like.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use todo_core::validation::{parse_todo_id, validate_create, validate_update};
use todo_core::{Todo, TodoService};

use crate::response::{ApiError, ErrorBody};

pub fn router(service: TodoService) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/todos", get(get_all_todo).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo_by_id).patch(update_todo).delete(delete_todo),
        )
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn not_found() -> (StatusCode, Json<ErrorBody>) {
    let status = StatusCode::NOT_FOUND;
    (status, Json(ErrorBody::new(status, "NOT_FOUND", "Resource not found")))
}

async fn create_todo(
    State(service): State<TodoService>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Uuid>), ApiError> {
    let Json(body) = body?;
    let input = validate_create(&body)?;
    let id = service.create_todo(input).await?;
    Ok((StatusCode::CREATED, Json(id)))
}

async fn get_all_todo(State(service): State<TodoService>) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(service.get_all_todo().await?))
}

async fn get_todo_by_id(
    State(service): State<TodoService>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let id = parse_todo_id(&id)?;
    Ok(Json(service.get_todo_by_id(id).await?))
}

async fn update_todo(
    State(service): State<TodoService>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Uuid>, ApiError> {
    let id = parse_todo_id(&id)?;
    let Json(body) = body?;
    let update = validate_update(&body)?;
    Ok(Json(service.update_todo(id, update).await?))
}

async fn delete_todo(
    State(service): State<TodoService>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_todo_id(&id)?;
    service.delete_todo(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
