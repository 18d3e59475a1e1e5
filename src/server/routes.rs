//! HTTP routes for the reference store server.
//!
//! - `GET /health`: health check
//! - `GET /messages`: list all messages
//! - `POST /messages`: create a message from `{content, order}`
//! - `PUT /messages/{id}`: overwrite `{order, content}` of a message
//! - `DELETE /messages/{id}`: delete a message, returning it

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::storage::{MemoryStore, StorageError};
use crate::models::{Message, MessageId, MessageUpdate, NewMessage};

/// Error body returned for failed requests
#[derive(Serialize)]
struct ApiError {
    error: &'static str,
    message: String,
}

impl IntoResponse for StorageError {
    fn into_response(self) -> Response {
        let status = match self {
            StorageError::NotFound(_) => StatusCode::NOT_FOUND,
        };
        let body = ApiError {
            error: "not_found",
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn list_messages(State(store): State<Arc<MemoryStore>>) -> Json<Vec<Message>> {
    Json(store.list().await)
}

async fn create_message(
    State(store): State<Arc<MemoryStore>>,
    Json(new_message): Json<NewMessage>,
) -> Json<Message> {
    let created = store.create(new_message).await;
    tracing::debug!(id = created.id, order = created.order, "Created message");
    Json(created)
}

async fn update_message(
    State(store): State<Arc<MemoryStore>>,
    Path(id): Path<MessageId>,
    Json(update): Json<MessageUpdate>,
) -> Result<Json<Message>, StorageError> {
    let updated = store.update(id, update).await?;
    tracing::debug!(id, order = updated.order, "Updated message");
    Ok(Json(updated))
}

async fn delete_message(
    State(store): State<Arc<MemoryStore>>,
    Path(id): Path<MessageId>,
) -> Result<Json<Message>, StorageError> {
    let deleted = store.delete(id).await?;
    tracing::debug!(id, order = deleted.order, "Deleted message");
    Ok(Json(deleted))
}

/// Builds the store router over shared storage.
pub fn router(store: Arc<MemoryStore>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/messages", get(list_messages).post(create_message))
        .route(
            "/messages/{id}",
            put(update_message).delete(delete_message),
        )
        .with_state(store)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
