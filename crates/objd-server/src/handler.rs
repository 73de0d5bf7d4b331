use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Json};
use objd_store::{ListEntry, ObjectKey, StoreResult};
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};
use crate::router::AppState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

/// Run a store operation on the blocking pool. The store holds its guard
/// across file I/O, which must not stall the async workers.
async fn run_blocking<T, F>(op: F) -> ServerResult<T>
where
    F: FnOnce() -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?;
    Ok(result?)
}

/// `POST /upload/{key}`: store the request body as a new object.
pub async fn upload_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> ServerResult<String> {
    let key = ObjectKey::parse(key)?;
    let store = Arc::clone(&state.store);
    let saved = key.clone();
    run_blocking(move || store.save(key, body)).await?;
    Ok(format!("object {saved} saved"))
}

/// `GET /download/{key}`: return the object body.
pub async fn download_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ServerResult<impl IntoResponse> {
    let key = ObjectKey::parse(key)?;
    let store = Arc::clone(&state.store);
    let lookup = key.clone();
    let object = run_blocking(move || store.load(&lookup))
        .await?
        .ok_or_else(|| ServerError::NotFound(key.into_string()))?;
    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        object.into_body(),
    ))
}

/// `GET /list`: every known object with its cache residency.
pub async fn list_handler(State(state): State<AppState>) -> ServerResult<Json<Vec<ListEntry>>> {
    let store = Arc::clone(&state.store);
    let entries = run_blocking(move || store.list()).await?;
    Ok(Json(entries))
}

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}
