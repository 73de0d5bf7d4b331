use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use objd_store::{DurableLayer, ObjectStore};
use tower_http::trace::TraceLayer;

use crate::handler;

/// The store shared by all request handlers.
pub type SharedStore = Arc<ObjectStore<Box<dyn DurableLayer>>>;

/// Handler state. Built once at startup and cloned into each request.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
}

impl AppState {
    pub fn new(store: ObjectStore<Box<dyn DurableLayer>>) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Wrap a durable layer in a fresh store with an empty cache.
    pub fn with_durable(durable: impl DurableLayer + 'static) -> Self {
        let durable: Box<dyn DurableLayer> = Box::new(durable);
        Self::new(ObjectStore::new(durable))
    }
}

/// Build the axum router with all objd endpoints.
pub fn build_router(state: AppState, max_object_size: usize) -> Router {
    Router::new()
        .route("/upload/*key", post(handler::upload_handler))
        .route("/download/*key", get(handler::download_handler))
        .route("/list", get(handler::list_handler))
        .route("/v1/health", get(handler::health_handler))
        .layer(DefaultBodyLimit::max(max_object_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
