use objd_store::FsDurable;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::{build_router, AppState};

/// objd HTTP server.
pub struct ObjdServer {
    config: ServerConfig,
}

impl ObjdServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Create the storage root if needed and build the shared store.
    ///
    /// Failing here is fatal: without a root there is nothing to serve.
    pub fn prepare_state(&self) -> ServerResult<AppState> {
        let root = &self.config.storage_root;
        let durable = FsDurable::open(root).map_err(|e| {
            ServerError::Config(format!("cannot prepare storage root {}: {e}", root.display()))
        })?;
        tracing::info!("storage root ready at {}", root.display());
        Ok(AppState::with_durable(durable))
    }

    /// Build the router (useful for testing).
    pub fn router(&self, state: AppState) -> axum::Router {
        build_router(state, self.config.max_object_size)
    }

    /// Start serving requests until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router(self.prepare_state()?);
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!("objd listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        tracing::info!("objd stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(e) => {
            tracing::error!("cannot listen for shutdown signal: {e}");
            std::future::pending::<()>().await;
        }
    }
}
