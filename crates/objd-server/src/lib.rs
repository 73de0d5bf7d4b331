//! HTTP server for objd.
//!
//! Exposes the cached object store over three endpoints: `POST /upload/{key}`,
//! `GET /download/{key}` and `GET /list`, plus a health check.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::HealthResponse;
pub use router::{build_router, AppState, SharedStore};
pub use server::ObjdServer;
