//! Web server module.
//!
//! JSON-only surface: the merged site/health view, per-endpoint history,
//! pool and drift reports, scheduled tasks, and a liveness route.

mod handlers;

pub use handlers::*;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::platform::{Inventory, TaskReader};
use crate::store::StatusStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub inventory: Arc<dyn Inventory>,
    pub tasks: Arc<dyn TaskReader>,
    pub store: Arc<StatusStore>,
}

/// Web server for the monitor.
pub struct Server {
    state: AppState,
}

impl Server {
    /// Create a new server with the given dependencies.
    pub fn new(
        config: ServerConfig,
        inventory: Arc<dyn Inventory>,
        tasks: Arc<dyn TaskReader>,
        store: Arc<StatusStore>,
    ) -> Self {
        Self {
            state: AppState {
                config,
                inventory,
                tasks,
                store,
            },
        }
    }

    /// Build the router with all routes.
    fn routes(&self) -> Router {
        let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);

        Router::new()
            .route("/healthz", get(handlers::handle_healthz))
            .route("/api/sites", get(handlers::handle_get_sites))
            .route("/api/sites/{name}/history", get(handlers::handle_get_history))
            .route("/api/pools", get(handlers::handle_get_pools))
            .route("/api/pools/drift", get(handlers::handle_get_drift))
            .route("/api/tasks", get(handlers::handle_get_tasks))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Start the server on the configured port.
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.state.config.http_port));
        let router = self.routes();

        tracing::info!("web server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}
