//! HTTP API server for the cast gateway

pub mod cast;
pub mod devices;
pub mod health;
pub mod proxy;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::response::Redirect;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::Result;
use crate::cast::CastOrchestrator;
use crate::config::Config;
use crate::discovery::SharedRegistry;

/// Shared state for API handlers
pub struct ApiState {
    /// Live device registry, read-only from here
    pub registry: SharedRegistry,

    /// The cast orchestrator
    pub orchestrator: Arc<CastOrchestrator>,

    /// Gateway configuration (callback URL, cast labels)
    pub config: Config,

    /// Upstream pass-through, when a backend is configured
    pub upstream: Option<proxy::UpstreamProxy>,
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
    static_dir: Option<PathBuf>,
}

impl ApiServer {
    /// Create the server from shared state
    #[must_use]
    pub fn new(state: Arc<ApiState>) -> Self {
        let port = state.config.port;
        let static_dir = state.config.static_dir.clone();
        Self {
            state,
            port,
            static_dir,
        }
    }

    /// Build the router with all routes
    fn router(&self) -> Router {
        let mut router = Router::new()
            .route("/api/cast/devices", get(devices::list_devices))
            .route("/api/cast/connect", post(cast::connect))
            .merge(health::router())
            .route("/", get(|| async { Redirect::permanent("/frontend/login.html") }));

        // Serve frontend assets if configured
        if let Some(static_dir) = &self.static_dir {
            router = router.nest_service("/frontend", ServeDir::new(static_dir));
            tracing::info!(path = %static_dir.display(), "serving static files");
        }

        // Everything else under /api is forwarded to the upstream backend
        let router = router
            .fallback(proxy::forward)
            .with_state(self.state.clone());

        // CORS layer for cross-origin requests from frontend
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        router.layer(cors).layer(TraceLayer::new_for_http())
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(port = self.port, "API server listening");

        axum::serve(listener, self.router())
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }

    /// Run the API server in a background task
    #[must_use]
    pub fn spawn(self) -> tokio::task::JoinHandle<Result<()>> {
        tokio::spawn(async move { self.run().await })
    }
}
