use axum::{routing::get, Router};
use std::sync::Arc;
use tower::Layer;
use tower_http::{
    cors::CorsLayer,
    normalize_path::{NormalizePath, NormalizePathLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::database::ReadingStore;
use crate::handlers;
use crate::services::ReadingService;

/// Shared, read-only request state. Built once at startup.
pub struct AppState {
    pub config: AppConfig,
    pub readings: Arc<ReadingService>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn ReadingStore>) -> Self {
        Self {
            config,
            readings: Arc::new(ReadingService::new(store)),
        }
    }
}

/// The routed service. Trailing slashes are trimmed before routing so
/// `/api/latest/` and `/api/latest` reach the same handler.
pub type App = NormalizePath<Router>;

pub fn app(state: Arc<AppState>) -> App {
    let dashboard_dir = state.config.server.dashboard_dir.clone();
    let request_logging = state.config.logging.enable_request_logging;

    let router = Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api_routes())
        .with_state(state)
        // Dashboard
        .route_service("/", ServeFile::new(dashboard_dir.join("index.html")))
        .fallback_service(ServeDir::new(dashboard_dir))
        // Global middleware
        .layer(CorsLayer::permissive());

    let router = if request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

fn api_routes() -> Router<Arc<AppState>> {
    use handlers::api;

    Router::new()
        .route("/latest", get(api::latest_get))
        .route("/history/:location", get(api::history_get))
        .route("/status", get(api::status_get))
        .route("/all", get(api::all_get))
        .fallback(api::not_found)
}
