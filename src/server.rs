//! HTTP application assembly: routes, static assets, and middleware.

use std::sync::Arc;

use axum::Router;
use axum::http::StatusCode;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::AppState;
use crate::config::TrackerConfig;
use crate::persistence::Store;
use crate::service::TrackerService;

/// Builds the application state for the configured storage backend.
#[must_use]
pub fn build_state(config: &TrackerConfig) -> AppState {
    let store = Arc::new(Store::from_config(&config.storage));
    AppState {
        tracker: Arc::new(TrackerService::new(store)),
    }
}

/// Builds the full router: REST API, health, frontend assets, and, with
/// the `swagger-ui` feature, the OpenAPI explorer.
pub fn build_app(state: AppState, config: &TrackerConfig) -> Router {
    let index = ServeFile::new(config.static_dir.join("index.html"));
    let assets = ServeDir::new(&config.static_dir);

    let router = Router::new()
        .merge(api::build_router())
        .route_service("/", index)
        .nest_service("/static", assets);

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", api::openapi::ApiDoc::openapi()),
        )
    };

    router
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
