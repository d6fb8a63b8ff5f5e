// Profiles Control Plane Library
// Decision: Shared library for binaries (API server, OpenAPI export) and
// integration tests; the router is built here so tests exercise the real one

use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    http::{header, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use profiles_core::TokenService;
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

// API routes and types (shared for OpenAPI generation)
pub mod api;

// Authentication module
pub mod auth;

// Storage layer
pub mod storage;

// OpenAPI spec generation
pub mod openapi;

use auth::IdentityResolver;
use storage::StorageBackend;

/// App state shared across routes
#[derive(Clone, FromRef)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub db: Arc<StorageBackend>,
    pub identity: Arc<IdentityResolver>,
}

impl AppState {
    pub fn new(tokens: TokenService, db: StorageBackend, identity: IdentityResolver) -> Self {
        Self {
            tokens: Arc::new(tokens),
            db: Arc::new(db),
            identity: Arc::new(identity),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    storage: &'static str,
}

async fn health(State(db): State<Arc<StorageBackend>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        storage: db.kind(),
    })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi::ApiDoc::openapi())
}

/// Build the application router with CORS and request tracing
pub fn build_router(state: AppState, cors_origins: Vec<HeaderValue>) -> Router {
    let app = Router::new()
        .route("/health", get(health))
        .route("/api-doc/openapi.json", get(openapi_json))
        .with_state(state.clone())
        .merge(auth::routes(state.clone()))
        .merge(api::routes(state));

    let app = if cors_origins.is_empty() {
        app
    } else {
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
                .allow_credentials(true),
        )
    };

    app.layer(TraceLayer::new_for_http())
}

/// Parse a comma-separated origin list, skipping invalid entries
pub fn parse_cors_origins(raw: &str) -> Vec<HeaderValue> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect()
}
