// Profiles API server
// Decision: Storage is PostgreSQL when DATABASE_URL is set, in-memory otherwise
// Decision: A missing signing secret is the only fatal configuration error

use anyhow::{Context, Result};
use profiles_control_plane::auth::{AuthConfig, IdentityResolver};
use profiles_control_plane::storage::StorageBackend;
use profiles_control_plane::{build_router, parse_cors_origins, AppState};
use profiles_core::telemetry::{init_tracing, TelemetryConfig};
use profiles_core::TokenService;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // RUST_LOG (or LOG_LEVEL) controls the filter
    let mut telemetry_config = TelemetryConfig::from_env();
    if telemetry_config.service_name == "profiles" {
        telemetry_config.service_name = "profiles-control-plane".to_string();
    }
    if telemetry_config.log_filter.is_none() {
        telemetry_config.log_filter =
            Some("profiles_control_plane=debug,tower_http=debug".to_string());
    }
    init_tracing(&telemetry_config);

    tracing::info!("profiles-control-plane starting...");

    let auth_config = AuthConfig::from_env();
    auth_config
        .validate()
        .context("Invalid authentication configuration")?;
    tracing::info!(
        google = auth_config.google_enabled(),
        access_ttl_secs = auth_config.jwt.access_token_lifetime.as_secs(),
        refresh_ttl_secs = auth_config.jwt.refresh_token_lifetime.as_secs(),
        "Authentication configured"
    );

    let db = match std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()) {
        Some(database_url) => {
            let db = StorageBackend::postgres(&database_url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to database");
            db
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage (dev mode)");
            StorageBackend::in_memory()
        }
    };

    let identity = IdentityResolver::new(&auth_config)?;
    let tokens = TokenService::new(auth_config.jwt.clone());
    let state = AppState::new(tokens, db, identity);

    let cors_raw = std::env::var("CORS_ALLOWED_ORIGINS")
        .unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string());
    let cors_origins = parse_cors_origins(&cors_raw);
    if cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
    } else {
        tracing::info!(origins = ?cors_origins, "CORS origins configured");
    }

    let app = build_router(state, cors_origins);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
