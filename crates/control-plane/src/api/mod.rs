// Public API routes and DTOs
// Decision: One module per resource, each exposing routes(state)

pub mod common;
pub mod media;
pub mod profiles;

pub use common::{ApiError, ApiResponse, ErrorResponse};

use axum::Router;

use crate::AppState;

/// All profile and media routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .merge(profiles::routes(state.clone()))
        .merge(media::routes(state))
}
