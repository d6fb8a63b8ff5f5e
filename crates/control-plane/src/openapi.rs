// OpenAPI specification generation
//
// Served at /api-doc/openapi.json and written out by the export-openapi binary.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::{self, ApiResponse, ErrorResponse};
use crate::auth;

/// OpenAPI documentation for the Profiles API
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::routes::google_login,
        auth::routes::facebook_login,
        auth::routes::refresh_token,
        api::profiles::get_own_profile,
        api::profiles::get_public_profile,
        api::profiles::get_profile_summary,
        api::media::get_media,
        api::media::get_live_rooms,
        api::media::get_upcoming_rooms,
    ),
    components(
        schemas(
            ErrorResponse,
            auth::routes::SocialLoginRequest,
            auth::routes::LoginResponse,
            auth::routes::RefreshTokenRequest,
            auth::routes::RefreshTokenResponse,
            api::profiles::ProfileView,
            api::profiles::ProfileSummary,
            api::media::RoomView,
            api::media::VideoView,
            api::media::MediaResponse,
            api::media::RoomsResponse,
            ApiResponse<api::profiles::ProfileView>,
            ApiResponse<api::profiles::ProfileSummary>,
            ApiResponse<api::media::MediaResponse>,
            ApiResponse<api::media::RoomsResponse>,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Social login and token refresh"),
        (name = "profiles", description = "Profile endpoints"),
        (name = "media", description = "Profile rooms and videos")
    ),
    info(
        title = "Profiles API",
        version = "0.1.0",
        description = "Social login and profile API",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

impl ApiDoc {
    /// Generate the OpenAPI spec as a pretty-printed JSON string
    pub fn to_json() -> Result<String, serde_json::Error> {
        Self::openapi().to_pretty_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_all_routes() {
        let spec = ApiDoc::openapi();
        for path in [
            "/auth/google",
            "/auth/facebook",
            "/auth/refresh",
            "/profile",
            "/public",
            "/profile/media",
            "/profile/media/live",
            "/profile/media/upcoming",
            "/profile/media2",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_spec_serializes() {
        let json = ApiDoc::to_json().unwrap();
        assert!(json.contains("\"bearer\""));
    }
}
