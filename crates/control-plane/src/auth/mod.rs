// Authentication module
// Decision: Token lifecycle lives in profiles-core; this module adds the
// HTTP surface and third-party identity providers
//
// Supports:
// - Google sign-in (ID token checked against tokeninfo)
// - Facebook login (access token checked against the Graph API)
// - Strict and optional bearer extractors

pub mod config;
pub mod identity;
pub mod middleware;
pub mod routes;

pub use config::AuthConfig;
pub use identity::{ExternalIdentity, IdentityResolver, SocialProvider};
pub use middleware::{AuthUser, OptionalAuthUser};
pub use routes::routes;
