// Profiles core: token lifecycle
//
// Key design decisions:
// - Stateless bearer tokens: validity is signature + embedded expiry + kind
// - One service issues, verifies and redeems; no HTTP or storage dependencies
// - Error taxonomy distinguishes configuration, input, token and provider failures

pub mod config;
pub mod error;
pub mod telemetry;
pub mod token;

// Re-exports for convenience
pub use config::TokenConfig;
pub use error::{AuthError, Result};
pub use token::{Claims, TokenKind, TokenPair, TokenService};
