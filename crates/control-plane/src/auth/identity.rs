// Social identity resolution for Google and Facebook
// Decision: Google ID tokens are checked against Google's tokeninfo service
// rather than verified locally against rotating JWKS
// Decision: Provider responses are parsed into typed structs; any missing or
// mistyped required field is a provider auth failure

use anyhow::{Context, Result};
use profiles_core::AuthError;
use serde::{Deserialize, Serialize};

use super::config::{AuthConfig, FacebookConfig, GoogleConfig};

const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];
const FACEBOOK_FIELDS: &str = "id,name,email,picture.type(large)";

/// Supported identity providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialProvider {
    Google,
    Facebook,
}

impl SocialProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            SocialProvider::Google => "google",
            SocialProvider::Facebook => "facebook",
        }
    }

    /// Display name used in user-facing messages
    pub fn label(&self) -> &'static str {
        match self {
            SocialProvider::Google => "Google",
            SocialProvider::Facebook => "Facebook",
        }
    }
}

/// Identity verified by a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIdentity {
    /// Provider user ID
    pub external_id: String,
    pub email: String,
    pub display_name: String,
    /// Empty when the provider has no picture
    pub avatar_url: String,
}

/// Exchanges provider tokens for verified identities
#[derive(Clone)]
pub struct IdentityResolver {
    client: reqwest::Client,
    google: Option<GoogleConfig>,
    facebook: FacebookConfig,
}

impl IdentityResolver {
    pub fn new(config: &AuthConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.provider_timeout)
            .build()
            .context("Failed to build identity provider HTTP client")?;

        Ok(Self {
            client,
            google: config.google.clone(),
            facebook: config.facebook.clone(),
        })
    }

    /// Verify `token` with `provider` and return the identity it belongs to
    pub async fn resolve(
        &self,
        provider: SocialProvider,
        token: &str,
    ) -> Result<ExternalIdentity, AuthError> {
        let result = match provider {
            SocialProvider::Google => self.resolve_google(token).await,
            SocialProvider::Facebook => self.resolve_facebook(token).await,
        };

        if let Err(e) = &result {
            tracing::warn!(provider = provider.as_str(), error = %e, "Identity resolution failed");
        }
        result
    }

    async fn resolve_google(&self, token: &str) -> Result<ExternalIdentity, AuthError> {
        let provider = SocialProvider::Google.as_str();
        let config = self
            .google
            .as_ref()
            .ok_or_else(|| AuthError::config("AUTH_GOOGLE_CLIENT_ID not set"))?;

        let response = self
            .client
            .get(format!("{}/tokeninfo", config.base_url.trim_end_matches('/')))
            .query(&[("id_token", token)])
            .send()
            .await
            .map_err(|e| transport_error(provider, "request failed", e))?;

        if !response.status().is_success() {
            return Err(AuthError::provider(
                provider,
                format!("token rejected with status {}", response.status()),
            ));
        }

        let info: GoogleTokenInfo = response
            .json()
            .await
            .map_err(|e| transport_error(provider, "unparseable response", e))?;

        if info.aud != config.client_id {
            return Err(AuthError::provider(provider, "audience mismatch"));
        }

        if let Some(iss) = &info.iss {
            if !GOOGLE_ISSUERS.contains(&iss.as_str()) {
                return Err(AuthError::provider(provider, "unexpected issuer"));
            }
        }

        let external_id = required(info.sub, provider, "sub")?;
        let email = required(info.email, provider, "email")?;

        Ok(ExternalIdentity {
            external_id,
            email,
            display_name: info.name.unwrap_or_default(),
            avatar_url: info.picture.unwrap_or_default(),
        })
    }

    async fn resolve_facebook(&self, token: &str) -> Result<ExternalIdentity, AuthError> {
        let provider = SocialProvider::Facebook.as_str();

        let response = self
            .client
            .get(format!(
                "{}/me",
                self.facebook.graph_url.trim_end_matches('/')
            ))
            .query(&[("fields", FACEBOOK_FIELDS)])
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| transport_error(provider, "request failed", e))?;

        if !response.status().is_success() {
            return Err(AuthError::provider(
                provider,
                format!("token rejected with status {}", response.status()),
            ));
        }

        let profile: FacebookProfile = response
            .json()
            .await
            .map_err(|e| transport_error(provider, "unparseable response", e))?;

        let external_id = required(Some(profile.id), provider, "id")?;
        let email = required(profile.email, provider, "email")?;

        Ok(ExternalIdentity {
            external_id,
            email,
            display_name: profile.name.unwrap_or_default(),
            avatar_url: profile
                .picture
                .map(|picture| picture.data.url)
                .unwrap_or_default(),
        })
    }
}

// The request URL carries the Google ID token, so it is stripped before the
// error text reaches AuthError or the logs
fn transport_error(provider: &str, context: &str, e: reqwest::Error) -> AuthError {
    let kind = if e.is_timeout() { " (timeout)" } else { "" };
    AuthError::provider(
        provider,
        format!("{}{}: {}", context, kind, e.without_url()),
    )
}

fn required(value: Option<String>, provider: &str, field: &str) -> Result<String, AuthError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AuthError::provider(provider, format!("missing {} claim", field)))
}

#[derive(Debug, Deserialize)]
struct GoogleTokenInfo {
    aud: String,
    iss: Option<String>,
    sub: Option<String>,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FacebookProfile {
    id: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<FacebookPicture>,
}

#[derive(Debug, Deserialize)]
struct FacebookPicture {
    data: FacebookPictureData,
}

#[derive(Debug, Deserialize)]
struct FacebookPictureData {
    url: String,
}
