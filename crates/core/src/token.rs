// Token service: issuance, verification and refresh redemption
// Decision: Use HS256 (symmetric key) for both token kinds
// Decision: Tokens are stateless; nothing is persisted at issuance
// Decision: Expiry is checked against an explicit clock so it can be tested without sleeping

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::config::TokenConfig;
use crate::error::{AuthError, Result};

/// Kind of a signed token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived credential for protected requests
    Access,
    /// Long-lived credential used only to mint new access tokens
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims carried by every issued token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (internal user ID)
    pub sub: String,
    /// Token kind
    pub token_type: TokenKind,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// A token is expired once the clock reaches `exp`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// Token pair returned after a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

#[derive(Clone)]
struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Issues and verifies signed access/refresh tokens
///
/// Construction never fails: with an empty secret every operation returns
/// [`AuthError::Config`]. Callers that want startup to fail fast should run
/// [`TokenConfig::validate`] first.
#[derive(Clone)]
pub struct TokenService {
    config: TokenConfig,
    keys: Option<SigningKeys>,
}

impl TokenService {
    pub fn new(config: TokenConfig) -> Self {
        let keys = (!config.secret.is_empty()).then(|| SigningKeys {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
        });

        Self { config, keys }
    }

    fn keys(&self) -> Result<&SigningKeys> {
        self.keys
            .as_ref()
            .ok_or_else(|| AuthError::config("signing secret not set"))
    }

    fn lifetime(&self, kind: TokenKind) -> std::time::Duration {
        match kind {
            TokenKind::Access => self.config.access_token_lifetime,
            TokenKind::Refresh => self.config.refresh_token_lifetime,
        }
    }

    /// Get access token lifetime in seconds
    pub fn access_token_lifetime_secs(&self) -> i64 {
        self.config.access_token_lifetime.as_secs() as i64
    }

    fn sign(&self, subject: &str, kind: TokenKind, now: DateTime<Utc>) -> Result<String> {
        let keys = self.keys()?;
        let lifetime = Duration::from_std(self.lifetime(kind))
            .map_err(|_| AuthError::config(format!("{} token lifetime out of range", kind)))?;

        let claims = Claims {
            sub: subject.to_string(),
            token_type: kind,
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(|e| AuthError::config(format!("failed to sign {} token: {}", kind, e)))
    }

    /// Issue an access/refresh pair for a user
    pub fn issue_pair(&self, user_id: &str) -> Result<TokenPair> {
        self.issue_pair_at(user_id, Utc::now())
    }

    /// Issue an access/refresh pair as of `now`
    pub fn issue_pair_at(&self, user_id: &str, now: DateTime<Utc>) -> Result<TokenPair> {
        self.keys()?;
        if user_id.is_empty() {
            return Err(AuthError::validation("user id cannot be empty"));
        }

        let access_token = self.sign(user_id, TokenKind::Access, now)?;
        let refresh_token = self.sign(user_id, TokenKind::Refresh, now)?;

        tracing::debug!(user_id = %user_id, "Issued token pair");

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_lifetime_secs(),
        })
    }

    /// Verify a token of the expected kind
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims> {
        self.verify_at(token, expected, Utc::now())
    }

    /// Verify a token of the expected kind as of `now`
    ///
    /// Checks run in order: parse, signature, expiry, kind, subject.
    pub fn verify_at(
        &self,
        token: &str,
        expected: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<Claims> {
        let keys = self.keys()?;

        // Expiry is checked below against the supplied clock, not the system one
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &keys.decoding, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => AuthError::Signature,
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::malformed(e.to_string()),
            })?
            .claims;

        if claims.is_expired_at(now) {
            return Err(AuthError::Expired);
        }

        if claims.token_type != expected {
            return Err(AuthError::KindMismatch {
                expected,
                actual: claims.token_type,
            });
        }

        if claims.sub.is_empty() {
            return Err(AuthError::validation("token subject is empty"));
        }

        Ok(claims)
    }

    /// Exchange a refresh token for a new access token
    ///
    /// The refresh token is not rotated and there is no revocation check:
    /// any unexpired refresh token with a valid signature is honored.
    pub fn redeem(&self, refresh_token: &str) -> Result<String> {
        self.redeem_at(refresh_token, Utc::now())
    }

    /// Exchange a refresh token for a new access token as of `now`
    pub fn redeem_at(&self, refresh_token: &str, now: DateTime<Utc>) -> Result<String> {
        let claims = self.verify_at(refresh_token, TokenKind::Refresh, now)?;
        let access_token = self.sign(&claims.sub, TokenKind::Access, now)?;

        tracing::debug!(user_id = %claims.sub, "Redeemed refresh token");

        Ok(access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration as StdDuration;

    const SECRET: &str = "test-secret-key-for-testing";

    fn test_config() -> TokenConfig {
        TokenConfig {
            secret: SECRET.to_string(),
            access_token_lifetime: StdDuration::from_secs(900), // 15 minutes
            refresh_token_lifetime: StdDuration::from_secs(7 * 86400), // 7 days
        }
    }

    fn service() -> TokenService {
        TokenService::new(test_config())
    }

    fn sign_raw(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_issue_then_verify_access_returns_subject() {
        let service = service();
        for user_id in ["u1", "0190f5a3-7c1e-7d2a-9b1f-3c4d5e6f7a8b", "ünïcødé", "a b c"] {
            let pair = service.issue_pair(user_id).unwrap();
            let claims = service.verify(&pair.access_token, TokenKind::Access).unwrap();
            assert_eq!(claims.sub, user_id);
            assert_eq!(claims.token_type, TokenKind::Access);
        }
    }

    #[test]
    fn test_issue_pair_shape() {
        let service = service();
        let now = Utc::now();
        let pair = service.issue_pair_at("u1", now).unwrap();

        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 900);
        assert_ne!(pair.access_token, pair.refresh_token);

        let access = service
            .verify_at(&pair.access_token, TokenKind::Access, now)
            .unwrap();
        let refresh = service
            .verify_at(&pair.refresh_token, TokenKind::Refresh, now)
            .unwrap();

        assert_eq!(access.sub, refresh.sub);
        assert_eq!(access.iat, now.timestamp());
        assert_eq!(access.exp, now.timestamp() + 900);
        assert_eq!(refresh.exp, now.timestamp() + 7 * 86400);
    }

    #[test]
    fn test_issue_requires_secret() {
        let service = TokenService::new(TokenConfig::default());
        assert!(matches!(service.issue_pair("u1"), Err(AuthError::Config(_))));
        assert!(matches!(
            service.verify("a.b.c", TokenKind::Access),
            Err(AuthError::Config(_))
        ));
        assert!(matches!(service.redeem("a.b.c"), Err(AuthError::Config(_))));
    }

    #[test]
    fn test_issue_rejects_empty_user_id() {
        assert!(matches!(
            service().issue_pair(""),
            Err(AuthError::Validation(_))
        ));
    }

    #[test]
    fn test_wrong_kind_is_kind_mismatch() {
        let service = service();
        let pair = service.issue_pair("u1").unwrap();

        let err = service
            .verify(&pair.refresh_token, TokenKind::Access)
            .unwrap_err();
        assert_eq!(
            err,
            AuthError::KindMismatch {
                expected: TokenKind::Access,
                actual: TokenKind::Refresh,
            }
        );

        let err = service
            .verify(&pair.access_token, TokenKind::Refresh)
            .unwrap_err();
        assert!(matches!(err, AuthError::KindMismatch { .. }));
    }

    #[test]
    fn test_access_expires_before_refresh() {
        let service = service();
        let issued = Utc::now();
        let pair = service.issue_pair_at("u1", issued).unwrap();

        let later = issued + Duration::minutes(16);
        assert_eq!(
            service
                .verify_at(&pair.access_token, TokenKind::Access, later)
                .unwrap_err(),
            AuthError::Expired
        );

        let claims = service
            .verify_at(&pair.refresh_token, TokenKind::Refresh, later)
            .unwrap();
        assert_eq!(claims.sub, "u1");
    }

    #[test]
    fn test_expiry_boundary() {
        let service = service();
        let issued = Utc::now();
        let pair = service.issue_pair_at("u1", issued).unwrap();

        let just_before = issued + Duration::seconds(899);
        assert!(service
            .verify_at(&pair.access_token, TokenKind::Access, just_before)
            .is_ok());

        let at_expiry = issued + Duration::seconds(900);
        assert_eq!(
            service
                .verify_at(&pair.access_token, TokenKind::Access, at_expiry)
                .unwrap_err(),
            AuthError::Expired
        );
    }

    #[test]
    fn test_expired_wins_over_kind_mismatch() {
        let service = service();
        let issued = Utc::now();
        let pair = service.issue_pair_at("u1", issued).unwrap();

        let much_later = issued + Duration::days(30);
        assert_eq!(
            service
                .verify_at(&pair.refresh_token, TokenKind::Access, much_later)
                .unwrap_err(),
            AuthError::Expired
        );
    }

    #[test]
    fn test_tampered_signature() {
        let service = service();
        let pair = service.issue_pair("u1").unwrap();

        let (signed, signature) = pair.access_token.rsplit_once('.').unwrap();
        let mut chars: Vec<char> = signature.chars().collect();
        chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
        let tampered = format!("{}.{}", signed, chars.into_iter().collect::<String>());

        assert_eq!(
            service.verify(&tampered, TokenKind::Access).unwrap_err(),
            AuthError::Signature
        );
    }

    #[test]
    fn test_foreign_secret_is_signature_error() {
        let now = Utc::now();
        let claims = Claims {
            sub: "u1".to_string(),
            token_type: TokenKind::Access,
            iat: now.timestamp(),
            exp: now.timestamp() + 60,
        };
        let token = sign_raw(&claims, "some-other-secret");

        assert_eq!(
            service().verify(&token, TokenKind::Access).unwrap_err(),
            AuthError::Signature
        );
    }

    #[test]
    fn test_malformed_tokens() {
        let service = service();
        for token in ["", "invalid-token", "a.b", "a.b.c", "not.a.jwt.at.all"] {
            let err = service.verify(token, TokenKind::Access).unwrap_err();
            assert!(
                matches!(err, AuthError::Malformed(_)),
                "expected malformed for {:?}, got {:?}",
                token,
                err
            );
        }
    }

    #[test]
    fn test_empty_subject_is_validation_error() {
        let now = Utc::now();
        let claims = Claims {
            sub: String::new(),
            token_type: TokenKind::Access,
            iat: now.timestamp(),
            exp: now.timestamp() + 60,
        };
        let token = sign_raw(&claims, SECRET);

        assert!(matches!(
            service().verify(&token, TokenKind::Access),
            Err(AuthError::Validation(_))
        ));
    }

    #[test]
    fn test_redeem_issues_access_token_for_same_subject() {
        let service = service();
        let issued = Utc::now();
        let pair = service.issue_pair_at("u1", issued).unwrap();

        // Access token long gone, refresh still valid
        let later = issued + Duration::hours(2);
        let access = service.redeem_at(&pair.refresh_token, later).unwrap();

        let claims = service
            .verify_at(&access, TokenKind::Access, later)
            .unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.iat, later.timestamp());

        // Refresh token is not rotated and can be redeemed again
        assert!(service.redeem_at(&pair.refresh_token, later).is_ok());
    }

    #[test]
    fn test_redeem_rejects_access_token() {
        let service = service();
        let pair = service.issue_pair("u1").unwrap();
        assert!(matches!(
            service.redeem(&pair.access_token),
            Err(AuthError::KindMismatch { .. })
        ));
    }

    #[test]
    fn test_redeem_rejects_expired_refresh_token() {
        let service = service();
        let issued = Utc::now();
        let pair = service.issue_pair_at("u1", issued).unwrap();
        assert_eq!(
            service
                .redeem_at(&pair.refresh_token, issued + Duration::days(8))
                .unwrap_err(),
            AuthError::Expired
        );
    }

    #[test]
    fn test_claims_wire_format() {
        let claims = Claims {
            sub: "u1".to_string(),
            token_type: TokenKind::Refresh,
            iat: 1,
            exp: 2,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["sub"], "u1");
        assert_eq!(json["token_type"], "refresh");
        assert_eq!(json["iat"], 1);
        assert_eq!(json["exp"], 2);
    }
}
