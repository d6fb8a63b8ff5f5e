// Token lifecycle tests through the public API
//
// Run with: cargo test -p profiles-core --test token_lifecycle_test

use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use profiles_core::{AuthError, TokenConfig, TokenKind, TokenService};

fn service() -> TokenService {
    TokenService::new(TokenConfig {
        secret: "lifecycle-secret".to_string(),
        ..Default::default()
    })
}

#[test]
fn test_issue_verify_for_many_subjects() {
    let tokens = service();
    for user_id in ["u1", "0191c2f4-7d3e-7a00-8000-000000000000", "üñí", "a b c"] {
        let pair = tokens.issue_pair(user_id).unwrap();
        let claims = tokens.verify(&pair.access_token, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, user_id);
        let claims = tokens.verify(&pair.refresh_token, TokenKind::Refresh).unwrap();
        assert_eq!(claims.sub, user_id);
    }
}

#[test]
fn test_session_over_a_month() {
    let tokens = service();
    let login = Utc::now();
    let pair = tokens.issue_pair_at("u1", login).unwrap();

    // Access token dies after 15 minutes
    let later = login + ChronoDuration::minutes(20);
    assert_eq!(
        tokens.verify_at(&pair.access_token, TokenKind::Access, later),
        Err(AuthError::Expired)
    );

    // The refresh token mints a new one that verifies as access
    let renewed = tokens.redeem_at(&pair.refresh_token, later).unwrap();
    let claims = tokens
        .verify_at(&renewed, TokenKind::Access, later)
        .unwrap();
    assert_eq!(claims.sub, "u1");

    // Day 29 still works, day 31 does not
    let day_29 = login + ChronoDuration::days(29);
    assert!(tokens.redeem_at(&pair.refresh_token, day_29).is_ok());
    let day_31 = login + ChronoDuration::days(31);
    assert_eq!(
        tokens.redeem_at(&pair.refresh_token, day_31),
        Err(AuthError::Expired)
    );
}

#[test]
fn test_configured_lifetimes() {
    let tokens = TokenService::new(TokenConfig {
        secret: "lifecycle-secret".to_string(),
        access_token_lifetime: Duration::from_secs(60),
        refresh_token_lifetime: Duration::from_secs(120),
    });
    let now = Utc::now();
    let pair = tokens.issue_pair_at("u1", now).unwrap();
    assert_eq!(pair.expires_in, 60);

    let at_90s = now + ChronoDuration::seconds(90);
    assert!(tokens
        .verify_at(&pair.access_token, TokenKind::Access, at_90s)
        .is_err());
    assert!(tokens
        .verify_at(&pair.refresh_token, TokenKind::Refresh, at_90s)
        .is_ok());
}

#[test]
fn test_secret_rotation_invalidates_tokens() {
    let pair = service().issue_pair("u1").unwrap();
    let rotated = TokenService::new(TokenConfig {
        secret: "rotated-secret".to_string(),
        ..Default::default()
    });
    assert_eq!(
        rotated.verify(&pair.access_token, TokenKind::Access),
        Err(AuthError::Signature)
    );
}
