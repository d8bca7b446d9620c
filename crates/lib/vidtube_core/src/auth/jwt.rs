//! JWT token generation and verification.
//!
//! Two independent profiles (access, refresh), each with its own HS256
//! secret and lifetime. Pure functions of their inputs.

use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::account::AccountId;
use crate::uuid::uuidv4;

/// Token codec failures. Callers collapse these into one unauthorized
/// response; the distinction is kept for logs and tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("signature does not match")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("jwt encode: {0}")]
    Signing(String),
}

/// Token class, embedded in the claims so a refresh token can never pass as
/// an access token (and vice versa) even under a shared secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims carried by both token classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: Account ID in canonical form.
    pub sub: String,
    pub kind: TokenKind,
    /// Unique token id; keeps two tokens minted in the same second distinct.
    pub jti: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiry (unix timestamp).
    pub exp: i64,
}

impl TokenClaims {
    /// Parse the subject back into an account id.
    pub fn account_id(&self) -> Result<AccountId, TokenError> {
        self.sub
            .parse()
            .map_err(|e| TokenError::Malformed(format!("subject: {e}")))
    }
}

/// Signing secret and lifetime for one token class.
#[derive(Clone)]
pub struct TokenProfile {
    pub kind: TokenKind,
    pub secret: String,
    pub ttl: Duration,
}

impl TokenProfile {
    pub fn new(kind: TokenKind, secret: impl Into<String>, ttl: Duration) -> Self {
        Self {
            kind,
            secret: secret.into(),
            ttl,
        }
    }
}

impl fmt::Debug for TokenProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenProfile")
            .field("kind", &self.kind)
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Sign a token for `subject` under `profile`.
pub fn issue(subject: &AccountId, profile: &TokenProfile) -> Result<String, TokenError> {
    let now = Utc::now();
    let claims = TokenClaims {
        sub: subject.to_string(),
        kind: profile.kind,
        jti: uuidv4().to_string(),
        iat: now.timestamp(),
        exp: (now + profile.ttl).timestamp(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(profile.secret.as_bytes()),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

/// Verify signature, structure and expiry, returning the claims on success.
pub fn verify(token: &str, profile: &TokenProfile) -> Result<TokenClaims, TokenError> {
    let key = DecodingKey::from_secret(profile.secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.validate_exp = true;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let claims = decode::<TokenClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            other => TokenError::Malformed(format!("{other:?}")),
        })?;

    if claims.kind != profile.kind {
        return Err(TokenError::Malformed(format!(
            "expected {:?} token, got {:?}",
            profile.kind, claims.kind
        )));
    }
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uuid::uuidv7;

    fn access() -> TokenProfile {
        TokenProfile::new(TokenKind::Access, "access-secret", Duration::minutes(15))
    }

    fn refresh() -> TokenProfile {
        TokenProfile::new(TokenKind::Refresh, "refresh-secret", Duration::days(10))
    }

    #[test]
    fn round_trip_preserves_subject_for_both_profiles() {
        let id = AccountId::new(uuidv7());
        for profile in [access(), refresh()] {
            let token = issue(&id, &profile).unwrap();
            let claims = verify(&token, &profile).unwrap();
            assert_eq!(claims.account_id().unwrap(), id);
            assert_eq!(claims.kind, profile.kind);
            assert_eq!(claims.exp - claims.iat, profile.ttl.num_seconds());
        }
    }

    #[test]
    fn tokens_minted_back_to_back_differ() {
        let id = AccountId::new(uuidv7());
        let a = issue(&id, &refresh()).unwrap();
        let b = issue(&id, &refresh()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_secret_is_invalid_signature() {
        let id = AccountId::new(uuidv7());
        let token = issue(&id, &access()).unwrap();
        let other = TokenProfile::new(TokenKind::Access, "other-secret", Duration::minutes(15));
        assert_eq!(verify(&token, &other), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn tampered_payload_is_invalid_signature() {
        let id = AccountId::new(uuidv7());
        let token = issue(&id, &access()).unwrap();
        let forged_id = AccountId::new(uuidv7());
        let forged = issue(&forged_id, &access()).unwrap();

        // Splice the forged payload onto the original signature.
        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);

        assert_eq!(verify(&spliced, &access()), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn past_expiry_is_expired() {
        let id = AccountId::new(uuidv7());
        let stale = TokenProfile::new(TokenKind::Access, "access-secret", Duration::seconds(-30));
        let token = issue(&id, &stale).unwrap();
        assert_eq!(verify(&token, &access()), Err(TokenError::Expired));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            verify("not.a.jwt", &access()),
            Err(TokenError::Malformed(_))
        ));
        assert!(matches!(verify("", &access()), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn refresh_token_is_rejected_by_access_profile_with_same_secret() {
        let id = AccountId::new(uuidv7());
        let shared = TokenProfile::new(TokenKind::Refresh, "shared", Duration::days(1));
        let token = issue(&id, &shared).unwrap();
        let as_access = TokenProfile::new(TokenKind::Access, "shared", Duration::minutes(5));
        assert!(matches!(
            verify(&token, &as_access),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn debug_output_hides_secret() {
        let rendered = format!("{:?}", access());
        assert!(!rendered.contains("access-secret"));
    }
}
