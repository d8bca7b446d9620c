//! Authentication and authorization logic.
//!
//! Token codec, password hashing, credential verification, session
//! issuance/rotation, request authentication and the ownership guard.
//! Everything here is framework-agnostic; `vidtube_api` wires it to HTTP.

pub mod authenticator;
pub mod credentials;
pub mod guard;
pub mod jwt;
pub mod password;
pub mod queries;
pub mod session;

use thiserror::Error;

use self::jwt::{TokenError, TokenProfile};
use crate::store::StoreError;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Account not found")]
    NotFound,

    #[error("Invalid credentials")]
    CredentialError,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),

    #[error("Session issuance failed: {0}")]
    Issuance(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(msg) => AuthError::Conflict(msg),
            StoreError::Db(e) => AuthError::DbError(e),
        }
    }
}

/// bcrypt cost factor used outside tests.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Key material and lifetimes for both token classes.
///
/// Built once at startup and handed to the session issuer, refresher and
/// authenticator; nothing in this module reads the environment.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub access: TokenProfile,
    pub refresh: TokenProfile,
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    pub fn new(access: TokenProfile, refresh: TokenProfile) -> Self {
        Self {
            access,
            refresh,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }

    /// Reject configurations that would let one token class stand in for the other.
    pub fn validate(&self) -> Result<(), AuthError> {
        for profile in [&self.access, &self.refresh] {
            if profile.ttl <= chrono::Duration::zero() {
                return Err(AuthError::ValidationError(format!(
                    "{:?} token lifetime must be positive",
                    profile.kind
                )));
            }
        }
        if self.access.secret.is_empty() || self.refresh.secret.is_empty() {
            return Err(AuthError::ValidationError(
                "token secrets must not be empty".into(),
            ));
        }
        if self.access.secret == self.refresh.secret {
            return Err(AuthError::ValidationError(
                "access and refresh secrets must differ".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Duration;

    use super::AuthConfig;
    use super::jwt::{TokenKind, TokenProfile};
    use crate::auth::password::hash_password;
    use crate::models::account::{Account, NewAccount};
    use crate::store::AccountStore;

    pub fn config() -> AuthConfig {
        AuthConfig {
            access: TokenProfile::new(TokenKind::Access, "access-secret", Duration::minutes(15)),
            refresh: TokenProfile::new(TokenKind::Refresh, "refresh-secret", Duration::days(10)),
            bcrypt_cost: 4,
        }
    }

    pub async fn seed(store: &dyn AccountStore, username: &str, password: &str) -> Account {
        store
            .create(NewAccount {
                username: username.to_string(),
                email: format!("{username}@x.com"),
                full_name: username.to_uppercase(),
                password_hash: hash_password(password, 4).unwrap(),
                avatar: None,
                cover_image: None,
            })
            .await
            .unwrap()
    }
}
