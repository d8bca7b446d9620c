//! Session issuance and refresh-token rotation.
//!
//! Single session per account: the account record holds the digest of
//! exactly one refresh token. Issuing a new pair overwrites it, which
//! revokes whatever refresh token the account held before.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use super::jwt::{self, TokenProfile};
use super::{AuthConfig, AuthError};
use crate::models::account::AccountId;
use crate::store::AccountStore;

/// Freshly minted access/refresh pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub access_expires_in: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_expires_in: i64,
}

/// SHA-256 hash a refresh token for storage.
pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn sign(id: &AccountId, profile: &TokenProfile) -> Result<String, AuthError> {
    jwt::issue(id, profile).map_err(|e| AuthError::Issuance(e.to_string()))
}

/// Mints token pairs and records the refresh token against the account.
#[derive(Clone)]
pub struct SessionIssuer {
    store: Arc<dyn AccountStore>,
    config: AuthConfig,
}

impl SessionIssuer {
    pub fn new(store: Arc<dyn AccountStore>, config: AuthConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Mint a pair for `account_id` and overwrite its stored refresh token.
    ///
    /// Fails as a whole if the write fails: no token leaves this function
    /// that the store could not later validate.
    pub async fn issue(&self, account_id: &AccountId) -> Result<TokenPair, AuthError> {
        let account = self
            .store
            .find_by_id(account_id)
            .await
            .map_err(|e| AuthError::Issuance(format!("account lookup: {e}")))?
            .ok_or_else(|| AuthError::Issuance(format!("account {account_id} not found")))?;

        let pair = self.mint(&account.id)?;
        let digest = hash_refresh_token(&pair.refresh_token);
        let stored = self
            .store
            .set_refresh_token(&account.id, Some(&digest))
            .await
            .map_err(|e| AuthError::Issuance(format!("persist refresh token: {e}")))?;
        if !stored {
            return Err(AuthError::Issuance(format!(
                "account {account_id} disappeared during issuance"
            )));
        }

        info!(account_id = %account.id, "session issued");
        Ok(pair)
    }

    /// Clear the stored refresh token; the account has no live session afterwards.
    /// Returns `false` if there was no such account to revoke.
    pub async fn revoke(&self, account_id: &AccountId) -> Result<bool, AuthError> {
        let revoked = self.store.set_refresh_token(account_id, None).await?;
        if revoked {
            info!(account_id = %account_id, "session revoked");
        } else {
            warn!(account_id = %account_id, "revoke for unknown account");
        }
        Ok(revoked)
    }

    fn mint(&self, id: &AccountId) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access_token: sign(id, &self.config.access)?,
            refresh_token: sign(id, &self.config.refresh)?,
            access_expires_in: self.config.access.ttl.num_seconds(),
            refresh_expires_in: self.config.refresh.ttl.num_seconds(),
        })
    }

    /// Mint a pair and swap it in only if `presented_digest` is still the
    /// stored one. Two concurrent rotations of the same token cannot both win.
    async fn rotate(
        &self,
        id: &AccountId,
        presented_digest: &str,
    ) -> Result<TokenPair, AuthError> {
        let pair = self.mint(id)?;
        let digest = hash_refresh_token(&pair.refresh_token);
        let swapped = self
            .store
            .replace_refresh_token(id, presented_digest, &digest)
            .await
            .map_err(|e| AuthError::Issuance(format!("persist refresh token: {e}")))?;
        if !swapped {
            warn!(account_id = %id, "refresh token superseded by a concurrent rotation");
            return Err(AuthError::Unauthorized(
                "Refresh token expired or superseded".into(),
            ));
        }
        info!(account_id = %id, "session rotated");
        Ok(pair)
    }
}

/// Validates a presented refresh token against signature and store, then rotates.
#[derive(Clone)]
pub struct SessionRefresher {
    issuer: SessionIssuer,
}

impl SessionRefresher {
    pub fn new(issuer: SessionIssuer) -> Self {
        Self { issuer }
    }

    pub async fn refresh(&self, presented: Option<&str>) -> Result<TokenPair, AuthError> {
        let token = presented
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::Unauthorized("Missing refresh token".into()))?;

        let claims = jwt::verify(token, &self.issuer.config.refresh).map_err(|e| {
            debug!(reason = %e, "refresh token rejected by codec");
            AuthError::Unauthorized("Invalid refresh token".into())
        })?;
        let account_id = claims
            .account_id()
            .map_err(|_| AuthError::Unauthorized("Invalid refresh token".into()))?;

        let account = self
            .issuer
            .store
            .find_by_id(&account_id)
            .await?
            .ok_or_else(|| AuthError::Unauthorized("Invalid refresh token".into()))?;

        let presented_digest = hash_refresh_token(token);
        if account.refresh_token_hash.as_deref() != Some(presented_digest.as_str()) {
            warn!(account_id = %account.id, "presented refresh token is not the stored one");
            return Err(AuthError::Unauthorized(
                "Refresh token expired or superseded".into(),
            ));
        }

        self.issuer.rotate(&account.id, &presented_digest).await
    }
}
