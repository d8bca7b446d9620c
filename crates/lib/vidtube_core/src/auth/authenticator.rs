//! Request-time access-token verification.

use std::sync::Arc;

use tracing::debug;

use super::jwt::{self, TokenProfile};
use super::AuthError;
use crate::models::account::PublicAccount;
use crate::store::AccountStore;

/// Resolves a presented access token to the account it names.
///
/// Never renews anything: an expired access token is rejected here and the
/// client has to go through the refresh flow.
#[derive(Clone)]
pub struct RequestAuthenticator {
    store: Arc<dyn AccountStore>,
    access: TokenProfile,
}

impl RequestAuthenticator {
    pub fn new(store: Arc<dyn AccountStore>, access: TokenProfile) -> Self {
        Self { store, access }
    }

    pub async fn authenticate(&self, token: Option<&str>) -> Result<PublicAccount, AuthError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::Unauthorized("Missing token".into()))?;

        let claims = jwt::verify(token, &self.access).map_err(|e| {
            debug!(reason = %e, "access token rejected");
            AuthError::Unauthorized("Invalid or expired token".into())
        })?;
        let account_id = claims.account_id().map_err(|e| {
            debug!(reason = %e, "access token subject unparseable");
            AuthError::Unauthorized("Invalid token".into())
        })?;

        let account = self
            .store
            .find_by_id(&account_id)
            .await?
            .ok_or_else(|| {
                debug!(account_id = %account_id, "access token names unknown account");
                AuthError::Unauthorized("Invalid token".into())
            })?;

        Ok(account.into())
    }
}
