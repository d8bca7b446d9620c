//! Authentication service: Login/register/refresh/logout flows delegating
//! to `vidtube_core::auth`.

use tracing::info;
use vidtube_core::auth::credentials::{self, Registration};
use vidtube_core::auth::session::TokenPair;
use vidtube_core::models::account::{AccountId, PublicAccount};

use crate::AppState;
use crate::error::AppResult;
use crate::models::{LogoutResponse, RegisterRequest, UserResponse};

/// Verify credentials and open a session, replacing any previous one.
pub async fn login(
    state: &AppState,
    identifier: &str,
    password: &str,
) -> AppResult<(PublicAccount, TokenPair)> {
    let account =
        credentials::verify_credentials(state.accounts.as_ref(), identifier, password).await?;
    let pair = state.issuer.issue(&account.id).await?;
    info!(account_id = %account.id, "login succeeded");
    Ok((account.into(), pair))
}

/// Register a new account. Does not open a session.
pub async fn register(state: &AppState, body: RegisterRequest) -> AppResult<UserResponse> {
    let account = credentials::register(
        state.accounts.as_ref(),
        Registration {
            full_name: body.full_name,
            email: body.email,
            username: body.username,
            password: body.password,
            avatar: body.avatar,
            cover_image: body.cover_image,
        },
        state.config.auth.bcrypt_cost,
    )
    .await?;
    Ok(account.into())
}

/// Exchange a refresh token for a new pair (full rotation).
pub async fn refresh(state: &AppState, presented: Option<&str>) -> AppResult<TokenPair> {
    Ok(state.refresher.refresh(presented).await?)
}

/// Clear the account's stored refresh token.
pub async fn logout(state: &AppState, account_id: &AccountId) -> AppResult<LogoutResponse> {
    state.issuer.revoke(account_id).await?;
    Ok(LogoutResponse { success: true })
}
