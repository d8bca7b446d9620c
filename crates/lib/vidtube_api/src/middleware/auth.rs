//! Authentication middleware: Access-token extraction and verification.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use vidtube_core::models::account::PublicAccount;

use crate::AppState;
use crate::error::AppError;
use crate::services::cookies::{self, ACCESS_COOKIE};

/// Authenticated account, stored in request extensions for the handlers.
/// Carries the public projection only: no password hash, no refresh token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub PublicAccount);

/// Access token from the `accessToken` cookie, else from `Authorization: Bearer`.
pub fn access_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    cookies::read(jar, ACCESS_COOKIE).or_else(|| {
        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string())
    })
}

/// Axum middleware: resolves the access token to an account and injects
/// `AuthenticatedUser` into request extensions, or answers 401.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = access_token(&jar, request.headers());
    let account = state.authenticator.authenticate(token.as_deref()).await?;

    request.extensions_mut().insert(AuthenticatedUser(account));

    Ok(next.run(request).await)
}
