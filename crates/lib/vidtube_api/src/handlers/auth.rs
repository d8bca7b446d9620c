//! Authentication request handlers.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use axum_extra::extract::cookie::CookieJar;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{
    LoginRequest, LoginResponse, LogoutResponse, RefreshRequest, RegisterRequest, TokenResponse,
    UserResponse,
};
use crate::services::{auth, cookies};

/// `POST /api/v1/users/register`: Create a new account.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = auth::register(&state, body).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `POST /api/v1/users/login`: Authenticate with username or email + password.
/// Tokens go out both as httpOnly cookies and in the body.
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let (account, pair) = auth::login(&state, &body.username_or_email, &body.password).await?;
    let jar = cookies::with_session(jar, &pair, &state.config.cookies);
    Ok((
        jar,
        Json(LoginResponse {
            user: account.into(),
            tokens: pair.into(),
        }),
    ))
}

/// `POST /api/v1/users/refresh-token`: Exchange a refresh token (cookie
/// first, then body) for a new pair.
pub async fn refresh_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Bytes,
) -> AppResult<(CookieJar, Json<TokenResponse>)> {
    let from_body = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        serde_json::from_slice::<RefreshRequest>(&body)
            .map_err(|e| AppError::Validation(format!("Invalid request body: {e}")))?
            .refresh_token
    };
    let presented = cookies::read(&jar, cookies::REFRESH_COOKIE).or(from_body);

    let pair = auth::refresh(&state, presented.as_deref()).await?;
    let jar = cookies::with_session(jar, &pair, &state.config.cookies);
    Ok((jar, Json(pair.into())))
}

/// `POST /api/v1/users/logout`: End the session. Requires authentication.
pub async fn logout_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<LogoutResponse>)> {
    let resp = auth::logout(&state, &user.0.id).await?;
    Ok((cookies::cleared(jar, &state.config.cookies), Json(resp)))
}
