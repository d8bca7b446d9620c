//! Account self-service handlers. All require authentication.

use axum::extract::State;
use axum::{Extension, Json};
use axum_extra::extract::cookie::CookieJar;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{
    ChangePasswordRequest, MessageResponse, UpdateAvatarRequest, UpdateCoverImageRequest,
    UpdateDetailsRequest, UserResponse,
};
use crate::services::cookies;
use crate::services::users::{self, MediaField};

/// `GET /api/v1/users/user-details`: The authenticated account.
pub async fn current_user_handler(
    Extension(user): Extension<AuthenticatedUser>,
) -> Json<UserResponse> {
    Json(user.0.into())
}

/// `POST /api/v1/users/update-password`: Change password; ends the session.
pub async fn change_password_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    jar: CookieJar,
    Json(body): Json<ChangePasswordRequest>,
) -> AppResult<(CookieJar, Json<MessageResponse>)> {
    users::change_password(&state, &user.0.id, &body).await?;
    Ok((
        cookies::cleared(jar, &state.config.cookies),
        Json(MessageResponse {
            message: "Password changed successfully".into(),
        }),
    ))
}

/// `PATCH /api/v1/users/update-details`: Update full name and email.
pub async fn update_details_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(body): Json<UpdateDetailsRequest>,
) -> AppResult<Json<UserResponse>> {
    Ok(Json(users::update_details(&state, &user.0.id, &body).await?))
}

/// `PATCH /api/v1/users/update-avatar`: Point the avatar at a new media URL.
pub async fn update_avatar_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(body): Json<UpdateAvatarRequest>,
) -> AppResult<Json<UserResponse>> {
    let resp = users::update_media(&state, &user.0.id, MediaField::Avatar, &body.avatar).await?;
    Ok(Json(resp))
}

/// `PATCH /api/v1/users/update-coverimage`: Point the cover image at a new media URL.
pub async fn update_cover_image_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(body): Json<UpdateCoverImageRequest>,
) -> AppResult<Json<UserResponse>> {
    let resp =
        users::update_media(&state, &user.0.id, MediaField::CoverImage, &body.cover_image).await?;
    Ok(Json(resp))
}
