//! Video request handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{MessageResponse, UpdateVideoRequest, UploadVideoRequest, VideoResponse};
use crate::services::videos;

/// `POST /api/v1/videos/upload`: Record metadata for a hosted video.
pub async fn upload_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(body): Json<UploadVideoRequest>,
) -> AppResult<(StatusCode, Json<VideoResponse>)> {
    let video = videos::upload(&state, &user.0, body).await?;
    Ok((StatusCode::CREATED, Json(video)))
}

/// `GET /api/v1/videos/video/{video_id}`: Public.
pub async fn get_video_handler(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<Json<VideoResponse>> {
    let id = videos::parse_video_id(&video_id)?;
    Ok(Json(videos::get(&state, &id).await?))
}

/// `POST /api/v1/videos/video/{video_id}/watch`: Record a view in the caller's history.
pub async fn watch_video_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(video_id): Path<String>,
) -> AppResult<Json<VideoResponse>> {
    let id = videos::parse_video_id(&video_id)?;
    Ok(Json(videos::watch(&state, &user.0, &id).await?))
}

/// `PATCH /api/v1/videos/video/{video_id}`: Owner only.
pub async fn update_video_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(video_id): Path<String>,
    Json(body): Json<UpdateVideoRequest>,
) -> AppResult<Json<VideoResponse>> {
    let id = videos::parse_video_id(&video_id)?;
    Ok(Json(videos::update(&state, &user.0, &id, body).await?))
}

/// `DELETE /api/v1/videos/video/{video_id}`: Owner only.
pub async fn delete_video_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(video_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = videos::parse_video_id(&video_id)?;
    videos::delete(&state, &user.0, &id).await?;
    Ok(Json(MessageResponse {
        message: "Video deleted".into(),
    }))
}

/// `PUT /api/v1/videos/video/togglepublish/{video_id}`: Owner only.
pub async fn toggle_publish_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(video_id): Path<String>,
) -> AppResult<Json<VideoResponse>> {
    let id = videos::parse_video_id(&video_id)?;
    Ok(Json(videos::toggle_publish(&state, &user.0, &id).await?))
}
