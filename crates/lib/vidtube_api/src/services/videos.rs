//! Video service. Every mutation loads the video, runs the ownership
//! guard against the caller, and only then writes.

use tracing::info;
use uuid::Uuid;
use vidtube_core::auth::guard::assert_owner;
use vidtube_core::models::account::PublicAccount;
use vidtube_core::models::video::{NewVideo, Video, VideoUpdate};
use vidtube_core::validation::first_missing;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{UpdateVideoRequest, UploadVideoRequest, VideoResponse};

/// Parse a path segment as a video id.
pub fn parse_video_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::Validation("Invalid video id".into()))
}

async fn load(state: &AppState, id: &Uuid) -> AppResult<Video> {
    state
        .videos
        .find_video(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".into()))
}

/// Load a video and check that `caller` owns it.
async fn load_owned(state: &AppState, id: &Uuid, caller: &PublicAccount) -> AppResult<Video> {
    let video = load(state, id).await?;
    assert_owner(&video, caller)?;
    Ok(video)
}

/// Record metadata for a video the caller has already pushed to the media host.
pub async fn upload(
    state: &AppState,
    caller: &PublicAccount,
    body: UploadVideoRequest,
) -> AppResult<VideoResponse> {
    if let Some(field) = first_missing(&[
        ("title", body.title.as_str()),
        ("description", body.description.as_str()),
        ("videoFile", body.video_file.as_str()),
        ("thumbnail", body.thumbnail.as_str()),
    ]) {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    if !body.duration.is_finite() || body.duration < 0.0 {
        return Err(AppError::Validation("duration must be a non-negative number".into()));
    }

    let video = state
        .videos
        .create_video(NewVideo {
            owner_id: caller.id,
            title: body.title.trim().to_string(),
            description: body.description.trim().to_string(),
            video_file: body.video_file,
            thumbnail: body.thumbnail,
            duration_secs: body.duration,
        })
        .await?;
    info!(video_id = %video.id, owner = %caller.id, "video uploaded");
    Ok(video.into())
}

pub async fn get(state: &AppState, id: &Uuid) -> AppResult<VideoResponse> {
    Ok(load(state, id).await?.into())
}

/// Add the video to the caller's watch history and return it.
pub async fn watch(state: &AppState, viewer: &PublicAccount, id: &Uuid) -> AppResult<VideoResponse> {
    if !state.accounts.record_watch(&viewer.id, id).await? {
        return Err(AppError::NotFound("Video not found".into()));
    }
    Ok(load(state, id).await?.into())
}

pub async fn update(
    state: &AppState,
    caller: &PublicAccount,
    id: &Uuid,
    body: UpdateVideoRequest,
) -> AppResult<VideoResponse> {
    let update = VideoUpdate {
        title: body.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()),
        description: body
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        thumbnail: body.thumbnail.filter(|t| !t.trim().is_empty()),
    };
    if update.is_empty() {
        return Err(AppError::Validation(
            "Provide at least one of title, description or thumbnail".into(),
        ));
    }

    load_owned(state, id, caller).await?;
    let video = state
        .videos
        .update_video(id, &update)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".into()))?;
    Ok(video.into())
}

pub async fn delete(state: &AppState, caller: &PublicAccount, id: &Uuid) -> AppResult<()> {
    load_owned(state, id, caller).await?;
    if !state.videos.delete_video(id).await? {
        return Err(AppError::NotFound("Video not found".into()));
    }
    info!(video_id = %id, "video deleted");
    Ok(())
}

pub async fn toggle_publish(
    state: &AppState,
    caller: &PublicAccount,
    id: &Uuid,
) -> AppResult<VideoResponse> {
    load_owned(state, id, caller).await?;
    let video = state
        .videos
        .toggle_published(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".into()))?;
    info!(video_id = %id, is_published = video.is_published, "publish status toggled");
    Ok(video.into())
}
