//! Channel and watch-history handlers. All require authentication.

use axum::extract::{Path, State};
use axum::{Extension, Json};

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{ChannelProfileResponse, SubscriptionResponse, WatchHistoryItem};
use crate::services::channels;

/// `GET /api/v1/users/c/{username}`: Channel profile with subscription counts.
pub async fn channel_profile_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(username): Path<String>,
) -> AppResult<Json<ChannelProfileResponse>> {
    Ok(Json(channels::profile(&state, &user.0.id, &username).await?))
}

/// `POST /api/v1/users/c/{username}/subscribe`: Toggle the caller's subscription.
pub async fn toggle_subscription_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(username): Path<String>,
) -> AppResult<Json<SubscriptionResponse>> {
    Ok(Json(
        channels::toggle_subscription(&state, &user.0.id, &username).await?,
    ))
}

/// `GET /api/v1/users/watch-history`
pub async fn watch_history_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<Vec<WatchHistoryItem>>> {
    Ok(Json(channels::watch_history(&state, &user.0.id).await?))
}
