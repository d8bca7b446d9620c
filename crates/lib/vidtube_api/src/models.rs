//! API request/response models (camelCase on the wire).
//!
//! String fields on requests default to empty so a missing field reaches
//! validation and yields a 400 with a field name, not a JSON rejection.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vidtube_core::auth::session::TokenPair;
use vidtube_core::models::account::PublicAccount;
use vidtube_core::models::channel::{ChannelProfile, WatchedVideo};
use vidtube_core::models::video::Video;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub avatar: Option<String>,
    pub cover_image: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    #[serde(alias = "username", alias = "email")]
    pub username_or_email: String,
    pub password: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: Option<String>,
    pub cover_image: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PublicAccount> for UserResponse {
    fn from(account: PublicAccount) -> Self {
        Self {
            id: account.id.to_string(),
            username: account.username,
            email: account.email,
            full_name: account.full_name,
            avatar: account.avatar,
            cover_image: account.cover_image,
            created_at: account.created_at.to_rfc3339(),
            updated_at: account.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub token_type: String,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_in: pair.access_expires_in,
            token_type: "Bearer".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserResponse,
    #[serde(flatten)]
    pub tokens: TokenResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateDetailsRequest {
    pub full_name: String,
    pub email: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateAvatarRequest {
    pub avatar: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateCoverImageRequest {
    pub cover_image: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadVideoRequest {
    pub title: String,
    pub description: String,
    /// URL of the uploaded media on the media host.
    pub video_file: String,
    pub thumbnail: String,
    pub duration: f64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateVideoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResponse {
    pub id: Uuid,
    pub owner: String,
    pub title: String,
    pub description: String,
    pub video_file: String,
    pub thumbnail: String,
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Video> for VideoResponse {
    fn from(video: Video) -> Self {
        Self {
            id: video.id,
            owner: video.owner_id.to_string(),
            title: video.title,
            description: video.description,
            video_file: video.video_file,
            thumbnail: video.thumbnail,
            duration: video.duration_secs,
            views: video.views,
            is_published: video.is_published,
            created_at: video.created_at.to_rfc3339(),
            updated_at: video.updated_at.to_rfc3339(),
        }
    }
}

/// An account seen as a channel, with subscription counts for the viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelProfileResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: Option<String>,
    pub cover_image: Option<String>,
    pub created_at: String,
    pub subscribers_count: i64,
    pub subscribed_channels_count: i64,
    pub is_subscribed: bool,
}

impl From<ChannelProfile> for ChannelProfileResponse {
    fn from(profile: ChannelProfile) -> Self {
        let account = profile.account;
        Self {
            id: account.id.to_string(),
            username: account.username,
            email: account.email,
            full_name: account.full_name,
            avatar: account.avatar,
            cover_image: account.cover_image,
            created_at: account.created_at.to_rfc3339(),
            subscribers_count: profile.subscribers_count,
            subscribed_channels_count: profile.subscribed_channels_count,
            is_subscribed: profile.is_subscribed,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    pub subscribed: bool,
}

/// Owner summary shown alongside watched videos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: Option<String>,
}

impl From<PublicAccount> for OwnerResponse {
    fn from(account: PublicAccount) -> Self {
        Self {
            id: account.id.to_string(),
            username: account.username,
            email: account.email,
            full_name: account.full_name,
            avatar: account.avatar,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchHistoryItem {
    pub video: VideoResponse,
    pub owner: OwnerResponse,
    pub watched_at: String,
}

impl From<WatchedVideo> for WatchHistoryItem {
    fn from(entry: WatchedVideo) -> Self {
        Self {
            video: entry.video.into(),
            owner: entry.owner.into(),
            watched_at: entry.watched_at.to_rfc3339(),
        }
    }
}
