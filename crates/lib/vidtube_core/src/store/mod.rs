//! Storage contracts the core depends on.
//!
//! [`AccountStore`] is the credential store: it owns the single refresh-token
//! slot per account, plus the subscription and watch-history relations
//! hanging off accounts. [`VideoStore`] holds owned resources. Both have a
//! PostgreSQL implementation ([`postgres::PgStore`]) and an in-process one
//! ([`memory::MemoryStore`]).

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::account::{Account, AccountId, NewAccount};
use crate::models::channel::{ChannelProfile, WatchedVideo};
use crate::models::video::{NewVideo, Video, VideoUpdate};

/// Persistence failures, shared by every store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness rule was violated (duplicate username, email, ...).
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
}

impl StoreError {
    /// Map a unique-index violation to [`StoreError::Conflict`], anything else to `Db`.
    pub(crate) fn conflict_or_db(e: sqlx::Error, message: &str) -> Self {
        if let sqlx::Error::Database(db) = &e
            && db.is_unique_violation()
        {
            return StoreError::Conflict(message.to_string());
        }
        StoreError::Db(e)
    }
}

/// Account persistence. Every write is a single-record atomic update.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Match `identifier` against username or email, case-insensitively.
    async fn find_by_username_or_email(&self, identifier: &str)
    -> Result<Option<Account>, StoreError>;

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, StoreError>;

    /// Insert a new account. Duplicate username or email → [`StoreError::Conflict`].
    async fn create(&self, account: NewAccount) -> Result<Account, StoreError>;

    /// Overwrite the stored refresh-token digest. `None` clears it.
    /// Returns `false` if the account does not exist.
    async fn set_refresh_token(
        &self,
        id: &AccountId,
        token_hash: Option<&str>,
    ) -> Result<bool, StoreError>;

    /// Replace the stored digest only if it still equals `expected`.
    /// Returns `false` when another writer got there first.
    async fn replace_refresh_token(
        &self,
        id: &AccountId,
        expected: &str,
        token_hash: &str,
    ) -> Result<bool, StoreError>;

    /// Store a new password hash and clear the refresh token in the same write.
    async fn update_password(&self, id: &AccountId, password_hash: &str)
    -> Result<bool, StoreError>;

    async fn update_details(
        &self,
        id: &AccountId,
        full_name: &str,
        email: &str,
    ) -> Result<Option<Account>, StoreError>;

    async fn update_avatar(&self, id: &AccountId, avatar: &str)
    -> Result<Option<Account>, StoreError>;

    async fn update_cover_image(
        &self,
        id: &AccountId,
        cover_image: &str,
    ) -> Result<Option<Account>, StoreError>;

    /// Subscribe `subscriber` to `channel`, or unsubscribe if already subscribed.
    /// Returns whether the subscription exists afterwards.
    async fn toggle_subscription(
        &self,
        subscriber: &AccountId,
        channel: &AccountId,
    ) -> Result<bool, StoreError>;

    /// Look up a channel by username, with its subscription counts and
    /// whether `viewer` is subscribed to it.
    async fn channel_profile(
        &self,
        username: &str,
        viewer: &AccountId,
    ) -> Result<Option<ChannelProfile>, StoreError>;

    /// Record that `account` watched a video. Watching again moves it to the
    /// front of the history. Returns `false` if the video does not exist.
    async fn record_watch(&self, account: &AccountId, video_id: &Uuid) -> Result<bool, StoreError>;

    /// Watched videos, most recent first, each with its owner's public projection.
    async fn watch_history(&self, account: &AccountId) -> Result<Vec<WatchedVideo>, StoreError>;
}

/// Video persistence.
#[async_trait]
pub trait VideoStore: Send + Sync {
    async fn create_video(&self, video: NewVideo) -> Result<Video, StoreError>;

    async fn find_video(&self, id: &Uuid) -> Result<Option<Video>, StoreError>;

    async fn update_video(
        &self,
        id: &Uuid,
        update: &VideoUpdate,
    ) -> Result<Option<Video>, StoreError>;

    /// Flip `is_published` atomically and return the updated record.
    async fn toggle_published(&self, id: &Uuid) -> Result<Option<Video>, StoreError>;

    /// Returns `false` if there was nothing to delete.
    async fn delete_video(&self, id: &Uuid) -> Result<bool, StoreError>;
}
