//! PostgreSQL store, delegating to the query modules.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{AccountStore, StoreError, VideoStore};
use crate::auth::queries::{self, MediaColumn};
use crate::channels::queries as channel_queries;
use crate::models::account::{Account, AccountId, NewAccount};
use crate::models::channel::{ChannelProfile, WatchedVideo};
use crate::models::video::{NewVideo, Video, VideoUpdate};
use crate::videos::queries as video_queries;

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn find_by_username_or_email(
        &self,
        identifier: &str,
    ) -> Result<Option<Account>, StoreError> {
        queries::find_account_by_username_or_email(&self.pool, identifier).await
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, StoreError> {
        queries::find_account_by_id(&self.pool, id).await
    }

    async fn create(&self, account: NewAccount) -> Result<Account, StoreError> {
        queries::create_account(&self.pool, &account).await
    }

    async fn set_refresh_token(
        &self,
        id: &AccountId,
        token_hash: Option<&str>,
    ) -> Result<bool, StoreError> {
        queries::set_refresh_token(&self.pool, id, token_hash).await
    }

    async fn replace_refresh_token(
        &self,
        id: &AccountId,
        expected: &str,
        token_hash: &str,
    ) -> Result<bool, StoreError> {
        queries::replace_refresh_token(&self.pool, id, expected, token_hash).await
    }

    async fn update_password(
        &self,
        id: &AccountId,
        password_hash: &str,
    ) -> Result<bool, StoreError> {
        queries::update_password(&self.pool, id, password_hash).await
    }

    async fn update_details(
        &self,
        id: &AccountId,
        full_name: &str,
        email: &str,
    ) -> Result<Option<Account>, StoreError> {
        queries::update_details(&self.pool, id, full_name, email).await
    }

    async fn update_avatar(
        &self,
        id: &AccountId,
        avatar: &str,
    ) -> Result<Option<Account>, StoreError> {
        queries::update_media(&self.pool, id, MediaColumn::Avatar, avatar).await
    }

    async fn update_cover_image(
        &self,
        id: &AccountId,
        cover_image: &str,
    ) -> Result<Option<Account>, StoreError> {
        queries::update_media(&self.pool, id, MediaColumn::CoverImage, cover_image).await
    }

    async fn toggle_subscription(
        &self,
        subscriber: &AccountId,
        channel: &AccountId,
    ) -> Result<bool, StoreError> {
        channel_queries::toggle_subscription(&self.pool, subscriber, channel).await
    }

    async fn channel_profile(
        &self,
        username: &str,
        viewer: &AccountId,
    ) -> Result<Option<ChannelProfile>, StoreError> {
        channel_queries::channel_profile(&self.pool, username, viewer).await
    }

    async fn record_watch(&self, account: &AccountId, video_id: &Uuid) -> Result<bool, StoreError> {
        video_queries::record_watch(&self.pool, account, video_id).await
    }

    async fn watch_history(&self, account: &AccountId) -> Result<Vec<WatchedVideo>, StoreError> {
        video_queries::watch_history(&self.pool, account).await
    }
}

#[async_trait]
impl VideoStore for PgStore {
    async fn create_video(&self, video: NewVideo) -> Result<Video, StoreError> {
        video_queries::create_video(&self.pool, &video).await
    }

    async fn find_video(&self, id: &Uuid) -> Result<Option<Video>, StoreError> {
        video_queries::find_video(&self.pool, id).await
    }

    async fn update_video(
        &self,
        id: &Uuid,
        update: &VideoUpdate,
    ) -> Result<Option<Video>, StoreError> {
        video_queries::update_video(&self.pool, id, update).await
    }

    async fn toggle_published(&self, id: &Uuid) -> Result<Option<Video>, StoreError> {
        video_queries::toggle_published(&self.pool, id).await
    }

    async fn delete_video(&self, id: &Uuid) -> Result<bool, StoreError> {
        video_queries::delete_video(&self.pool, id).await
    }
}
