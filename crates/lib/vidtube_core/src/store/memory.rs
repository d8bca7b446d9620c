//! In-process store backed by `RwLock<HashMap>`.
//!
//! Each method takes the write lock for the whole read-modify-write, which
//! gives the same single-record atomicity the PostgreSQL store gets from
//! its `UPDATE ... WHERE` statements. Methods that read more than one map
//! take the locks in the order accounts, videos, subscriptions, watched.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AccountStore, StoreError, VideoStore};
use crate::models::account::{Account, AccountId, NewAccount, PublicAccount};
use crate::models::channel::{ChannelProfile, WatchedVideo};
use crate::models::video::{NewVideo, Video, VideoUpdate};
use crate::uuid::uuidv7;

#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: RwLock<HashMap<AccountId, Account>>,
    videos: RwLock<HashMap<Uuid, Video>>,
    /// `(subscriber, channel)` pairs.
    subscriptions: RwLock<HashSet<(AccountId, AccountId)>>,
    /// Per account, oldest first.
    watched: RwLock<HashMap<AccountId, Vec<(Uuid, DateTime<Utc>)>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_identifier(account: &Account, identifier: &str) -> bool {
    account.username.eq_ignore_ascii_case(identifier) || account.email.eq_ignore_ascii_case(identifier)
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_by_username_or_email(
        &self,
        identifier: &str,
    ) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| matches_identifier(a, identifier))
            .cloned())
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.read().await.get(id).cloned())
    }

    async fn create(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.write().await;
        let taken = accounts.values().any(|a| {
            a.username.eq_ignore_ascii_case(&account.username)
                || a.email.eq_ignore_ascii_case(&account.email)
        });
        if taken {
            return Err(StoreError::Conflict(
                "User already exists with this email or username".into(),
            ));
        }

        let now = Utc::now();
        let record = Account {
            id: AccountId::new(uuidv7()),
            username: account.username,
            email: account.email,
            full_name: account.full_name,
            password_hash: account.password_hash,
            refresh_token_hash: None,
            avatar: account.avatar,
            cover_image: account.cover_image,
            created_at: now,
            updated_at: now,
        };
        accounts.insert(record.id, record.clone());
        Ok(record)
    }

    async fn set_refresh_token(
        &self,
        id: &AccountId,
        token_hash: Option<&str>,
    ) -> Result<bool, StoreError> {
        let mut accounts = self.accounts.write().await;
        Ok(match accounts.get_mut(id) {
            Some(account) => {
                account.refresh_token_hash = token_hash.map(str::to_string);
                true
            }
            None => false,
        })
    }

    async fn replace_refresh_token(
        &self,
        id: &AccountId,
        expected: &str,
        token_hash: &str,
    ) -> Result<bool, StoreError> {
        let mut accounts = self.accounts.write().await;
        Ok(match accounts.get_mut(id) {
            Some(account) if account.refresh_token_hash.as_deref() == Some(expected) => {
                account.refresh_token_hash = Some(token_hash.to_string());
                true
            }
            _ => false,
        })
    }

    async fn update_password(
        &self,
        id: &AccountId,
        password_hash: &str,
    ) -> Result<bool, StoreError> {
        let mut accounts = self.accounts.write().await;
        Ok(match accounts.get_mut(id) {
            Some(account) => {
                account.password_hash = password_hash.to_string();
                account.refresh_token_hash = None;
                account.updated_at = Utc::now();
                true
            }
            None => false,
        })
    }

    async fn update_details(
        &self,
        id: &AccountId,
        full_name: &str,
        email: &str,
    ) -> Result<Option<Account>, StoreError> {
        let mut accounts = self.accounts.write().await;
        let email_taken = accounts
            .values()
            .any(|a| a.id != *id && a.email.eq_ignore_ascii_case(email));
        if email_taken {
            return Err(StoreError::Conflict("Email is already in use".into()));
        }
        Ok(accounts.get_mut(id).map(|account| {
            account.full_name = full_name.to_string();
            account.email = email.to_string();
            account.updated_at = Utc::now();
            account.clone()
        }))
    }

    async fn update_avatar(
        &self,
        id: &AccountId,
        avatar: &str,
    ) -> Result<Option<Account>, StoreError> {
        let mut accounts = self.accounts.write().await;
        Ok(accounts.get_mut(id).map(|account| {
            account.avatar = Some(avatar.to_string());
            account.updated_at = Utc::now();
            account.clone()
        }))
    }

    async fn update_cover_image(
        &self,
        id: &AccountId,
        cover_image: &str,
    ) -> Result<Option<Account>, StoreError> {
        let mut accounts = self.accounts.write().await;
        Ok(accounts.get_mut(id).map(|account| {
            account.cover_image = Some(cover_image.to_string());
            account.updated_at = Utc::now();
            account.clone()
        }))
    }

    async fn toggle_subscription(
        &self,
        subscriber: &AccountId,
        channel: &AccountId,
    ) -> Result<bool, StoreError> {
        let mut subscriptions = self.subscriptions.write().await;
        let pair = (*subscriber, *channel);
        if subscriptions.remove(&pair) {
            return Ok(false);
        }
        subscriptions.insert(pair);
        Ok(true)
    }

    async fn channel_profile(
        &self,
        username: &str,
        viewer: &AccountId,
    ) -> Result<Option<ChannelProfile>, StoreError> {
        let accounts = self.accounts.read().await;
        let Some(account) = accounts
            .values()
            .find(|a| a.username.eq_ignore_ascii_case(username))
        else {
            return Ok(None);
        };

        let subscriptions = self.subscriptions.read().await;
        let subscribers_count = subscriptions.iter().filter(|(_, c)| *c == account.id).count();
        let subscribed_channels_count = subscriptions.iter().filter(|(s, _)| *s == account.id).count();
        Ok(Some(ChannelProfile {
            account: account.clone().into(),
            subscribers_count: subscribers_count as i64,
            subscribed_channels_count: subscribed_channels_count as i64,
            is_subscribed: subscriptions.contains(&(*viewer, account.id)),
        }))
    }

    async fn record_watch(&self, account: &AccountId, video_id: &Uuid) -> Result<bool, StoreError> {
        if !self.videos.read().await.contains_key(video_id) {
            return Ok(false);
        }
        let mut watched = self.watched.write().await;
        let history = watched.entry(*account).or_default();
        history.retain(|(id, _)| id != video_id);
        history.push((*video_id, Utc::now()));
        Ok(true)
    }

    async fn watch_history(&self, account: &AccountId) -> Result<Vec<WatchedVideo>, StoreError> {
        let accounts = self.accounts.read().await;
        let videos = self.videos.read().await;
        let watched = self.watched.read().await;

        // Entries whose video or owner is gone are skipped, as the SQL join does.
        let entries = watched.get(account).map(Vec::as_slice).unwrap_or_default();
        Ok(entries
            .iter()
            .rev()
            .filter_map(|(video_id, watched_at)| {
                let video = videos.get(video_id)?;
                let owner = accounts.get(&video.owner_id)?;
                Some(WatchedVideo {
                    video: video.clone(),
                    owner: PublicAccount::from(owner.clone()),
                    watched_at: *watched_at,
                })
            })
            .collect())
    }
}

#[async_trait]
impl VideoStore for MemoryStore {
    async fn create_video(&self, video: NewVideo) -> Result<Video, StoreError> {
        let now = Utc::now();
        let record = Video {
            id: uuidv7(),
            owner_id: video.owner_id,
            title: video.title,
            description: video.description,
            video_file: video.video_file,
            thumbnail: video.thumbnail,
            duration_secs: video.duration_secs,
            views: 0,
            is_published: true,
            created_at: now,
            updated_at: now,
        };
        self.videos.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_video(&self, id: &Uuid) -> Result<Option<Video>, StoreError> {
        Ok(self.videos.read().await.get(id).cloned())
    }

    async fn update_video(
        &self,
        id: &Uuid,
        update: &VideoUpdate,
    ) -> Result<Option<Video>, StoreError> {
        let mut videos = self.videos.write().await;
        Ok(videos.get_mut(id).map(|video| {
            if let Some(title) = &update.title {
                video.title = title.clone();
            }
            if let Some(description) = &update.description {
                video.description = description.clone();
            }
            if let Some(thumbnail) = &update.thumbnail {
                video.thumbnail = thumbnail.clone();
            }
            video.updated_at = Utc::now();
            video.clone()
        }))
    }

    async fn toggle_published(&self, id: &Uuid) -> Result<Option<Video>, StoreError> {
        let mut videos = self.videos.write().await;
        Ok(videos.get_mut(id).map(|video| {
            video.is_published = !video.is_published;
            video.updated_at = Utc::now();
            video.clone()
        }))
    }

    async fn delete_video(&self, id: &Uuid) -> Result<bool, StoreError> {
        Ok(self.videos.write().await.remove(id).is_some())
    }
}
