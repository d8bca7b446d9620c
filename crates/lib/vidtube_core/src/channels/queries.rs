//! Subscription and channel-profile queries.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::account::{AccountId, PublicAccount};
use crate::models::channel::ChannelProfile;
use crate::store::StoreError;

#[derive(sqlx::FromRow)]
struct ChannelRow {
    id: Uuid,
    username: String,
    email: String,
    full_name: String,
    avatar: Option<String>,
    cover_image: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    subscribers_count: i64,
    subscribed_channels_count: i64,
    is_subscribed: bool,
}

impl From<ChannelRow> for ChannelProfile {
    fn from(row: ChannelRow) -> Self {
        Self {
            account: PublicAccount {
                id: AccountId::new(row.id),
                username: row.username,
                email: row.email,
                full_name: row.full_name,
                avatar: row.avatar,
                cover_image: row.cover_image,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            subscribers_count: row.subscribers_count,
            subscribed_channels_count: row.subscribed_channels_count,
            is_subscribed: row.is_subscribed,
        }
    }
}

/// Delete the subscription if present, insert it otherwise, in one statement.
/// Returns whether the subscription exists afterwards.
pub async fn toggle_subscription(
    pool: &PgPool,
    subscriber: &AccountId,
    channel: &AccountId,
) -> Result<bool, StoreError> {
    let inserted = sqlx::query_scalar::<_, i32>(
        "WITH removed AS ( \
           DELETE FROM subscriptions WHERE subscriber_id = $1 AND channel_id = $2 RETURNING 1 \
         ) \
         INSERT INTO subscriptions (subscriber_id, channel_id) \
         SELECT $1, $2 WHERE NOT EXISTS (SELECT 1 FROM removed) \
         RETURNING 1",
    )
    .bind(subscriber.as_uuid())
    .bind(channel.as_uuid())
    .fetch_optional(pool)
    .await
    .map_err(|e| StoreError::conflict_or_db(e, "Subscription changed concurrently"))?;
    Ok(inserted.is_some())
}

/// Fetch a channel by username with its subscription counts as seen by `viewer`.
pub async fn channel_profile(
    pool: &PgPool,
    username: &str,
    viewer: &AccountId,
) -> Result<Option<ChannelProfile>, StoreError> {
    let row = sqlx::query_as::<_, ChannelRow>(
        "SELECT a.id, a.username, a.email, a.full_name, a.avatar, a.cover_image, \
                a.created_at, a.updated_at, \
                (SELECT COUNT(*) FROM subscriptions s WHERE s.channel_id = a.id) \
                    AS subscribers_count, \
                (SELECT COUNT(*) FROM subscriptions s WHERE s.subscriber_id = a.id) \
                    AS subscribed_channels_count, \
                EXISTS (SELECT 1 FROM subscriptions s \
                        WHERE s.channel_id = a.id AND s.subscriber_id = $2) AS is_subscribed \
         FROM accounts a WHERE lower(a.username) = lower($1)",
    )
    .bind(username)
    .bind(viewer.as_uuid())
    .fetch_optional(pool)
    .await?;
    Ok(row.map(ChannelProfile::from))
}
