//! Video database queries.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::account::{AccountId, PublicAccount};
use crate::models::channel::WatchedVideo;
use crate::models::video::{NewVideo, Video, VideoUpdate};
use crate::store::StoreError;
use crate::uuid::uuidv7;

const VIDEO_COLUMNS: &str = "id, owner_id, title, description, video_file, thumbnail, \
     duration_secs, views, is_published, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct VideoRow {
    id: Uuid,
    owner_id: Uuid,
    title: String,
    description: String,
    video_file: String,
    thumbnail: String,
    duration_secs: f64,
    views: i64,
    is_published: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<VideoRow> for Video {
    fn from(row: VideoRow) -> Self {
        Self {
            id: row.id,
            owner_id: AccountId::new(row.owner_id),
            title: row.title,
            description: row.description,
            video_file: row.video_file,
            thumbnail: row.thumbnail,
            duration_secs: row.duration_secs,
            views: row.views,
            is_published: row.is_published,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Insert a video owned by `video.owner_id`.
pub async fn create_video(pool: &PgPool, video: &NewVideo) -> Result<Video, StoreError> {
    let row = sqlx::query_as::<_, VideoRow>(&format!(
        "INSERT INTO videos (id, owner_id, title, description, video_file, thumbnail, duration_secs) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {VIDEO_COLUMNS}"
    ))
    .bind(uuidv7())
    .bind(video.owner_id.as_uuid())
    .bind(&video.title)
    .bind(&video.description)
    .bind(&video.video_file)
    .bind(&video.thumbnail)
    .bind(video.duration_secs)
    .fetch_one(pool)
    .await?;
    Ok(row.into())
}

/// Fetch a video by ID.
pub async fn find_video(pool: &PgPool, id: &Uuid) -> Result<Option<Video>, StoreError> {
    let row = sqlx::query_as::<_, VideoRow>(&format!(
        "SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Video::from))
}

/// Apply a partial update; absent fields keep their value.
pub async fn update_video(
    pool: &PgPool,
    id: &Uuid,
    update: &VideoUpdate,
) -> Result<Option<Video>, StoreError> {
    let row = sqlx::query_as::<_, VideoRow>(&format!(
        "UPDATE videos SET \
           title = COALESCE($2, title), \
           description = COALESCE($3, description), \
           thumbnail = COALESCE($4, thumbnail), \
           updated_at = now() \
         WHERE id = $1 RETURNING {VIDEO_COLUMNS}"
    ))
    .bind(id)
    .bind(&update.title)
    .bind(&update.description)
    .bind(&update.thumbnail)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Video::from))
}

/// Flip the publish flag in a single statement.
pub async fn toggle_published(pool: &PgPool, id: &Uuid) -> Result<Option<Video>, StoreError> {
    let row = sqlx::query_as::<_, VideoRow>(&format!(
        "UPDATE videos SET is_published = NOT is_published, updated_at = now() \
         WHERE id = $1 RETURNING {VIDEO_COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Video::from))
}

/// Delete a video.
pub async fn delete_video(pool: &PgPool, id: &Uuid) -> Result<bool, StoreError> {
    let result = sqlx::query("DELETE FROM videos WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() == 1)
}

#[derive(sqlx::FromRow)]
struct WatchRow {
    #[sqlx(flatten)]
    video: VideoRow,
    owner_username: String,
    owner_email: String,
    owner_full_name: String,
    owner_avatar: Option<String>,
    owner_cover_image: Option<String>,
    owner_created_at: DateTime<Utc>,
    owner_updated_at: DateTime<Utc>,
    watched_at: DateTime<Utc>,
}

impl From<WatchRow> for WatchedVideo {
    fn from(row: WatchRow) -> Self {
        let video = Video::from(row.video);
        Self {
            owner: PublicAccount {
                id: video.owner_id,
                username: row.owner_username,
                email: row.owner_email,
                full_name: row.owner_full_name,
                avatar: row.owner_avatar,
                cover_image: row.owner_cover_image,
                created_at: row.owner_created_at,
                updated_at: row.owner_updated_at,
            },
            video,
            watched_at: row.watched_at,
        }
    }
}

/// Upsert a watch-history entry. Inserts nothing if the video does not exist.
pub async fn record_watch(
    pool: &PgPool,
    account: &AccountId,
    video_id: &Uuid,
) -> Result<bool, StoreError> {
    let result = sqlx::query(
        "INSERT INTO watch_history (account_id, video_id, watched_at) \
         SELECT $1, id, clock_timestamp() FROM videos WHERE id = $2 \
         ON CONFLICT (account_id, video_id) DO UPDATE SET watched_at = EXCLUDED.watched_at",
    )
    .bind(account.as_uuid())
    .bind(video_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Watched videos joined with their owners, most recent first.
pub async fn watch_history(
    pool: &PgPool,
    account: &AccountId,
) -> Result<Vec<WatchedVideo>, StoreError> {
    let rows = sqlx::query_as::<_, WatchRow>(
        "SELECT v.id, v.owner_id, v.title, v.description, v.video_file, v.thumbnail, \
                v.duration_secs, v.views, v.is_published, v.created_at, v.updated_at, \
                o.username AS owner_username, o.email AS owner_email, \
                o.full_name AS owner_full_name, o.avatar AS owner_avatar, \
                o.cover_image AS owner_cover_image, o.created_at AS owner_created_at, \
                o.updated_at AS owner_updated_at, w.watched_at \
         FROM watch_history w \
         JOIN videos v ON v.id = w.video_id \
         JOIN accounts o ON o.id = v.owner_id \
         WHERE w.account_id = $1 \
         ORDER BY w.watched_at DESC",
    )
    .bind(account.as_uuid())
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(WatchedVideo::from).collect())
}
