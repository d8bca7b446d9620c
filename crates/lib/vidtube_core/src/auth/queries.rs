//! Account database queries.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::account::{Account, AccountId, NewAccount};
use crate::store::StoreError;
use crate::uuid::uuidv7;

const ACCOUNT_COLUMNS: &str = "id, username, email, full_name, password_hash, refresh_token_hash, \
     avatar, cover_image, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    username: String,
    email: String,
    full_name: String,
    password_hash: String,
    refresh_token_hash: Option<String>,
    avatar: Option<String>,
    cover_image: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Self {
            id: AccountId::new(row.id),
            username: row.username,
            email: row.email,
            full_name: row.full_name,
            password_hash: row.password_hash,
            refresh_token_hash: row.refresh_token_hash,
            avatar: row.avatar,
            cover_image: row.cover_image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Fetch an account whose username or email matches `identifier`.
pub async fn find_account_by_username_or_email(
    pool: &PgPool,
    identifier: &str,
) -> Result<Option<Account>, StoreError> {
    let row = sqlx::query_as::<_, AccountRow>(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts \
         WHERE lower(username) = lower($1) OR lower(email) = lower($1) \
         LIMIT 1"
    ))
    .bind(identifier)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Account::from))
}

/// Fetch an account by ID.
pub async fn find_account_by_id(
    pool: &PgPool,
    id: &AccountId,
) -> Result<Option<Account>, StoreError> {
    let row = sqlx::query_as::<_, AccountRow>(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
    ))
    .bind(id.as_uuid())
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Account::from))
}

/// Create a new account.
pub async fn create_account(pool: &PgPool, account: &NewAccount) -> Result<Account, StoreError> {
    let row = sqlx::query_as::<_, AccountRow>(&format!(
        "INSERT INTO accounts (id, username, email, full_name, password_hash, avatar, cover_image) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {ACCOUNT_COLUMNS}"
    ))
    .bind(uuidv7())
    .bind(&account.username)
    .bind(&account.email)
    .bind(&account.full_name)
    .bind(&account.password_hash)
    .bind(&account.avatar)
    .bind(&account.cover_image)
    .fetch_one(pool)
    .await
    .map_err(|e| StoreError::conflict_or_db(e, "User already exists with this email or username"))?;
    Ok(row.into())
}

/// Overwrite (or clear, with `None`) the stored refresh-token digest.
pub async fn set_refresh_token(
    pool: &PgPool,
    id: &AccountId,
    token_hash: Option<&str>,
) -> Result<bool, StoreError> {
    let result = sqlx::query("UPDATE accounts SET refresh_token_hash = $2 WHERE id = $1")
        .bind(id.as_uuid())
        .bind(token_hash)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() == 1)
}

/// Swap the stored digest from `expected` to `token_hash` in one statement.
pub async fn replace_refresh_token(
    pool: &PgPool,
    id: &AccountId,
    expected: &str,
    token_hash: &str,
) -> Result<bool, StoreError> {
    let result = sqlx::query(
        "UPDATE accounts SET refresh_token_hash = $3 \
         WHERE id = $1 AND refresh_token_hash = $2",
    )
    .bind(id.as_uuid())
    .bind(expected)
    .bind(token_hash)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Store a new password hash and end the current session.
pub async fn update_password(
    pool: &PgPool,
    id: &AccountId,
    password_hash: &str,
) -> Result<bool, StoreError> {
    let result = sqlx::query(
        "UPDATE accounts SET password_hash = $2, refresh_token_hash = NULL, updated_at = now() \
         WHERE id = $1",
    )
    .bind(id.as_uuid())
    .bind(password_hash)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Update display name and email.
pub async fn update_details(
    pool: &PgPool,
    id: &AccountId,
    full_name: &str,
    email: &str,
) -> Result<Option<Account>, StoreError> {
    let row = sqlx::query_as::<_, AccountRow>(&format!(
        "UPDATE accounts SET full_name = $2, email = $3, updated_at = now() \
         WHERE id = $1 RETURNING {ACCOUNT_COLUMNS}"
    ))
    .bind(id.as_uuid())
    .bind(full_name)
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(|e| StoreError::conflict_or_db(e, "Email is already in use"))?;
    Ok(row.map(Account::from))
}

/// Update one media reference column (`avatar` or `cover_image`).
pub async fn update_media(
    pool: &PgPool,
    id: &AccountId,
    column: MediaColumn,
    url: &str,
) -> Result<Option<Account>, StoreError> {
    let row = sqlx::query_as::<_, AccountRow>(&format!(
        "UPDATE accounts SET {} = $2, updated_at = now() \
         WHERE id = $1 RETURNING {ACCOUNT_COLUMNS}",
        column.as_str()
    ))
    .bind(id.as_uuid())
    .bind(url)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Account::from))
}

/// Account media columns that hold media-host URLs.
#[derive(Debug, Clone, Copy)]
pub enum MediaColumn {
    Avatar,
    CoverImage,
}

impl MediaColumn {
    fn as_str(self) -> &'static str {
        match self {
            MediaColumn::Avatar => "avatar",
            MediaColumn::CoverImage => "cover_image",
        }
    }
}
