//! Account self-service: password, details and media references.

use vidtube_core::auth::credentials;
use vidtube_core::models::account::{AccountId, PublicAccount};
use vidtube_core::validation::{first_missing, is_email_valid, normalize_identifier};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{ChangePasswordRequest, UpdateDetailsRequest, UserResponse};

/// Change the password. The stored refresh token is cleared in the same write.
pub async fn change_password(
    state: &AppState,
    account_id: &AccountId,
    body: &ChangePasswordRequest,
) -> AppResult<()> {
    if let Some(field) = first_missing(&[
        ("oldPassword", body.old_password.as_str()),
        ("newPassword", body.new_password.as_str()),
    ]) {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    credentials::change_password(
        state.accounts.as_ref(),
        account_id,
        &body.old_password,
        &body.new_password,
        state.config.auth.bcrypt_cost,
    )
    .await?;
    Ok(())
}

/// Update display name and email.
pub async fn update_details(
    state: &AppState,
    account_id: &AccountId,
    body: &UpdateDetailsRequest,
) -> AppResult<UserResponse> {
    if let Some(field) = first_missing(&[
        ("fullName", body.full_name.as_str()),
        ("email", body.email.as_str()),
    ]) {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    let email = normalize_identifier(&body.email);
    if !is_email_valid(&email) {
        return Err(AppError::Validation("Email is not valid".into()));
    }

    let account = state
        .accounts
        .update_details(account_id, body.full_name.trim(), &email)
        .await?
        .ok_or_else(|| AppError::NotFound("User does not exist".into()))?;
    Ok(PublicAccount::from(account).into())
}

/// Which media reference to update.
#[derive(Debug, Clone, Copy)]
pub enum MediaField {
    Avatar,
    CoverImage,
}

/// Point the avatar or cover image at a new media-host URL.
pub async fn update_media(
    state: &AppState,
    account_id: &AccountId,
    field: MediaField,
    url: &str,
) -> AppResult<UserResponse> {
    let url = url.trim();
    let account = match field {
        MediaField::Avatar => {
            if url.is_empty() {
                return Err(AppError::Validation("Avatar image is required".into()));
            }
            state.accounts.update_avatar(account_id, url).await?
        }
        MediaField::CoverImage => {
            if url.is_empty() {
                return Err(AppError::Validation("Cover image is required".into()));
            }
            state.accounts.update_cover_image(account_id, url).await?
        }
    };
    let account = account.ok_or_else(|| AppError::NotFound("User does not exist".into()))?;
    Ok(PublicAccount::from(account).into())
}
