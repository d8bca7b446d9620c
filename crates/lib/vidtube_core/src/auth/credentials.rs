//! Credential verification, registration and password changes.

use tracing::{debug, info};

use super::AuthError;
use super::password::{hash_password, verify_password};
use crate::models::account::{Account, AccountId, NewAccount, PublicAccount};
use crate::store::AccountStore;
use crate::validation::{first_missing, is_email_valid, is_username_valid, normalize_identifier};

/// Registration input as supplied by the client.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub avatar: Option<String>,
    pub cover_image: Option<String>,
}

/// Locate an account by username or email and check its password.
///
/// Unknown identifier → [`AuthError::NotFound`]; wrong password →
/// [`AuthError::CredentialError`].
pub async fn verify_credentials(
    store: &dyn AccountStore,
    identifier: &str,
    password: &str,
) -> Result<Account, AuthError> {
    if identifier.trim().is_empty() {
        return Err(AuthError::ValidationError(
            "username or email is required".into(),
        ));
    }
    if password.is_empty() {
        return Err(AuthError::ValidationError("password is required".into()));
    }

    let account = store
        .find_by_username_or_email(&normalize_identifier(identifier))
        .await?
        .ok_or(AuthError::NotFound)?;

    if !verify_password(password, &account.password_hash)? {
        debug!(account_id = %account.id, "password mismatch");
        return Err(AuthError::CredentialError);
    }
    Ok(account)
}

/// Create an account. Username and email are stored lowercase.
pub async fn register(
    store: &dyn AccountStore,
    registration: Registration,
    bcrypt_cost: u32,
) -> Result<PublicAccount, AuthError> {
    if let Some(field) = first_missing(&[
        ("fullName", registration.full_name.as_str()),
        ("email", registration.email.as_str()),
        ("username", registration.username.as_str()),
        ("password", registration.password.as_str()),
    ]) {
        return Err(AuthError::ValidationError(format!("{field} is required")));
    }

    let email = normalize_identifier(&registration.email);
    let username = normalize_identifier(&registration.username);
    if !is_email_valid(&email) {
        return Err(AuthError::ValidationError("Email is not valid".into()));
    }
    if !is_username_valid(&username) {
        return Err(AuthError::ValidationError(
            "Username is not valid; username should only have numbers and alphabets".into(),
        ));
    }

    // The store enforces uniqueness too; checking here gives the common case
    // a clean error without paying for a bcrypt hash.
    for identifier in [&username, &email] {
        if store.find_by_username_or_email(identifier).await?.is_some() {
            return Err(AuthError::Conflict(
                "User already exists with this email or username".into(),
            ));
        }
    }

    let password_hash = hash_password(&registration.password, bcrypt_cost)?;
    let account = store
        .create(NewAccount {
            username,
            email,
            full_name: registration.full_name.trim().to_string(),
            password_hash,
            avatar: registration.avatar,
            cover_image: registration.cover_image,
        })
        .await?;

    info!(account_id = %account.id, username = %account.username, "account registered");
    Ok(account.into())
}

/// Replace the password after checking the old one. Clears the stored
/// refresh token, so the caller must log in again.
pub async fn change_password(
    store: &dyn AccountStore,
    id: &AccountId,
    old_password: &str,
    new_password: &str,
    bcrypt_cost: u32,
) -> Result<(), AuthError> {
    if new_password.is_empty() {
        return Err(AuthError::ValidationError("newPassword is required".into()));
    }

    let account = store.find_by_id(id).await?.ok_or(AuthError::NotFound)?;
    if !verify_password(old_password, &account.password_hash)? {
        return Err(AuthError::ValidationError("Invalid old password".into()));
    }

    let password_hash = hash_password(new_password, bcrypt_cost)?;
    if !store.update_password(id, &password_hash).await? {
        return Err(AuthError::NotFound);
    }
    info!(account_id = %id, "password changed, session cleared");
    Ok(())
}
