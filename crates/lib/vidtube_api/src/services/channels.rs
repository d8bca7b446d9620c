//! Channel service: profiles, subscriptions and watch history.

use tracing::info;
use vidtube_core::models::account::AccountId;
use vidtube_core::models::channel::ChannelProfile;
use vidtube_core::validation::normalize_identifier;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{ChannelProfileResponse, SubscriptionResponse, WatchHistoryItem};

async fn lookup(state: &AppState, username: &str, viewer: &AccountId) -> AppResult<ChannelProfile> {
    let username = normalize_identifier(username);
    if username.is_empty() {
        return Err(AppError::Validation("Username is required".into()));
    }
    state
        .accounts
        .channel_profile(&username, viewer)
        .await?
        .ok_or_else(|| AppError::NotFound("Channel not found".into()))
}

/// The channel named `username` as seen by `viewer`.
pub async fn profile(
    state: &AppState,
    viewer: &AccountId,
    username: &str,
) -> AppResult<ChannelProfileResponse> {
    Ok(lookup(state, username, viewer).await?.into())
}

/// Subscribe to the channel, or unsubscribe if already subscribed.
pub async fn toggle_subscription(
    state: &AppState,
    subscriber: &AccountId,
    username: &str,
) -> AppResult<SubscriptionResponse> {
    let channel = lookup(state, username, subscriber).await?;
    if channel.account.id == *subscriber {
        return Err(AppError::Validation(
            "Cannot subscribe to your own channel".into(),
        ));
    }
    let subscribed = state
        .accounts
        .toggle_subscription(subscriber, &channel.account.id)
        .await?;
    info!(subscriber = %subscriber, channel = %channel.account.id, subscribed, "subscription toggled");
    Ok(SubscriptionResponse { subscribed })
}

pub async fn watch_history(state: &AppState, account: &AccountId) -> AppResult<Vec<WatchHistoryItem>> {
    let history = state.accounts.watch_history(account).await?;
    Ok(history.into_iter().map(WatchHistoryItem::from).collect())
}
