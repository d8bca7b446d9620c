//! Channel views over accounts: subscription counts and watch history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::account::PublicAccount;
use super::video::Video;

/// An account seen as a channel by a particular viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelProfile {
    pub account: PublicAccount,
    /// Accounts subscribed to this channel.
    pub subscribers_count: i64,
    /// Channels this account subscribes to.
    pub subscribed_channels_count: i64,
    /// Whether the viewer is among the subscribers.
    pub is_subscribed: bool,
}

/// One watch-history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchedVideo {
    pub video: Video,
    pub owner: PublicAccount,
    pub watched_at: DateTime<Utc>,
}
