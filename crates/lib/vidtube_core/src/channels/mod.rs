//! Channel persistence: subscriptions and profile lookups.

pub mod queries;
