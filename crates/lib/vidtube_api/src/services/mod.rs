//! Services backing the handlers.

pub mod auth;
pub mod channels;
pub mod cookies;
pub mod users;
pub mod videos;
