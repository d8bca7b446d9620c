//! Request handlers.

pub mod auth;
pub mod channels;
pub mod users;
pub mod videos;
