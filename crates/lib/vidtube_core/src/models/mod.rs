//! Domain models.
//!
//! These are internal domain models, distinct from the API request/response
//! types in `vidtube_api` (which carry `#[serde(rename)]` for camelCase).

pub mod account;
pub mod channel;
pub mod video;
