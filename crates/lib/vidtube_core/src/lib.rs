//! # vidtube_core
//!
//! Core domain logic for vidtube: accounts, session tokens, ownership checks
//! and the storage contracts they rely on.

pub mod auth;
pub mod channels;
pub mod migrate;
pub mod models;
pub mod store;
pub mod uuid;
pub mod validation;
pub mod videos;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
