//! API server configuration.

use axum::http::HeaderValue;
use thiserror::Error;
use vidtube_core::auth::AuthConfig;

use crate::services::cookies::CookieSettings;

/// Configuration errors raised while assembling [`ApiConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid auth configuration: {0}")]
    Auth(String),

    #[error("Invalid SameSite policy '{0}' (expected strict, lax or none)")]
    SameSite(String),

    #[error("Invalid CORS origin '{0}'")]
    CorsOrigin(String),
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:8000").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Token secrets, lifetimes and bcrypt cost.
    pub auth: AuthConfig,
    /// Attributes shared by both auth cookies.
    pub cookies: CookieSettings,
    /// Allowed browser origin. `None` allows any origin without credentials.
    pub cors_origin: Option<String>,
}

impl ApiConfig {
    /// Check cross-field invariants before the server starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.auth
            .validate()
            .map_err(|e| ConfigError::Auth(e.to_string()))?;
        if let Some(origin) = &self.cors_origin
            && HeaderValue::from_str(origin).is_err()
        {
            return Err(ConfigError::CorsOrigin(origin.clone()));
        }
        Ok(())
    }
}
