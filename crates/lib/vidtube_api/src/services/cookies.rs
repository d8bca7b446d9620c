//! Cookie service: Set/read/clear httpOnly auth cookies.
//!
//! Cookie names: `accessToken`, `refreshToken`.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;
use vidtube_core::auth::session::TokenPair;

use crate::config::ConfigError;

/// Cookie name for the access token.
pub const ACCESS_COOKIE: &str = "accessToken";
/// Cookie name for the refresh token.
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Attributes applied to both auth cookies.
#[derive(Clone, Copy, Debug)]
pub struct CookieSettings {
    pub secure: bool,
    pub same_site: SameSite,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            secure: true,
            same_site: SameSite::Lax,
        }
    }
}

/// Parse a `SameSite` policy name, case-insensitively.
pub fn parse_same_site(value: &str) -> Result<SameSite, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "strict" => Ok(SameSite::Strict),
        "lax" => Ok(SameSite::Lax),
        "none" => Ok(SameSite::None),
        _ => Err(ConfigError::SameSite(value.to_string())),
    }
}

fn build(name: &'static str, value: String, max_age: Duration, settings: &CookieSettings) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(settings.secure)
        .same_site(settings.same_site)
        .path("/")
        .max_age(max_age)
        .build()
}

/// Add both auth cookies for a freshly issued pair.
pub fn with_session(jar: CookieJar, pair: &TokenPair, settings: &CookieSettings) -> CookieJar {
    jar.add(build(
        ACCESS_COOKIE,
        pair.access_token.clone(),
        Duration::seconds(pair.access_expires_in),
        settings,
    ))
    .add(build(
        REFRESH_COOKIE,
        pair.refresh_token.clone(),
        Duration::seconds(pair.refresh_expires_in),
        settings,
    ))
}

/// Overwrite both auth cookies with expired, empty ones.
pub fn cleared(jar: CookieJar, settings: &CookieSettings) -> CookieJar {
    jar.add(build(ACCESS_COOKIE, String::new(), Duration::ZERO, settings))
        .add(build(REFRESH_COOKIE, String::new(), Duration::ZERO, settings))
}

/// Read a cookie value, ignoring empty ones.
pub fn read(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}
