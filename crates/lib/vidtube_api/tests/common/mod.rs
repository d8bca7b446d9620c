//! Shared helpers for the HTTP integration tests: an in-memory app and
//! small request/response utilities.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use chrono::Duration;
use serde_json::{Value, json};
use tower::ServiceExt;
use vidtube_api::config::ApiConfig;
use vidtube_api::services::cookies::CookieSettings;
use vidtube_api::{AppState, router};
use vidtube_core::auth::AuthConfig;
use vidtube_core::auth::jwt::{TokenKind, TokenProfile};
use vidtube_core::store::memory::MemoryStore;

pub fn test_config() -> ApiConfig {
    ApiConfig {
        bind_addr: "127.0.0.1:0".into(),
        database_url: "postgres://unused".into(),
        auth: AuthConfig {
            access: TokenProfile::new(TokenKind::Access, "test-access", Duration::minutes(15)),
            refresh: TokenProfile::new(TokenKind::Refresh, "test-refresh", Duration::days(10)),
            bcrypt_cost: 4,
        },
        cookies: CookieSettings::default(),
        cors_origin: None,
    }
}

/// Router over a fresh in-memory store.
pub fn app() -> Router {
    let store = Arc::new(MemoryStore::new());
    router(AppState::new(store.clone(), store, test_config()))
}

pub struct Reply {
    pub status: StatusCode,
    pub set_cookies: Vec<String>,
    pub json: Value,
}

impl Reply {
    /// Value of a `Set-Cookie` entry by cookie name.
    pub fn cookie(&self, name: &str) -> Option<String> {
        let prefix = format!("{name}=");
        self.set_cookies.iter().find_map(|c| {
            c.strip_prefix(&prefix)
                .map(|rest| rest.split(';').next().unwrap_or("").to_string())
        })
    }
}

async fn read(resp: Response<Body>) -> Reply {
    let status = resp.status();
    let set_cookies = resp
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("parse JSON")
    };
    Reply {
        status,
        set_cookies,
        json,
    }
}

/// Send a request. `auth` is either `Bearer <token>` or a raw `Cookie` header.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> Reply {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        req = if auth.starts_with("Bearer ") {
            req.header(header::AUTHORIZATION, auth)
        } else {
            req.header(header::COOKIE, auth)
        };
    }
    let req = match body {
        Some(body) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };
    read(app.clone().oneshot(req).await.expect("request")).await
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub async fn register(app: &Router, username: &str, password: &str) -> Reply {
    send(
        app,
        "POST",
        "/api/v1/users/register",
        None,
        Some(json!({
            "fullName": username.to_uppercase(),
            "email": format!("{username}@x.com"),
            "username": username,
            "password": password,
        })),
    )
    .await
}

pub async fn login(app: &Router, identifier: &str, password: &str) -> Reply {
    send(
        app,
        "POST",
        "/api/v1/users/login",
        None,
        Some(json!({ "usernameOrEmail": identifier, "password": password })),
    )
    .await
}

/// Register and log in; returns the login reply.
pub async fn signed_in(app: &Router, username: &str) -> Reply {
    let reg = register(app, username, "Pw1").await;
    assert_eq!(reg.status, StatusCode::CREATED, "register: {}", reg.json);
    let reply = login(app, username, "Pw1").await;
    assert_eq!(reply.status, StatusCode::OK, "login: {}", reply.json);
    reply
}

pub fn access_of(reply: &Reply) -> String {
    reply.json["accessToken"].as_str().unwrap().to_string()
}

pub fn refresh_of(reply: &Reply) -> String {
    reply.json["refreshToken"].as_str().unwrap().to_string()
}
