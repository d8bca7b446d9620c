//! # vidtube_api
//!
//! HTTP API library for vidtube.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, patch, post, put};
use tower_http::cors::{Any, CorsLayer};
use vidtube_core::auth::authenticator::RequestAuthenticator;
use vidtube_core::auth::session::{SessionIssuer, SessionRefresher};
use vidtube_core::store::{AccountStore, VideoStore};

use crate::config::ApiConfig;
use crate::handlers::{auth, channels, users, videos};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Credential store.
    pub accounts: Arc<dyn AccountStore>,
    /// Owned-resource store.
    pub videos: Arc<dyn VideoStore>,
    /// Mints and persists token pairs.
    pub issuer: SessionIssuer,
    /// Validates and rotates refresh tokens.
    pub refresher: SessionRefresher,
    /// Resolves access tokens on protected routes.
    pub authenticator: RequestAuthenticator,
    /// API configuration.
    pub config: ApiConfig,
}

impl AppState {
    /// Wire the auth services over the given stores.
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        videos: Arc<dyn VideoStore>,
        config: ApiConfig,
    ) -> Self {
        let issuer = SessionIssuer::new(accounts.clone(), config.auth.clone());
        let refresher = SessionRefresher::new(issuer.clone());
        let authenticator = RequestAuthenticator::new(accounts.clone(), config.auth.access.clone());
        Self {
            accounts,
            videos,
            issuer,
            refresher,
            authenticator,
            config,
        }
    }
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    match origin.and_then(|o| HeaderValue::from_str(o).ok()) {
        // Cookies need credentialed CORS, which rules out wildcards.
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(state.config.cors_origin.as_deref());

    // Public routes (no auth required)
    let public = Router::new()
        .route(routes::POST_USERS_REGISTER, post(auth::register_handler))
        .route(routes::POST_USERS_LOGIN, post(auth::login_handler))
        .route(routes::POST_USERS_REFRESH_TOKEN, post(auth::refresh_handler))
        .route(routes::VIDEOS_VIDEO_ID, get(videos::get_video_handler));

    // Protected routes (require auth)
    let protected = Router::new()
        .route(routes::POST_USERS_LOGOUT, post(auth::logout_handler))
        .route(routes::GET_USERS_DETAILS, get(users::current_user_handler))
        .route(
            routes::POST_USERS_UPDATE_PASSWORD,
            post(users::change_password_handler),
        )
        .route(
            routes::PATCH_USERS_UPDATE_DETAILS,
            patch(users::update_details_handler),
        )
        .route(
            routes::PATCH_USERS_UPDATE_AVATAR,
            patch(users::update_avatar_handler),
        )
        .route(
            routes::PATCH_USERS_UPDATE_COVER_IMAGE,
            patch(users::update_cover_image_handler),
        )
        .route(routes::GET_USERS_CHANNEL, get(channels::channel_profile_handler))
        .route(
            routes::POST_USERS_CHANNEL_SUBSCRIBE,
            post(channels::toggle_subscription_handler),
        )
        .route(
            routes::GET_USERS_WATCH_HISTORY,
            get(channels::watch_history_handler),
        )
        .route(routes::POST_VIDEOS_UPLOAD, post(videos::upload_handler))
        .route(routes::POST_VIDEOS_WATCH, post(videos::watch_video_handler))
        .route(
            routes::VIDEOS_VIDEO_ID,
            patch(videos::update_video_handler).delete(videos::delete_video_handler),
        )
        .route(
            routes::PUT_VIDEOS_TOGGLE_PUBLISH,
            put(videos::toggle_publish_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(cors)
        .with_state(state)
}
