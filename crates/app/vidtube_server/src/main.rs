//! vidtube API server binary.

use std::sync::Arc;

use chrono::Duration;
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use vidtube_api::config::ApiConfig;
use vidtube_api::services::cookies::{CookieSettings, parse_same_site};
use vidtube_core::auth::AuthConfig;
use vidtube_core::auth::jwt::{TokenKind, TokenProfile};
use vidtube_core::store::postgres::PgStore;

/// CLI arguments; every option can also come from the environment or `.env`.
#[derive(Parser, Debug)]
#[command(name = "vidtube_server", about = "vidtube API server")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:8000")]
    bind_addr: String,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/vidtube"
    )]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 5)]
    max_connections: u32,

    /// HS256 secret for access tokens.
    #[arg(long, env = "ACCESS_TOKEN_SECRET", hide_env_values = true)]
    access_token_secret: String,

    /// Access token lifetime in seconds.
    #[arg(long, env = "ACCESS_TOKEN_EXPIRY_SECS", default_value_t = 15 * 60)]
    access_token_expiry_secs: u32,

    /// HS256 secret for refresh tokens. Must differ from the access secret.
    #[arg(long, env = "REFRESH_TOKEN_SECRET", hide_env_values = true)]
    refresh_token_secret: String,

    /// Refresh token lifetime in seconds.
    #[arg(long, env = "REFRESH_TOKEN_EXPIRY_SECS", default_value_t = 10 * 24 * 60 * 60)]
    refresh_token_expiry_secs: u32,

    /// Mark auth cookies `Secure`.
    #[arg(long, env = "COOKIE_SECURE", default_value_t = true, action = clap::ArgAction::Set)]
    cookie_secure: bool,

    /// `SameSite` policy for auth cookies: strict, lax or none.
    #[arg(long, env = "COOKIE_SAME_SITE", default_value = "lax")]
    cookie_same_site: String,

    /// Allowed browser origin for credentialed CORS.
    #[arg(long, env = "CORS_ORIGIN")]
    cors_origin: Option<String>,
}

impl Args {
    fn api_config(&self) -> Result<ApiConfig, Box<dyn std::error::Error>> {
        let auth = AuthConfig::new(
            TokenProfile::new(
                TokenKind::Access,
                self.access_token_secret.clone(),
                Duration::seconds(i64::from(self.access_token_expiry_secs)),
            ),
            TokenProfile::new(
                TokenKind::Refresh,
                self.refresh_token_secret.clone(),
                Duration::seconds(i64::from(self.refresh_token_expiry_secs)),
            ),
        );
        let config = ApiConfig {
            bind_addr: self.bind_addr.clone(),
            database_url: self.database_url.clone(),
            auth,
            cookies: CookieSettings {
                secure: self.cookie_secure,
                same_site: parse_same_site(&self.cookie_same_site)?,
            },
            cors_origin: self.cors_origin.clone(),
        };
        config.validate()?;
        Ok(config)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().or_else(|_| {
                tracing_subscriber::EnvFilter::try_new("info,vidtube_api=debug,vidtube_core=debug")
            })?,
        )
        .init();

    let args = Args::parse();
    let config = args.api_config()?;

    info!(bind_addr = %config.bind_addr, "starting vidtube_server");
    info!(max_connections = args.max_connections, "configuring connection pool");

    let pool = PgPoolOptions::new()
        .max_connections(args.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&config.database_url)
        .await?;

    info!("running database migrations");
    vidtube_core::migrate::migrate(&pool).await?;

    let store = Arc::new(PgStore::new(pool));
    let state = vidtube_api::AppState::new(store.clone(), store, config.clone());
    let app = vidtube_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
