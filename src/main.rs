use calenfit::domain::auth::RefreshTokenRepository;
use calenfit::infrastructure;
use calenfit::infrastructure::auth::JwtTokenIssuer;
use calenfit::infrastructure::repositories::refresh_tokens::PostgresRefreshTokenRepository;
use calenfit::infrastructure::state::AppState;
use calenfit::presentation;

use anyhow::Context;
use dotenvy::dotenv;
use std::env;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run_with_signal().await
}

async fn run_with_signal() -> anyhow::Result<()> {
    run(async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run<F>(shutdown_signal: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    dotenv().ok();

    // Initialize tracing only if it hasn't been initialized yet; the error
    // is ignored because tests may call this multiple times.
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "calenfit=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);

    let (listener, app) = bootstrap(&database_url, port).await?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    Ok(())
}

async fn bootstrap(
    database_url: &str,
    port: u16,
) -> anyhow::Result<(tokio::net::TcpListener, axum::Router)> {
    let pool = infrastructure::db::create_pool(database_url).await?;

    sqlx::migrate!().run(&pool).await?;

    let access_secret = env::var("JWT_ACCESS_SECRET").context("JWT_ACCESS_SECRET must be set")?;
    let refresh_secret =
        env::var("JWT_REFRESH_SECRET").context("JWT_REFRESH_SECRET must be set")?;
    let access_token_expiry = env::var("JWT_ACCESS_TOKEN_EXPIRY")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(900);
    let refresh_token_expiry = env::var("JWT_REFRESH_TOKEN_EXPIRY")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(604800);

    let token_issuer = Arc::new(JwtTokenIssuer::new(
        &access_secret,
        &refresh_secret,
        access_token_expiry,
        refresh_token_expiry,
    ));

    // Drop rows left behind by sessions that expired without a refresh or
    // an explicit logout.
    let removed = PostgresRefreshTokenRepository::new(pool.clone())
        .delete_expired()
        .await?;
    if removed > 0 {
        tracing::info!(removed, "Removed expired refresh tokens");
    }

    let state = AppState::new(pool, token_issuer);
    let cors = presentation::middleware::cors::cors_layer()?;
    let app = presentation::router::app(state, cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    Ok((listener, app))
}
