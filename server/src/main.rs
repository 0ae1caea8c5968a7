//! freightexpo-server — membership and events backend for the freight industry
//!
//! Long-running service that:
//! - Manages company accounts, memberships, and the event catalog
//! - Sells event inventory (booths, tickets, sponsorships, hotel rooms)
//!   through a transactional checkout and admin-driven order finalization
//! - Issues invoices and sends transactional email
//! - Relays realtime chat between companies over WebSocket

mod api;
mod auth;
mod chat;
mod checkout;
mod config;
mod db;
mod email;
mod error;
mod state;
mod util;

use config::Config;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "freightexpo_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting freightexpo-server (env: {})", config.environment);

    // Initialize application state (pool, migrations, AWS clients)
    let state = AppState::new(&config).await?;

    let app = api::create_router(state.clone());

    // Periodic rate limiter cleanup (every 5 minutes)
    let rate_limiter = state.rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            rate_limiter.cleanup().await;
        }
    });

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("freightexpo-server listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}
