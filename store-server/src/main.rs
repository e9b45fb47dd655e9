//! store-server — storefront backend
//!
//! Long-running HTTP service:
//! - product catalog, cart, checkout, orders
//! - Razorpay webhook (payment confirmation)
//! - COD verification code flow
//! - delivery-partner integration
//! - content settings + staff/admin surface

use store_server::api;
use store_server::config::Config;
use store_server::state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "store_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting store-server (env: {})", config.environment);

    if config.razorpay_webhook_secret.is_none() {
        tracing::warn!(
            "RAZORPAY_WEBHOOK_SECRET is not set; payment webhooks will be rejected with 500"
        );
    }

    let state = AppState::new(&config).await?;
    let app = api::create_router(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("store-server listening on {addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
