//! # Galerie RS
//!
//! Storefront backend for a single-artist gallery.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export SANITY_PROJECT_ID=abc123
//! export SANITY_DATASET=production
//! export SANITY_API_TOKEN=sk...
//! export STRIPE_SECRET_KEY=sk_test_...
//! export STRIPE_WEBHOOK_SECRET=whsec_...
//! export RESEND_API_KEY=re_...
//! export ARTIST_EMAIL=artiste@example.com
//!
//! # Run the server
//! galerie
//! ```

use galerie_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Initialize application state
    let state = AppState::from_env()?;

    let addr = state.config.socket_addr();
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Payment gateway: {}", state.gateway.provider_name());
    info!(
        "Email notifications: {}",
        if state.mailer.is_configured() {
            "enabled"
        } else {
            "disabled"
        }
    );

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("🎨 Galerie starting on http://{}", addr);

    if !is_prod {
        info!("📝 Health: http://{}/health", addr);
        info!("🖼️  Gallery: GET http://{}/api/v1/artworks", addr);
        info!("💳 Checkout: POST http://{}/api/v1/checkout", addr);
        info!("🔔 Webhook: POST http://{}/webhook/stripe", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
