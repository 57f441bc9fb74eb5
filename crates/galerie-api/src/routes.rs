//! # Routes
//!
//! Axum router configuration for the storefront API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Gallery:
///   - GET  /api/v1/artworks - List artworks (filters: available, technique,
///     min_price/max_price)
///   - GET  /api/v1/artworks/featured - Featured artworks
///   - GET  /api/v1/artworks/counts - Total / available counts
///   - GET  /api/v1/artworks/{slug} - Artwork detail with prev/next
///   - GET  /api/v1/settings - Site settings
///
/// - Checkout:
///   - POST /api/v1/checkout - Create a checkout session
///   - GET  /checkout/success - Post-payment page
///   - GET  /checkout/cancel - Cancellation page
///
/// - Contact:
///   - POST /api/v1/contact - Relay a message to the artist
///
/// - Webhooks:
///   - POST /webhook/stripe - Stripe webhook handler
pub fn create_router(state: AppState) -> Router {
    // The storefront is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let checkout_pages = Router::new()
        .route("/success", get(handlers::checkout_success))
        .route("/cancel", get(handlers::checkout_cancel));

    let api_routes = Router::new()
        .route("/artworks", get(handlers::list_artworks))
        .route("/artworks/featured", get(handlers::featured_artworks))
        .route("/artworks/counts", get(handlers::artwork_counts))
        .route("/artworks/{slug}", get(handlers::get_artwork))
        .route("/settings", get(handlers::site_settings))
        .route("/checkout", post(handlers::create_checkout))
        .route("/contact", post(handlers::contact));

    // Webhook routes stay outside CORS and read the raw body
    let webhook_routes = Router::new().route("/stripe", post(handlers::stripe_webhook));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .nest("/checkout", checkout_pages)
        .nest("/api/v1", api_routes)
        .nest("/webhook", webhook_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
