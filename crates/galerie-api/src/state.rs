//! # Application State
//!
//! Shared state for the Axum application: the content store, the payment
//! gateway, the mailer, and the server configuration. Everything behind a
//! trait handle so tests can inject fakes.

use galerie_core::{
    CheckoutUrls, DisabledMailer, Mailer, SharedGateway, SharedMailer, SharedStore,
};
use galerie_email::ResendMailer;
use galerie_sanity::{SanityClient, SanityConfig};
use galerie_stripe::{StripeConfig, StripeGateway};
use std::sync::Arc;
use tracing::warn;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for checkout redirects
    pub base_url: String,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            base_url: std::env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address")
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Artwork content store (Sanity)
    pub store: SharedStore,
    /// Payment gateway (Stripe)
    pub gateway: SharedGateway,
    /// Transactional mailer (Resend)
    pub mailer: SharedMailer,
    /// Checkout redirect URLs
    pub urls: CheckoutUrls,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create the production state from environment variables.
    ///
    /// Sanity and Stripe configuration is mandatory and fails startup.
    /// Email is optional: a missing Resend key just disables the
    /// notification sends.
    pub fn from_env() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let urls = CheckoutUrls::new(&config.base_url);

        let sanity_config = SanityConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to configure Sanity: {}", e))?;
        let store = SanityClient::new(sanity_config)
            .map_err(|e| anyhow::anyhow!("Failed to initialize Sanity client: {}", e))?;

        let stripe_config = StripeConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to configure Stripe: {}", e))?;
        let gateway = StripeGateway::new(stripe_config)
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe gateway: {}", e))?;

        let resend = ResendMailer::from_env();
        let mailer: SharedMailer = if resend.is_configured() {
            Arc::new(resend)
        } else {
            warn!("Email not configured, notifications and contact relay are disabled");
            Arc::new(DisabledMailer)
        };

        Ok(Self {
            store: Arc::new(store),
            gateway: Arc::new(gateway),
            mailer,
            urls,
            config,
        })
    }

    /// Assemble a state from explicit service handles (used by tests)
    pub fn with_services(
        store: SharedStore,
        gateway: SharedGateway,
        mailer: SharedMailer,
        base_url: &str,
    ) -> Self {
        Self {
            store,
            gateway,
            mailer,
            urls: CheckoutUrls::new(base_url),
            config: AppConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                base_url: base_url.to_string(),
                environment: "test".to_string(),
            },
        }
    }
}
