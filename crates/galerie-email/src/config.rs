//! # Email Configuration
//!
//! Unlike the Stripe configuration, nothing here is critical: a missing API
//! key or recipient address disables the corresponding sends and the rest
//! of the storefront keeps working.

use std::env;

/// Resend API configuration
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Resend API key; None disables all sending
    pub api_key: Option<String>,

    /// Sender address
    pub from: String,

    /// The artist's address, recipient of sale alerts and contact relays
    pub artist_email: Option<String>,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,
}

/// Fallback sender until a domain is verified with the provider
const DEFAULT_FROM: &str = "onboarding@resend.dev";

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// All optional:
    /// - `RESEND_API_KEY` — absent means email is disabled
    /// - `EMAIL_FROM` — defaults to the provider's onboarding sender
    /// - `ARTIST_EMAIL` — absent disables artist alerts and contact relay
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self {
            api_key: env::var("RESEND_API_KEY").ok(),
            from: env::var("EMAIL_FROM").unwrap_or_else(|_| DEFAULT_FROM.to_string()),
            artist_email: env::var("ARTIST_EMAIL").ok(),
            api_base_url: "https://api.resend.com".to_string(),
        }
    }

    /// Create config with explicit values (for testing)
    pub fn new(api_key: Option<String>, from: impl Into<String>, artist_email: Option<String>) -> Self {
        Self {
            api_key,
            from: from.into(),
            artist_email,
            api_base_url: "https://api.resend.com".to_string(),
        }
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Whether the send API is usable at all
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
