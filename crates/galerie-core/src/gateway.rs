//! # Payment Gateway Trait
//!
//! Seam between the storefront and the hosted payment processor.
//! The single implementation is Stripe; tests substitute a fake.

use crate::artwork::Artwork;
use crate::error::GalleryResult;
use crate::session::{CheckoutSession, WebhookEvent};
use async_trait::async_trait;
use std::sync::Arc;

/// Payment processor seam: session creation and webhook verification.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a hosted checkout session for a single artwork.
    ///
    /// The price is taken from the artwork record, never from the client,
    /// which prevents price tampering. Returns the session with its
    /// redirect URL.
    async fn create_checkout(
        &self,
        artwork: &Artwork,
        urls: &CheckoutUrls,
    ) -> GalleryResult<CheckoutSession>;

    /// Verify a webhook signature and parse the event.
    ///
    /// # Arguments
    /// * `payload` - Raw webhook body bytes
    /// * `signature` - Signature header from the request
    async fn verify_webhook(&self, payload: &[u8], signature: &str)
        -> GalleryResult<WebhookEvent>;

    /// Provider name (for logging)
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared gateway handle (dynamic dispatch)
pub type SharedGateway = Arc<dyn PaymentGateway>;

/// URLs the hosted checkout page redirects back to
#[derive(Debug, Clone)]
pub struct CheckoutUrls {
    /// Public base URL of the site (e.g., "https://atelier-mngh.fr")
    pub base_url: String,
}

impl CheckoutUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url: String = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Success URL with the provider's session-id placeholder
    pub fn success_url(&self) -> String {
        format!(
            "{}/checkout/success?session_id={{CHECKOUT_SESSION_ID}}",
            self.base_url
        )
    }

    /// Cancel URL: back to the artwork detail page
    pub fn cancel_url(&self, artwork_slug: &str) -> String {
        format!("{}/oeuvres/{}", self.base_url, artwork_slug)
    }
}

impl Default for CheckoutUrls {
    fn default() -> Self {
        Self::new("http://localhost:3000")
    }
}
