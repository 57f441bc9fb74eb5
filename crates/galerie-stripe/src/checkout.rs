//! # Stripe Checkout Sessions
//!
//! Creates hosted Checkout Sessions for single-artwork purchases. The
//! session price comes from the artwork record in the content store, never
//! from the client, and the artwork identifier/slug are round-tripped
//! through session metadata for webhook correlation.

use crate::config::StripeConfig;
use crate::webhook;
use async_trait::async_trait;
use chrono::Utc;
use galerie_core::{
    Artwork, CheckoutSession, CheckoutUrls, GalleryError, GalleryResult, PaymentGateway,
    WebhookEvent,
};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// Countries the hosted checkout page may ship to
pub const ALLOWED_SHIPPING_COUNTRIES: &[&str] = &[
    "FR", "BE", "CH", "LU", "MC", "DE", "ES", "IT", "GB", "NL", "PT",
];

/// Stripe Checkout gateway
///
/// Uses Stripe's hosted checkout page for secure payments.
/// This is the recommended approach for PCI compliance.
pub struct StripeGateway {
    config: StripeConfig,
    client: Client,
}

impl StripeGateway {
    /// Create a new Stripe gateway
    pub fn new(config: StripeConfig) -> GalleryResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| GalleryError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> GalleryResult<Self> {
        let config = StripeConfig::from_env()?;
        Self::new(config)
    }

    /// Build the form body for a single-artwork session
    fn build_form_params(artwork: &Artwork, urls: &CheckoutUrls) -> Vec<(String, String)> {
        let price = artwork.price_as_money();

        let mut form_params: Vec<(String, String)> = vec![
            ("mode".to_string(), "payment".to_string()),
            (
                "payment_method_types[0]".to_string(),
                "card".to_string(),
            ),
            ("success_url".to_string(), urls.success_url()),
            ("cancel_url".to_string(), urls.cancel_url(&artwork.slug)),
            (
                "line_items[0][price_data][currency]".to_string(),
                price.currency.as_str().to_string(),
            ),
            (
                "line_items[0][price_data][unit_amount]".to_string(),
                price.amount.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]".to_string(),
                artwork.title.clone(),
            ),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
            (
                "phone_number_collection[enabled]".to_string(),
                "true".to_string(),
            ),
            ("metadata[artwork_id]".to_string(), artwork.id.clone()),
            (
                "metadata[artwork_slug]".to_string(),
                artwork.slug.clone(),
            ),
        ];

        if let Some(image_url) = &artwork.image_url {
            form_params.push((
                "line_items[0][price_data][product_data][images][0]".to_string(),
                image_url.clone(),
            ));
        }

        for (i, country) in ALLOWED_SHIPPING_COUNTRIES.iter().enumerate() {
            form_params.push((
                format!("shipping_address_collection[allowed_countries][{}]", i),
                country.to_string(),
            ));
        }

        form_params
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    #[instrument(skip(self, artwork, urls), fields(artwork_id = %artwork.id))]
    async fn create_checkout(
        &self,
        artwork: &Artwork,
        urls: &CheckoutUrls,
    ) -> GalleryResult<CheckoutSession> {
        let form_params = Self::build_form_params(artwork, urls);
        let idempotency_key = Uuid::new_v4().to_string();

        debug!(
            "Creating Stripe checkout session for artwork {} at {}",
            artwork.id,
            artwork.price_as_money().display()
        );

        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .header("Idempotency-Key", &idempotency_key)
            .form(&form_params)
            .send()
            .await
            .map_err(|e| GalleryError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GalleryError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(GalleryError::ProviderError {
                    provider: "stripe".to_string(),
                    message: error_response.error.message,
                });
            }

            return Err(GalleryError::ProviderError {
                provider: "stripe".to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let session_response: StripeCheckoutSessionResponse = serde_json::from_str(&body)
            .map_err(|e| {
                GalleryError::Serialization(format!("Failed to parse Stripe response: {}", e))
            })?;

        info!(
            "Created Stripe checkout session: id={}, artwork={}",
            session_response.id, artwork.id
        );

        Ok(CheckoutSession {
            session_id: session_response.id,
            checkout_url: session_response.url,
            artwork_id: artwork.id.clone(),
            artwork_slug: artwork.slug.clone(),
            created_at: Utc::now(),
        })
    }

    #[instrument(skip(self, payload, signature))]
    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> GalleryResult<WebhookEvent> {
        webhook::verify_signature(payload, signature, &self.config.webhook_secret, Utc::now())?;

        let event = webhook::parse_event(payload)?;
        debug!("Verified Stripe webhook: id={}", event.event_id);

        Ok(event)
    }

    fn provider_name(&self) -> &'static str {
        "stripe"
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}
