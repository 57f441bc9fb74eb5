//! # Mailer Trait
//!
//! Seam to the transactional email provider. Sends are best-effort: every
//! method returns an `EmailOutcome` rather than an error, so callers can
//! log a failure without letting it affect the primary operation.

use crate::artwork::Price;
use crate::session::ShippingAddress;
use async_trait::async_trait;
use std::sync::Arc;

/// Result of a single send attempt. Observed synchronously, only logged.
#[derive(Debug, Clone, Default)]
pub struct EmailOutcome {
    /// Whether the provider accepted the message
    pub sent: bool,
    /// Provider-assigned message ID, when accepted
    pub email_id: Option<String>,
    /// Failure description, when not sent
    pub error: Option<String>,
}

impl EmailOutcome {
    pub fn sent(email_id: impl Into<String>) -> Self {
        Self {
            sent: true,
            email_id: Some(email_id.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            sent: false,
            email_id: None,
            error: Some(error.into()),
        }
    }

    /// A send skipped because the feature is disabled (missing config)
    pub fn disabled(reason: impl Into<String>) -> Self {
        Self::failed(reason)
    }
}

/// Purchase recap sent to the buyer after a confirmed payment
#[derive(Debug, Clone)]
pub struct CustomerConfirmation {
    pub customer_email: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub shipping_name: Option<String>,
    pub shipping_address: Option<ShippingAddress>,
    pub artwork_title: String,
    pub artwork_price: Price,
    pub artwork_image_url: Option<String>,
    pub artwork_dimensions: Option<String>,
    pub artwork_technique: Option<String>,
    pub session_id: String,
}

/// Sale alert sent to the artist after a confirmed payment
#[derive(Debug, Clone)]
pub struct ArtistNotification {
    pub artwork_title: String,
    pub artwork_slug: String,
    pub artwork_price: Price,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub shipping_name: Option<String>,
    pub shipping_address: Option<ShippingAddress>,
    pub session_id: String,
}

/// A contact-form submission relayed to the artist
#[derive(Debug, Clone)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Transactional email seam.
///
/// Configuration absence (missing API key or recipient) makes the mailer a
/// no-op that reports `EmailOutcome::disabled`, not a startup error.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send the purchase confirmation to the buyer
    async fn send_customer_confirmation(&self, data: &CustomerConfirmation) -> EmailOutcome;

    /// Send the sale alert to the artist
    async fn send_artist_notification(&self, data: &ArtistNotification) -> EmailOutcome;

    /// Relay a contact-form message to the artist
    async fn send_contact_message(&self, data: &ContactMessage) -> EmailOutcome;

    /// Whether sending is configured at all
    fn is_configured(&self) -> bool;
}

/// Type alias for a shared mailer handle (dynamic dispatch)
pub type SharedMailer = Arc<dyn Mailer>;

/// Mailer used when email is not configured: skips every send.
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send_customer_confirmation(&self, _data: &CustomerConfirmation) -> EmailOutcome {
        EmailOutcome::disabled("email service not configured")
    }

    async fn send_artist_notification(&self, _data: &ArtistNotification) -> EmailOutcome {
        EmailOutcome::disabled("email service not configured")
    }

    async fn send_contact_message(&self, _data: &ContactMessage) -> EmailOutcome {
        EmailOutcome::disabled("email service not configured")
    }

    fn is_configured(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_mailer_never_sends() {
        let mailer = DisabledMailer;
        assert!(!mailer.is_configured());

        let outcome = mailer
            .send_contact_message(&ContactMessage {
                name: "Jean".into(),
                email: "jean@example.com".into(),
                subject: "Question".into(),
                message: "Bonjour, votre toile est-elle encadrée ?".into(),
            })
            .await;

        assert!(!outcome.sent);
        assert!(outcome.error.is_some());
    }

    #[test]
    fn test_outcome_constructors() {
        let ok = EmailOutcome::sent("email-123");
        assert!(ok.sent);
        assert_eq!(ok.email_id.as_deref(), Some("email-123"));

        let failed = EmailOutcome::failed("provider 500");
        assert!(!failed.sent);
        assert_eq!(failed.error.as_deref(), Some("provider 500"));
    }
}
