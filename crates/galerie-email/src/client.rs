//! # Resend Mailer
//!
//! Implements the `Mailer` trait over the Resend send API. Every method
//! folds transport and provider failures into an `EmailOutcome` — callers
//! log the outcome, they never have to handle an error.

use crate::config::EmailConfig;
use crate::templates::{self, EmailKind};
use async_trait::async_trait;
use galerie_core::{
    ArtistNotification, ContactMessage, CustomerConfirmation, EmailOutcome, Mailer,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

/// Resend transactional mailer
pub struct ResendMailer {
    config: EmailConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SendErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

impl ResendMailer {
    /// Create a new mailer. Always succeeds; a missing API key just means
    /// every send reports a disabled outcome.
    pub fn new(config: EmailConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self { config, client }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::new(EmailConfig::from_env())
    }

    /// Issue one send request and fold any failure into the outcome
    async fn dispatch(
        &self,
        to: &str,
        subject: &str,
        html: &str,
        reply_to: Option<&str>,
    ) -> EmailOutcome {
        let Some(api_key) = &self.config.api_key else {
            warn!("Email not configured (RESEND_API_KEY missing), skipping send");
            return EmailOutcome::disabled("email service not configured");
        };

        let request = SendRequest {
            from: &self.config.from,
            to: vec![to],
            subject,
            html,
            reply_to,
        };

        let response = self
            .client
            .post(format!("{}/emails", self.config.api_base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                error!("Email send failed (network): {}", e);
                return EmailOutcome::failed(format!("network error: {}", e));
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            let message = serde_json::from_str::<SendErrorResponse>(&body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| format!("HTTP {}", status));
            error!("Email send failed: {}", message);
            return EmailOutcome::failed(message);
        }

        match serde_json::from_str::<SendResponse>(&body) {
            Ok(sent) => {
                info!("Email sent to {} (id: {})", to, sent.id);
                EmailOutcome::sent(sent.id)
            }
            Err(e) => {
                // The provider accepted the message; only the response
                // envelope was unexpected.
                warn!("Email accepted but response unparseable: {}", e);
                EmailOutcome {
                    sent: true,
                    email_id: None,
                    error: None,
                }
            }
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    #[instrument(skip(self, data), fields(session_id = %data.session_id))]
    async fn send_customer_confirmation(&self, data: &CustomerConfirmation) -> EmailOutcome {
        let subject = templates::subject(EmailKind::CustomerConfirmation, &data.artwork_title);
        let html = templates::customer_confirmation_html(data);
        self.dispatch(&data.customer_email, &subject, &html, None)
            .await
    }

    #[instrument(skip(self, data), fields(session_id = %data.session_id))]
    async fn send_artist_notification(&self, data: &ArtistNotification) -> EmailOutcome {
        let Some(artist_email) = &self.config.artist_email else {
            warn!("ARTIST_EMAIL not configured, skipping artist notification");
            return EmailOutcome::disabled("artist email not configured");
        };

        let subject = templates::subject(EmailKind::ArtistNotification, &data.artwork_title);
        let html = templates::artist_notification_html(data);
        // Reply-to the buyer so the artist can answer directly
        self.dispatch(artist_email, &subject, &html, Some(&data.customer_email))
            .await
    }

    #[instrument(skip(self, data))]
    async fn send_contact_message(&self, data: &ContactMessage) -> EmailOutcome {
        let Some(artist_email) = &self.config.artist_email else {
            warn!("ARTIST_EMAIL not configured, skipping contact relay");
            return EmailOutcome::disabled("artist email not configured");
        };

        let subject = templates::subject(EmailKind::ContactForm, &data.subject);
        let html = templates::contact_form_html(data);
        self.dispatch(artist_email, &subject, &html, Some(&data.email))
            .await
    }

    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }
}
