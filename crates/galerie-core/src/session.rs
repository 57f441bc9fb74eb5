//! # Checkout Session & Webhook Event Types
//!
//! The checkout session is owned by the payment processor; we only keep its
//! identifier, the redirect URL, and the artwork metadata round-tripped
//! through it. Webhook events are processed and discarded, never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A checkout session created by the payment processor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's session ID
    pub session_id: String,

    /// URL to redirect the customer to for payment
    pub checkout_url: String,

    /// Artwork this session is selling (round-tripped via metadata)
    pub artwork_id: String,

    /// Artwork slug (for the cancel redirect and later correlation)
    pub artwork_slug: String,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

/// Webhook event types we care about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEventType {
    /// Checkout session completed (the one relevant type)
    CheckoutCompleted,
    /// Checkout session expired without payment
    CheckoutExpired,
    /// Any other event (passthrough, acknowledged without action)
    Unknown(String),
}

impl WebhookEventType {
    /// Parse a provider event type string
    pub fn from_provider(event_type: &str) -> Self {
        match event_type {
            "checkout.session.completed" => WebhookEventType::CheckoutCompleted,
            "checkout.session.expired" => WebhookEventType::CheckoutExpired,
            other => WebhookEventType::Unknown(other.to_string()),
        }
    }
}

/// Customer contact details captured by the hosted checkout page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerDetails {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Shipping address captured by the hosted checkout page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShippingAddress {
    #[serde(default)]
    pub line1: Option<String>,
    #[serde(default)]
    pub line2: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl ShippingAddress {
    /// Single-line rendering for email templates; None when empty
    pub fn display(&self) -> Option<String> {
        let mut parts: Vec<String> = Vec::new();
        if let Some(l) = &self.line1 {
            parts.push(l.clone());
        }
        if let Some(l) = &self.line2 {
            parts.push(l.clone());
        }
        match (&self.postal_code, &self.city) {
            (Some(cp), Some(city)) => parts.push(format!("{} {}", cp, city)),
            (Some(cp), None) => parts.push(cp.clone()),
            (None, Some(city)) => parts.push(city.clone()),
            (None, None) => {}
        }
        if let Some(s) = &self.state {
            parts.push(s.clone());
        }
        if let Some(c) = &self.country {
            parts.push(c.clone());
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// Snapshot of the checkout session carried inside a webhook event
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    /// Provider session ID
    pub id: String,

    /// Payment status reported by the provider ("paid", "unpaid", ...)
    pub payment_status: String,

    /// Customer contact details, if collected
    pub customer: CustomerDetails,

    /// Shipping name, if collected
    pub shipping_name: Option<String>,

    /// Shipping address, if collected
    pub shipping_address: Option<ShippingAddress>,

    /// Metadata set at session creation (artwork_id, artwork_slug)
    pub metadata: HashMap<String, String>,
}

impl SessionSnapshot {
    /// True when the provider reports the payment as settled
    pub fn is_paid(&self) -> bool {
        self.payment_status == "paid"
    }

    /// The artwork ID round-tripped through session metadata
    pub fn artwork_id(&self) -> Option<&str> {
        self.metadata.get("artwork_id").map(|s| s.as_str())
    }

    /// The artwork slug round-tripped through session metadata
    pub fn artwork_slug(&self) -> Option<&str> {
        self.metadata.get("artwork_slug").map(|s| s.as_str())
    }
}

/// A verified, parsed webhook event
#[derive(Debug, Clone)]
pub struct WebhookEvent {
    /// Event ID from the provider
    pub event_id: String,

    /// Event type
    pub event_type: WebhookEventType,

    /// Session snapshot carried by the event
    pub session: SessionSnapshot,

    /// Event timestamp
    pub timestamp: DateTime<Utc>,
}
