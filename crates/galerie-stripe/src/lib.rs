//! # galerie-stripe
//!
//! Stripe Checkout gateway for galerie-rs.
//!
//! This crate implements the `PaymentGateway` trait over Stripe's hosted
//! Checkout Sessions API:
//!
//! - **Session creation** — single line item, price read from the content
//!   store, artwork id/slug round-tripped through session metadata.
//! - **Webhook verification** — `Stripe-Signature` parsing, timestamp
//!   tolerance, HMAC-SHA256 constant-time compare, event parsing into the
//!   domain `WebhookEvent`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use galerie_stripe::StripeGateway;
//! use galerie_core::{CheckoutUrls, PaymentGateway};
//!
//! let gateway = StripeGateway::from_env()?;
//! let urls = CheckoutUrls::new("https://atelier-mngh.fr");
//! let session = gateway.create_checkout(&artwork, &urls).await?;
//! // Redirect the customer to session.checkout_url
//! ```

pub mod checkout;
pub mod config;
pub mod webhook;

// Re-exports
pub use checkout::{StripeGateway, ALLOWED_SHIPPING_COUNTRIES};
pub use config::StripeConfig;
pub use webhook::{parse_event, verify_signature, SIGNATURE_TOLERANCE_SECS};
