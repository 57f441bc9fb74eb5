//! # galerie-core
//!
//! Core types and traits for the galerie-rs storefront.
//!
//! This crate provides:
//! - `ArtworkStore` trait for the external content store
//! - `PaymentGateway` trait for the hosted payment processor
//! - `Mailer` trait for transactional email
//! - `Artwork`, `CheckoutSession`, and `WebhookEvent` domain types
//! - `GalleryError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use galerie_core::{ArtworkStore, CheckoutUrls, PaymentGateway};
//!
//! // Look the artwork up; the store is the price authority
//! let artwork = store.fetch_by_id("artwork-123").await?
//!     .ok_or(GalleryError::ArtworkNotFound { artwork_id: "artwork-123".into() })?;
//!
//! // Create a hosted checkout session
//! let urls = CheckoutUrls::new("https://atelier-mngh.fr");
//! let session = gateway.create_checkout(&artwork, &urls).await?;
//!
//! // Redirect the customer to session.checkout_url
//! ```

pub mod artwork;
pub mod error;
pub mod gateway;
pub mod mailer;
pub mod session;
pub mod store;

// Re-exports for convenience
pub use artwork::{Artwork, Currency, Dimensions, Price, SiteSettings};
pub use error::{GalleryError, GalleryResult};
pub use gateway::{CheckoutUrls, PaymentGateway, SharedGateway};
pub use mailer::{
    ArtistNotification, ContactMessage, CustomerConfirmation, DisabledMailer, EmailOutcome,
    Mailer, SharedMailer,
};
pub use session::{
    CheckoutSession, CustomerDetails, SessionSnapshot, ShippingAddress, WebhookEvent,
    WebhookEventType,
};
pub use store::{ArtworkStore, MarkSoldOutcome, SharedStore};
