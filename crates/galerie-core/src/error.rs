//! # Storefront Error Types
//!
//! Typed error handling for the galerie-rs storefront.
//! All store, gateway and handler operations return `Result<T, GalleryError>`.

use thiserror::Error;

/// Core error type for all storefront operations
#[derive(Debug, Error)]
pub enum GalleryError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Artwork not found in the content store
    #[error("Artwork not found: {artwork_id}")]
    ArtworkNotFound { artwork_id: String },

    /// Artwork exists but is no longer for sale
    #[error("Artwork no longer available: {artwork_id}")]
    ArtworkUnavailable { artwork_id: String },

    /// Vendor API error (Sanity, Stripe, Resend)
    #[error("Provider error [{provider}]: {message}")]
    ProviderError { provider: String, message: String },

    /// Network/HTTP error communicating with a vendor
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Webhook signature verification failed
    #[error("Webhook verification failed: {0}")]
    WebhookVerificationFailed(String),

    /// Webhook payload parsing error
    #[error("Webhook parse error: {0}")]
    WebhookParseError(String),

    /// Checkout session metadata is missing a required key
    #[error("Missing metadata: {0}")]
    MissingMetadata(String),

    /// Content store read or write failed
    #[error("Store error: {0}")]
    StoreError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GalleryError {
    /// Returns true if this error represents a transient condition
    /// that the caller (or Stripe's webhook retry) may retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GalleryError::NetworkError(_)
                | GalleryError::ProviderError { .. }
                | GalleryError::StoreError(_)
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            GalleryError::Configuration(_) => 500,
            GalleryError::InvalidRequest(_) => 400,
            GalleryError::ArtworkNotFound { .. } => 404,
            GalleryError::ArtworkUnavailable { .. } => 410,
            GalleryError::ProviderError { .. } => 502,
            GalleryError::NetworkError(_) => 503,
            GalleryError::WebhookVerificationFailed(_) => 400,
            GalleryError::WebhookParseError(_) => 400,
            GalleryError::MissingMetadata(_) => 400,
            GalleryError::StoreError(_) => 500,
            GalleryError::Serialization(_) => 500,
            GalleryError::Internal(_) => 500,
        }
    }
}

/// Result type alias for storefront operations
pub type GalleryResult<T> = Result<T, GalleryError>;
