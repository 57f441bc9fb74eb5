//! # Request Handlers
//!
//! Axum request handlers for the storefront API: gallery reads, checkout
//! creation, the Stripe webhook, the contact relay, and the static
//! post-checkout pages.

use crate::contact::{self, ContactForm};
use crate::fulfillment::{self, FulfillmentOutcome};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use galerie_core::{Artwork, GalleryError};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create checkout request
#[derive(Debug, Deserialize)]
pub struct CreateCheckoutRequest {
    /// Slug of the artwork to purchase
    #[serde(default)]
    pub artwork_slug: Option<String>,
}

/// Create checkout response
#[derive(Debug, Serialize)]
pub struct CreateCheckoutResponse {
    /// Session ID
    pub session_id: String,
    /// Checkout URL (redirect the buyer here)
    pub url: String,
}

/// Gallery listing filters
#[derive(Debug, Default, Deserialize)]
pub struct ListArtworksQuery {
    /// Only return artworks still for sale
    #[serde(default)]
    pub available: bool,
    /// Filter by technique (exact match on the content-managed value)
    #[serde(default)]
    pub technique: Option<String>,
    /// Lower price bound in euros (available artworks only)
    #[serde(default)]
    pub min_price: Option<f64>,
    /// Upper price bound in euros (available artworks only)
    #[serde(default)]
    pub max_price: Option<f64>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

fn gallery_error_to_response(err: GalleryError) -> (StatusCode, Json<ErrorResponse>) {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

// =============================================================================
// Gallery Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "galerie",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// List artworks, optionally filtered to those still available
pub async fn list_artworks(
    State(state): State<AppState>,
    Query(query): Query<ListArtworksQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let mut artworks = if let Some(technique) = &query.technique {
        state.store.fetch_by_technique(technique).await
    } else if query.min_price.is_some() || query.max_price.is_some() {
        let min = query.min_price.unwrap_or(0.0);
        let max = query.max_price.unwrap_or(f64::MAX);
        if min > max {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("min_price exceeds max_price", 400)),
            ));
        }
        state.store.fetch_by_price_range(min, max).await
    } else if query.available {
        state.store.fetch_available().await
    } else {
        state.store.fetch_all().await
    }
    .map_err(gallery_error_to_response)?;

    // `available` composes with the other filters
    if query.available {
        artworks.retain(|a| a.is_available);
    }

    Ok(Json(serde_json::json!({
        "artworks": artworks,
        "count": artworks.len()
    })))
}

/// Featured artworks for the landing page (at most five)
pub async fn featured_artworks(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, HandlerError> {
    let artworks = state
        .store
        .fetch_featured()
        .await
        .map_err(gallery_error_to_response)?;

    Ok(Json(serde_json::json!({
        "artworks": artworks,
        "count": artworks.len()
    })))
}

/// Gallery counts
pub async fn artwork_counts(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, HandlerError> {
    let total = state.store.count().await.map_err(gallery_error_to_response)?;
    let available = state
        .store
        .count_available()
        .await
        .map_err(gallery_error_to_response)?;

    Ok(Json(serde_json::json!({
        "total": total,
        "available": available
    })))
}

/// Single artwork detail response, with circular prev/next navigation
#[derive(Debug, Serialize)]
pub struct ArtworkDetailResponse {
    #[serde(flatten)]
    pub artwork: Artwork,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_slug: Option<String>,
}

/// Get one artwork by slug
pub async fn get_artwork(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let artwork = state
        .store
        .fetch_by_slug(&slug)
        .await
        .map_err(gallery_error_to_response)?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(format!("Artwork not found: {}", slug), 404)),
            )
        })?;

    // Circular navigation over the gallery ordering
    let slugs = state
        .store
        .fetch_all_slugs()
        .await
        .map_err(gallery_error_to_response)?;

    let (previous_slug, next_slug) = neighbor_slugs(&slugs, &slug);

    Ok(Json(ArtworkDetailResponse {
        artwork,
        previous_slug,
        next_slug,
    }))
}

/// Previous/next slugs in gallery order, wrapping at the edges.
/// A single-artwork gallery gets no navigation.
fn neighbor_slugs(slugs: &[String], current: &str) -> (Option<String>, Option<String>) {
    if slugs.len() < 2 {
        return (None, None);
    }
    let Some(index) = slugs.iter().position(|s| s == current) else {
        return (None, None);
    };
    let prev = slugs[(index + slugs.len() - 1) % slugs.len()].clone();
    let next = slugs[(index + 1) % slugs.len()].clone();
    (Some(prev), Some(next))
}

/// Site settings (artist bio, socials) from the content store
pub async fn site_settings(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, HandlerError> {
    let settings = state
        .store
        .fetch_settings()
        .await
        .map_err(gallery_error_to_response)?;

    Ok(Json(serde_json::json!({ "settings": settings })))
}

// =============================================================================
// Checkout Handlers
// =============================================================================

/// Create a checkout session for one artwork
#[instrument(skip(state, request))]
pub async fn create_checkout(
    State(state): State<AppState>,
    Json(request): Json<CreateCheckoutRequest>,
) -> Result<Json<CreateCheckoutResponse>, HandlerError> {
    let Some(slug) = request.artwork_slug.as_deref().map(str::trim).filter(|s| !s.is_empty())
    else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Missing 'artwork_slug' in request", 400)),
        ));
    };

    let artwork = state
        .store
        .fetch_by_slug(slug)
        .await
        .map_err(gallery_error_to_response)?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(format!("Artwork not found: {}", slug), 404)),
            )
        })?;

    // A sold artwork is permanently gone, not temporarily unavailable
    if !artwork.is_available {
        return Err(gallery_error_to_response(GalleryError::ArtworkUnavailable {
            artwork_id: artwork.id,
        }));
    }

    info!(
        "Creating checkout for '{}' ({})",
        artwork.title,
        artwork.price_as_money().display()
    );

    let session = state
        .gateway
        .create_checkout(&artwork, &state.urls)
        .await
        .map_err(|e| {
            error!("Failed to create checkout: {}", e);
            gallery_error_to_response(e)
        })?;

    info!("Created checkout session: {}", session.session_id);

    Ok(Json(CreateCheckoutResponse {
        session_id: session.session_id,
        url: session.checkout_url,
    }))
}

// =============================================================================
// Webhook Handler
// =============================================================================

/// Handle a Stripe webhook delivery
#[instrument(skip(state, headers, body))]
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, HandlerError> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Missing Stripe-Signature header", 400)),
            )
        })?;

    let event = state
        .gateway
        .verify_webhook(&body, signature)
        .await
        .map_err(|e| {
            error!("Webhook verification failed: {}", e);
            gallery_error_to_response(e)
        })?;

    info!(
        "Received webhook: type={:?}, id={}",
        event.event_type, event.event_id
    );

    let outcome = fulfillment::fulfill_event(state.store.as_ref(), state.mailer.as_ref(), &event)
        .await
        .map_err(|e| {
            error!("Fulfillment failed for event {}: {}", event.event_id, e);
            gallery_error_to_response(e)
        })?;

    let body = match outcome {
        FulfillmentOutcome::Ignored { reason } => {
            serde_json::json!({ "received": true, "ignored": reason })
        }
        FulfillmentOutcome::MissingMetadata => {
            warn!("Acknowledged delivery with unusable metadata");
            serde_json::json!({ "received": true, "error": "missing artwork metadata" })
        }
        FulfillmentOutcome::AlreadySold { artwork_id } => {
            serde_json::json!({ "received": true, "artwork_id": artwork_id, "already_sold": true })
        }
        FulfillmentOutcome::Fulfilled {
            artwork_id,
            customer_notified,
            artist_notified,
        } => serde_json::json!({
            "received": true,
            "artwork_id": artwork_id,
            "updated": true,
            "customer_notified": customer_notified,
            "artist_notified": artist_notified
        }),
    };

    Ok(Json(body))
}

// =============================================================================
// Contact Handler
// =============================================================================

/// Relay a contact-form submission to the artist
#[instrument(skip(state, form), fields(sender = %form.email))]
pub async fn contact(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<impl IntoResponse, HandlerError> {
    if !state.mailer.is_configured() {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new("Contact form is not available", 503)),
        ));
    }

    let message = contact::validate(&form)
        .map_err(|e| (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e, 400))))?;

    let outcome = state.mailer.send_contact_message(&message).await;
    if !outcome.sent {
        error!("Contact relay failed: {:?}", outcome.error);
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Failed to send message", 500)),
        ));
    }

    Ok(Json(serde_json::json!({ "sent": true })))
}

// =============================================================================
// Static Pages
// =============================================================================

/// Post-checkout success page
pub async fn checkout_success(
    Query(params): Query<std::collections::HashMap<String, String>>,
) -> impl IntoResponse {
    let session_id = params
        .get("session_id")
        .map(|s| s.as_str())
        .unwrap_or("inconnue");

    Html(format!(
        r#"
<!DOCTYPE html>
<html lang="fr">
<head><meta charset="UTF-8"><title>Paiement confirmé</title></head>
<body style="font-family: system-ui; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);">
    <div style="background: white; padding: 60px; border-radius: 16px; text-align: center;">
        <div style="font-size: 60px;">🎨</div>
        <h1>Merci pour votre achat !</h1>
        <p style="color: #666;">Votre paiement a bien été confirmé. Un email de confirmation vous a été envoyé.</p>
        <p style="color: #999; font-size: 12px;">Référence : <code>{}</code></p>
    </div>
</body>
</html>
"#,
        html_escape(session_id)
    ))
}

/// Post-checkout cancel page
pub async fn checkout_cancel() -> impl IntoResponse {
    Html(
        r#"
<!DOCTYPE html>
<html lang="fr">
<head><meta charset="UTF-8"><title>Paiement annulé</title></head>
<body style="font-family: system-ui; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);">
    <div style="background: white; padding: 60px; border-radius: 16px; text-align: center;">
        <div style="font-size: 60px;">↩️</div>
        <h1>Paiement annulé</h1>
        <p style="color: #666;">Aucun montant n'a été débité. L'œuvre reste disponible à la vente.</p>
    </div>
</body>
</html>
"#,
    )
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Test error", 400);
        assert_eq!(err.error, "Test error");
        assert_eq!(err.code, 400);
    }

    #[test]
    fn test_gallery_error_conversion() {
        let err = GalleryError::ArtworkUnavailable {
            artwork_id: "a1".into(),
        };
        let (status, _json) = gallery_error_to_response(err);
        assert_eq!(status, StatusCode::GONE);
    }

    #[test]
    fn test_neighbor_slugs_wrap_around() {
        let slugs: Vec<String> = ["aube", "crepuscule", "nuit"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        assert_eq!(
            neighbor_slugs(&slugs, "aube"),
            (Some("nuit".into()), Some("crepuscule".into()))
        );
        assert_eq!(
            neighbor_slugs(&slugs, "nuit"),
            (Some("crepuscule".into()), Some("aube".into()))
        );
    }

    #[test]
    fn test_neighbor_slugs_single_artwork() {
        let slugs = vec!["aube".to_string()];
        assert_eq!(neighbor_slugs(&slugs, "aube"), (None, None));
    }

    #[test]
    fn test_neighbor_slugs_unknown_slug() {
        let slugs: Vec<String> = ["aube", "nuit"].iter().map(|s| s.to_string()).collect();
        assert_eq!(neighbor_slugs(&slugs, "inconnu"), (None, None));
    }

    #[test]
    fn test_success_page_escapes_session_id() {
        let escaped = html_escape("<script>cs_1</script>");
        assert!(!escaped.contains("<script>"));
    }
}
