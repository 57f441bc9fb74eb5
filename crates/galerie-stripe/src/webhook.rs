//! # Stripe Webhook Verification & Parsing
//!
//! Signature verification (HMAC-SHA256 over `"{timestamp}.{payload}"`,
//! constant-time compare) and parsing of the event JSON into the domain
//! `WebhookEvent` with its checkout-session snapshot.

use chrono::{DateTime, Utc};
use galerie_core::{
    CustomerDetails, GalleryError, GalleryResult, SessionSnapshot, ShippingAddress, WebhookEvent,
    WebhookEventType,
};
use serde::Deserialize;
use std::collections::HashMap;

/// Accepted clock skew between Stripe's timestamp and ours
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

pub(crate) struct SignatureHeader {
    pub timestamp: i64,
    pub signatures: Vec<String>,
}

/// Parse the `Stripe-Signature` header (`t=...,v1=...[,v1=...]`)
pub(crate) fn parse_signature_header(header: &str) -> GalleryResult<SignatureHeader> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let kv: Vec<&str> = part.split('=').collect();
        if kv.len() != 2 {
            continue;
        }
        match kv[0] {
            "t" => {
                timestamp = kv[1].parse().ok();
            }
            "v1" => {
                signatures.push(kv[1].to_string());
            }
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| {
        GalleryError::WebhookVerificationFailed("Missing timestamp in signature".to_string())
    })?;

    if signatures.is_empty() {
        return Err(GalleryError::WebhookVerificationFailed(
            "No v1 signature found".to_string(),
        ));
    }

    Ok(SignatureHeader {
        timestamp,
        signatures,
    })
}

pub(crate) fn compute_hmac_sha256(secret: &str, message: &str) -> String {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    let result = mac.finalize();
    hex::encode(result.into_bytes())
}

pub(crate) fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// Verify the signature header against the payload and shared secret.
///
/// `now` is injected so tests can pin the clock.
pub fn verify_signature(
    payload: &[u8],
    signature: &str,
    webhook_secret: &str,
    now: DateTime<Utc>,
) -> GalleryResult<()> {
    let sig_parts = parse_signature_header(signature)?;

    if (now.timestamp() - sig_parts.timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(GalleryError::WebhookVerificationFailed(
            "Timestamp outside tolerance".to_string(),
        ));
    }

    let signed_payload = format!(
        "{}.{}",
        sig_parts.timestamp,
        String::from_utf8_lossy(payload)
    );
    let expected_sig = compute_hmac_sha256(webhook_secret, &signed_payload);

    let valid = sig_parts
        .signatures
        .iter()
        .any(|sig| constant_time_compare(sig, &expected_sig));

    if !valid {
        return Err(GalleryError::WebhookVerificationFailed(
            "Signature mismatch".to_string(),
        ));
    }

    Ok(())
}

// =============================================================================
// Event payload types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeWebhookEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    created: i64,
    data: StripeEventData,
}

#[derive(Debug, Deserialize)]
struct StripeEventData {
    object: StripeSessionObject,
}

#[derive(Debug, Deserialize)]
struct StripeSessionObject {
    id: String,
    #[serde(default)]
    payment_status: Option<String>,
    #[serde(default)]
    customer_details: Option<StripeCustomerDetails>,
    #[serde(default, alias = "shipping")]
    shipping_details: Option<StripeShippingDetails>,
    #[serde(default)]
    metadata: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct StripeCustomerDetails {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    phone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeShippingDetails {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    address: Option<StripeAddress>,
}

#[derive(Debug, Deserialize)]
struct StripeAddress {
    #[serde(default)]
    line1: Option<String>,
    #[serde(default)]
    line2: Option<String>,
    #[serde(default)]
    postal_code: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

/// Parse a verified payload into the domain event
pub fn parse_event(payload: &[u8]) -> GalleryResult<WebhookEvent> {
    let event: StripeWebhookEvent = serde_json::from_slice(payload)
        .map_err(|e| GalleryError::WebhookParseError(format!("Failed to parse webhook: {}", e)))?;

    let object = event.data.object;

    let customer = object
        .customer_details
        .map(|cd| CustomerDetails {
            email: cd.email,
            name: cd.name,
            phone: cd.phone,
        })
        .unwrap_or_default();

    let (shipping_name, shipping_address) = match object.shipping_details {
        Some(sd) => (
            sd.name,
            sd.address.map(|a| ShippingAddress {
                line1: a.line1,
                line2: a.line2,
                postal_code: a.postal_code,
                city: a.city,
                state: a.state,
                country: a.country,
            }),
        ),
        None => (None, None),
    };

    Ok(WebhookEvent {
        event_id: event.id,
        event_type: WebhookEventType::from_provider(&event.event_type),
        session: SessionSnapshot {
            id: object.id,
            payment_status: object.payment_status.unwrap_or_default(),
            customer,
            shipping_name,
            shipping_address,
            metadata: object.metadata,
        },
        timestamp: DateTime::from_timestamp(event.created, 0).unwrap_or_else(Utc::now),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_header(payload: &str, secret: &str, timestamp: i64) -> String {
        let sig = compute_hmac_sha256(secret, &format!("{}.{}", timestamp, payload));
        format!("t={},v1={}", timestamp, sig)
    }

    fn sample_event_json() -> String {
        serde_json::json!({
            "id": "evt_test_1",
            "type": "checkout.session.completed",
            "created": 1750000000,
            "data": {
                "object": {
                    "id": "cs_test_1",
                    "payment_status": "paid",
                    "customer_details": {
                        "email": "jean@example.com",
                        "name": "Jean Dupont",
                        "phone": "+33612345678"
                    },
                    "shipping_details": {
                        "name": "Jean Dupont",
                        "address": {
                            "line1": "12 rue des Lilas",
                            "postal_code": "75011",
                            "city": "Paris",
                            "country": "FR"
                        }
                    },
                    "metadata": {
                        "artwork_id": "artwork-1",
                        "artwork_slug": "lever-de-soleil"
                    }
                }
            }
        })
        .to_string()
    }

    #[test]
    fn test_parse_signature_header() {
        let header = "t=1234567890,v1=abc123,v1=def456";
        let parsed = parse_signature_header(header).unwrap();

        assert_eq!(parsed.timestamp, 1234567890);
        assert_eq!(parsed.signatures.len(), 2);
        assert_eq!(parsed.signatures[0], "abc123");
    }

    #[test]
    fn test_verify_signature_roundtrip() {
        let payload = sample_event_json();
        let secret = "whsec_test";
        let now = DateTime::from_timestamp(1750000000, 0).unwrap();
        let header = signed_header(&payload, secret, 1750000000);

        assert!(verify_signature(payload.as_bytes(), &header, secret, now).is_ok());
    }

    #[test]
    fn test_verify_signature_rejects_wrong_secret() {
        let payload = sample_event_json();
        let now = DateTime::from_timestamp(1750000000, 0).unwrap();
        let header = signed_header(&payload, "whsec_other", 1750000000);

        let err = verify_signature(payload.as_bytes(), &header, "whsec_test", now).unwrap_err();
        assert!(matches!(err, GalleryError::WebhookVerificationFailed(_)));
    }

    #[test]
    fn test_verify_signature_rejects_stale_timestamp() {
        let payload = sample_event_json();
        let secret = "whsec_test";
        let now = DateTime::from_timestamp(1750000000 + SIGNATURE_TOLERANCE_SECS + 1, 0).unwrap();
        let header = signed_header(&payload, secret, 1750000000);

        let err = verify_signature(payload.as_bytes(), &header, secret, now).unwrap_err();
        assert!(matches!(err, GalleryError::WebhookVerificationFailed(_)));
    }

    #[test]
    fn test_verify_signature_rejects_tampered_payload() {
        let payload = sample_event_json();
        let secret = "whsec_test";
        let now = DateTime::from_timestamp(1750000000, 0).unwrap();
        let header = signed_header(&payload, secret, 1750000000);

        let tampered = payload.replace("paid", "free");
        let err = verify_signature(tampered.as_bytes(), &header, secret, now).unwrap_err();
        assert!(matches!(err, GalleryError::WebhookVerificationFailed(_)));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc123", "abc123"));
        assert!(!constant_time_compare("abc123", "abc124"));
        assert!(!constant_time_compare("abc", "abcd"));
    }

    #[test]
    fn test_parse_event_extracts_snapshot() {
        let event = parse_event(sample_event_json().as_bytes()).unwrap();

        assert_eq!(event.event_id, "evt_test_1");
        assert_eq!(event.event_type, WebhookEventType::CheckoutCompleted);
        assert_eq!(event.session.id, "cs_test_1");
        assert!(event.session.is_paid());
        assert_eq!(event.session.artwork_id(), Some("artwork-1"));
        assert_eq!(
            event.session.customer.email.as_deref(),
            Some("jean@example.com")
        );
        assert_eq!(
            event
                .session
                .shipping_address
                .as_ref()
                .and_then(|a| a.display())
                .unwrap(),
            "12 rue des Lilas, 75011 Paris, FR"
        );
    }

    #[test]
    fn test_parse_event_unknown_type() {
        let payload = serde_json::json!({
            "id": "evt_test_2",
            "type": "invoice.paid",
            "created": 1750000000,
            "data": { "object": { "id": "in_test_1" } }
        })
        .to_string();

        let event = parse_event(payload.as_bytes()).unwrap();
        assert_eq!(
            event.event_type,
            WebhookEventType::Unknown("invoice.paid".to_string())
        );
        assert!(!event.session.is_paid());
    }
}
