//! End-to-end tests over the real router with in-memory services.
//!
//! The webhook tests run against the real Stripe gateway (signature
//! verification is local), with payloads signed using the shared secret.

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use chrono::Utc;
use galerie_api::{routes, AppState};
use galerie_core::{
    ArtistNotification, Artwork, ArtworkStore, CheckoutSession, CheckoutUrls, ContactMessage,
    CustomerConfirmation, EmailOutcome, GalleryError, GalleryResult, Mailer, MarkSoldOutcome,
    PaymentGateway, SiteSettings, WebhookEvent,
};
use galerie_stripe::{StripeConfig, StripeGateway};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const WEBHOOK_SECRET: &str = "whsec_test_secret";

// =============================================================================
// In-memory services
// =============================================================================

struct FakeStore {
    artworks: Mutex<Vec<Artwork>>,
    mark_sold_calls: AtomicUsize,
}

impl FakeStore {
    fn new(artworks: Vec<Artwork>) -> Arc<Self> {
        Arc::new(Self {
            artworks: Mutex::new(artworks),
            mark_sold_calls: AtomicUsize::new(0),
        })
    }

    fn is_available(&self, id: &str) -> bool {
        self.artworks
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.is_available)
            .unwrap_or(false)
    }
}

#[async_trait]
impl ArtworkStore for FakeStore {
    async fn fetch_all(&self) -> GalleryResult<Vec<Artwork>> {
        Ok(self.artworks.lock().unwrap().clone())
    }

    async fn fetch_available(&self) -> GalleryResult<Vec<Artwork>> {
        Ok(self
            .artworks
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.is_available)
            .cloned()
            .collect())
    }

    async fn fetch_by_slug(&self, slug: &str) -> GalleryResult<Option<Artwork>> {
        Ok(self
            .artworks
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.slug == slug)
            .cloned())
    }

    async fn fetch_by_id(&self, artwork_id: &str) -> GalleryResult<Option<Artwork>> {
        Ok(self
            .artworks
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == artwork_id)
            .cloned())
    }

    async fn fetch_featured(&self) -> GalleryResult<Vec<Artwork>> {
        Ok(self
            .artworks
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.is_featured)
            .take(5)
            .cloned()
            .collect())
    }

    async fn count(&self) -> GalleryResult<u64> {
        Ok(self.artworks.lock().unwrap().len() as u64)
    }

    async fn count_available(&self) -> GalleryResult<u64> {
        Ok(self.fetch_available().await?.len() as u64)
    }

    async fn fetch_by_technique(&self, technique: &str) -> GalleryResult<Vec<Artwork>> {
        Ok(self
            .artworks
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.technique.as_deref() == Some(technique))
            .cloned()
            .collect())
    }

    async fn fetch_by_price_range(&self, min: f64, max: f64) -> GalleryResult<Vec<Artwork>> {
        Ok(self
            .artworks
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.is_available && a.price >= min && a.price <= max)
            .cloned()
            .collect())
    }

    async fn fetch_all_slugs(&self) -> GalleryResult<Vec<String>> {
        Ok(self
            .artworks
            .lock()
            .unwrap()
            .iter()
            .map(|a| a.slug.clone())
            .collect())
    }

    async fn fetch_settings(&self) -> GalleryResult<Option<SiteSettings>> {
        Ok(None)
    }

    async fn mark_sold(
        &self,
        artwork_id: &str,
        expected_rev: &str,
    ) -> GalleryResult<MarkSoldOutcome> {
        self.mark_sold_calls.fetch_add(1, Ordering::SeqCst);
        let mut artworks = self.artworks.lock().unwrap();
        let artwork = artworks
            .iter_mut()
            .find(|a| a.id == artwork_id)
            .ok_or_else(|| GalleryError::ArtworkNotFound {
                artwork_id: artwork_id.to_string(),
            })?;
        if artwork.rev != expected_rev {
            return Ok(MarkSoldOutcome::Conflict);
        }
        artwork.is_available = false;
        artwork.rev = format!("{}-next", artwork.rev);
        Ok(MarkSoldOutcome::Updated)
    }
}

struct FakeMailer {
    customer_sends: AtomicUsize,
    artist_sends: AtomicUsize,
    contact_sends: AtomicUsize,
    fail_all: bool,
    configured: bool,
}

impl FakeMailer {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            customer_sends: AtomicUsize::new(0),
            artist_sends: AtomicUsize::new(0),
            contact_sends: AtomicUsize::new(0),
            fail_all: false,
            configured: true,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail_all: true,
            ..Self::unwrapped()
        })
    }

    fn unconfigured() -> Arc<Self> {
        Arc::new(Self {
            configured: false,
            ..Self::unwrapped()
        })
    }

    fn unwrapped() -> Self {
        Self {
            customer_sends: AtomicUsize::new(0),
            artist_sends: AtomicUsize::new(0),
            contact_sends: AtomicUsize::new(0),
            fail_all: false,
            configured: true,
        }
    }

    fn outcome(&self) -> EmailOutcome {
        if self.fail_all {
            EmailOutcome::failed("provider unavailable")
        } else {
            EmailOutcome::sent("email-1")
        }
    }
}

#[async_trait]
impl Mailer for FakeMailer {
    async fn send_customer_confirmation(&self, _data: &CustomerConfirmation) -> EmailOutcome {
        self.customer_sends.fetch_add(1, Ordering::SeqCst);
        self.outcome()
    }

    async fn send_artist_notification(&self, _data: &ArtistNotification) -> EmailOutcome {
        self.artist_sends.fetch_add(1, Ordering::SeqCst);
        self.outcome()
    }

    async fn send_contact_message(&self, _data: &ContactMessage) -> EmailOutcome {
        self.contact_sends.fetch_add(1, Ordering::SeqCst);
        self.outcome()
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}

/// Gateway returning a canned session, for checkout-route tests
struct FakeGateway {
    sessions_created: AtomicUsize,
}

impl FakeGateway {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            sessions_created: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_checkout(
        &self,
        artwork: &Artwork,
        _urls: &CheckoutUrls,
    ) -> GalleryResult<CheckoutSession> {
        self.sessions_created.fetch_add(1, Ordering::SeqCst);
        Ok(CheckoutSession {
            session_id: "cs_test_fake".to_string(),
            checkout_url: "https://checkout.example.com/cs_test_fake".to_string(),
            artwork_id: artwork.id.clone(),
            artwork_slug: artwork.slug.clone(),
            created_at: Utc::now(),
        })
    }

    async fn verify_webhook(
        &self,
        _payload: &[u8],
        _signature: &str,
    ) -> GalleryResult<WebhookEvent> {
        Err(GalleryError::Internal("not used in this test".to_string()))
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

// =============================================================================
// Fixtures
// =============================================================================

fn artwork(id: &str, slug: &str, available: bool) -> Artwork {
    serde_json::from_value(serde_json::json!({
        "_id": id,
        "_rev": "rev-1",
        "_createdAt": Utc::now().to_rfc3339(),
        "_updatedAt": Utc::now().to_rfc3339(),
        "slug": slug,
        "title": "Lever de Soleil",
        "description": "Acrylique sur toile, 2024.",
        "price": 500.0,
        "dimensions": { "height": 50.0, "width": 40.0 },
        "technique": "Acrylique sur toile",
        "isAvailable": available,
        "isFeatured": true
    }))
    .unwrap()
}

fn server_with(
    store: Arc<FakeStore>,
    gateway: Arc<dyn PaymentGateway>,
    mailer: Arc<FakeMailer>,
) -> TestServer {
    let state = AppState::with_services(store, gateway, mailer, "https://atelier-mngh.fr");
    TestServer::new(routes::create_router(state)).unwrap()
}

fn stripe_gateway() -> Arc<StripeGateway> {
    let config = StripeConfig::new("sk_test_key", WEBHOOK_SECRET);
    Arc::new(StripeGateway::new(config).unwrap())
}

fn sign(payload: &str) -> HeaderValue {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    let timestamp = Utc::now().timestamp();
    let mut mac = Hmac::<Sha256>::new_from_slice(WEBHOOK_SECRET.as_bytes()).unwrap();
    mac.update(format!("{}.{}", timestamp, payload).as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());
    HeaderValue::from_str(&format!("t={},v1={}", timestamp, signature)).unwrap()
}

const SIGNATURE_HEADER: HeaderName = HeaderName::from_static("stripe-signature");

fn checkout_completed_payload(artwork_id: &str, payment_status: &str) -> String {
    serde_json::json!({
        "id": "evt_test_1",
        "type": "checkout.session.completed",
        "created": Utc::now().timestamp(),
        "data": {
            "object": {
                "id": "cs_test_1",
                "payment_status": payment_status,
                "customer_details": {
                    "email": "jean@example.com",
                    "name": "Jean Dupont"
                },
                "metadata": {
                    "artwork_id": artwork_id,
                    "artwork_slug": "lever-de-soleil"
                }
            }
        }
    })
    .to_string()
}

// =============================================================================
// Gallery routes
// =============================================================================

#[tokio::test]
async fn test_health() {
    let server = server_with(FakeStore::new(vec![]), FakeGateway::new(), FakeMailer::new());

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_list_artworks_with_availability_filter() {
    let store = FakeStore::new(vec![
        artwork("a1", "lever-de-soleil", true),
        artwork("a2", "nocturne", false),
    ]);
    let server = server_with(store, FakeGateway::new(), FakeMailer::new());

    let all: serde_json::Value = server.get("/api/v1/artworks").await.json();
    assert_eq!(all["count"], 2);

    let available: serde_json::Value =
        server.get("/api/v1/artworks?available=true").await.json();
    assert_eq!(available["count"], 1);
    assert_eq!(available["artworks"][0]["_id"], "a1");
}

#[tokio::test]
async fn test_list_artworks_by_technique_and_price() {
    let store = FakeStore::new(vec![
        artwork("a1", "lever-de-soleil", true),
        artwork("a2", "nocturne", true),
    ]);
    let server = server_with(store, FakeGateway::new(), FakeMailer::new());

    let by_technique: serde_json::Value = server
        .get("/api/v1/artworks?technique=Acrylique%20sur%20toile")
        .await
        .json();
    assert_eq!(by_technique["count"], 2);

    let in_range: serde_json::Value = server
        .get("/api/v1/artworks?min_price=400&max_price=600")
        .await
        .json();
    assert_eq!(in_range["count"], 2);

    let out_of_range: serde_json::Value = server
        .get("/api/v1/artworks?max_price=100")
        .await
        .json();
    assert_eq!(out_of_range["count"], 0);

    let inverted = server
        .get("/api/v1/artworks?min_price=600&max_price=100")
        .await;
    inverted.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_availability_filter_composes_with_technique() {
    let store = FakeStore::new(vec![
        artwork("a1", "lever-de-soleil", true),
        artwork("a2", "nocturne", false),
    ]);
    let server = server_with(store, FakeGateway::new(), FakeMailer::new());

    let body: serde_json::Value = server
        .get("/api/v1/artworks?available=true&technique=Acrylique%20sur%20toile")
        .await
        .json();

    // The sold artwork shares the technique but must not appear
    assert_eq!(body["count"], 1);
    assert_eq!(body["artworks"][0]["_id"], "a1");
}

#[tokio::test]
async fn test_artwork_detail_includes_circular_navigation() {
    let store = FakeStore::new(vec![
        artwork("a1", "aube", true),
        artwork("a2", "midi", true),
        artwork("a3", "nuit", true),
    ]);
    let server = server_with(store, FakeGateway::new(), FakeMailer::new());

    let response = server.get("/api/v1/artworks/aube").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["_id"], "a1");
    assert_eq!(body["previous_slug"], "nuit");
    assert_eq!(body["next_slug"], "midi");
}

#[tokio::test]
async fn test_unknown_artwork_is_404() {
    let server = server_with(FakeStore::new(vec![]), FakeGateway::new(), FakeMailer::new());

    let response = server.get("/api/v1/artworks/inconnu").await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_artwork_counts() {
    let store = FakeStore::new(vec![
        artwork("a1", "aube", true),
        artwork("a2", "nuit", false),
    ]);
    let server = server_with(store, FakeGateway::new(), FakeMailer::new());

    let body: serde_json::Value = server.get("/api/v1/artworks/counts").await.json();
    assert_eq!(body["total"], 2);
    assert_eq!(body["available"], 1);
}

// =============================================================================
// Checkout route
// =============================================================================

#[tokio::test]
async fn test_create_checkout_returns_session() {
    let store = FakeStore::new(vec![artwork("a1", "lever-de-soleil", true)]);
    let gateway = FakeGateway::new();
    let server = server_with(store, gateway.clone(), FakeMailer::new());

    let response = server
        .post("/api/v1/checkout")
        .json(&serde_json::json!({ "artwork_slug": "lever-de-soleil" }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["session_id"], "cs_test_fake");
    assert_eq!(body["url"], "https://checkout.example.com/cs_test_fake");
    assert_eq!(gateway.sessions_created.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_checkout_for_sold_artwork_is_gone() {
    let store = FakeStore::new(vec![artwork("a1", "lever-de-soleil", false)]);
    let gateway = FakeGateway::new();
    let server = server_with(store, gateway.clone(), FakeMailer::new());

    let response = server
        .post("/api/v1/checkout")
        .json(&serde_json::json!({ "artwork_slug": "lever-de-soleil" }))
        .await;

    response.assert_status(axum::http::StatusCode::GONE);
    assert_eq!(gateway.sessions_created.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_checkout_for_unknown_artwork_is_404() {
    let store = FakeStore::new(vec![]);
    let gateway = FakeGateway::new();
    let server = server_with(store, gateway.clone(), FakeMailer::new());

    let response = server
        .post("/api/v1/checkout")
        .json(&serde_json::json!({ "artwork_slug": "fantome" }))
        .await;

    response.assert_status(axum::http::StatusCode::NOT_FOUND);
    assert_eq!(gateway.sessions_created.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_checkout_without_slug_is_400() {
    let server = server_with(FakeStore::new(vec![]), FakeGateway::new(), FakeMailer::new());

    let response = server
        .post("/api/v1/checkout")
        .json(&serde_json::json!({}))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

// =============================================================================
// Webhook route
// =============================================================================

#[tokio::test]
async fn test_webhook_marks_artwork_sold_and_notifies() {
    let store = FakeStore::new(vec![artwork("a1", "lever-de-soleil", true)]);
    let mailer = FakeMailer::new();
    let server = server_with(store.clone(), stripe_gateway(), mailer.clone());

    let payload = checkout_completed_payload("a1", "paid");
    let response = server
        .post("/webhook/stripe")
        .add_header(SIGNATURE_HEADER, sign(&payload))
        .text(payload)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["updated"], true);
    assert_eq!(body["artwork_id"], "a1");

    assert!(!store.is_available("a1"));
    assert_eq!(mailer.customer_sends.load(Ordering::SeqCst), 1);
    assert_eq!(mailer.artist_sends.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_webhook_rejects_invalid_signature() {
    let store = FakeStore::new(vec![artwork("a1", "lever-de-soleil", true)]);
    let mailer = FakeMailer::new();
    let server = server_with(store.clone(), stripe_gateway(), mailer.clone());

    let payload = checkout_completed_payload("a1", "paid");
    let response = server
        .post("/webhook/stripe")
        .add_header(SIGNATURE_HEADER, HeaderValue::from_static("t=1,v1=deadbeef"))
        .text(payload)
        .await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);

    // No state change, no emails
    assert!(store.is_available("a1"));
    assert_eq!(mailer.customer_sends.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_webhook_without_signature_header_is_400() {
    let store = FakeStore::new(vec![artwork("a1", "lever-de-soleil", true)]);
    let server = server_with(store.clone(), stripe_gateway(), FakeMailer::new());

    let response = server
        .post("/webhook/stripe")
        .text(checkout_completed_payload("a1", "paid"))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    assert!(store.is_available("a1"));
}

#[tokio::test]
async fn test_webhook_double_delivery_flips_once() {
    let store = FakeStore::new(vec![artwork("a1", "lever-de-soleil", true)]);
    let mailer = FakeMailer::new();
    let server = server_with(store.clone(), stripe_gateway(), mailer.clone());

    let payload = checkout_completed_payload("a1", "paid");

    let first = server
        .post("/webhook/stripe")
        .add_header(SIGNATURE_HEADER, sign(&payload))
        .text(payload.clone())
        .await;
    first.assert_status_ok();

    let second = server
        .post("/webhook/stripe")
        .add_header(SIGNATURE_HEADER, sign(&payload))
        .text(payload)
        .await;
    second.assert_status_ok();

    let body: serde_json::Value = second.json();
    assert_eq!(body["already_sold"], true);

    // One transition, one notification pair
    assert_eq!(store.mark_sold_calls.load(Ordering::SeqCst), 1);
    assert_eq!(mailer.customer_sends.load(Ordering::SeqCst), 1);
    assert_eq!(mailer.artist_sends.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_webhook_unpaid_session_is_acknowledged_without_action() {
    let store = FakeStore::new(vec![artwork("a1", "lever-de-soleil", true)]);
    let mailer = FakeMailer::new();
    let server = server_with(store.clone(), stripe_gateway(), mailer.clone());

    let payload = checkout_completed_payload("a1", "unpaid");
    let response = server
        .post("/webhook/stripe")
        .add_header(SIGNATURE_HEADER, sign(&payload))
        .text(payload)
        .await;

    response.assert_status_ok();
    assert!(store.is_available("a1"));
    assert_eq!(mailer.customer_sends.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_webhook_irrelevant_event_is_acknowledged() {
    let store = FakeStore::new(vec![artwork("a1", "lever-de-soleil", true)]);
    let server = server_with(store.clone(), stripe_gateway(), FakeMailer::new());

    let payload = serde_json::json!({
        "id": "evt_test_2",
        "type": "payment_intent.created",
        "created": Utc::now().timestamp(),
        "data": { "object": { "id": "pi_test_1" } }
    })
    .to_string();

    let response = server
        .post("/webhook/stripe")
        .add_header(SIGNATURE_HEADER, sign(&payload))
        .text(payload)
        .await;

    response.assert_status_ok();
    assert!(store.is_available("a1"));
}

#[tokio::test]
async fn test_webhook_for_unseen_artwork_is_server_error() {
    // The session references a document the store cannot see yet
    // (replication lag between session creation and delivery).
    let store = FakeStore::new(vec![]);
    let mailer = FakeMailer::new();
    let server = server_with(store.clone(), stripe_gateway(), mailer.clone());

    let payload = checkout_completed_payload("ghost", "paid");
    let response = server
        .post("/webhook/stripe")
        .add_header(SIGNATURE_HEADER, sign(&payload))
        .text(payload)
        .await;

    // 5xx so the processor redelivers; a 4xx would drop the event for good
    assert!(response.status_code().is_server_error());
    assert_eq!(mailer.customer_sends.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_webhook_email_failure_does_not_fail_delivery() {
    let store = FakeStore::new(vec![artwork("a1", "lever-de-soleil", true)]);
    let mailer = FakeMailer::failing();
    let server = server_with(store.clone(), stripe_gateway(), mailer.clone());

    let payload = checkout_completed_payload("a1", "paid");
    let response = server
        .post("/webhook/stripe")
        .add_header(SIGNATURE_HEADER, sign(&payload))
        .text(payload)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["updated"], true);
    assert_eq!(body["customer_notified"], false);

    // The sale is recorded even though no email went out
    assert!(!store.is_available("a1"));
}

// =============================================================================
// Contact route
// =============================================================================

#[tokio::test]
async fn test_contact_relays_message() {
    let mailer = FakeMailer::new();
    let server = server_with(FakeStore::new(vec![]), FakeGateway::new(), mailer.clone());

    let response = server
        .post("/api/v1/contact")
        .json(&serde_json::json!({
            "name": "Jean Dupont",
            "email": "jean@example.com",
            "subject": "Question",
            "message": "Bonjour, la toile est-elle encadrée ?"
        }))
        .await;

    response.assert_status_ok();
    assert_eq!(mailer.contact_sends.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_contact_rejects_invalid_email() {
    let mailer = FakeMailer::new();
    let server = server_with(FakeStore::new(vec![]), FakeGateway::new(), mailer.clone());

    let response = server
        .post("/api/v1/contact")
        .json(&serde_json::json!({
            "name": "Jean Dupont",
            "email": "pas-un-email",
            "subject": "Question",
            "message": "Bonjour, la toile est-elle encadrée ?"
        }))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(mailer.contact_sends.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_contact_unavailable_when_email_disabled() {
    let server = server_with(
        FakeStore::new(vec![]),
        FakeGateway::new(),
        FakeMailer::unconfigured(),
    );

    let response = server
        .post("/api/v1/contact")
        .json(&serde_json::json!({
            "name": "Jean Dupont",
            "email": "jean@example.com",
            "subject": "Question",
            "message": "Bonjour, la toile est-elle encadrée ?"
        }))
        .await;

    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
}

// =============================================================================
// Static pages
// =============================================================================

#[tokio::test]
async fn test_checkout_success_page_shows_session() {
    let server = server_with(FakeStore::new(vec![]), FakeGateway::new(), FakeMailer::new());

    let response = server.get("/checkout/success?session_id=cs_test_42").await;
    response.assert_status_ok();
    assert!(response.text().contains("cs_test_42"));
}

#[tokio::test]
async fn test_checkout_cancel_page() {
    let server = server_with(FakeStore::new(vec![]), FakeGateway::new(), FakeMailer::new());

    let response = server.get("/checkout/cancel").await;
    response.assert_status_ok();
    assert!(response.text().contains("Paiement annulé"));
}
