//! # Webhook Fulfillment Flow
//!
//! The one stateful flow in the storefront: a verified payment event walks
//! through type and payment-status filters, the idempotency guard, the
//! single availability write, and two best-effort notification sends.
//!
//! Early exits at the filtering stages are successes from the processor's
//! perspective, not errors. Fetch and mutation failures propagate so the
//! webhook endpoint can answer 5xx and lean on Stripe's retry policy
//! instead of a local one.

use galerie_core::{
    ArtistNotification, Artwork, ArtworkStore, CustomerConfirmation, GalleryError, GalleryResult,
    Mailer, MarkSoldOutcome, SessionSnapshot, WebhookEvent, WebhookEventType,
};
use tracing::{info, warn};

/// How a delivery was handled. Every variant is acknowledged with a 200.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FulfillmentOutcome {
    /// Event type or payment status requires no action
    Ignored { reason: &'static str },
    /// The session metadata carries no artwork id; retrying cannot recover
    /// it, so the delivery is acknowledged and logged as an application error
    MissingMetadata,
    /// Duplicate delivery: the artwork is already marked sold
    AlreadySold { artwork_id: String },
    /// The availability flag was flipped and notifications attempted
    Fulfilled {
        artwork_id: String,
        customer_notified: bool,
        artist_notified: bool,
    },
}

/// Drive a verified webhook event through the fulfillment state machine.
pub async fn fulfill_event(
    store: &dyn ArtworkStore,
    mailer: &dyn Mailer,
    event: &WebhookEvent,
) -> GalleryResult<FulfillmentOutcome> {
    // 1. Only completed checkout sessions are relevant
    if event.event_type != WebhookEventType::CheckoutCompleted {
        info!("Ignoring event {}: irrelevant type", event.event_id);
        return Ok(FulfillmentOutcome::Ignored {
            reason: "irrelevant event type",
        });
    }

    // 2. The session must actually be paid
    if !event.session.is_paid() {
        info!(
            "Ignoring session {}: payment status is '{}'",
            event.session.id, event.session.payment_status
        );
        return Ok(FulfillmentOutcome::Ignored {
            reason: "payment not settled",
        });
    }

    // 3. Correlate back to the artwork via session metadata
    let Some(artwork_id) = event.session.artwork_id() else {
        warn!(
            "Session {} has no artwork_id metadata, acknowledging without action",
            event.session.id
        );
        return Ok(FulfillmentOutcome::MissingMetadata);
    };

    // 4. Fetch the current record. A missing document is treated as store
    //    lag, a transient condition: it surfaces as a retryable store error
    //    (5xx) so the processor redelivers, never as a 404.
    let artwork = store.fetch_by_id(artwork_id).await?.ok_or_else(|| {
        GalleryError::StoreError(format!("artwork {} not visible in store yet", artwork_id))
    })?;

    // 5. Idempotency guard: a redelivery (or a second payment racing on the
    //    same artwork) finds the flag already flipped and is a harmless
    //    duplicate.
    if !artwork.is_available {
        info!(
            "Artwork {} ({}) already sold, duplicate delivery",
            artwork.id, artwork.title
        );
        return Ok(FulfillmentOutcome::AlreadySold {
            artwork_id: artwork.id,
        });
    }

    // 6. The single authoritative write, conditional on the revision we
    //    just read. A conflict means a concurrent writer got there first.
    match store.mark_sold(&artwork.id, &artwork.rev).await? {
        MarkSoldOutcome::Updated => {
            info!("Artwork {} ({}) marked as sold", artwork.id, artwork.title);
        }
        MarkSoldOutcome::Conflict => {
            return Ok(FulfillmentOutcome::AlreadySold {
                artwork_id: artwork.id,
            });
        }
    }

    // 7. Notifications. Each send is isolated; a failure is logged and
    //    never rolls back the write or fails the delivery.
    let (customer_notified, artist_notified) =
        send_notifications(mailer, &artwork, &event.session).await;

    // 8. Done
    Ok(FulfillmentOutcome::Fulfilled {
        artwork_id: artwork.id,
        customer_notified,
        artist_notified,
    })
}

/// Attempt both notification sends, sequenced and independently isolated.
async fn send_notifications(
    mailer: &dyn Mailer,
    artwork: &Artwork,
    session: &SessionSnapshot,
) -> (bool, bool) {
    let Some(customer_email) = session.customer.email.clone() else {
        warn!(
            "Missing customer email (session {}), skipping notifications",
            session.id
        );
        return (false, false);
    };

    let customer_name = session
        .customer
        .name
        .clone()
        .unwrap_or_else(|| "Client".to_string());

    let confirmation = CustomerConfirmation {
        customer_email: customer_email.clone(),
        customer_name: customer_name.clone(),
        customer_phone: session.customer.phone.clone(),
        shipping_name: session.shipping_name.clone(),
        shipping_address: session.shipping_address.clone(),
        artwork_title: artwork.title.clone(),
        artwork_price: artwork.price_as_money(),
        artwork_image_url: artwork.image_url.clone(),
        artwork_dimensions: artwork.dimensions_display(),
        artwork_technique: artwork.technique.clone(),
        session_id: session.id.clone(),
    };

    let customer_outcome = mailer.send_customer_confirmation(&confirmation).await;
    if !customer_outcome.sent {
        warn!(
            "Customer confirmation not sent (session {}): {:?}",
            session.id, customer_outcome.error
        );
    }

    let notification = ArtistNotification {
        artwork_title: artwork.title.clone(),
        artwork_slug: artwork.slug.clone(),
        artwork_price: artwork.price_as_money(),
        customer_name,
        customer_email,
        customer_phone: session.customer.phone.clone(),
        shipping_name: session.shipping_name.clone(),
        shipping_address: session.shipping_address.clone(),
        session_id: session.id.clone(),
    };

    let artist_outcome = mailer.send_artist_notification(&notification).await;
    if !artist_outcome.sent {
        warn!(
            "Artist notification not sent (session {}): {:?}",
            session.id, artist_outcome.error
        );
    }

    (customer_outcome.sent, artist_outcome.sent)
}
