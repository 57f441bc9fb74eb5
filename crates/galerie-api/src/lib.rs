//! # galerie-api
//!
//! HTTP layer for the storefront: gallery reads from the content store,
//! single-artwork checkout, the payment webhook that reconciles inventory,
//! and the contact relay.

pub mod contact;
pub mod fulfillment;
pub mod handlers;
pub mod routes;
pub mod state;

// Re-exports
pub use fulfillment::{fulfill_event, FulfillmentOutcome};
pub use routes::create_router;
pub use state::{AppConfig, AppState};
