//! # galerie-email
//!
//! Transactional email client for galerie-rs, backed by the Resend API.
//!
//! Three messages:
//! - customer purchase confirmation
//! - artist sale alert (reply-to the buyer)
//! - contact-form relay (reply-to the sender)
//!
//! Sends are best-effort by contract: the `Mailer` implementation returns an
//! `EmailOutcome` instead of an error, and a missing API key or recipient
//! address disables the feature without failing startup.

pub mod client;
pub mod config;
pub mod templates;

// Re-exports
pub use client::ResendMailer;
pub use config::EmailConfig;
pub use templates::EmailKind;
