//! # galerie-sanity
//!
//! Sanity Content Lake client for galerie-rs.
//!
//! The content store owns the artwork catalog and the site settings. This
//! crate implements the `ArtworkStore` trait over the Content Lake HTTP API:
//! GROQ reads (optionally through the CDN edge) and a single conditional
//! mutation that flips an artwork's availability flag.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use galerie_sanity::SanityClient;
//! use galerie_core::ArtworkStore;
//!
//! let store = SanityClient::from_env()?;
//! let featured = store.fetch_featured().await?;
//! ```

pub mod client;
pub mod config;
pub mod queries;

// Re-exports
pub use client::SanityClient;
pub use config::SanityConfig;
