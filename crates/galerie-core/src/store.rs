//! # Content Store Trait
//!
//! Read-mostly query surface over the external document store, plus the
//! single write operation used by the webhook fulfillment flow.

use crate::artwork::{Artwork, SiteSettings};
use crate::error::GalleryResult;
use async_trait::async_trait;
use std::sync::Arc;

/// Result of the conditional availability write.
///
/// `Conflict` means another writer changed the document between our read and
/// our write; the fulfillment flow treats it as a duplicate delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkSoldOutcome {
    /// The availability flag was flipped by this call
    Updated,
    /// The document revision no longer matched; nothing was written
    Conflict,
}

/// Query and mutation surface over the external content store.
///
/// Implemented by the Sanity client; tests substitute an in-memory fake.
#[async_trait]
pub trait ArtworkStore: Send + Sync {
    /// All artworks, most recent first
    async fn fetch_all(&self) -> GalleryResult<Vec<Artwork>>;

    /// Artworks still for sale, most recent first
    async fn fetch_available(&self) -> GalleryResult<Vec<Artwork>>;

    /// One artwork by slug, or None
    async fn fetch_by_slug(&self, slug: &str) -> GalleryResult<Option<Artwork>>;

    /// One artwork by document ID, or None
    async fn fetch_by_id(&self, artwork_id: &str) -> GalleryResult<Option<Artwork>>;

    /// Featured artworks for the home carousel, bounded to 5
    async fn fetch_featured(&self) -> GalleryResult<Vec<Artwork>>;

    /// Total artwork count
    async fn count(&self) -> GalleryResult<u64>;

    /// Count of artworks still for sale
    async fn count_available(&self) -> GalleryResult<u64>;

    /// Artworks using a given technique, most recent first
    async fn fetch_by_technique(&self, technique: &str) -> GalleryResult<Vec<Artwork>>;

    /// Available artworks within a price range (euros), cheapest first
    async fn fetch_by_price_range(&self, min: f64, max: f64) -> GalleryResult<Vec<Artwork>>;

    /// Slugs of every artwork (for navigation and static page generation)
    async fn fetch_all_slugs(&self) -> GalleryResult<Vec<String>>;

    /// The site settings singleton, or None if not yet created
    async fn fetch_settings(&self) -> GalleryResult<Option<SiteSettings>>;

    /// Mark an artwork as sold, conditional on its revision being unchanged
    /// since the read that produced `expected_rev`.
    ///
    /// This is the only write this service ever performs against the store.
    async fn mark_sold(&self, artwork_id: &str, expected_rev: &str)
        -> GalleryResult<MarkSoldOutcome>;
}

/// Type alias for a shared store handle (dynamic dispatch)
pub type SharedStore = Arc<dyn ArtworkStore>;
