//! # GROQ Queries
//!
//! Predefined GROQ queries for the artwork catalog. The shared projection
//! keeps every artwork query returning the same shape, including `_rev`,
//! which `mark_sold` uses as its compare-and-swap token.

/// Shared projection for artwork documents
pub const ARTWORK_PROJECTION: &str = r#"
  _id,
  _rev,
  _createdAt,
  _updatedAt,
  title,
  "slug": slug.current,
  description,
  "imageUrl": image.asset->url,
  "imageAlt": image.alt,
  price,
  dimensions,
  technique,
  isAvailable,
  isFeatured
"#;

/// All artworks, most recent first
pub fn all_artworks() -> String {
    format!(
        r#"*[_type == "artwork"] | order(_createdAt desc) {{{}}}"#,
        ARTWORK_PROJECTION
    )
}

/// Artworks still for sale, most recent first
pub fn available_artworks() -> String {
    format!(
        r#"*[_type == "artwork" && isAvailable == true] | order(_createdAt desc) {{{}}}"#,
        ARTWORK_PROJECTION
    )
}

/// One artwork by slug (parameter: `$slug`)
pub fn artwork_by_slug() -> String {
    format!(
        r#"*[_type == "artwork" && slug.current == $slug][0] {{{}}}"#,
        ARTWORK_PROJECTION
    )
}

/// One artwork by document ID (parameter: `$artworkId`)
pub fn artwork_by_id() -> String {
    format!(
        r#"*[_type == "artwork" && _id == $artworkId][0] {{{}}}"#,
        ARTWORK_PROJECTION
    )
}

/// Featured and available artworks, bounded to 5 for the carousel
pub fn featured_artworks() -> String {
    format!(
        r#"*[_type == "artwork" && isFeatured == true && isAvailable == true] | order(_createdAt desc)[0...5] {{{}}}"#,
        ARTWORK_PROJECTION
    )
}

/// Total artwork count
pub fn artwork_count() -> String {
    r#"count(*[_type == "artwork"])"#.to_string()
}

/// Count of artworks still for sale
pub fn available_artwork_count() -> String {
    r#"count(*[_type == "artwork" && isAvailable == true])"#.to_string()
}

/// Artworks using a given technique (parameter: `$technique`)
pub fn artworks_by_technique() -> String {
    format!(
        r#"*[_type == "artwork" && technique == $technique] | order(_createdAt desc) {{{}}}"#,
        ARTWORK_PROJECTION
    )
}

/// Available artworks within a price range, cheapest first
/// (parameters: `$minPrice`, `$maxPrice`)
pub fn artworks_by_price_range() -> String {
    format!(
        r#"*[_type == "artwork" && price >= $minPrice && price <= $maxPrice && isAvailable == true] | order(price asc) {{{}}}"#,
        ARTWORK_PROJECTION
    )
}

/// Slugs of every artwork
pub fn all_artwork_slugs() -> String {
    r#"*[_type == "artwork"].slug.current"#.to_string()
}

/// The site settings singleton
pub fn site_settings() -> String {
    r#"*[_type == "siteSettings"][0] {
  title,
  description,
  contactEmail,
  instagramUrl,
  facebookUrl
}"#
    .to_string()
}
