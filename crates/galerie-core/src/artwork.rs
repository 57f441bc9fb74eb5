//! # Artwork Types
//!
//! Catalog types for the galerie-rs storefront.
//! Artworks are owned by the content store; the only field this service
//! ever mutates is `is_available` (via the webhook fulfillment flow).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    EUR,
    USD,
    GBP,
    CHF,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::EUR => "eur",
            Currency::USD => "usd",
            Currency::GBP => "gbp",
            Currency::CHF => "chf",
        }
    }

    /// Convert a decimal amount to the smallest currency unit (cents)
    pub fn to_smallest_unit(&self, amount: f64) -> i64 {
        (amount * 100.0).round() as i64
    }

    /// Convert from smallest unit back to decimal
    pub fn from_smallest_unit(&self, amount: i64) -> f64 {
        amount as f64 / 100.0
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::EUR
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// Price with amount in smallest currency unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in smallest currency unit (cents for EUR)
    pub amount: i64,
    /// Currency
    pub currency: Currency,
}

impl Price {
    /// Create a new price from decimal amount
    pub fn new(amount: f64, currency: Currency) -> Self {
        Self {
            amount: currency.to_smallest_unit(amount),
            currency,
        }
    }

    /// Create a price from smallest unit (cents)
    pub fn from_cents(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Get the decimal amount
    pub fn as_decimal(&self) -> f64 {
        self.currency.from_smallest_unit(self.amount)
    }

    /// Format for display (e.g., "350 €")
    pub fn display(&self) -> String {
        let symbol = match self.currency {
            Currency::EUR => "€",
            Currency::USD => "$",
            Currency::GBP => "£",
            Currency::CHF => "CHF",
        };
        if self.amount % 100 == 0 {
            format!("{} {}", self.amount / 100, symbol)
        } else {
            format!("{:.2} {}", self.as_decimal(), symbol)
        }
    }
}

/// Physical dimensions of an artwork, in centimeters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Height in cm
    pub height: f64,
    /// Width in cm
    pub width: f64,
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} × {} cm", self.height, self.width)
    }
}

/// An artwork document from the content store.
///
/// Field names follow the content store's projection (camelCase, `_`-prefixed
/// system fields), so this deserializes straight from a GROQ result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artwork {
    /// Content store document ID
    #[serde(rename = "_id")]
    pub id: String,

    /// Document revision, used for compare-and-swap on `mark_sold`
    #[serde(rename = "_rev")]
    pub rev: String,

    /// URL slug (e.g., "lever-de-soleil")
    pub slug: String,

    /// Display title
    pub title: String,

    /// Long-form description
    #[serde(default)]
    pub description: String,

    /// Price in euros, as stored by the CMS
    pub price: f64,

    /// Physical dimensions
    #[serde(default)]
    pub dimensions: Option<Dimensions>,

    /// Technique (content-managed list, e.g., "Huile sur toile")
    #[serde(default)]
    pub technique: Option<String>,

    /// Whether the artwork is still for sale.
    /// Flips true→false exactly once; never flips back automatically.
    pub is_available: bool,

    /// Whether the artwork appears in the featured carousel
    #[serde(default)]
    pub is_featured: bool,

    /// Resolved asset URL for the main image
    #[serde(default)]
    pub image_url: Option<String>,

    /// Alt text for the main image
    #[serde(default)]
    pub image_alt: Option<String>,

    /// Creation timestamp
    #[serde(rename = "_createdAt")]
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    #[serde(rename = "_updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Artwork {
    /// Price as a typed amount in cents, the unit Stripe expects
    pub fn price_as_money(&self) -> Price {
        Price::new(self.price, Currency::EUR)
    }

    /// Dimensions formatted for display, if set
    pub fn dimensions_display(&self) -> Option<String> {
        self.dimensions.map(|d| d.to_string())
    }
}

/// Global site settings (singleton document in the content store)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    /// Site title
    pub title: String,

    /// Site description
    #[serde(default)]
    pub description: String,

    /// Public contact email
    #[serde(default)]
    pub contact_email: Option<String>,

    /// Instagram profile URL
    #[serde(default)]
    pub instagram_url: Option<String>,

    /// Facebook profile URL
    #[serde(default)]
    pub facebook_url: Option<String>,
}
