//! # Sanity Client
//!
//! HTTP client for the Sanity Content Lake: GROQ reads against the query
//! endpoint, plus the single conditional mutation the webhook flow needs.

use crate::config::SanityConfig;
use crate::queries;
use async_trait::async_trait;
use galerie_core::{
    Artwork, ArtworkStore, GalleryError, GalleryResult, MarkSoldOutcome, SiteSettings,
};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

/// Sanity Content Lake client
pub struct SanityClient {
    config: SanityConfig,
    client: Client,
}

/// Envelope every query response arrives in
#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    result: T,
}

/// Error body returned by the Sanity API
#[derive(Debug, Deserialize)]
struct SanityErrorResponse {
    error: SanityErrorBody,
}

#[derive(Debug, Deserialize)]
struct SanityErrorBody {
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "type", default)]
    error_type: Option<String>,
}

impl SanityClient {
    /// Create a new client
    pub fn new(config: SanityConfig) -> GalleryResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| GalleryError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> GalleryResult<Self> {
        let config = SanityConfig::from_env()?;
        Self::new(config)
    }

    /// Run a GROQ query with named parameters and deserialize the result.
    ///
    /// Parameters are passed as `$name=<json>` query-string pairs, matching
    /// the Content Lake HTTP API convention.
    async fn query<T: DeserializeOwned>(
        &self,
        groq: &str,
        params: &[(&str, serde_json::Value)],
    ) -> GalleryResult<T> {
        let mut pairs: Vec<(String, String)> = vec![("query".to_string(), groq.to_string())];
        for (name, value) in params {
            let encoded = serde_json::to_string(value)
                .map_err(|e| GalleryError::Serialization(e.to_string()))?;
            pairs.push((format!("${}", name), encoded));
        }

        let response = self
            .client
            .get(self.config.query_url())
            .query(&pairs)
            .send()
            .await
            .map_err(|e| GalleryError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GalleryError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Sanity query error: status={}, body={}", status, body);
            return Err(store_error(status, &body));
        }

        let envelope: QueryResponse<T> = serde_json::from_str(&body).map_err(|e| {
            GalleryError::Serialization(format!("Failed to parse Sanity response: {}", e))
        })?;

        Ok(envelope.result)
    }
}

/// Map a non-success query/mutation response to a typed error
fn store_error(status: StatusCode, body: &str) -> GalleryError {
    let message = serde_json::from_str::<SanityErrorResponse>(body)
        .ok()
        .and_then(|e| e.error.description.or(e.error.error_type))
        .unwrap_or_else(|| format!("HTTP {}", status));

    if status.is_server_error() {
        GalleryError::StoreError(message)
    } else {
        GalleryError::ProviderError {
            provider: "sanity".to_string(),
            message,
        }
    }
}

#[async_trait]
impl ArtworkStore for SanityClient {
    async fn fetch_all(&self) -> GalleryResult<Vec<Artwork>> {
        self.query(&queries::all_artworks(), &[]).await
    }

    async fn fetch_available(&self) -> GalleryResult<Vec<Artwork>> {
        self.query(&queries::available_artworks(), &[]).await
    }

    #[instrument(skip(self))]
    async fn fetch_by_slug(&self, slug: &str) -> GalleryResult<Option<Artwork>> {
        self.query(
            &queries::artwork_by_slug(),
            &[("slug", serde_json::Value::String(slug.to_string()))],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn fetch_by_id(&self, artwork_id: &str) -> GalleryResult<Option<Artwork>> {
        self.query(
            &queries::artwork_by_id(),
            &[("artworkId", serde_json::Value::String(artwork_id.to_string()))],
        )
        .await
    }

    async fn fetch_featured(&self) -> GalleryResult<Vec<Artwork>> {
        self.query(&queries::featured_artworks(), &[]).await
    }

    async fn count(&self) -> GalleryResult<u64> {
        self.query(&queries::artwork_count(), &[]).await
    }

    async fn count_available(&self) -> GalleryResult<u64> {
        self.query(&queries::available_artwork_count(), &[]).await
    }

    async fn fetch_by_technique(&self, technique: &str) -> GalleryResult<Vec<Artwork>> {
        self.query(
            &queries::artworks_by_technique(),
            &[("technique", serde_json::Value::String(technique.to_string()))],
        )
        .await
    }

    async fn fetch_by_price_range(&self, min: f64, max: f64) -> GalleryResult<Vec<Artwork>> {
        self.query(
            &queries::artworks_by_price_range(),
            &[
                ("minPrice", serde_json::json!(min)),
                ("maxPrice", serde_json::json!(max)),
            ],
        )
        .await
    }

    async fn fetch_all_slugs(&self) -> GalleryResult<Vec<String>> {
        self.query(&queries::all_artwork_slugs(), &[]).await
    }

    async fn fetch_settings(&self) -> GalleryResult<Option<SiteSettings>> {
        self.query(&queries::site_settings(), &[]).await
    }

    /// Flip `isAvailable` to false, conditional on the document revision.
    ///
    /// The `ifRevisionID` guard turns the read-then-write into a
    /// compare-and-swap: if any other writer (a concurrent webhook delivery,
    /// a Studio edit) has touched the document since our read, the API
    /// answers 409 and we report `Conflict` without writing anything.
    #[instrument(skip(self, expected_rev))]
    async fn mark_sold(
        &self,
        artwork_id: &str,
        expected_rev: &str,
    ) -> GalleryResult<MarkSoldOutcome> {
        let token = self.config.token.as_ref().ok_or_else(|| {
            GalleryError::Configuration("SANITY_API_TOKEN required for mutations".to_string())
        })?;

        let body = serde_json::json!({
            "mutations": [{
                "patch": {
                    "id": artwork_id,
                    "ifRevisionID": expected_rev,
                    "set": { "isAvailable": false }
                }
            }]
        });

        debug!("Patching artwork {} (rev {})", artwork_id, expected_rev);

        let response = self
            .client
            .post(self.config.mutate_url())
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| GalleryError::NetworkError(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GalleryError::NetworkError(e.to_string()))?;

        if status == StatusCode::CONFLICT {
            warn!(
                "Revision conflict marking artwork {} as sold, treating as concurrent update",
                artwork_id
            );
            return Ok(MarkSoldOutcome::Conflict);
        }

        if !status.is_success() {
            error!("Sanity mutation error: status={}, body={}", status, text);
            return Err(store_error(status, &text));
        }

        info!("Artwork {} marked as sold", artwork_id);
        Ok(MarkSoldOutcome::Updated)
    }
}
