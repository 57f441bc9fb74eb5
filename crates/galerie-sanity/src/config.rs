//! # Sanity Configuration
//!
//! Configuration for the Sanity Content Lake HTTP API.
//! All values are loaded from environment variables.

use galerie_core::GalleryError;
use std::env;

/// Sanity API configuration
#[derive(Debug, Clone)]
pub struct SanityConfig {
    /// Project ID (e.g., "abc12345")
    pub project_id: String,

    /// Dataset name (e.g., "production")
    pub dataset: String,

    /// API version date (e.g., "2024-01-01")
    pub api_version: String,

    /// Write token, required for mutations only
    pub token: Option<String>,

    /// Serve reads from the CDN edge (stale by up to a minute, much faster)
    pub use_cdn: bool,

    /// Explicit base URL override (for testing/mocking)
    pub api_base_url: Option<String>,
}

impl SanityConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `SANITY_PROJECT_ID`
    /// - `SANITY_DATASET`
    ///
    /// Optional:
    /// - `SANITY_API_TOKEN` (required only for the availability mutation)
    pub fn from_env() -> Result<Self, GalleryError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let project_id = env::var("SANITY_PROJECT_ID")
            .map_err(|_| GalleryError::Configuration("SANITY_PROJECT_ID not set".to_string()))?;

        let dataset = env::var("SANITY_DATASET")
            .map_err(|_| GalleryError::Configuration("SANITY_DATASET not set".to_string()))?;

        let token = env::var("SANITY_API_TOKEN").ok();

        Ok(Self {
            project_id,
            dataset,
            api_version: "2024-01-01".to_string(),
            token,
            use_cdn: true,
            api_base_url: None,
        })
    }

    /// Create config with explicit values (for testing)
    pub fn new(
        project_id: impl Into<String>,
        dataset: impl Into<String>,
        token: Option<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: dataset.into(),
            api_version: "2024-01-01".to_string(),
            token,
            use_cdn: true,
            api_base_url: None,
        }
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Builder: disable the CDN (reads hit the live dataset)
    pub fn without_cdn(mut self) -> Self {
        self.use_cdn = false;
        self
    }

    /// Base URL for read queries. The CDN host serves cached reads; the
    /// mutation endpoint always uses the live API host.
    pub fn query_base_url(&self) -> String {
        if let Some(url) = &self.api_base_url {
            return url.clone();
        }
        let host = if self.use_cdn {
            "apicdn.sanity.io"
        } else {
            "api.sanity.io"
        };
        format!("https://{}.{}", self.project_id, host)
    }

    /// Base URL for mutations (never the CDN)
    pub fn mutate_base_url(&self) -> String {
        if let Some(url) = &self.api_base_url {
            return url.clone();
        }
        format!("https://{}.api.sanity.io", self.project_id)
    }

    /// Full query endpoint URL
    pub fn query_url(&self) -> String {
        format!(
            "{}/v{}/data/query/{}",
            self.query_base_url(),
            self.api_version,
            self.dataset
        )
    }

    /// Full mutation endpoint URL
    pub fn mutate_url(&self) -> String {
        format!(
            "{}/v{}/data/mutate/{}",
            self.mutate_base_url(),
            self.api_version,
            self.dataset
        )
    }

    /// Whether mutations are possible (a write token is configured)
    pub fn can_mutate(&self) -> bool {
        self.token.is_some()
    }
}
