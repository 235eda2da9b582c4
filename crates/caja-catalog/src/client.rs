//! # Product Catalog Client
//!
//! The [`ProductCatalog`] trait is the seam between the sale screen and the
//! inventory server. [`HttpCatalog`] implements it over HTTP; tests and the
//! offline demo use [`crate::memory::InMemoryCatalog`].
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        HttpCatalog Request                              │
//! │                                                                         │
//! │  endpoint(path) ──► GET ──► status 2xx? ──► JSON body ──► core types   │
//! │                              │                                          │
//! │                              └── no ──► CatalogError::HttpStatus        │
//! │                                                                         │
//! │  No retries. A failed request is reported once and the cashier          │
//! │  scans again.                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use caja_core::Product;
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::{debug, warn};
use url::Url;

use crate::config::CatalogConfig;
use crate::error::{CatalogError, CatalogResult};
use crate::protocol::{LookupResponse, LookupResult, SearchResponse, Suggestion};

// =============================================================================
// Catalog Trait
// =============================================================================

/// Read-only access to the product catalog.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Autocomplete entries whose barcode contains `query`.
    async fn suggest(&self, query: &str) -> CatalogResult<Vec<Suggestion>>;

    /// Exact barcode lookup.
    async fn lookup(&self, code: &str) -> CatalogResult<LookupResult>;

    /// Products whose name matches `query`.
    async fn search(&self, query: &str) -> CatalogResult<Vec<Product>>;
}

// =============================================================================
// HTTP Implementation
// =============================================================================

/// [`ProductCatalog`] backed by the inventory server's JSON endpoints.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: reqwest::Client,
    config: CatalogConfig,
}

impl HttpCatalog {
    /// Builds a client with the configured request timeout.
    pub fn new(config: CatalogConfig) -> CatalogResult<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(HttpCatalog { client, config })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Joins the base URL and an endpoint path, keeping any prefix the base
    /// URL already carries.
    fn endpoint(&self, path: &str) -> CatalogResult<Url> {
        let base = self.config.base_url.trim_end_matches('/');
        Ok(Url::parse(&format!("{}{}", base, path))?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> CatalogResult<T> {
        let started = Instant::now();
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            warn!(%url, error = %e, "Catalog request failed");
            CatalogError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%url, status = status.as_u16(), "Catalog returned an error status");
            return Err(CatalogError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.json::<T>().await?;
        debug!(%url, elapsed_ms = started.elapsed().as_millis() as u64, "Catalog request done");
        Ok(body)
    }
}

#[async_trait]
impl ProductCatalog for HttpCatalog {
    async fn suggest(&self, query: &str) -> CatalogResult<Vec<Suggestion>> {
        let mut url = self.endpoint(&self.config.suggestions_path)?;
        url.query_pairs_mut().append_pair("q", query);
        self.get_json(url).await
    }

    async fn lookup(&self, code: &str) -> CatalogResult<LookupResult> {
        let mut url = self.endpoint(&self.config.lookup_path)?;
        url.path_segments_mut()
            .map_err(|_| CatalogError::InvalidUrl(self.config.base_url.clone()))?
            .pop_if_empty()
            .push(code);

        let response: LookupResponse = self.get_json(url).await?;
        LookupResult::try_from(response)
    }

    async fn search(&self, query: &str) -> CatalogResult<Vec<Product>> {
        let mut url = self.endpoint(&self.config.search_path)?;
        url.query_pairs_mut().append_pair("q", query);

        let response: SearchResponse = self.get_json(url).await?;
        response.into_products()
    }
}
