//! # In-Memory Catalog
//!
//! A [`ProductCatalog`] over a fixed product list. Backs the terminal's
//! `--demo` mode and the scanner, modal and session tests.
//!
//! Matching follows the inventory server:
//! - suggestions: barcode contains the query, at most 10
//! - lookup: exact barcode
//! - search: name contains the query, case-insensitive

use async_trait::async_trait;
use caja_core::{Guarani, Product, ProductId};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use crate::client::ProductCatalog;
use crate::error::{CatalogError, CatalogResult};
use crate::protocol::{LookupResult, Suggestion};

/// Most suggestions returned per query.
pub const MAX_SUGGESTIONS: usize = 10;

/// Fixed product list with optional latency and a failure switch.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
    latency: Duration,
    offline: AtomicBool,
    requests: AtomicUsize,
}

impl InMemoryCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        InMemoryCatalog {
            products,
            ..Default::default()
        }
    }

    /// A small store: beverages, groceries, one item with no stock.
    pub fn demo() -> Self {
        let rows: [(i64, &str, &str, i64, i64, &str); 8] = [
            (1, "7840001", "Agua mineral 500ml", 3_500, 48, "Bebidas"),
            (2, "7840002", "Gaseosa cola 2L", 12_000, 24, "Bebidas"),
            (3, "7840003", "Yerba mate 500g", 15_500, 30, "Almacén"),
            (4, "7840004", "Galletitas de agua", 6_000, 12, "Almacén"),
            (5, "7840005", "Leche entera 1L", 7_500, 3, "Lácteos"),
            (6, "7840006", "Queso Paraguay 1kg", 45_000, 5, "Lácteos"),
            (7, "7840007", "Chipa (docena)", 20_000, 0, "Panadería"),
            (8, "7840008", "Pan felipe", 1_000, 60, "Panadería"),
        ];

        Self::new(
            rows.into_iter()
                .map(|(id, barcode, name, price, stock, category)| Product {
                    id: ProductId::from(id),
                    barcode: barcode.to_string(),
                    name: name.to_string(),
                    unit_price: Guarani::from_units(price),
                    stock_available: stock,
                    category: category.to_string(),
                })
                .collect(),
        )
    }

    /// Delays every response by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// While offline, every request fails with a connection error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    async fn begin_request(&self) -> CatalogResult<()> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(CatalogError::ConnectionFailed(
                "catalog is offline".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductCatalog for InMemoryCatalog {
    async fn suggest(&self, query: &str) -> CatalogResult<Vec<Suggestion>> {
        self.begin_request().await?;
        Ok(self
            .products
            .iter()
            .filter(|p| p.barcode.contains(query))
            .take(MAX_SUGGESTIONS)
            .map(|p| Suggestion {
                id: p.id.clone(),
                barcode: p.barcode.clone(),
                name: p.name.clone(),
            })
            .collect())
    }

    async fn lookup(&self, code: &str) -> CatalogResult<LookupResult> {
        self.begin_request().await?;
        Ok(match self.products.iter().find(|p| p.barcode == code) {
            Some(product) => LookupResult::Found(product.clone()),
            None => LookupResult::NotFound {
                message: Some("Producto no encontrado".to_string()),
            },
        })
    }

    async fn search(&self, query: &str) -> CatalogResult<Vec<Product>> {
        self.begin_request().await?;
        let needle = query.to_lowercase();
        Ok(self
            .products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}
