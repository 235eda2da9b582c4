//! # Barcode Scanner Input
//!
//! The barcode box of the sale screen: type-ahead suggestions while typing,
//! a preview card when a code is picked, and the Enter-key scan that hands
//! a product to the ledger.
//!
//! ## Scan Outcomes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           scan(code)                                    │
//! │                                                                         │
//! │  ""                      ──► EmptyCode                                 │
//! │  malformed code          ──► NotFound("Producto no encontrado o ...")  │
//! │  server: success=false   ──► NotFound(server message or fallback)      │
//! │  server: stock <= 0      ──► OutOfStock(name)                          │
//! │  network / bad payload   ──► Catalog(err)                              │
//! │  otherwise               ──► Ok(ProductSelected)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use caja_core::validation::{validate_barcode, validate_search_query};
use caja_core::{Product, ProductSelected};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::client::ProductCatalog;
use crate::error::CatalogError;
use crate::latest::{Debouncer, LatestOnly};
use crate::protocol::{LookupResult, Suggestion};

/// Shown when the server gives no message for a missing product.
pub const NOT_FOUND_FALLBACK: &str = "Producto no encontrado o código inválido.";

// =============================================================================
// Scan Errors
// =============================================================================

/// Why a scan did not produce a product.
///
/// The display text is what the cashier sees under the barcode box.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Por favor, ingrese un código de barras.")]
    EmptyCode,

    #[error("{0}")]
    NotFound(String),

    #[error("'{name}' no tiene stock disponible.")]
    OutOfStock { name: String },

    #[error("Error al conectar con el servidor.")]
    Catalog(#[from] CatalogError),
}

impl ScanError {
    /// Whether the barcode box should be emptied after this error.
    ///
    /// Network failures keep the code so the cashier can press Enter again.
    pub fn clears_input(&self) -> bool {
        matches!(self, ScanError::NotFound(_) | ScanError::OutOfStock { .. })
    }
}

/// State of the preview card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    Hidden,
    Shown(Product),
}

// =============================================================================
// Code Scanner
// =============================================================================

/// Barcode input backed by a [`ProductCatalog`].
pub struct CodeScanner {
    catalog: Arc<dyn ProductCatalog>,
    autocomplete: Debouncer,
    preview_requests: LatestOnly,
    current: Mutex<Option<Product>>,
}

impl CodeScanner {
    pub fn new(catalog: Arc<dyn ProductCatalog>, debounce: Duration) -> Self {
        CodeScanner {
            catalog,
            autocomplete: Debouncer::new(debounce),
            preview_requests: LatestOnly::new(),
            current: Mutex::new(None),
        }
    }

    /// Autocomplete entries for the text typed so far.
    ///
    /// Empty input clears the list immediately and drops any pending
    /// request. Otherwise the request is debounced; `None` means a newer
    /// keystroke superseded this one and the list must be left as is.
    /// Failures are logged and yield an empty list.
    pub async fn suggestions(&self, input: &str) -> Option<Vec<Suggestion>> {
        let query = match validate_search_query(input) {
            Ok(query) if !query.is_empty() => query,
            Ok(_) => {
                self.autocomplete.cancel();
                return Some(Vec::new());
            }
            Err(e) => {
                debug!(error = %e, "Autocomplete query rejected");
                self.autocomplete.cancel();
                return Some(Vec::new());
            }
        };

        let result = self
            .autocomplete
            .run(|| self.catalog.suggest(&query))
            .await?;

        Some(result.unwrap_or_else(|e| {
            warn!(query = %query, error = %e, "Autocomplete request failed");
            Vec::new()
        }))
    }

    /// Preview card for a picked code.
    ///
    /// Misses and failures hide the card. `None` means a newer preview
    /// request superseded this one.
    pub async fn preview(&self, input: &str) -> Option<Preview> {
        let ticket = self.preview_requests.issue();

        let Ok(code) = validate_barcode(input) else {
            self.set_current(None);
            return Some(Preview::Hidden);
        };

        let outcome = self.catalog.lookup(&code).await;
        if !ticket.is_current() {
            debug!(code = %code, "Discarding stale preview");
            return None;
        }

        let preview = match outcome {
            Ok(LookupResult::Found(product)) => Preview::Shown(product),
            Ok(LookupResult::NotFound { .. }) => Preview::Hidden,
            Err(e) => {
                warn!(code = %code, error = %e, "Preview request failed");
                Preview::Hidden
            }
        };

        self.set_current(match &preview {
            Preview::Shown(product) => Some(product.clone()),
            Preview::Hidden => None,
        });
        Some(preview)
    }

    /// Product currently on the preview card.
    pub fn current_preview(&self) -> Option<Product> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Hides the preview card and drops any preview still in flight.
    pub fn clear_preview(&self) {
        self.preview_requests.invalidate();
        self.set_current(None);
    }

    /// Looks up `input` and, if it can be sold, emits the selection.
    pub async fn scan(&self, input: &str) -> Result<ProductSelected, ScanError> {
        if input.trim().is_empty() {
            return Err(ScanError::EmptyCode);
        }

        let code = validate_barcode(input).map_err(|e| {
            debug!(error = %e, "Malformed barcode");
            ScanError::NotFound(NOT_FOUND_FALLBACK.to_string())
        })?;

        match self.catalog.lookup(&code).await? {
            LookupResult::Found(product) if !product.in_stock() => {
                info!(code = %code, name = %product.name, "Scanned product has no stock");
                Err(ScanError::OutOfStock { name: product.name })
            }
            LookupResult::Found(product) => {
                info!(code = %code, id = %product.id, "Product scanned");
                self.clear_preview();
                Ok(ProductSelected::new(product))
            }
            LookupResult::NotFound { message } => {
                info!(code = %code, "Scanned code not found");
                Err(ScanError::NotFound(
                    message.unwrap_or_else(|| NOT_FOUND_FALLBACK.to_string()),
                ))
            }
        }
    }

    fn set_current(&self, product: Option<Product>) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = product;
    }
}

impl std::fmt::Debug for CodeScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeScanner")
            .field("debounce", &self.autocomplete.delay())
            .field("current", &self.current_preview())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryCatalog;
    use caja_core::ProductId;

    fn scanner_with(catalog: Arc<InMemoryCatalog>) -> CodeScanner {
        CodeScanner::new(catalog, Duration::from_millis(300))
    }

    #[tokio::test(start_paused = true)]
    async fn test_scan_in_stock_product() {
        let scanner = scanner_with(Arc::new(InMemoryCatalog::demo()));
        let selected = scanner.scan(" 7840002 ").await.unwrap();
        assert_eq!(selected.product.id, ProductId::from(2));
        assert_eq!(selected.product.name, "Gaseosa cola 2L");
    }

    #[tokio::test(start_paused = true)]
    async fn test_scan_errors_and_messages() {
        let catalog = Arc::new(InMemoryCatalog::demo());
        let scanner = scanner_with(Arc::clone(&catalog));

        let err = scanner.scan("   ").await.unwrap_err();
        assert!(matches!(err, ScanError::EmptyCode));
        assert_eq!(err.to_string(), "Por favor, ingrese un código de barras.");
        assert!(!err.clears_input());

        let err = scanner.scan("7840007").await.unwrap_err();
        assert_eq!(err.to_string(), "'Chipa (docena)' no tiene stock disponible.");
        assert!(err.clears_input());

        let err = scanner.scan("0000000").await.unwrap_err();
        assert_eq!(err.to_string(), "Producto no encontrado");

        let err = scanner.scan("78 40").await.unwrap_err();
        assert_eq!(err.to_string(), NOT_FOUND_FALLBACK);

        catalog.set_offline(true);
        let err = scanner.scan("7840001").await.unwrap_err();
        assert_eq!(err.to_string(), "Error al conectar con el servidor.");
        assert!(!err.clears_input());
    }

    #[tokio::test(start_paused = true)]
    async fn test_suggestions_empty_input_skips_request() {
        let catalog = Arc::new(InMemoryCatalog::demo());
        let scanner = scanner_with(Arc::clone(&catalog));

        assert_eq!(scanner.suggestions("  ").await, Some(Vec::new()));
        assert_eq!(catalog.request_count(), 0);

        let list = scanner.suggestions("7840005").await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "Leche entera 1L");
        assert_eq!(catalog.request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_suggestions_typing_burst_sends_one_request() {
        let catalog = Arc::new(InMemoryCatalog::demo());
        let scanner = scanner_with(Arc::clone(&catalog));

        let first = scanner.suggestions("7");
        let second = async {
            tokio::time::sleep(Duration::from_millis(120)).await;
            scanner.suggestions("78").await
        };
        let third = async {
            tokio::time::sleep(Duration::from_millis(240)).await;
            scanner.suggestions("7840008").await
        };

        let (a, b, c) = tokio::join!(first, second, third);
        assert_eq!(a, None);
        assert_eq!(b, None);
        assert_eq!(c.unwrap()[0].barcode, "7840008");
        assert_eq!(catalog.request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_suggestions_failure_yields_empty_list() {
        let catalog = Arc::new(InMemoryCatalog::demo());
        catalog.set_offline(true);
        let scanner = scanner_with(catalog);
        assert_eq!(scanner.suggestions("784").await, Some(Vec::new()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_preview_shows_and_hides() {
        let catalog = Arc::new(InMemoryCatalog::demo());
        let scanner = scanner_with(Arc::clone(&catalog));

        let preview = scanner.preview("7840003").await.unwrap();
        assert!(matches!(preview, Preview::Shown(ref p) if p.name == "Yerba mate 500g"));
        assert!(scanner.current_preview().is_some());

        assert_eq!(scanner.preview("9999").await, Some(Preview::Hidden));
        assert!(scanner.current_preview().is_none());

        assert_eq!(scanner.preview("").await, Some(Preview::Hidden));

        catalog.set_offline(true);
        assert_eq!(scanner.preview("7840003").await, Some(Preview::Hidden));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_preview_is_discarded() {
        let catalog =
            Arc::new(InMemoryCatalog::demo().with_latency(Duration::from_millis(200)));
        let scanner = scanner_with(catalog);

        let first = scanner.preview("7840001");
        let second = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            scanner.preview("7840002").await
        };

        let (first, second) = tokio::join!(first, second);
        assert_eq!(first, None);
        assert!(matches!(second, Some(Preview::Shown(ref p)) if p.barcode == "7840002"));
        assert_eq!(
            scanner.current_preview().map(|p| p.barcode),
            Some("7840002".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_scan_clears_preview() {
        let scanner = scanner_with(Arc::new(InMemoryCatalog::demo()));
        scanner.preview("7840001").await;
        assert!(scanner.current_preview().is_some());

        scanner.scan("7840001").await.unwrap();
        assert!(scanner.current_preview().is_none());
    }
}
