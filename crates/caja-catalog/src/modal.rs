//! # Product Search Modal
//!
//! Search-by-name dialog. Results are listed with their stock; rows with
//! stock can be added to the sale.
//!
//! ## States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         SearchModal                                     │
//! │                                                                         │
//! │  open() ──► Initial ◄──────────── query shorter than 2 chars            │
//! │                │                                                        │
//! │                ▼ query >= 2 chars                                       │
//! │             Loading ──300ms──► GET ─┬─► Results(rows)                   │
//! │                                     ├─► NoResults                       │
//! │                                     └─► Failed                          │
//! │                                                                         │
//! │  select(id) ──► re-query by name ──► ProductSelected ──► close()        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use caja_core::validation::{validate_modal_query, MIN_MODAL_QUERY_LEN};
use caja_core::{Product, ProductId, ProductSelected};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::client::ProductCatalog;
use crate::error::CatalogError;
use crate::latest::Debouncer;

pub const NO_RESULTS_MESSAGE: &str = "No se encontraron productos que coincidan con la búsqueda.";
pub const SEARCH_FAILED_MESSAGE: &str = "Error al buscar productos.";

// =============================================================================
// Modal State
// =============================================================================

/// What the modal body currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalState {
    /// Prompt to type at least two characters.
    #[default]
    Initial,
    /// Spinner; a search is pending or in flight.
    Loading,
    Results(Vec<Product>),
    NoResults,
    Failed,
}

impl ModalState {
    /// Message line for the states that show one.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            ModalState::NoResults => Some(NO_RESULTS_MESSAGE),
            ModalState::Failed => Some(SEARCH_FAILED_MESSAGE),
            _ => None,
        }
    }

    /// Rows currently listed.
    pub fn rows(&self) -> &[Product] {
        match self {
            ModalState::Results(rows) => rows,
            _ => &[],
        }
    }
}

/// Why an "Agregar" click did not produce a product.
#[derive(Debug, Error)]
pub enum SelectError {
    #[error("El producto no está en los resultados de búsqueda.")]
    NotListed(ProductId),

    /// The row has no stock; its button is disabled.
    #[error("'{name}' no tiene stock disponible.")]
    OutOfStock { name: String },

    /// The confirming search no longer returns the product.
    #[error("Producto no encontrado o código inválido.")]
    Vanished(ProductId),

    #[error("Error al buscar productos.")]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Default)]
struct ModalInner {
    open: bool,
    state: ModalState,
}

// =============================================================================
// Search Modal
// =============================================================================

/// Search-by-name dialog backed by a [`ProductCatalog`].
pub struct SearchModal {
    catalog: Arc<dyn ProductCatalog>,
    debouncer: Debouncer,
    inner: Mutex<ModalInner>,
}

impl SearchModal {
    pub fn new(catalog: Arc<dyn ProductCatalog>, debounce: Duration) -> Self {
        SearchModal {
            catalog,
            debouncer: Debouncer::new(debounce),
            inner: Mutex::new(ModalInner::default()),
        }
    }

    /// Opens the modal in its initial state.
    pub fn open(&self) {
        self.debouncer.cancel();
        let mut inner = self.lock();
        inner.open = true;
        inner.state = ModalState::Initial;
    }

    /// Closes the modal and drops any pending search.
    pub fn close(&self) {
        self.debouncer.cancel();
        self.lock().open = false;
    }

    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    pub fn state(&self) -> ModalState {
        self.lock().state.clone()
    }

    /// Handles a change of the search text.
    ///
    /// Queries shorter than two characters reset to `Initial` without a
    /// request. Longer ones show `Loading` at once and search after the
    /// quiet period. Returns the new state, or `None` when a newer query
    /// superseded this one.
    pub async fn search(&self, input: &str) -> Option<ModalState> {
        let query = match validate_modal_query(input) {
            Ok(query) => query,
            Err(e) => {
                debug!(error = %e, min = MIN_MODAL_QUERY_LEN, "Modal query not searchable");
                self.debouncer.cancel();
                return Some(self.set_state(ModalState::Initial));
            }
        };

        self.set_state(ModalState::Loading);

        let outcome = self
            .debouncer
            .run(|| self.catalog.search(&query))
            .await?;

        let state = match outcome {
            Ok(rows) if rows.is_empty() => ModalState::NoResults,
            Ok(rows) => {
                debug!(query = %query, count = rows.len(), "Modal search results");
                ModalState::Results(rows)
            }
            Err(e) => {
                warn!(query = %query, error = %e, "Modal search failed");
                ModalState::Failed
            }
        };

        Some(self.set_state(state))
    }

    /// Handles an "Agregar" click on a listed row.
    ///
    /// The product is fetched again by name so the selection carries
    /// current stock and price. On success the modal closes.
    pub async fn select(&self, id: &ProductId) -> Result<ProductSelected, SelectError> {
        let listed = self
            .lock()
            .state
            .rows()
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| SelectError::NotListed(id.clone()))?;

        if !listed.in_stock() {
            return Err(SelectError::OutOfStock { name: listed.name });
        }

        let fresh = self
            .catalog
            .search(&listed.name)
            .await?
            .into_iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| SelectError::Vanished(id.clone()))?;

        info!(id = %fresh.id, name = %fresh.name, "Product added from search modal");
        self.close();
        Ok(ProductSelected::new(fresh))
    }

    fn set_state(&self, state: ModalState) -> ModalState {
        self.lock().state = state.clone();
        state
    }

    fn lock(&self) -> MutexGuard<'_, ModalInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SearchModal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchModal")
            .field("debounce", &self.debouncer.delay())
            .field("inner", &*self.lock())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryCatalog;

    fn modal_with(catalog: Arc<InMemoryCatalog>) -> SearchModal {
        let modal = SearchModal::new(catalog, Duration::from_millis(300));
        modal.open();
        modal
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_query_resets_without_request() {
        let catalog = Arc::new(InMemoryCatalog::demo());
        let modal = modal_with(Arc::clone(&catalog));

        assert_eq!(modal.search("a").await, Some(ModalState::Initial));
        assert_eq!(modal.search(" q ").await, Some(ModalState::Initial));
        assert_eq!(catalog.request_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_lists_results() {
        let catalog = Arc::new(InMemoryCatalog::demo());
        let modal = modal_with(Arc::clone(&catalog));

        let state = modal.search("pan").await.unwrap();
        let names: Vec<_> = state.rows().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Pan felipe"]);
        assert_eq!(modal.state(), state);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_shown_during_quiet_period() {
        let modal = modal_with(Arc::new(InMemoryCatalog::demo()));

        let search = modal.search("leche");
        let observe = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            modal.state()
        };

        let (done, during) = tokio::join!(search, observe);
        assert_eq!(during, ModalState::Loading);
        assert!(matches!(done, Some(ModalState::Results(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_results_and_failure_messages() {
        let catalog = Arc::new(InMemoryCatalog::demo());
        let modal = modal_with(Arc::clone(&catalog));

        let state = modal.search("zzz").await.unwrap();
        assert_eq!(state, ModalState::NoResults);
        assert_eq!(state.message(), Some(NO_RESULTS_MESSAGE));

        catalog.set_offline(true);
        let state = modal.search("agua").await.unwrap();
        assert_eq!(state, ModalState::Failed);
        assert_eq!(state.message(), Some("Error al buscar productos."));
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_search_keeps_newer_state() {
        let catalog = Arc::new(InMemoryCatalog::demo());
        let modal = modal_with(Arc::clone(&catalog));

        let first = modal.search("agua");
        let second = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            modal.search("queso").await
        };

        let (first, second) = tokio::join!(first, second);
        assert_eq!(first, None);
        assert_eq!(second.unwrap().rows()[0].name, "Queso Paraguay 1kg");
        assert_eq!(catalog.request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_emits_and_closes() {
        let modal = modal_with(Arc::new(InMemoryCatalog::demo()));
        modal.search("yerba").await;

        let selected = modal.select(&ProductId::from(3)).await.unwrap();
        assert_eq!(selected.product.name, "Yerba mate 500g");
        assert!(!modal.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_rejections() {
        let catalog = Arc::new(InMemoryCatalog::demo());
        let modal = modal_with(Arc::clone(&catalog));
        modal.search("chipa").await;

        let err = modal.select(&ProductId::from(7)).await.unwrap_err();
        assert_eq!(err.to_string(), "'Chipa (docena)' no tiene stock disponible.");
        assert!(modal.is_open());

        let err = modal.select(&ProductId::from(1)).await.unwrap_err();
        assert!(matches!(err, SelectError::NotListed(_)));

        modal.search("agua").await;
        catalog.set_offline(true);
        let err = modal.select(&ProductId::from(1)).await.unwrap_err();
        assert!(matches!(err, SelectError::Catalog(_)));
        assert!(modal.is_open());
    }
}
