//! # Summary Panel
//!
//! Right-hand side of the sale screen. Subscribed to the ledger, it redraws
//! its view from every [`SummarySnapshot`] it receives.
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │  TOTAL            ₲2.000             │
//! │  dos mil guaraníes                   │
//! │  Ítems: 2   Sin stock: 0   Errores: 0│
//! │  [ Registrar venta ]                 │
//! └──────────────────────────────────────┘
//! ```

use caja_core::{LedgerListener, SummarySnapshot};
use std::sync::{Mutex, PoisonError};
use tracing::warn;

pub const SUBMIT_READY: &str = "Registrar venta";
pub const SUBMIT_BLOCKED: &str = "Debe agregar al menos un producto";

/// Rendered state of the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub total: String,
    pub total_words: String,
    pub item_count: i64,
    pub out_of_stock_count: usize,
    pub error_count: usize,
    pub submit_enabled: bool,
    pub submit_title: &'static str,
}

impl PanelView {
    pub fn from_snapshot(snapshot: &SummarySnapshot) -> Self {
        let total_words = snapshot.total.in_words().unwrap_or_else(|e| {
            warn!(error = %e, "Total cannot be spelled");
            String::new()
        });

        PanelView {
            total: snapshot.total.to_string(),
            total_words,
            item_count: snapshot.item_count,
            out_of_stock_count: snapshot.out_of_stock_count,
            error_count: snapshot.invalid_count,
            submit_enabled: snapshot.has_entries,
            submit_title: if snapshot.has_entries {
                SUBMIT_READY
            } else {
                SUBMIT_BLOCKED
            },
        }
    }
}

impl Default for PanelView {
    fn default() -> Self {
        PanelView::from_snapshot(&SummarySnapshot::default())
    }
}

/// Ledger listener holding the latest [`PanelView`].
#[derive(Debug)]
pub struct SummaryPanel {
    show_words: bool,
    view: Mutex<PanelView>,
}

impl SummaryPanel {
    pub fn new(show_words: bool) -> Self {
        SummaryPanel {
            show_words,
            view: Mutex::new(PanelView::default()),
        }
    }

    pub fn view(&self) -> PanelView {
        self.view
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn render(&self) -> String {
        let view = self.view();
        let mut out = format!("TOTAL  {}\n", view.total);
        if self.show_words && !view.total_words.is_empty() {
            out.push_str(&format!("       {}\n", view.total_words));
        }
        out.push_str(&format!(
            "Ítems: {}   Sin stock: {}   Errores: {}\n",
            view.item_count, view.out_of_stock_count, view.error_count
        ));
        if view.submit_enabled {
            out.push_str(&format!("[ {} ]", view.submit_title));
        } else {
            out.push_str(&format!("[ {} ] (deshabilitado)", view.submit_title));
        }
        out
    }
}

impl LedgerListener for SummaryPanel {
    fn summary_changed(&self, snapshot: &SummarySnapshot) {
        *self.view.lock().unwrap_or_else(PoisonError::into_inner) =
            PanelView::from_snapshot(snapshot);
    }
}
