//! # caja-core: Pure Business Logic for the Caja sale screen
//!
//! Everything the sale screen computes lives here, as plain functions and
//! owned data with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Caja POS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               Presentation (apps/terminal)                      │   │
//! │  │    Search box ──► Sales table ──► Summary panel ──► Submit      │   │
//! │  └──────────────┬──────────────────────────────▲───────────────────┘   │
//! │                 │ ProductSelected              │ LedgerListener         │
//! │  ┌──────────────▼──────────────────────────────┴───────────────────┐   │
//! │  │               ★ caja-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  ledger   │  │   words   │  │   money   │  │ validation│  │   │
//! │  │   │  Ledger   │  │ spell_    │  │  Guarani  │  │   form    │  │   │
//! │  │   │ Snapshot  │  │ amount    │  │           │  │   rules   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO TIMERS                              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                 ▲                                                       │
//! │  ┌──────────────┴──────────────────────────────────────────────────┐   │
//! │  │              caja-catalog (HTTP product lookups)                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`ledger`] - Line items of the current sale, summary broadcasts
//! - [`words`] - Amount-to-words converter (Spanish, guaraníes)
//! - [`money`] - `Guarani` integer money type
//! - [`types`] - Product, LineItem, SummarySnapshot, SubmissionLine
//! - [`validation`] - Barcode / query / price checks
//! - [`form`] - Rule-based form validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use caja_core::{Guarani, Ledger, Product, ProductId};
//!
//! let widget = Product {
//!     id: ProductId::from(1),
//!     barcode: "7840001".to_string(),
//!     name: "Widget".to_string(),
//!     unit_price: Guarani::from_units(1_000),
//!     stock_available: 3,
//!     category: String::new(),
//! };
//!
//! let mut ledger = Ledger::new();
//! ledger.add_or_increment(&widget).unwrap();
//! ledger.add_or_increment(&widget).unwrap();
//!
//! let summary = ledger.snapshot();
//! assert_eq!(summary.total.units(), 2_000);
//! assert_eq!(summary.total.in_words().unwrap(), "dos mil guaraníes");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod form;
pub mod ledger;
pub mod money;
pub mod types;
pub mod validation;
pub mod words;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::{AddOutcome, Ledger, LedgerListener, NoOpListener, QuantityChange};
pub use money::Guarani;
pub use types::*;
pub use words::{spell_amount, MAX_SPELLABLE};
