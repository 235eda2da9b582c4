//! # caja-catalog: Product Lookups for the Caja sale screen
//!
//! Everything the sale screen asks the inventory server: autocomplete,
//! barcode lookup and search by name. The only thing handed on to the
//! ledger is a [`caja_core::ProductSelected`].
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Catalog Architecture                              │
//! │                                                                         │
//! │   barcode box                          search modal                     │
//! │  ┌────────────────┐                   ┌────────────────┐               │
//! │  │  CodeScanner   │                   │  SearchModal   │               │
//! │  │  suggestions   │                   │  search        │               │
//! │  │  preview       │                   │  select        │               │
//! │  │  scan          │                   │                │               │
//! │  └───────┬────────┘                   └───────┬────────┘               │
//! │          │        Debouncer / LatestOnly      │                         │
//! │          └──────────────┬─────────────────────┘                         │
//! │                         ▼                                               │
//! │              dyn ProductCatalog                                         │
//! │            ┌────────────┴────────────┐                                  │
//! │            ▼                         ▼                                  │
//! │      HttpCatalog               InMemoryCatalog                          │
//! │      (reqwest)                 (demo mode, tests)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`client`] - `ProductCatalog` trait and the HTTP implementation
//! - [`config`] - `[catalog]` configuration section
//! - [`error`] - Catalog error types
//! - [`latest`] - Debounce and latest-only request guards
//! - [`memory`] - In-memory catalog
//! - [`modal`] - Search-by-name modal
//! - [`protocol`] - Wire DTOs
//! - [`scanner`] - Barcode box: autocomplete, preview, scan

pub mod client;
pub mod config;
pub mod error;
pub mod latest;
pub mod memory;
pub mod modal;
pub mod protocol;
pub mod scanner;

pub use client::{HttpCatalog, ProductCatalog};
pub use config::CatalogConfig;
pub use error::{CatalogError, CatalogResult};
pub use latest::{Debouncer, LatestOnly, Ticket};
pub use memory::InMemoryCatalog;
pub use modal::{ModalState, SearchModal, SelectError};
pub use protocol::{LookupResult, Suggestion};
pub use scanner::{CodeScanner, Preview, ScanError};
