//! # Error Types
//!
//! Domain-specific error types for caja-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  caja-core errors (this file)                                          │
//! │  ├── CoreError        - Ledger and converter failures                  │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  caja-catalog errors (separate crate)                                  │
//! │  └── CatalogError     - Transport / decode failures                    │
//! │                                                                         │
//! │  terminal (app)                                                        │
//! │  └── UserMessage      - What the cashier sees (Spanish text + code)    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → UserMessage → screen              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these are fatal: every failure leaves the ledger unchanged and
//! still consistent.

use thiserror::Error;

use crate::types::ProductId;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Product id is not in the ledger.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Incrementing a line would exceed the available stock.
    ///
    /// ## User Workflow
    /// ```text
    /// Scan "Widget" (stock: 1, already in ledger with qty 1)
    ///      │
    ///      ▼
    /// StockExceeded { name: "Widget", available: 1 }
    ///      │
    ///      ▼
    /// UI shows: "No hay suficiente stock para 'Widget'. Disponible: 1"
    /// ```
    #[error("Insufficient stock for {name}: available {available}")]
    StockExceeded { name: String, available: i64 },

    /// A product with no stock cannot start a new line.
    #[error("{name} has no stock available")]
    OutOfStock { name: String },

    /// Submission attempted with no lines.
    #[error("Ledger is empty")]
    LedgerEmpty,

    /// A line's quantity is outside `[1, stock]`.
    #[error("Line {name} out of bounds: quantity {quantity}, stock {stock}")]
    LineOutOfBounds {
        name: String,
        quantity: i64,
        stock: i64,
    },

    /// The converter only spells amounts up to its thousands band.
    #[error("Amount {amount} cannot be spelled (maximum {max})")]
    AmountOutOfRange { amount: i64, max: u64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation before business logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., malformed email, barcode with spaces).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
