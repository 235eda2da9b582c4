//! # Validation Module
//!
//! Input checks run before the catalog is queried or a value reaches the
//! ledger.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Input box (this module)                                      │
//! │  ├── Empty barcode, too-short modal query                              │
//! │  └── Immediate feedback, no request sent                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Ledger                                                        │
//! │  ├── Quantity clamping, stock ceiling                                  │
//! │  └── Submission gate                                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Sales endpoint (external)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use caja_core::validation::{validate_barcode, validate_modal_query};
//!
//! assert_eq!(validate_barcode("  7840001 ").unwrap(), "7840001");
//! assert!(validate_modal_query("a").is_err());
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Minimum characters before the search modal queries the catalog.
pub const MIN_MODAL_QUERY_LEN: usize = 2;

/// Longest query accepted by any search box.
pub const MAX_QUERY_LEN: usize = 100;

/// Highest unit price accepted from the catalog, in guaraníes.
pub const MAX_PRICE: i64 = 1_000_000_000_000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a scanned or typed barcode.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 50 characters
/// - No inner whitespace
///
/// ## Returns
/// The trimmed barcode.
pub fn validate_barcode(code: &str) -> ValidationResult<String> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "codigo_barras".to_string(),
        });
    }

    if code.chars().count() > 50 {
        return Err(ValidationError::TooLong {
            field: "codigo_barras".to_string(),
            max: 50,
        });
    }

    if code.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "codigo_barras".to_string(),
            reason: "must not contain spaces".to_string(),
        });
    }

    Ok(code.to_string())
}

/// Validates an autocomplete query.
///
/// ## Rules
/// - Can be empty (clears suggestions)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

/// Validates a search-modal query.
///
/// ## Rules
/// - At least 2 characters after trimming
/// - Maximum 100 characters
pub fn validate_modal_query(query: &str) -> ValidationResult<String> {
    let query = validate_search_query(query)?;

    if query.chars().count() < MIN_MODAL_QUERY_LEN {
        return Err(ValidationError::TooShort {
            field: "query".to_string(),
            min: MIN_MODAL_QUERY_LEN,
        });
    }

    Ok(query)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit price in guaraníes.
///
/// Zero is allowed (free items). Negative prices and prices above
/// [`MAX_PRICE`] are not.
pub fn validate_price(units: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE).contains(&units) {
        return Err(ValidationError::OutOfRange {
            field: "precio".to_string(),
            min: 0,
            max: MAX_PRICE,
        });
    }

    Ok(())
}

/// Parses the text of a quantity input.
///
/// Reads an optional sign and the leading digits, ignoring whatever follows
/// (`"12abc"` → 12, `"2.5"` → 2). Text with no leading digits reads as 0,
/// which the ledger then clamps to 1. Digit runs too long for `i64` saturate.
pub fn parse_quantity_input(raw: &str) -> i64 {
    let raw = raw.trim_start();
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };

    let magnitude = digits
        .chars()
        .map_while(|c| c.to_digit(10))
        .fold(0i64, |acc, d| {
            acc.saturating_mul(10).saturating_add(i64::from(d))
        });

    if negative {
        -magnitude
    } else {
        magnitude
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
