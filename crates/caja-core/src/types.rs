//! # Domain Types
//!
//! Core domain types shared by the ledger, the catalog client and the
//! presentation layer.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    LineItem     │   │ SummarySnapshot │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │──►│  product_id     │──►│  total          │       │
//! │  │  barcode        │   │  unit_price     │   │  item_count     │       │
//! │  │  unit_price     │   │  stock_available│   │  invalid_count  │       │
//! │  │  stock_available│   │  quantity       │   │  has_entries    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  ProductSelected  (search/modal ──► ledger)                            │
//! │                                                                         │
//! │  SubmissionLine   (ledger ──► form field JSON: {"id", "cantidad"})     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Guarani;

// =============================================================================
// Product Id
// =============================================================================

/// Opaque product identifier.
///
/// The catalog hands out numeric ids; string ids are accepted as well so the
/// ledger does not care which backend it is fed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum ProductId {
    Numeric(i64),
    Code(String),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Numeric(id) => write!(f, "{}", id),
            ProductId::Code(code) => f.write_str(code),
        }
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        ProductId::Numeric(id)
    }
}

impl From<&str> for ProductId {
    fn from(code: &str) -> Self {
        ProductId::Code(code.to_string())
    }
}

impl From<String> for ProductId {
    fn from(code: String) -> Self {
        ProductId::Code(code)
    }
}

impl std::str::FromStr for ProductId {
    type Err = std::convert::Infallible;

    /// Numeric text becomes a numeric id, anything else is kept verbatim.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(s.parse::<i64>()
            .map(ProductId::Numeric)
            .unwrap_or_else(|_| ProductId::Code(s.to_string())))
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product as returned by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    pub id: ProductId,

    /// Barcode the cashier scans or types.
    pub barcode: String,

    /// Display name shown in the table and in error messages.
    pub name: String,

    pub unit_price: Guarani,

    /// Units available at lookup time.
    pub stock_available: i64,

    #[serde(default)]
    pub category: String,
}

impl Product {
    /// Checks if at least one unit can be sold.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.stock_available > 0
    }
}

// =============================================================================
// Product Selected
// =============================================================================

/// Product-selection notification.
///
/// The only thing the search box and the search modal hand to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSelected {
    pub product: Product,
}

impl ProductSelected {
    pub fn new(product: Product) -> Self {
        ProductSelected { product }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One product in the current sale.
///
/// Name, barcode and price are copied from the product when the line is
/// created; `stock_available` takes the catalog's stock on every successful
/// increment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    pub product_id: ProductId,
    pub barcode: String,
    pub name: String,
    pub unit_price: Guarani,
    pub stock_available: i64,
    pub quantity: i64,
}

impl LineItem {
    /// Creates a line with quantity 1.
    pub fn from_product(product: &Product) -> Self {
        LineItem {
            product_id: product.id.clone(),
            barcode: product.barcode.clone(),
            name: product.name.clone(),
            unit_price: product.unit_price,
            stock_available: product.stock_available,
            quantity: 1,
        }
    }

    /// Unit price × quantity.
    #[inline]
    pub fn subtotal(&self) -> Guarani {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// Checks `1 <= quantity <= stock_available`.
    #[inline]
    pub fn is_within_bounds(&self) -> bool {
        self.quantity >= 1 && self.quantity <= self.stock_available
    }
}

// =============================================================================
// Summary Snapshot
// =============================================================================

/// Aggregate view of the ledger, recomputed on every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SummarySnapshot {
    /// Σ unit_price × quantity.
    pub total: Guarani,
    /// Σ quantity.
    pub item_count: i64,
    /// Lines whose stock ceiling is zero or below.
    pub out_of_stock_count: usize,
    /// Lines whose quantity is outside `[1, stock_available]`.
    pub invalid_count: usize,
    pub has_entries: bool,
}

// =============================================================================
// Submission Line
// =============================================================================

/// One `{productId, quantity}` pair of the submitted sale.
///
/// Serialized with the field names the sales endpoint reads from the hidden
/// form field: `{"id": 1, "cantidad": 2}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmissionLine {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    #[serde(rename = "cantidad")]
    pub quantity: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_parsing() {
        assert_eq!("42".parse::<ProductId>().unwrap(), ProductId::Numeric(42));
        assert_eq!(
            " ABC-1 ".parse::<ProductId>().unwrap(),
            ProductId::Code("ABC-1".to_string())
        );
    }

    #[test]
    fn test_product_id_untagged_json() {
        let id: ProductId = serde_json::from_str("7").unwrap();
        assert_eq!(id, ProductId::Numeric(7));

        let id: ProductId = serde_json::from_str("\"sku-7\"").unwrap();
        assert_eq!(id, ProductId::Code("sku-7".to_string()));
    }

    #[test]
    fn test_line_item_subtotal_and_bounds() {
        let product = Product {
            id: ProductId::from(1),
            barcode: "7840001".to_string(),
            name: "Widget".to_string(),
            unit_price: Guarani::from_units(1_000),
            stock_available: 3,
            category: String::new(),
        };
        let mut line = LineItem::from_product(&product);
        assert_eq!(line.quantity, 1);
        assert_eq!(line.subtotal().units(), 1_000);
        assert!(line.is_within_bounds());

        line.quantity = 4;
        assert!(!line.is_within_bounds());
    }

    #[test]
    fn test_submission_line_field_names() {
        let line = SubmissionLine {
            product_id: ProductId::from(3),
            quantity: 2,
        };
        assert_eq!(
            serde_json::to_string(&line).unwrap(),
            r#"{"id":3,"cantidad":2}"#
        );
    }
}
