//! # Catalog Wire Protocol
//!
//! JSON shapes returned by the inventory server, and their conversion into
//! core types.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Endpoints                                │
//! │                                                                         │
//! │  GET /inventario/sugerencias?q=784                                     │
//! │  ──► [{"id": 1, "codigo_barras": "7840001", "nombre": "Widget"}]       │
//! │                                                                         │
//! │  GET /ventas/buscar/7840001                                            │
//! │  ──► {"success": true,  "producto": {...}}                             │
//! │  ──► {"success": false, "mensaje": "Producto no encontrado"}           │
//! │                                                                         │
//! │  GET /ventas/productos/buscar?q=wid                                    │
//! │  ──► {"productos": [{...}, {...}]}                                     │
//! │                                                                         │
//! │  product record:                                                       │
//! │  {"id", "nombre", "precio": 1000.0, "stock": 3,                        │
//! │   "categoria", "codigo_barras"}                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prices travel as JSON numbers and may carry a fractional part; they are
//! rounded to whole guaraníes on the way in.

use caja_core::validation::validate_price;
use caja_core::{Guarani, Product, ProductId, ValidationError};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

// =============================================================================
// Product Record
// =============================================================================

/// A product as the server serializes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireProduct {
    pub id: ProductId,
    pub nombre: String,
    pub precio: f64,
    pub stock: i64,
    #[serde(default)]
    pub categoria: Option<String>,
    #[serde(default)]
    pub codigo_barras: Option<String>,
}

impl TryFrom<WireProduct> for Product {
    type Error = CatalogError;

    fn try_from(wire: WireProduct) -> Result<Self, Self::Error> {
        let unit_price =
            price_from_wire(wire.precio).map_err(|e| CatalogError::InvalidProduct {
                id: wire.id.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Product {
            id: wire.id,
            barcode: wire.codigo_barras.unwrap_or_default(),
            name: wire.nombre,
            unit_price,
            stock_available: wire.stock,
            category: wire.categoria.unwrap_or_default(),
        })
    }
}

/// Rounds a wire price to whole guaraníes and checks its range.
fn price_from_wire(precio: f64) -> Result<Guarani, ValidationError> {
    if !precio.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "precio".to_string(),
            reason: format!("{} is not a number", precio),
        });
    }

    // Float to int casts saturate, so anything past i64 fails the range check.
    let units = precio.round() as i64;
    validate_price(units)?;
    Ok(Guarani::from_units(units))
}

// =============================================================================
// Suggestions
// =============================================================================

/// One autocomplete entry under the barcode box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: ProductId,
    #[serde(rename = "codigo_barras")]
    pub barcode: String,
    #[serde(rename = "nombre")]
    pub name: String,
}

// =============================================================================
// Lookup
// =============================================================================

/// Body of `GET /ventas/buscar/{code}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupResponse {
    pub success: bool,
    #[serde(default)]
    pub producto: Option<WireProduct>,
    #[serde(default)]
    pub mensaje: Option<String>,
}

/// Outcome of a barcode lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResult {
    Found(Product),
    /// The server answered but has no such product; `message` is its text.
    NotFound { message: Option<String> },
}

impl TryFrom<LookupResponse> for LookupResult {
    type Error = CatalogError;

    fn try_from(response: LookupResponse) -> Result<Self, Self::Error> {
        match (response.success, response.producto) {
            (true, Some(wire)) => Ok(LookupResult::Found(Product::try_from(wire)?)),
            _ => Ok(LookupResult::NotFound {
                message: response.mensaje.filter(|m| !m.trim().is_empty()),
            }),
        }
    }
}

// =============================================================================
// Search
// =============================================================================

/// Body of `GET /ventas/productos/buscar?q=`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub productos: Vec<WireProduct>,
}

impl SearchResponse {
    /// Converts every record; one bad record fails the whole response.
    pub fn into_products(self) -> Result<Vec<Product>, CatalogError> {
        self.productos.into_iter().map(Product::try_from).collect()
    }
}
