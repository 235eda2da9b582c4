//! # Catalog Error Types
//!
//! Error types for catalog requests.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Catalog Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Payload             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidUrl     │  │  Connection     │  │  DeserializationFailed  │ │
//! │  │  InvalidConfig  │  │  Timeout        │  │  InvalidProduct         │ │
//! │  │                 │  │  HttpStatus     │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Every transport and payload error reaches the cashier as              │
//! │  "Error al conectar con el servidor." and is never retried.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use caja_core::ValidationError;
use thiserror::Error;

/// Result type alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog error type covering every request failure.
#[derive(Debug, Error)]
pub enum CatalogError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Base URL or endpoint path could not be parsed.
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid catalog configuration: {0}")]
    InvalidConfig(String),

    // =========================================================================
    // Input Errors
    // =========================================================================
    /// Query or barcode rejected before any request was sent.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    /// Server answered with a non-2xx status.
    #[error("Catalog returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    // =========================================================================
    // Payload Errors
    // =========================================================================
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// A product record that cannot be used for a sale (bad price).
    #[error("Invalid product {id}: {reason}")]
    InvalidProduct { id: String, reason: String },
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CatalogError::Timeout
        } else if err.is_decode() {
            CatalogError::DeserializationFailed(err.to_string())
        } else if let Some(status) = err.status() {
            CatalogError::HttpStatus {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            CatalogError::ConnectionFailed(err.to_string())
        }
    }
}

impl From<url::ParseError> for CatalogError {
    fn from(err: url::ParseError) -> Self {
        CatalogError::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::DeserializationFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl CatalogError {
    /// Returns true if the request reached the network and failed there, or
    /// came back unreadable.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            CatalogError::ConnectionFailed(_)
                | CatalogError::Timeout
                | CatalogError::HttpStatus { .. }
                | CatalogError::DeserializationFailed(_)
                | CatalogError::InvalidProduct { .. }
        )
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            CatalogError::InvalidUrl(_) | CatalogError::InvalidConfig(_)
        )
    }
}
