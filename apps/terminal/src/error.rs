//! # User-Facing Errors
//!
//! Every failure the cashier can see is turned into a [`UserMessage`]: a
//! machine-readable code plus the Spanish text shown on screen.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Sale Screen                        │
//! │                                                                         │
//! │  Ledger          CoreError    ───┐                                      │
//! │  Barcode box     ScanError    ───┤                                      │
//! │  Search modal    SelectError  ───┼──► UserMessage ──► error alert       │
//! │  HTTP client     CatalogError ───┘    {code, message}                   │
//! │                                                                         │
//! │  Transport details are logged, never shown.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use caja_catalog::{CatalogError, ScanError, SelectError};
use caja_core::CoreError;
use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;

/// Shown for every network or payload failure.
pub const CONNECTION_ERROR: &str = "Error al conectar con el servidor.";

/// Error returned from session commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "No hay suficiente stock para 'Widget'. Disponible: 1"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMessage {
    pub code: ErrorCode,
    pub message: String,
}

/// Error codes for user messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    InsufficientStock,
    ConnectionError,
    BusinessLogic,
    /// Malformed command line.
    Usage,
    Internal,
}

impl UserMessage {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        UserMessage {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        UserMessage::new(ErrorCode::ValidationError, message)
    }

    pub fn usage(message: impl Into<String>) -> Self {
        UserMessage::new(ErrorCode::Usage, message)
    }

    pub fn connection() -> Self {
        UserMessage::new(ErrorCode::ConnectionError, CONNECTION_ERROR)
    }
}

impl From<CoreError> for UserMessage {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => UserMessage::new(
                ErrorCode::NotFound,
                format!("El producto {} no está en la venta.", id),
            ),
            CoreError::StockExceeded { name, available } => UserMessage::new(
                ErrorCode::InsufficientStock,
                format!(
                    "No hay suficiente stock para '{}'. Disponible: {}",
                    name, available
                ),
            ),
            CoreError::OutOfStock { name } => UserMessage::new(
                ErrorCode::InsufficientStock,
                format!("'{}' no tiene stock disponible.", name),
            ),
            CoreError::LedgerEmpty => {
                UserMessage::validation("Debe agregar al menos un producto a la venta.")
            }
            CoreError::LineOutOfBounds { name, stock, .. } => UserMessage::validation(format!(
                "Error en cantidad del producto '{}'. Cantidad debe ser entre 1 y {}.",
                name, stock
            )),
            CoreError::AmountOutOfRange { amount, max } => UserMessage::new(
                ErrorCode::BusinessLogic,
                format!("El monto {} supera el máximo de {}.", amount, max),
            ),
            CoreError::Validation(e) => UserMessage::validation(e.to_string()),
        }
    }
}

impl From<CatalogError> for UserMessage {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::InvalidInput(e) => UserMessage::validation(e.to_string()),
            e if e.is_config_error() => {
                tracing::error!(error = %e, "Catalog misconfigured");
                UserMessage::new(ErrorCode::Internal, CONNECTION_ERROR)
            }
            e => {
                tracing::warn!(error = %e, "Catalog request failed");
                UserMessage::connection()
            }
        }
    }
}

impl From<ScanError> for UserMessage {
    fn from(err: ScanError) -> Self {
        let code = match &err {
            ScanError::EmptyCode => ErrorCode::ValidationError,
            ScanError::NotFound(_) => ErrorCode::NotFound,
            ScanError::OutOfStock { .. } => ErrorCode::InsufficientStock,
            ScanError::Catalog(_) => ErrorCode::ConnectionError,
        };
        UserMessage::new(code, err.to_string())
    }
}

impl From<SelectError> for UserMessage {
    fn from(err: SelectError) -> Self {
        let code = match &err {
            SelectError::NotListed(_) | SelectError::Vanished(_) => ErrorCode::NotFound,
            SelectError::OutOfStock { .. } => ErrorCode::InsufficientStock,
            SelectError::Catalog(_) => ErrorCode::ConnectionError,
        };
        UserMessage::new(code, err.to_string())
    }
}

impl std::fmt::Display for UserMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for UserMessage {}

// =============================================================================
// Startup Errors
// =============================================================================

/// Errors that stop the binary. These are printed, not shown as alerts.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog setup failed: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to render config: {0}")]
    Render(#[from] toml::ser::Error),
}
