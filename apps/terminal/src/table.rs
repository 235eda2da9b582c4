//! # Sales Table
//!
//! Text rendering of the ledger's lines.
//!
//! ```text
//! ID  Código    Producto   Precio  Cant.  Stock               Subtotal
//! 1   7840001   Widget     ₲1.000      2  Máx: 3 disponibles    ₲2.000
//! ```
//!
//! A line whose quantity is outside `[1, stock]` is flagged with `!` and the
//! stock ceiling, the way the quantity input turns red.

use caja_core::LineItem;

const EMPTY_TABLE: &str = "No hay productos en la venta.";

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub product_id: String,
    pub barcode: String,
    pub name: String,
    pub price: String,
    pub quantity: i64,
    pub stock_hint: String,
    pub subtotal: String,
    /// `Stock máximo: N` when the quantity is out of bounds.
    pub warning: Option<String>,
}

impl TableRow {
    pub fn from_line(line: &LineItem) -> Self {
        TableRow {
            product_id: line.product_id.to_string(),
            barcode: line.barcode.clone(),
            name: line.name.clone(),
            price: line.unit_price.to_string(),
            quantity: line.quantity,
            stock_hint: format!("Máx: {} disponibles", line.stock_available),
            subtotal: line.subtotal().to_string(),
            warning: (!line.is_within_bounds())
                .then(|| format!("Stock máximo: {}", line.stock_available)),
        }
    }
}

/// Renders the whole table, header included.
pub fn render(lines: &[LineItem]) -> String {
    if lines.is_empty() {
        return EMPTY_TABLE.to_string();
    }

    let mut out = format!(
        "{:<6} {:<14} {:<24} {:>10} {:>6}  {:<22} {:>12}\n",
        "ID", "Código", "Producto", "Precio", "Cant.", "Stock", "Subtotal"
    );

    for row in lines.iter().map(TableRow::from_line) {
        out.push_str(&format!(
            "{:<6} {:<14} {:<24} {:>10} {:>6}  {:<22} {:>12}",
            row.product_id,
            row.barcode,
            truncate(&row.name, 24),
            row.price,
            row.quantity,
            row.stock_hint,
            row.subtotal
        ));
        if let Some(warning) = &row.warning {
            out.push_str(&format!("  ! {}", warning));
        }
        out.push('\n');
    }

    out.pop();
    out
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caja_core::{Guarani, ProductId};

    fn line(quantity: i64, stock: i64) -> LineItem {
        LineItem {
            product_id: ProductId::from(1),
            barcode: "7840001".into(),
            name: "Widget".into(),
            unit_price: Guarani::from_units(1_000),
            stock_available: stock,
            quantity,
        }
    }

    #[test]
    fn test_row_from_line() {
        let row = TableRow::from_line(&line(2, 3));
        assert_eq!(row.price, "₲1.000");
        assert_eq!(row.subtotal, "₲2.000");
        assert_eq!(row.stock_hint, "Máx: 3 disponibles");
        assert_eq!(row.warning, None);
    }

    #[test]
    fn test_out_of_bounds_row_is_flagged() {
        let row = TableRow::from_line(&line(3, 2));
        assert_eq!(row.warning.as_deref(), Some("Stock máximo: 2"));

        let text = render(&[line(3, 2)]);
        assert!(text.contains("! Stock máximo: 2"));
    }

    #[test]
    fn test_render_empty_and_rows() {
        assert_eq!(render(&[]), EMPTY_TABLE);

        let text = render(&[line(1, 3)]);
        let mut rows = text.lines();
        assert!(rows.next().unwrap().contains("Producto"));
        assert!(rows.next().unwrap().contains("Widget"));
        assert!(rows.next().is_none());
    }

    #[test]
    fn test_truncate_long_names() {
        assert_eq!(truncate("Queso", 24), "Queso");
        assert_eq!(truncate("abcdef", 4), "abc…");
    }
}
