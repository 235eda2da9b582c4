//! # Line-Item Ledger
//!
//! The in-memory list of products in the current sale.
//!
//! ## Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Ledger Operations                                    │
//! │                                                                         │
//! │  Caller Action              Ledger Method              State Change     │
//! │  ─────────────              ─────────────              ────────────     │
//! │                                                                         │
//! │  ProductSelected ─────────► add_or_increment() ──► push / qty += 1     │
//! │                                                                         │
//! │  Quantity input ──────────► set_quantity() ──────► qty = clamp(n)      │
//! │                                                                         │
//! │  Delete button ───────────► remove() ────────────► line dropped        │
//! │                                                                         │
//! │  Sale registered ─────────► clear() ─────────────► lines emptied       │
//! │                                                                         │
//! │  Every call above ends with exactly one summary broadcast to the       │
//! │  subscribed listeners.                                                 │
//! │                                                                         │
//! │  Submit ──► validate() ──► export_for_submission() ──► [{id,cantidad}] │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by `product_id` (adding the same product increments)
//! - A line is never created with quantity 0 or without stock
//! - `set_quantity` always stores a value in `[1, stock_available]`

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::types::{LineItem, Product, ProductId, SubmissionLine, SummarySnapshot};

// =============================================================================
// Listener
// =============================================================================

/// Receives a fresh summary after every ledger mutation.
pub trait LedgerListener: Send + Sync {
    fn summary_changed(&self, snapshot: &SummarySnapshot);
}

/// No-op listener for testing.
pub struct NoOpListener;

impl LedgerListener for NoOpListener {
    fn summary_changed(&self, _snapshot: &SummarySnapshot) {}
}

// =============================================================================
// Outcomes
// =============================================================================

/// Result of a successful `add_or_increment`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// New line created with quantity 1.
    Inserted,
    /// Existing line incremented to `quantity`.
    Incremented { quantity: i64 },
}

/// Result of `set_quantity`.
///
/// `clamped` tells the caller its input was corrected and the visual field
/// should show `quantity` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityChange {
    pub quantity: i64,
    pub clamped: bool,
}

// =============================================================================
// Ledger
// =============================================================================

/// Line items of one sale session.
#[derive(Default)]
pub struct Ledger {
    lines: Vec<LineItem>,
    listeners: Vec<Arc<dyn LedgerListener>>,
}

impl Ledger {
    /// Creates an empty ledger with no listeners.
    pub fn new() -> Self {
        Ledger::default()
    }

    /// Registers a listener for summary broadcasts.
    pub fn subscribe(&mut self, listener: Arc<dyn LedgerListener>) {
        self.listeners.push(listener);
    }

    /// Adds a product or increases its quantity by one.
    ///
    /// ## Behavior
    /// - Not in ledger: new line with quantity 1 (rejected if it has no stock)
    /// - In ledger: the quantity is incremented if it is below the stock
    ///   reported by `product`; the line then takes that stock as its ceiling
    ///
    /// A failed add leaves the ledger exactly as it was. The summary is
    /// broadcast whether or not the add succeeded.
    pub fn add_or_increment(&mut self, product: &Product) -> CoreResult<AddOutcome> {
        let result = self.apply_add(product);
        self.broadcast();
        result
    }

    fn apply_add(&mut self, product: &Product) -> CoreResult<AddOutcome> {
        if let Some(line) = self.line_mut(&product.id) {
            if line.quantity >= product.stock_available {
                return Err(CoreError::StockExceeded {
                    name: product.name.clone(),
                    available: product.stock_available,
                });
            }

            line.stock_available = product.stock_available;
            line.quantity += 1;
            return Ok(AddOutcome::Incremented {
                quantity: line.quantity,
            });
        }

        if !product.in_stock() {
            return Err(CoreError::OutOfStock {
                name: product.name.clone(),
            });
        }

        self.lines.push(LineItem::from_product(product));
        Ok(AddOutcome::Inserted)
    }

    /// Sets a line's quantity, clamped to `[1, stock_available]`.
    ///
    /// ## Clamping
    /// ```text
    /// requested <= 0        → 1
    /// requested > stock     → stock
    /// otherwise             → requested
    /// ```
    /// A line whose stock ceiling dropped to zero is held at 1 and shows up
    /// in `invalid_count` until it is removed.
    pub fn set_quantity(
        &mut self,
        product_id: &ProductId,
        requested: i64,
    ) -> CoreResult<QuantityChange> {
        let result = match self.line_mut(product_id) {
            Some(line) => {
                let quantity = requested.clamp(1, line.stock_available.max(1));
                line.quantity = quantity;
                Ok(QuantityChange {
                    quantity,
                    clamped: quantity != requested,
                })
            }
            None => Err(CoreError::ProductNotFound(product_id.clone())),
        };
        self.broadcast();
        result
    }

    /// Removes a line. Absent ids are a no-op.
    pub fn remove(&mut self, product_id: &ProductId) -> Option<LineItem> {
        let removed = self
            .lines
            .iter()
            .position(|l| &l.product_id == product_id)
            .map(|index| self.lines.remove(index));
        self.broadcast();
        removed
    }

    /// Empties the ledger for the next sale.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.broadcast();
    }

    /// Computes the aggregate view of all lines.
    pub fn snapshot(&self) -> SummarySnapshot {
        let mut snapshot = SummarySnapshot {
            has_entries: !self.lines.is_empty(),
            ..SummarySnapshot::default()
        };

        for line in &self.lines {
            snapshot.total += line.subtotal();
            snapshot.item_count = snapshot.item_count.saturating_add(line.quantity);
            if line.stock_available <= 0 {
                snapshot.out_of_stock_count += 1;
            }
            if !line.is_within_bounds() {
                snapshot.invalid_count += 1;
            }
        }

        snapshot
    }

    /// Gate that must pass before the ledger is submitted.
    pub fn validate(&self) -> CoreResult<()> {
        if self.lines.is_empty() {
            return Err(CoreError::LedgerEmpty);
        }

        if let Some(line) = self.lines.iter().find(|l| !l.is_within_bounds()) {
            return Err(CoreError::LineOutOfBounds {
                name: line.name.clone(),
                quantity: line.quantity,
                stock: line.stock_available,
            });
        }

        Ok(())
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Produces one `{productId, quantity}` pair per line, in insertion order.
    pub fn export_for_submission(&self) -> CoreResult<Vec<SubmissionLine>> {
        self.validate()?;

        Ok(self
            .lines
            .iter()
            .map(|l| SubmissionLine {
                product_id: l.product_id.clone(),
                quantity: l.quantity,
            })
            .collect())
    }

    /// Renders the submission as the JSON value of the hidden form field.
    pub fn submission_json(&self) -> CoreResult<String> {
        let lines = self.export_for_submission()?;
        // Vec of plain structs with derived Serialize cannot fail.
        Ok(serde_json::to_string(&lines).unwrap_or_default())
    }

    pub fn get(&self, product_id: &ProductId) -> Option<&LineItem> {
        self.lines.iter().find(|l| &l.product_id == product_id)
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut LineItem> {
        self.lines.iter_mut().find(|l| &l.product_id == product_id)
    }

    fn broadcast(&self) {
        if self.listeners.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for listener in &self.listeners {
            listener.summary_changed(&snapshot);
        }
    }
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("lines", &self.lines)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Guarani;
    use std::sync::Mutex;

    fn product(id: i64, name: &str, price: i64, stock: i64) -> Product {
        Product {
            id: ProductId::from(id),
            barcode: format!("784000{}", id),
            name: name.to_string(),
            unit_price: Guarani::from_units(price),
            stock_available: stock,
            category: "General".to_string(),
        }
    }

    #[derive(Default)]
    struct Recorder {
        snapshots: Mutex<Vec<SummarySnapshot>>,
    }

    impl Recorder {
        fn count(&self) -> usize {
            self.snapshots.lock().unwrap().len()
        }

        fn last(&self) -> SummarySnapshot {
            *self.snapshots.lock().unwrap().last().unwrap()
        }
    }

    impl LedgerListener for Recorder {
        fn summary_changed(&self, snapshot: &SummarySnapshot) {
            self.snapshots.lock().unwrap().push(*snapshot);
        }
    }

    #[test]
    fn test_widget_scenario() {
        let mut ledger = Ledger::new();
        let widget = product(1, "Widget", 1_000, 3);

        assert_eq!(ledger.add_or_increment(&widget), Ok(AddOutcome::Inserted));
        let snap = ledger.snapshot();
        assert_eq!(snap.total.units(), 1_000);
        assert_eq!(snap.item_count, 1);

        assert_eq!(
            ledger.add_or_increment(&widget),
            Ok(AddOutcome::Incremented { quantity: 2 })
        );
        let snap = ledger.snapshot();
        assert_eq!(snap.total.units(), 2_000);
        assert_eq!(snap.item_count, 2);

        let change = ledger.set_quantity(&ProductId::from(1), 10).unwrap();
        assert_eq!(
            change,
            QuantityChange {
                quantity: 3,
                clamped: true
            }
        );
        assert_eq!(ledger.snapshot().total.units(), 3_000);
    }

    #[test]
    fn test_repeated_add_with_stock_one_reports_stock_exceeded() {
        let mut ledger = Ledger::new();
        let single = product(7, "Yerba", 15_000, 1);

        ledger.add_or_increment(&single).unwrap();
        let err = ledger.add_or_increment(&single).unwrap_err();

        assert_eq!(
            err,
            CoreError::StockExceeded {
                name: "Yerba".to_string(),
                available: 1,
            }
        );
        assert_eq!(ledger.get(&ProductId::from(7)).unwrap().quantity, 1);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_new_product_without_stock_is_rejected() {
        let mut ledger = Ledger::new();
        let err = ledger
            .add_or_increment(&product(2, "Agotado", 500, 0))
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::OutOfStock {
                name: "Agotado".to_string()
            }
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_set_quantity_clamps_both_ends() {
        let mut ledger = Ledger::new();
        ledger.add_or_increment(&product(1, "Widget", 1_000, 4)).unwrap();
        let id = ProductId::from(1);

        assert_eq!(
            ledger.set_quantity(&id, 0).unwrap(),
            QuantityChange {
                quantity: 1,
                clamped: true
            }
        );
        assert_eq!(ledger.set_quantity(&id, -3).unwrap().quantity, 1);
        assert_eq!(ledger.set_quantity(&id, 4 + 5).unwrap().quantity, 4);
        assert_eq!(
            ledger.set_quantity(&id, 2).unwrap(),
            QuantityChange {
                quantity: 2,
                clamped: false
            }
        );
    }

    #[test]
    fn test_set_quantity_unknown_product() {
        let mut ledger = Ledger::new();
        let err = ledger.set_quantity(&ProductId::from(99), 2).unwrap_err();
        assert_eq!(err, CoreError::ProductNotFound(ProductId::from(99)));
    }

    #[test]
    fn test_remove_is_noop_when_absent() {
        let mut ledger = Ledger::new();
        ledger.add_or_increment(&product(1, "Widget", 1_000, 3)).unwrap();

        assert!(ledger.remove(&ProductId::from(2)).is_none());
        assert_eq!(ledger.len(), 1);

        let removed = ledger.remove(&ProductId::from(1)).unwrap();
        assert_eq!(removed.name, "Widget");
        assert!(ledger.is_empty());
        assert!(!ledger.snapshot().has_entries);
    }

    #[test]
    fn test_is_valid_gate() {
        let mut ledger = Ledger::new();
        assert!(!ledger.is_valid());
        assert_eq!(ledger.validate(), Err(CoreError::LedgerEmpty));
        assert_eq!(ledger.export_for_submission(), Err(CoreError::LedgerEmpty));

        ledger.add_or_increment(&product(1, "Widget", 1_000, 3)).unwrap();
        assert!(ledger.is_valid());
    }

    #[test]
    fn test_failed_add_leaves_line_untouched() {
        let mut ledger = Ledger::new();
        ledger.add_or_increment(&product(1, "Widget", 1_000, 5)).unwrap();
        ledger.set_quantity(&ProductId::from(1), 4).unwrap();
        let before = ledger.get(&ProductId::from(1)).cloned().unwrap();

        // Catalog now reports only 2 left.
        let err = ledger
            .add_or_increment(&product(1, "Widget", 1_000, 2))
            .unwrap_err();
        assert!(matches!(err, CoreError::StockExceeded { available: 2, .. }));

        assert_eq!(ledger.get(&ProductId::from(1)), Some(&before));
        assert!(ledger.is_valid());
        assert_eq!(ledger.snapshot().invalid_count, 0);
    }

    #[test]
    fn test_successful_increment_takes_fresh_stock() {
        let mut ledger = Ledger::new();
        ledger.add_or_increment(&product(1, "Widget", 1_000, 5)).unwrap();

        let outcome = ledger
            .add_or_increment(&product(1, "Widget", 1_000, 8))
            .unwrap();
        assert_eq!(outcome, AddOutcome::Incremented { quantity: 2 });
        assert_eq!(ledger.get(&ProductId::from(1)).unwrap().stock_available, 8);
    }

    #[test]
    fn test_stock_dropping_to_zero_counts_out_of_stock() {
        let mut ledger = Ledger::new();
        let mut line = LineItem::from_product(&product(1, "Widget", 1_000, 2));
        line.stock_available = 0;
        ledger.lines.push(line);

        let change = ledger.set_quantity(&ProductId::from(1), 5).unwrap();
        assert_eq!(change.quantity, 1);

        let snap = ledger.snapshot();
        assert_eq!(snap.out_of_stock_count, 1);
        assert_eq!(snap.invalid_count, 1);
        assert!(!ledger.is_valid());
    }

    #[test]
    fn test_huge_prices_do_not_overflow_totals() {
        let mut ledger = Ledger::new();
        ledger
            .add_or_increment(&product(1, "Lingote", i64::MAX / 2 + 1, 3))
            .unwrap();
        ledger.add_or_increment(&product(2, "Widget", 1_000, 3)).unwrap();
        ledger.set_quantity(&ProductId::from(1), 2).unwrap();

        let snap = ledger.snapshot();
        assert_eq!(snap.total.units(), i64::MAX);
        assert_eq!(snap.item_count, 3);
    }

    #[test]
    fn test_export_for_submission_keeps_insertion_order() {
        let mut ledger = Ledger::new();
        ledger.add_or_increment(&product(5, "Cafe", 9_000, 10)).unwrap();
        ledger.add_or_increment(&product(2, "Azucar", 6_500, 10)).unwrap();
        ledger.add_or_increment(&product(5, "Cafe", 9_000, 10)).unwrap();

        let lines = ledger.export_for_submission().unwrap();
        assert_eq!(
            lines,
            vec![
                SubmissionLine {
                    product_id: ProductId::from(5),
                    quantity: 2
                },
                SubmissionLine {
                    product_id: ProductId::from(2),
                    quantity: 1
                },
            ]
        );
        assert_eq!(
            ledger.submission_json().unwrap(),
            r#"[{"id":5,"cantidad":2},{"id":2,"cantidad":1}]"#
        );
    }

    #[test]
    fn test_exactly_one_broadcast_per_mutation() {
        let recorder = Arc::new(Recorder::default());
        let mut ledger = Ledger::new();
        ledger.subscribe(recorder.clone());

        let single = product(1, "Widget", 1_000, 1);
        ledger.add_or_increment(&single).unwrap();
        assert_eq!(recorder.count(), 1);

        // Failed increment still broadcasts once.
        let _ = ledger.add_or_increment(&single);
        assert_eq!(recorder.count(), 2);

        ledger.set_quantity(&ProductId::from(1), 3).unwrap();
        assert_eq!(recorder.count(), 3);

        ledger.remove(&ProductId::from(42));
        assert_eq!(recorder.count(), 4);

        ledger.remove(&ProductId::from(1));
        assert_eq!(recorder.count(), 5);
        assert!(!recorder.last().has_entries);

        // Reads never broadcast.
        let _ = ledger.snapshot();
        let _ = ledger.is_valid();
        assert_eq!(recorder.count(), 5);
    }

    #[test]
    fn test_clear_broadcasts_empty_summary() {
        let recorder = Arc::new(Recorder::default());
        let mut ledger = Ledger::new();
        ledger.subscribe(recorder.clone());

        ledger.add_or_increment(&product(1, "Widget", 1_000, 3)).unwrap();
        ledger.clear();

        assert_eq!(recorder.count(), 2);
        assert_eq!(recorder.last(), SummarySnapshot::default());
    }
}
