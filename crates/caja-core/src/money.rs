//! # Money Module
//!
//! Provides the `Guarani` type for monetary values.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The Paraguayan guaraní (₲) has no minor unit in circulation.           │
//! │                                                                         │
//! │  Every amount on the sale screen is a whole number of guaraníes:        │
//! │    unit price × quantity = subtotal, Σ subtotals = total               │
//! │                                                                         │
//! │  Storing i64 keeps all of that exact. Floats only appear at the wire    │
//! │  boundary (the catalog sends JSON numbers) and are rounded there.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use caja_core::money::Guarani;
//!
//! let price = Guarani::from_units(12_500);
//! let subtotal = price.multiply_quantity(3);
//! assert_eq!(subtotal.units(), 37_500);
//! assert_eq!(subtotal.to_string(), "₲37.500");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::words::{spell_amount, MAX_SPELLABLE};

// =============================================================================
// Guarani Type
// =============================================================================

/// A monetary value in whole guaraníes.
///
/// ## Where It Is Used
/// ```text
/// Product.unit_price ──► LineItem.subtotal() ──► SummarySnapshot.total
///                                                      │
///                                                      ├──► "₲3.000" (panel)
///                                                      └──► "tres mil guaraníes"
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Guarani(i64);

impl Guarani {
    /// Creates an amount from whole guaraníes.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Guarani(units)
    }

    /// Returns the amount in whole guaraníes.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0
    }

    /// Zero guaraníes.
    #[inline]
    pub const fn zero() -> Self {
        Guarani(0)
    }

    /// Multiplies a unit price by a quantity, saturating at the `i64` bounds.
    ///
    /// ```rust
    /// use caja_core::money::Guarani;
    ///
    /// let line = Guarani::from_units(1_000).multiply_quantity(3);
    /// assert_eq!(line.units(), 3_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Guarani(self.0.saturating_mul(qty))
    }

    /// Spells the amount in Spanish, currency noun included.
    ///
    /// Negative amounts and amounts above the converter's thousands band
    /// are rejected with [`CoreError::AmountOutOfRange`].
    ///
    /// ```rust
    /// use caja_core::money::Guarani;
    ///
    /// let total = Guarani::from_units(2_500);
    /// assert_eq!(total.in_words().unwrap(), "dos mil quinientos guaraníes");
    /// ```
    pub fn in_words(&self) -> CoreResult<String> {
        let amount = u64::try_from(self.0).map_err(|_| CoreError::AmountOutOfRange {
            amount: self.0,
            max: MAX_SPELLABLE,
        })?;
        spell_amount(amount)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders `₲1.234.567`: dot-grouped thousands, the way the sale screen shows
/// prices and totals.
impl fmt::Display for Guarani {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₲{}", sign, grouped)
    }
}

// Arithmetic saturates at the i64 bounds.

impl Add for Guarani {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Guarani(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Guarani {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Mul<i64> for Guarani {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Guarani {
    fn sum<I: Iterator<Item = Guarani>>(iter: I) -> Self {
        iter.fold(Guarani::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Guarani::from_units(0).to_string(), "₲0");
        assert_eq!(Guarani::from_units(999).to_string(), "₲999");
        assert_eq!(Guarani::from_units(1_000).to_string(), "₲1.000");
        assert_eq!(Guarani::from_units(37_500).to_string(), "₲37.500");
        assert_eq!(Guarani::from_units(1_234_567).to_string(), "₲1.234.567");
        assert_eq!(Guarani::from_units(-5_500).to_string(), "-₲5.500");
    }

    #[test]
    fn test_arithmetic() {
        let a = Guarani::from_units(1_000);
        let b = Guarani::from_units(500);

        assert_eq!((a + b).units(), 1_500);
        assert_eq!((a * 3).units(), 3_000);

        let total: Guarani = [a, b, b].into_iter().sum();
        assert_eq!(total.units(), 2_000);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let big = Guarani::from_units(i64::MAX / 2 + 1);
        assert_eq!(big.multiply_quantity(2).units(), i64::MAX);
        assert_eq!((big * 3).units(), i64::MAX);
        assert_eq!((big + big).units(), i64::MAX);

        let mut total = Guarani::from_units(i64::MAX - 1);
        total += Guarani::from_units(10);
        assert_eq!(total.units(), i64::MAX);

        let total: Guarani = [big, big, big].into_iter().sum();
        assert_eq!(total.units(), i64::MAX);
    }

    #[test]
    fn test_in_words() {
        assert_eq!(Guarani::zero().in_words().unwrap(), "Cero guaraníes");
        assert_eq!(
            Guarani::from_units(3_000).in_words().unwrap(),
            "tres mil guaraníes"
        );
    }

    #[test]
    fn test_in_words_rejects_negative() {
        let err = Guarani::from_units(-1).in_words().unwrap_err();
        assert!(matches!(err, CoreError::AmountOutOfRange { amount: -1, .. }));
    }

    #[test]
    fn test_serializes_as_plain_number() {
        let json = serde_json::to_string(&Guarani::from_units(1_500)).unwrap();
        assert_eq!(json, "1500");
    }
}
