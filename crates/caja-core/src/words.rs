//! # Amount in Words
//!
//! Spells a guaraní amount in Spanish for the summary panel
//! ("tres mil guaraníes").
//!
//! ## Magnitude Bands
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  spell_amount(n)                                                        │
//! │     │                                                                   │
//! │     ├── n == 0          → "Cero guaraníes"                              │
//! │     ├── n > 999_999     → AmountOutOfRange (no "millón" band)           │
//! │     │                                                                   │
//! │     └── spell_thousands(n) + " guaraní" / " guaraníes"                  │
//! │              │                                                          │
//! │              ├── n / 1000 == 1  → "mil"                                 │
//! │              ├── n / 1000 > 1   → spell_hundreds(n / 1000) + " mil"     │
//! │              └── n % 1000       → spell_hundreds(..)                    │
//! │                                     │                                   │
//! │                                     ├── 100        → "cien"             │
//! │                                     ├── 101..=999  → centena + resto    │
//! │                                     └── 0..=99     → spell_below_hundred│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tens and units are joined with "y" ("veinte y uno"); the unit digit is
//! not fused into the tens word.

use crate::error::{CoreError, CoreResult};

/// Largest amount the converter spells.
pub const MAX_SPELLABLE: u64 = 999_999;

const ZERO_AMOUNT: &str = "Cero guaraníes";
const CURRENCY_SINGULAR: &str = "guaraní";
const CURRENCY_PLURAL: &str = "guaraníes";

const UNITS: [&str; 10] = [
    "", "uno", "dos", "tres", "cuatro", "cinco", "seis", "siete", "ocho", "nueve",
];

const TEENS: [&str; 10] = [
    "diez",
    "once",
    "doce",
    "trece",
    "catorce",
    "quince",
    "dieciséis",
    "diecisiete",
    "dieciocho",
    "diecinueve",
];

const TENS: [&str; 10] = [
    "", "", "veinte", "treinta", "cuarenta", "cincuenta", "sesenta", "setenta", "ochenta",
    "noventa",
];

const HUNDREDS: [&str; 10] = [
    "",
    "ciento",
    "doscientos",
    "trescientos",
    "cuatrocientos",
    "quinientos",
    "seiscientos",
    "setecientos",
    "ochocientos",
    "novecientos",
];

/// Spells a non-negative amount with its currency noun.
///
/// ```rust
/// use caja_core::words::spell_amount;
///
/// assert_eq!(spell_amount(0).unwrap(), "Cero guaraníes");
/// assert_eq!(spell_amount(1).unwrap(), "uno guaraní");
/// assert_eq!(spell_amount(1_000).unwrap(), "mil guaraníes");
/// assert_eq!(spell_amount(21_345).unwrap(),
///     "veinte y uno mil trescientos cuarenta y cinco guaraníes");
/// assert!(spell_amount(1_000_000).is_err());
/// ```
pub fn spell_amount(n: u64) -> CoreResult<String> {
    if n == 0 {
        return Ok(ZERO_AMOUNT.to_string());
    }

    if n > MAX_SPELLABLE {
        return Err(CoreError::AmountOutOfRange {
            amount: i64::try_from(n).unwrap_or(i64::MAX),
            max: MAX_SPELLABLE,
        });
    }

    let noun = if n == 1 {
        CURRENCY_SINGULAR
    } else {
        CURRENCY_PLURAL
    };
    Ok(format!("{} {}", spell_thousands(n), noun))
}

/// Spells `1..=999_999` without the currency noun.
fn spell_thousands(n: u64) -> String {
    let thousands = n / 1000;
    let remainder = n % 1000;

    let mut words = match thousands {
        0 => String::new(),
        1 => "mil".to_string(),
        _ => format!("{} mil", spell_hundreds(thousands)),
    };

    if remainder > 0 {
        if !words.is_empty() {
            words.push(' ');
        }
        words.push_str(&spell_hundreds(remainder));
    }

    words
}

/// Spells `0..=999`; zero yields an empty string.
fn spell_hundreds(n: u64) -> String {
    if n < 100 {
        return spell_below_hundred(n);
    }
    if n == 100 {
        return "cien".to_string();
    }

    let hundreds = HUNDREDS[(n / 100) as usize];
    match n % 100 {
        0 => hundreds.to_string(),
        rest => format!("{} {}", hundreds, spell_below_hundred(rest)),
    }
}

/// Spells `0..=99`; zero yields an empty string.
fn spell_below_hundred(n: u64) -> String {
    match n {
        0..=9 => UNITS[n as usize].to_string(),
        10..=19 => TEENS[(n - 10) as usize].to_string(),
        _ => {
            let tens = TENS[(n / 10) as usize];
            match n % 10 {
                0 => tens.to_string(),
                unit => format!("{} y {}", tens, UNITS[unit as usize]),
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
