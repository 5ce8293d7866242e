//! Won amounts parsed from spreadsheet cells
//!
//! Every money cell in the snapshot is a free-form string ("1,234,000",
//! "1234000원", ""), so amounts are read with a digits-only rule rather than
//! a strict parser. Internally stores whole won as i64 with saturating math.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// A monetary amount in whole won
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Won(i64);

impl Won {
    /// Create a Won amount
    pub const fn new(amount: i64) -> Self {
        Self(amount)
    }

    /// Create a zero amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the raw amount
    pub const fn amount(&self) -> i64 {
        self.0
    }

    /// Check if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Parse a cell by keeping only ASCII digits
    ///
    /// Separators, currency marks, signs and letters are all dropped; a cell
    /// with no digits is zero. Values beyond `i64::MAX` saturate.
    ///
    /// ```
    /// use kcc_dashboard::models::Won;
    /// assert_eq!(Won::parse_digits("1,234,000").amount(), 1_234_000);
    /// assert_eq!(Won::parse_digits("abc").amount(), 0);
    /// ```
    pub fn parse_digits(s: &str) -> Self {
        let value = s
            .bytes()
            .filter(u8::is_ascii_digit)
            .fold(0i64, |acc, b| {
                acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
            });
        Self(value)
    }

    /// Format with a currency symbol, e.g. "₩ 1,234,000"
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        format!("{} {}", symbol, self)
    }
}

/// Numeric value of a money cell (digits only, empty is zero)
pub fn to_number(s: &str) -> i64 {
    Won::parse_digits(s).amount()
}

/// Re-format a raw money cell with thousands separators
///
/// Returns an empty string when the cell holds no digits at all.
pub fn format_money_value(s: &str) -> String {
    let digits: String = s.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return String::new();
    }
    group_thousands(&digits)
}

/// Remove thousands separators before a value is stored
pub fn strip_separators(s: &str) -> String {
    s.replace(',', "")
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl Default for Won {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Won {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grouped = group_thousands(&self.0.unsigned_abs().to_string());
        if self.0 < 0 {
            write!(f, "-{}", grouped)
        } else {
            write!(f, "{}", grouped)
        }
    }
}

impl Add for Won {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Won {
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sum for Won {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |a, b| a + b)
    }
}

impl<'a> Sum<&'a Won> for Won {
    fn sum<I: Iterator<Item = &'a Won>>(iter: I) -> Self {
        iter.fold(Self::zero(), |a, b| a + *b)
    }
}
