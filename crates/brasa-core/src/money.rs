//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! All amounts are Mexican pesos stored as integer centavos. Floating point
//! never touches a price: the database, calculations and API all use
//! centavos, and only the UI converts for display.
//!
//! ## Usage
//! ```rust
//! use brasa_core::money::Money;
//!
//! let price = Money::from_cents(8_500); // $85.00
//! let line = price * 3i64;              // $255.00
//! assert_eq!(line.cents(), 25_500);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

/// A monetary value in centavos (the smallest currency unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: change calculations may pass through negatives
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ## Example
    /// ```rust
    /// use brasa_core::money::Money;
    ///
    /// let price = Money::from_cents(8_500); // $85.00
    /// assert_eq!(price.cents(), 8_500);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole pesos.
    #[inline]
    pub const fn from_pesos(pesos: i64) -> Self {
        Money(pesos * 100)
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-peso portion.
    #[inline]
    pub const fn pesos(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavo portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use brasa_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(4_500); // $45.00
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 13_500);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Rounds up to the nearest multiple of `denomination`.
    ///
    /// Used by the quick-cash suggestions: $137 rounds to $140 at the
    /// $10 denomination and $200 at the $100 denomination.
    ///
    /// ## Example
    /// ```rust
    /// use brasa_core::money::Money;
    ///
    /// let total = Money::from_pesos(137);
    /// assert_eq!(total.round_up_to(Money::from_pesos(10)), Money::from_pesos(140));
    /// assert_eq!(total.round_up_to(Money::from_pesos(100)), Money::from_pesos(200));
    /// ```
    pub const fn round_up_to(&self, denomination: Money) -> Money {
        let d = denomination.0;
        if d <= 0 {
            return *self;
        }
        Money(((self.0 + d - 1) / d) * d)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// This is for tickets and debugging; frontend formatting handles
/// localization for on-screen display.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.pesos().abs(), self.cents_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(8_599);
        assert_eq!(money.cents(), 8_599);
        assert_eq!(money.pesos(), 85);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_pesos() {
        assert_eq!(Money::from_pesos(137).cents(), 13_700);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(8_599)), "$85.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        let result: Money = a * 3;
        assert_eq!(result.cents(), 3000);
    }

    #[test]
    fn test_round_up_to() {
        let total = Money::from_pesos(137);
        assert_eq!(total.round_up_to(Money::from_pesos(10)), Money::from_pesos(140));
        assert_eq!(total.round_up_to(Money::from_pesos(50)), Money::from_pesos(150));
        assert_eq!(total.round_up_to(Money::from_pesos(100)), Money::from_pesos(200));
        assert_eq!(total.round_up_to(Money::from_pesos(500)), Money::from_pesos(500));

        // Exact multiples stay put
        assert_eq!(
            Money::from_pesos(200).round_up_to(Money::from_pesos(100)),
            Money::from_pesos(200)
        );
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_cents(100);
        assert!(positive.is_positive());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().cents(), 100);
    }
}
