//! # Money Module
//!
//! Provides the `Money` type for charged amounts.
//!
//! ## Two Kinds of Amount
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  INPUT AMOUNTS (rust_decimal::Decimal)                                  │
//! │    basePrice as submitted: 10.335, 4.996, 20                            │
//! │    carried exactly through evaluation, never rounded                    │
//! │                                                                         │
//! │  CHARGED AMOUNTS (Money, integer cents)                                 │
//! │    discountAmount, finalPrice, menu prices, line totals                 │
//! │    rounded half-up to the cent exactly once, at the end                 │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    10.33 × 0.15 = 1.5494999999999999  → rounds to 1.54  ❌ WRONG!       │
//! │  In Decimal:                                                            │
//! │    10.33 × 15 / 100 = 1.5495          → rounds to 1.55  ✓               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! On the wire every amount is a JSON number in currency units (`10.33`).
//!
//! ## Usage
//! ```rust
//! use forno_core::money::Money;
//! use rust_decimal::Decimal;
//!
//! let exact = Decimal::new(15495, 4); // 1.5495
//! assert_eq!(Money::round_from_decimal(exact).unwrap().cents(), 155);
//! assert_eq!(Money::from_cents(1033).to_string(), "€10.33");
//! ```

use rust_decimal::prelude::*;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of decimal places a charged amount carries.
pub const CURRENCY_DECIMALS: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (euro cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: a negative price is representable so callers can
///   reject it with a field-specific error instead of failing to parse
/// - **Checked arithmetic**: line totals and subtotals report overflow
///   instead of wrapping
/// - **Serde**: currency units on the wire, exact to the cent
///
/// ## Where Money is Used
/// ```text
/// MenuItem.base_price ──► PricedLine.line_total ──► PriceCalculation.subtotal
///                                                          │ to_decimal
///                                                          ▼
///                              DiscountInput.base_price ──► DiscountResult
///                                                           ├── discount_amount
///                                                           └── final_price
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use forno_core::money::Money;
    ///
    /// let price = Money::from_cents(1299); // Represents €12.99
    /// assert_eq!(price.cents(), 1299);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal amount that is already whole cents.
    ///
    /// Returns `None` for sub-cent amounts (`10.335`) and for amounts that do
    /// not fit in an `i64` number of cents. Trailing zeros are fine (`8.500`).
    ///
    /// ## Example
    /// ```rust
    /// use forno_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(Money::from_decimal(Decimal::new(8500, 3)), Some(Money::from_cents(850)));
    /// assert_eq!(Money::from_decimal(Decimal::new(10335, 3)), None);
    /// ```
    pub fn from_decimal(amount: Decimal) -> Option<Self> {
        let amount = amount.normalize();
        if amount.scale() > CURRENCY_DECIMALS {
            return None;
        }
        amount
            .checked_mul(Decimal::ONE_HUNDRED)?
            .to_i64()
            .map(Money)
    }

    /// Rounds an exact amount half-up (away from zero) to the cent.
    ///
    /// Returns `None` if the result does not fit in an `i64` number of cents.
    pub fn round_from_decimal(amount: Decimal) -> Option<Self> {
        let rounded =
            amount.round_dp_with_strategy(CURRENCY_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
        Self::from_decimal(rounded)
    }

    /// Returns the value as a decimal amount of currency units.
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, CURRENCY_DECIMALS)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (euros) portion.
    #[inline]
    pub const fn euros(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies by a line quantity, `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use forno_core::money::Money;
    ///
    /// let margherita = Money::from_cents(1200);
    /// assert_eq!(margherita.checked_mul_quantity(3), Some(Money::from_cents(3600)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_mul_quantity(2), None);
    /// ```
    #[inline]
    pub const fn checked_mul_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

/// Parses decimal currency text such as `"10.33"`, `"4.996"` or `"1.2e1"`.
///
/// The value is kept exactly as written; nothing is rounded here.
pub fn parse_currency_units(text: &str) -> Option<Decimal> {
    let text = text.trim();
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and the CLI. The order form formats prices itself.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}€{}.{:02}", sign, self.euros().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.to_decimal(), serializer)
    }
}

/// Reads currency units: `8.5`, `12`, or `"10.33"`. Sub-cent values are
/// rejected rather than rounded.
impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CurrencyUnits;

        impl Visitor<'_> for CurrencyUnits {
            type Value = Money;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an amount in currency units with at most two decimal places")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
                self.visit_str(&v.to_string())
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
                self.visit_str(&v.to_string())
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
                self.visit_str(&v.to_string())
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
                parse_currency_units(v)
                    .and_then(Money::from_decimal)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_any(CurrencyUnits)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
