//! # Domain Types
//!
//! Core pricing types used throughout Forno.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Pricing Types                                   │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  DiscountInput  │   │  DiscountRule   │   │ DiscountResult  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  base_price     │──►│  kind           │──►│  final_price    │       │
//! │  │  age, group     │   │  percentage     │   │  discount_amount│       │
//! │  │  flags          │   │  priority, tier │   │  floor applied  │       │
//! │  │  order_date     │   │  condition      │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │   Percentage    │   │  DiscountKind   │                             │
//! │  │  0..=100 whole  │   │  rule names     │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`DiscountRule`](crate::discount::DiscountRule) lives next to the rule table
//! in the `discount` module because it carries a predicate.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

/// Group size from which the group brackets start, and from which a group
/// suppresses child discounts.
pub const MIN_DISCOUNTED_GROUP: i64 = 15;

// =============================================================================
// Percentage
// =============================================================================

/// A whole-number percentage between 0 and 100.
///
/// Deserializing goes through [`TryFrom<u8>`], so `101` is an error rather
/// than a percentage the evaluator would have to guard against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(try_from = "u8")]
pub struct Percentage(u8);

impl Percentage {
    /// Creates a percentage; values above 100 are clamped to 100.
    #[inline]
    pub const fn from_whole(pct: u8) -> Self {
        if pct > 100 {
            Percentage(100)
        } else {
            Percentage(pct)
        }
    }

    /// Returns the percentage as a whole number (15 = 15%).
    #[inline]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Returns the percentage as an exact decimal whole number.
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::from(self.0)
    }

    /// Zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percentage(0)
    }

    /// Checks if the percentage is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Percentage::zero()
    }
}

impl TryFrom<u8> for Percentage {
    type Error = ValidationError;

    fn try_from(pct: u8) -> Result<Self, Self::Error> {
        if pct > 100 {
            return Err(ValidationError::OutOfRange {
                field: "Percentage",
                min: 0,
                max: 100,
            });
        }
        Ok(Percentage(pct))
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

// =============================================================================
// Discount Kind
// =============================================================================

/// Identity of each rule in the discount table.
///
/// Serialized as the customer-facing rule name, which is what the order form
/// and the order record display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum DiscountKind {
    #[serde(rename = "Disability Discount")]
    Disability,
    #[serde(rename = "Senior Discount")]
    Senior,
    #[serde(rename = "Group Discount (25+ people)")]
    LargeGroup,
    #[serde(rename = "Group Discount (21-24 people)")]
    MediumGroup,
    #[serde(rename = "Group Discount (15-20 people)")]
    SmallGroup,
    #[serde(rename = "Child Discount (Under 4)")]
    Toddler,
    #[serde(rename = "Child Discount (4-11 years)")]
    Child,
    #[serde(rename = "Loyalty Card Discount")]
    LoyaltyCard,
    #[serde(rename = "Weekend Discount")]
    Weekend,
    #[serde(rename = "Early Diner Discount")]
    EarlyDiner,
}

impl DiscountKind {
    /// Every kind, in rule table order.
    pub const ALL: [DiscountKind; 10] = [
        DiscountKind::Disability,
        DiscountKind::Senior,
        DiscountKind::LargeGroup,
        DiscountKind::MediumGroup,
        DiscountKind::SmallGroup,
        DiscountKind::Toddler,
        DiscountKind::Child,
        DiscountKind::LoyaltyCard,
        DiscountKind::Weekend,
        DiscountKind::EarlyDiner,
    ];

    /// Customer-facing rule name.
    pub const fn name(&self) -> &'static str {
        match self {
            DiscountKind::Disability => "Disability Discount",
            DiscountKind::Senior => "Senior Discount",
            DiscountKind::LargeGroup => "Group Discount (25+ people)",
            DiscountKind::MediumGroup => "Group Discount (21-24 people)",
            DiscountKind::SmallGroup => "Group Discount (15-20 people)",
            DiscountKind::Toddler => "Child Discount (Under 4)",
            DiscountKind::Child => "Child Discount (4-11 years)",
            DiscountKind::LoyaltyCard => "Loyalty Card Discount",
            DiscountKind::Weekend => "Weekend Discount",
            DiscountKind::EarlyDiner => "Early Diner Discount",
        }
    }
}

impl fmt::Display for DiscountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Rule Tier
// =============================================================================

/// Which pass of the evaluation a rule belongs to.
///
/// ```text
/// Primary pass:   Disability → Senior → Group ×3 → Child ×2 → Loyalty
///                 first match wins, stop
///                      │ nothing matched
///                      ▼
/// Fallback pass:  Weekend → Early Diner
///                 first match wins
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RuleTier {
    /// Individual, group and membership discounts.
    Primary,
    /// Calendar discounts, applied only when no primary rule matched.
    Fallback,
}

// =============================================================================
// Discount Input
// =============================================================================

/// Everything the evaluator needs to know about one order.
///
/// Numeric fields are signed on purpose: a negative value is a caller bug that
/// [`calculate_final_price`](crate::discount::calculate_final_price) reports by
/// field name.
///
/// `base_price` is in currency units and kept exactly as submitted, so a
/// sub-cent price like `4.996` reaches the floor check unrounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DiscountInput {
    /// Order subtotal before any discount.
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub base_price: Decimal,

    pub has_loyalty_card: bool,

    pub is_disabled: bool,

    /// Self-declared on the order form. Carried for the order record only:
    /// early diner status is derived from `order_date`.
    #[serde(default)]
    pub is_early_diner: bool,

    /// Customer age in years; `None` when not given.
    #[serde(default)]
    pub age: Option<i64>,

    /// Party size; `None` or `Some(0)` both mean "no group".
    #[serde(default)]
    pub group_size: Option<i64>,

    /// When the order is placed, with the offset it was submitted in.
    #[ts(as = "String")]
    pub order_date: DateTime<FixedOffset>,
}

impl DiscountInput {
    /// Creates an input with no customer attributes set.
    pub fn new(base_price: Decimal, order_date: DateTime<FixedOffset>) -> Self {
        DiscountInput {
            base_price,
            has_loyalty_card: false,
            is_disabled: false,
            is_early_diner: false,
            age: None,
            group_size: None,
            order_date,
        }
    }

    /// Group size with "no group" read as zero.
    #[inline]
    pub fn group_size_or_zero(&self) -> i64 {
        self.group_size.unwrap_or(0)
    }

    /// True when the order is not placed for a group.
    #[inline]
    pub fn has_no_group(&self) -> bool {
        self.group_size_or_zero() == 0
    }

    /// True when the party is large enough for any group bracket.
    #[inline]
    pub fn is_discounted_group(&self) -> bool {
        self.group_size_or_zero() >= MIN_DISCOUNTED_GROUP
    }
}

// =============================================================================
// Discount Result
// =============================================================================

/// Outcome of one evaluation.
///
/// `original_price` echoes the input unchanged. `discount_amount` and
/// `final_price` are each rounded half-up to the cent from exact values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DiscountResult {
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub original_price: Decimal,
    #[ts(type = "number")]
    pub final_price: Money,
    /// Winning rule, `None` when no rule matched.
    pub discount_applied: Option<DiscountKind>,
    pub discount_percentage: Percentage,
    #[ts(type = "number")]
    pub discount_amount: Money,
    /// Set only when the unrounded discounted price was strictly below the floor.
    pub price_floor_applied: bool,
}

// =============================================================================
// Unit Tests
// =============================================================================
