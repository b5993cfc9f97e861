//! # forno-core: Discount Pricing for Forno
//!
//! This crate decides what an order costs. It holds the discount rule table,
//! the evaluator that picks a single winning rule, and the order quoting that
//! feeds it. Everything here is pure: no I/O, no clock, no shared state.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Forno Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Order form / forno-quote CLI                    │   │
//! │  │      pick pizzas ──► enter age, group, card ──► see the quote   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON (camelCase)                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ forno-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   order   │  │ discount  │  │ validation│  │  calendar │  │   │
//! │  │   │   Menu    │─►│ rule table│  │  advisory │  │ Rome time │  │   │
//! │  │   │  quoting  │  │ evaluator │  │  + guard  │  │ weekend   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO MUTABLE STATE • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`discount`] - Rule table and the evaluator
//! - [`order`] - Menu lookup and order quoting
//! - [`validation`] - Advisory input checks and the strict guard
//! - [`calendar`] - Order timestamps in the restaurant's timezone
//! - [`money`] - Charged amounts in integer cents
//! - [`types`] - Evaluator input/output types
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **One Discount**: At most one rule wins; discounts never stack
//! 2. **Fixed Rules**: The table is a `static` and cannot change at runtime
//! 3. **Exact Money**: Prices are exact decimals; charged amounts are rounded
//!    to whole cents (i64) once, at the end
//! 4. **Explicit Time**: "Now" is never read; the order carries its timestamp
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::DateTime;
//! use forno_core::{calculate_final_price, DiscountInput, DiscountKind};
//! use rust_decimal::Decimal;
//!
//! // Monday 2024-01-15, 21:00 in Rome
//! let at = DateTime::parse_from_rfc3339("2024-01-15T20:00:00Z").unwrap();
//! let input = DiscountInput {
//!     is_disabled: true,
//!     ..DiscountInput::new(Decimal::new(1000, 2), at)
//! };
//!
//! let result = calculate_final_price(&input).unwrap();
//! assert_eq!(result.discount_applied, Some(DiscountKind::Disability));
//! assert_eq!(result.discount_amount.cents(), 900);
//! assert_eq!(result.final_price.cents(), 500); // price floor
//! assert!(result.price_floor_applied);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calendar;
pub mod discount;
pub mod error;
pub mod money;
pub mod order;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use discount::{calculate_final_price, discount_rules, DiscountRule, PRICE_FLOOR};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::{price_order, Menu, MenuItem, OrderItem, OrderRequest, PriceCalculation, PricedLine};
pub use types::*;
pub use validation::validate_discount_input;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single order
pub const MAX_ORDER_ITEMS: usize = 100;

/// Maximum quantity of a single pizza on one line
///
/// ## Business Reason
/// Catches typos on the order form (1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
