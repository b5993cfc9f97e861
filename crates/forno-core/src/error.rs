//! # Error Types
//!
//! Domain-specific error types for forno-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  forno-core errors (this file)                                         │
//! │  ├── CoreError        - Pricing and order errors                       │
//! │  └── ValidationError  - Field-level input problems                     │
//! │                                                                         │
//! │  forno-quote errors (app crate)                                        │
//! │  └── QuoteError       - File, config and JSON failures                 │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → QuoteError → stderr               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two Ways To Fail Validation
//! - [`calculate_final_price`](crate::discount::calculate_final_price) stops at
//!   the first negative field and returns `CoreError::Validation`.
//! - [`validate_discount_input`](crate::validation::validate_discount_input)
//!   collects every [`ValidationError`] and hands back their messages.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core pricing errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Order line references a pizza that is not on the menu.
    #[error("Pizza not found: {0}")]
    PizzaNotFound(String),

    /// Order has no lines to price.
    #[error("Order must contain at least one item")]
    EmptyOrder,

    /// Order has exceeded maximum allowed lines.
    #[error("Order cannot have more than {max} items")]
    OrderTooLarge { max: usize },

    /// A price, line total or subtotal does not fit the money representation.
    #[error("Amount is too large to price")]
    AmountTooLarge,

    /// A discount input document failed the advisory checks.
    ///
    /// ## When This Occurs
    /// - Building a [`DiscountInput`](crate::types::DiscountInput) from JSON
    ///   whose fields are missing, mistyped or negative
    #[error("Invalid discount input: {}", .problems.join("; "))]
    InvalidInput { problems: Vec<String> },

    /// Validation error (wraps ValidationError).
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Field names are already human-readable ("Base price", "Group size") so the
/// display string can be shown as-is next to the form field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Numeric field is below zero.
    #[error("{field} cannot be negative")]
    Negative { field: &'static str },

    /// Field is missing, not a number, or negative.
    #[error("{field} must be a non-negative number")]
    NonNegativeNumber { field: &'static str },

    /// Optional numeric field holds something other than null or a number >= 0.
    #[error("{field} must be null or a non-negative number")]
    NullOrNonNegative { field: &'static str },

    /// Numeric field has a fractional part where a count is expected.
    #[error("{field} must be a whole number")]
    NotWholeNumber { field: &'static str },

    /// Flag field is missing or not a boolean.
    #[error("{field} must be a boolean")]
    NotBoolean { field: &'static str },

    /// Timestamp field is missing or cannot be read.
    #[error("{field} must be a valid timestamp")]
    InvalidTimestamp { field: &'static str },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: &'static str },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
