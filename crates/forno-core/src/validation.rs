//! # Validation Module
//!
//! Input validation for discount evaluation and order lines.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Advisory (validate_discount_input)                           │
//! │  ├── Works on the raw JSON document, so wrong types are reportable     │
//! │  ├── Collects EVERY problem, never fails                               │
//! │  └── Caller decides: block submission, show messages                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Conversion (parse_discount_input)                            │
//! │  └── Advisory findings become CoreError::InvalidInput                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Strict guard (ensure_non_negative)                           │
//! │  ├── Runs inside calculate_final_price on every call                   │
//! │  └── Stops at the first negative field                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use forno_core::validation::validate_discount_input;
//! use serde_json::json;
//!
//! let problems = validate_discount_input(&json!({
//!     "basePrice": -3,
//!     "hasLoyaltyCard": "yes",
//!     "isDisabled": false,
//!     "orderDate": "2024-01-15T15:00:00Z"
//! }));
//!
//! assert_eq!(problems, vec![
//!     "Base price must be a non-negative number".to_string(),
//!     "Loyalty card status must be a boolean".to_string(),
//! ]);
//! ```

use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};

use crate::calendar::parse_order_time;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::parse_currency_units;
use crate::types::DiscountInput;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const BASE_PRICE: &str = "Base price";
const AGE: &str = "Age";
const GROUP_SIZE: &str = "Group size";
const LOYALTY_CARD: &str = "Loyalty card status";
const DISABILITY: &str = "Disability status";
const EARLY_DINER: &str = "Early diner status";
const ORDER_DATE: &str = "Order date";

// =============================================================================
// Strict Guard
// =============================================================================

/// Rejects negative numeric fields, first failure wins.
///
/// ## Rules
/// - `base_price` must be >= 0
/// - `age`, when present, must be >= 0
/// - `group_size`, when present, must be >= 0
///
/// ## Example
/// ```rust
/// use chrono::DateTime;
/// use forno_core::types::DiscountInput;
/// use forno_core::validation::ensure_non_negative;
/// use rust_decimal::Decimal;
///
/// let at = DateTime::parse_from_rfc3339("2024-01-15T15:00:00Z").unwrap();
/// // -0.004 is still negative: the sign is checked before any rounding
/// let input = DiscountInput::new(Decimal::new(-4, 3), at);
///
/// let err = ensure_non_negative(&input).unwrap_err();
/// assert_eq!(err.to_string(), "Base price cannot be negative");
/// ```
pub fn ensure_non_negative(input: &DiscountInput) -> ValidationResult<()> {
    if input.base_price < Decimal::ZERO {
        return Err(ValidationError::Negative { field: BASE_PRICE });
    }

    if input.age.is_some_and(|age| age < 0) {
        return Err(ValidationError::Negative { field: AGE });
    }

    if input.group_size.is_some_and(|size| size < 0) {
        return Err(ValidationError::Negative { field: GROUP_SIZE });
    }

    Ok(())
}

// =============================================================================
// Advisory Validator
// =============================================================================

/// Lists every problem in a (possibly partial) discount input document.
///
/// Field names follow the order form: `basePrice` (currency units),
/// `hasLoyaltyCard`, `isDisabled`, `isEarlyDiner`, `age`, `groupSize`,
/// `orderDate`. A document that is not a JSON object is treated as empty.
pub fn validate_discount_input(draft: &Value) -> Vec<String> {
    collect_input_problems(draft)
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Typed form of [`validate_discount_input`].
pub fn collect_input_problems(draft: &Value) -> Vec<ValidationError> {
    let empty = Map::new();
    let fields = draft.as_object().unwrap_or(&empty);
    let mut problems = Vec::new();

    if !matches!(price_field(fields), Some(price) if price >= Decimal::ZERO) {
        problems.push(ValidationError::NonNegativeNumber { field: BASE_PRICE });
    }

    problems.extend(check_count(
        fields.get("age"),
        ValidationError::NonNegativeNumber { field: AGE },
        ValidationError::Negative { field: AGE },
        AGE,
    ));

    if !matches!(fields.get("hasLoyaltyCard"), Some(Value::Bool(_))) {
        problems.push(ValidationError::NotBoolean { field: LOYALTY_CARD });
    }

    if !matches!(fields.get("isDisabled"), Some(Value::Bool(_))) {
        problems.push(ValidationError::NotBoolean { field: DISABILITY });
    }

    if !matches!(
        fields.get("isEarlyDiner"),
        None | Some(Value::Null) | Some(Value::Bool(_))
    ) {
        problems.push(ValidationError::NotBoolean { field: EARLY_DINER });
    }

    problems.extend(check_count(
        fields.get("groupSize"),
        ValidationError::NullOrNonNegative { field: GROUP_SIZE },
        ValidationError::NullOrNonNegative { field: GROUP_SIZE },
        GROUP_SIZE,
    ));

    let order_date = fields.get("orderDate").and_then(Value::as_str);
    if order_date.and_then(parse_order_time).is_none() {
        problems.push(ValidationError::InvalidTimestamp { field: ORDER_DATE });
    }

    problems
}

/// Builds a [`DiscountInput`] from a JSON document, rejecting it with every
/// advisory finding when any exist.
pub fn parse_discount_input(draft: &Value) -> CoreResult<DiscountInput> {
    let problems = validate_discount_input(draft);
    if !problems.is_empty() {
        return Err(CoreError::InvalidInput { problems });
    }

    // every field below was checked by the advisory pass
    let empty = Map::new();
    let fields = draft.as_object().unwrap_or(&empty);
    let flag = |name: &str| fields.get(name).and_then(Value::as_bool).unwrap_or(false);
    let count = |name: &str| fields.get(name).and_then(Value::as_number).and_then(whole_number);

    let base_price =
        price_field(fields).ok_or(ValidationError::NonNegativeNumber { field: BASE_PRICE })?;
    let order_date = fields
        .get("orderDate")
        .and_then(Value::as_str)
        .and_then(parse_order_time)
        .ok_or(ValidationError::InvalidTimestamp { field: ORDER_DATE })?;

    Ok(DiscountInput {
        base_price,
        has_loyalty_card: flag("hasLoyaltyCard"),
        is_disabled: flag("isDisabled"),
        is_early_diner: flag("isEarlyDiner"),
        age: count("age"),
        group_size: count("groupSize"),
        order_date,
    })
}

/// Reads `basePrice` as exact currency units; `4.996` stays `4.996`.
fn price_field(fields: &Map<String, Value>) -> Option<Decimal> {
    match fields.get("basePrice")? {
        Value::Number(n) => parse_currency_units(&n.to_string()),
        _ => None,
    }
}

/// Checks an optional count field (absent and null are fine).
fn check_count(
    value: Option<&Value>,
    not_a_number: ValidationError,
    negative: ValidationError,
    field: &'static str,
) -> Option<ValidationError> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) if n.as_f64().is_some_and(|v| v < 0.0) => Some(negative),
        Some(Value::Number(n)) if whole_number(n).is_none() => {
            Some(ValidationError::NotWholeNumber { field })
        }
        Some(Value::Number(_)) => None,
        Some(_) => Some(not_a_number),
    }
}

/// Accepts `65` and `65.0`, rejects `3.5` and values beyond `i64`.
fn whole_number(n: &Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64)
            .map(|v| v as i64)
    })
}

// =============================================================================
// Order Line Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ```text
/// Order line: Margherita × 5
///       │
///       ▼
/// validate_quantity(5) ← THIS FUNCTION
///       │
///       ├── qty <= 0?   → Error: "Quantity must be positive"
///       ├── qty > 999?  → Error: "Quantity must be between 1 and 999"
///       └── OK → line total = unit price × 5
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive { field: "Quantity" });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "Quantity",
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
