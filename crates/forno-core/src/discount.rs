//! # Discount Evaluator
//!
//! Picks at most one discount for an order and prices it.
//!
//! ## Rule Table
//! ```text
//! ┌──────┬───────────────────────────────┬─────┬──────────┬──────────────────────────────┐
//! │ Prio │ Rule                          │  %  │ Tier     │ Condition                    │
//! ├──────┼───────────────────────────────┼─────┼──────────┼──────────────────────────────┤
//! │  1   │ Disability Discount           │ 90  │ Primary  │ disabled, no group           │
//! │  2   │ Senior Discount               │ 70  │ Primary  │ age >= 60, no group          │
//! │  3   │ Group Discount (25+ people)   │ 50  │ Primary  │ group >= 25                  │
//! │  3   │ Group Discount (21-24 people) │ 30  │ Primary  │ 21 <= group <= 24            │
//! │  3   │ Group Discount (15-20 people) │ 20  │ Primary  │ 15 <= group <= 20            │
//! │  4   │ Child Discount (Under 4)      │ 50  │ Primary  │ age < 4, group < 15          │
//! │  4   │ Child Discount (4-11 years)   │ 20  │ Primary  │ 4 <= age < 12, group < 15    │
//! │  5   │ Loyalty Card Discount         │ 15  │ Primary  │ loyalty card                 │
//! │  6   │ Weekend Discount              │ 10  │ Fallback │ Sat/Sun in Rome              │
//! │  7   │ Early Diner Discount          │ 10  │ Fallback │ before 20:00 Rome, weekday   │
//! └──────┴───────────────────────────────┴─────┴──────────┴──────────────────────────────┘
//! ```
//!
//! ## Evaluation
//! ```text
//! DiscountInput
//!      │
//!      ▼
//! ensure_non_negative ──► Err(Validation)      (negative price / age / group)
//!      │
//!      ▼
//! first matching Primary rule ──┐
//!      │ none                   │
//!      ▼                        │
//! first matching Fallback rule ─┤
//!      │ none                   │
//!      ▼                        ▼
//!   0% off               rule percentage
//!      │                        │
//!      └──────────┬─────────────┘
//!                 ▼
//! discount = base × pct / 100             exact Decimal
//! final    = base − discount                exact Decimal
//! floor    = final < €5.00                  compared before rounding
//!                 │
//!                 ▼
//! round discount and final half-up to the cent, or charge €5.00
//! ```
//!
//! The base price is never rounded: `4.996` is below the floor even though it
//! would round to `5.00`.
//!
//! The table is a `static`, so evaluation allocates nothing, locks nothing and
//! can run on any number of threads at once.

use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use tracing::{debug, trace};

use crate::calendar;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{DiscountInput, DiscountKind, DiscountResult, Percentage, RuleTier};
use crate::validation::ensure_non_negative;

/// Lowest price an order can be charged after a discount.
pub const PRICE_FLOOR: Money = Money::from_cents(500);

/// Age from which the senior discount applies.
pub const SENIOR_MIN_AGE: i64 = 60;

// =============================================================================
// Discount Rule
// =============================================================================

/// One row of the rule table: a named, prioritized predicate with a percentage.
///
/// Rules are only ever built in [`DISCOUNT_RULES`]; callers read them through
/// [`discount_rules`].
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountRule {
    #[serde(rename = "name")]
    kind: DiscountKind,
    percentage: Percentage,
    priority: u8,
    tier: RuleTier,
    #[serde(skip)]
    condition: fn(&DiscountInput) -> bool,
}

impl DiscountRule {
    pub fn kind(&self) -> DiscountKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn percentage(&self) -> Percentage {
        self.percentage
    }

    /// Ordinal rank; lower wins.
    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn tier(&self) -> RuleTier {
        self.tier
    }

    /// Evaluates the rule's own condition, ignoring every other rule.
    pub fn applies_to(&self, input: &DiscountInput) -> bool {
        (self.condition)(input)
    }
}

impl fmt::Debug for DiscountRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscountRule")
            .field("kind", &self.kind)
            .field("percentage", &self.percentage)
            .field("priority", &self.priority)
            .field("tier", &self.tier)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Rule Table
// =============================================================================

static DISCOUNT_RULES: [DiscountRule; 10] = [
    DiscountRule {
        kind: DiscountKind::Disability,
        percentage: Percentage::from_whole(90),
        priority: 1,
        tier: RuleTier::Primary,
        condition: disability_applies,
    },
    DiscountRule {
        kind: DiscountKind::Senior,
        percentage: Percentage::from_whole(70),
        priority: 2,
        tier: RuleTier::Primary,
        condition: senior_applies,
    },
    DiscountRule {
        kind: DiscountKind::LargeGroup,
        percentage: Percentage::from_whole(50),
        priority: 3,
        tier: RuleTier::Primary,
        condition: large_group_applies,
    },
    DiscountRule {
        kind: DiscountKind::MediumGroup,
        percentage: Percentage::from_whole(30),
        priority: 3,
        tier: RuleTier::Primary,
        condition: medium_group_applies,
    },
    DiscountRule {
        kind: DiscountKind::SmallGroup,
        percentage: Percentage::from_whole(20),
        priority: 3,
        tier: RuleTier::Primary,
        condition: small_group_applies,
    },
    DiscountRule {
        kind: DiscountKind::Toddler,
        percentage: Percentage::from_whole(50),
        priority: 4,
        tier: RuleTier::Primary,
        condition: toddler_applies,
    },
    DiscountRule {
        kind: DiscountKind::Child,
        percentage: Percentage::from_whole(20),
        priority: 4,
        tier: RuleTier::Primary,
        condition: child_applies,
    },
    DiscountRule {
        kind: DiscountKind::LoyaltyCard,
        percentage: Percentage::from_whole(15),
        priority: 5,
        tier: RuleTier::Primary,
        condition: loyalty_applies,
    },
    DiscountRule {
        kind: DiscountKind::Weekend,
        percentage: Percentage::from_whole(10),
        priority: 6,
        tier: RuleTier::Fallback,
        condition: weekend_applies,
    },
    DiscountRule {
        kind: DiscountKind::EarlyDiner,
        percentage: Percentage::from_whole(10),
        priority: 7,
        tier: RuleTier::Fallback,
        condition: early_diner_applies,
    },
];

// Individual discounts never stack on top of a group booking.
fn disability_applies(input: &DiscountInput) -> bool {
    input.is_disabled && input.has_no_group()
}

fn senior_applies(input: &DiscountInput) -> bool {
    input.age.is_some_and(|age| age >= SENIOR_MIN_AGE) && input.has_no_group()
}

// Brackets are disjoint: at most one group rule can match.
fn large_group_applies(input: &DiscountInput) -> bool {
    input.group_size_or_zero() >= 25
}

fn medium_group_applies(input: &DiscountInput) -> bool {
    (21..=24).contains(&input.group_size_or_zero())
}

fn small_group_applies(input: &DiscountInput) -> bool {
    (15..=20).contains(&input.group_size_or_zero())
}

fn toddler_applies(input: &DiscountInput) -> bool {
    input.age.is_some_and(|age| age < 4) && !input.is_discounted_group()
}

fn child_applies(input: &DiscountInput) -> bool {
    input.age.is_some_and(|age| (4..12).contains(&age)) && !input.is_discounted_group()
}

fn loyalty_applies(input: &DiscountInput) -> bool {
    input.has_loyalty_card
}

fn weekend_applies(input: &DiscountInput) -> bool {
    calendar::is_weekend(&input.order_date)
}

fn early_diner_applies(input: &DiscountInput) -> bool {
    calendar::is_early_diner_hour(&input.order_date) && !calendar::is_weekend(&input.order_date)
}

// =============================================================================
// Public API
// =============================================================================

/// Returns the rule table in precedence order.
///
/// The slice is `'static` and immutable; there is no way to change the rules
/// at runtime.
///
/// ## Example
/// ```rust
/// use forno_core::discount::discount_rules;
///
/// let rules = discount_rules();
/// assert_eq!(rules.len(), 10);
/// assert_eq!(rules[0].name(), "Disability Discount");
/// assert_eq!(rules[0].percentage().value(), 90);
/// ```
pub fn discount_rules() -> &'static [DiscountRule] {
    &DISCOUNT_RULES
}

/// Picks the winning rule for an input, if any.
///
/// Primary rules are scanned first and the first match wins. Fallback rules
/// are consulted only when no primary rule matched.
pub fn select_rule(input: &DiscountInput) -> Option<&'static DiscountRule> {
    first_match(RuleTier::Primary, input).or_else(|| first_match(RuleTier::Fallback, input))
}

fn first_match(tier: RuleTier, input: &DiscountInput) -> Option<&'static DiscountRule> {
    DISCOUNT_RULES
        .iter()
        .filter(|rule| rule.tier == tier)
        .find(|rule| rule.applies_to(input))
}

/// Evaluates the discount for one order.
///
/// ## Errors
/// - `CoreError::Validation` when the base price, age or group size is negative
/// - `CoreError::AmountTooLarge` when a rounded amount does not fit in cents
///
/// ## Example
/// ```rust
/// use chrono::DateTime;
/// use forno_core::discount::calculate_final_price;
/// use forno_core::types::{DiscountInput, DiscountKind};
/// use rust_decimal::Decimal;
///
/// let at = DateTime::parse_from_rfc3339("2024-01-15T20:00:00Z").unwrap();
/// let input = DiscountInput {
///     has_loyalty_card: true,
///     ..DiscountInput::new(Decimal::new(1033, 2), at)
/// };
///
/// let result = calculate_final_price(&input).unwrap();
/// assert_eq!(result.discount_applied, Some(DiscountKind::LoyaltyCard));
/// assert_eq!(result.discount_amount.cents(), 155);
/// assert_eq!(result.final_price.cents(), 878);
/// ```
pub fn calculate_final_price(input: &DiscountInput) -> CoreResult<DiscountResult> {
    ensure_non_negative(input)?;

    let rule = select_rule(input);
    let percentage = rule.map(DiscountRule::percentage).unwrap_or_default();
    let base = input.base_price;

    let exact_discount = base
        .checked_mul(percentage.to_decimal())
        .and_then(|amount| amount.checked_div(Decimal::ONE_HUNDRED))
        .ok_or(CoreError::AmountTooLarge)?;
    let exact_final = base
        .checked_sub(exact_discount)
        .ok_or(CoreError::AmountTooLarge)?;

    let discount_amount =
        Money::round_from_decimal(exact_discount).ok_or(CoreError::AmountTooLarge)?;
    let price_floor_applied = exact_final < PRICE_FLOOR.to_decimal();
    let final_price = if price_floor_applied {
        trace!(%base, %percentage, %exact_final, "discounted price below floor, clamping");
        PRICE_FLOOR
    } else {
        Money::round_from_decimal(exact_final).ok_or(CoreError::AmountTooLarge)?
    };

    debug!(
        rule = rule.map(DiscountRule::name).unwrap_or("none"),
        %base,
        %final_price,
        price_floor_applied,
        "discount evaluated"
    );

    Ok(DiscountResult {
        original_price: base,
        final_price,
        discount_applied: rule.map(DiscountRule::kind),
        discount_percentage: percentage,
        discount_amount,
        price_floor_applied,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use chrono::{DateTime, Duration, FixedOffset};
    use std::str::FromStr;

    // Monday 2024-01-15, 21:00 in Rome: no calendar discount applies
    const MONDAY_EVENING: &str = "2024-01-15T20:00:00Z";
    // Monday 2024-01-15, 16:00 in Rome
    const MONDAY_AFTERNOON: &str = "2024-01-15T15:00:00Z";
    // Saturday 2024-01-13, 21:00 in Rome
    const SATURDAY_EVENING: &str = "2024-01-13T20:00:00Z";
    // Sunday 2024-01-14, 21:00 in Rome
    const SUNDAY_EVENING: &str = "2024-01-14T20:00:00Z";

    fn at(text: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(text).unwrap()
    }

    fn price(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    fn base_input() -> DiscountInput {
        DiscountInput::new(price("20.00"), at(MONDAY_EVENING))
    }

    fn evaluate(input: DiscountInput) -> DiscountResult {
        calculate_final_price(&input).unwrap()
    }

    fn applied(input: DiscountInput) -> Option<DiscountKind> {
        evaluate(input).discount_applied
    }

    // -------------------------------------------------------------------------
    // Strict guard
    // -------------------------------------------------------------------------

    #[test]
    fn test_negative_base_price_is_rejected() {
        let err = calculate_final_price(&DiscountInput {
            base_price: price("-10.00"),
            ..base_input()
        })
        .unwrap_err();

        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Negative { field: "Base price" })
        ));
        assert_eq!(err.to_string(), "Base price cannot be negative");
    }

    #[test]
    fn test_negative_age_and_group_are_rejected() {
        let err = calculate_final_price(&DiscountInput {
            age: Some(-1),
            ..base_input()
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Age cannot be negative");

        let err = calculate_final_price(&DiscountInput {
            group_size: Some(-5),
            ..base_input()
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Group size cannot be negative");
    }

    #[test]
    fn test_absent_group_size_is_accepted() {
        let result = evaluate(base_input());
        assert_eq!(result.discount_applied, None);
        assert_eq!(result.final_price, Money::from_cents(2000));
    }

    // -------------------------------------------------------------------------
    // Rule table
    // -------------------------------------------------------------------------

    #[test]
    fn test_rule_table_order() {
        let kinds: Vec<_> = discount_rules().iter().map(DiscountRule::kind).collect();
        assert_eq!(kinds, DiscountKind::ALL.to_vec());

        let priorities: Vec<_> = discount_rules().iter().map(DiscountRule::priority).collect();
        assert_eq!(priorities, vec![1, 2, 3, 3, 3, 4, 4, 5, 6, 7]);

        let fallbacks: Vec<_> = discount_rules()
            .iter()
            .filter(|rule| rule.tier() == RuleTier::Fallback)
            .map(DiscountRule::name)
            .collect();
        assert_eq!(fallbacks, vec!["Weekend Discount", "Early Diner Discount"]);
    }

    #[test]
    fn test_rule_table_is_shared() {
        // same static backing store on every call
        assert!(std::ptr::eq(discount_rules(), discount_rules()));
    }

    #[test]
    fn test_rule_table_serializes_without_conditions() {
        let value = serde_json::to_value(&discount_rules()[7]).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "Loyalty Card Discount",
                "percentage": 15,
                "priority": 5,
                "tier": "primary"
            })
        );
    }

    // -------------------------------------------------------------------------
    // Disability (90%)
    // -------------------------------------------------------------------------

    #[test]
    fn test_disability_discount_hits_floor() {
        let result = evaluate(DiscountInput {
            is_disabled: true,
            ..base_input()
        });
        assert_eq!(result.discount_applied, Some(DiscountKind::Disability));
        assert_eq!(result.discount_percentage.value(), 90);
        assert_eq!(result.discount_amount, Money::from_cents(1800));
        assert_eq!(result.final_price, Money::from_cents(500));
        assert!(result.price_floor_applied);
    }

    #[test]
    fn test_disability_discount_low_base_price() {
        let result = evaluate(DiscountInput {
            base_price: price("10.00"),
            is_disabled: true,
            ..base_input()
        });
        assert_eq!(result.discount_amount, Money::from_cents(900));
        assert_eq!(result.final_price, Money::from_cents(500));
        assert!(result.price_floor_applied);
    }

    #[test]
    fn test_disability_beats_senior() {
        let kind = applied(DiscountInput {
            is_disabled: true,
            age: Some(65),
            ..base_input()
        });
        assert_eq!(kind, Some(DiscountKind::Disability));
    }

    #[test]
    fn test_disability_with_group_size_zero() {
        let kind = applied(DiscountInput {
            is_disabled: true,
            group_size: Some(0),
            ..base_input()
        });
        assert_eq!(kind, Some(DiscountKind::Disability));
    }

    #[test]
    fn test_disability_suppressed_by_any_group() {
        let kind = applied(DiscountInput {
            is_disabled: true,
            group_size: Some(15),
            ..base_input()
        });
        assert_eq!(kind, Some(DiscountKind::SmallGroup));

        // a small party below the group brackets still loses the disability discount
        let kind = applied(DiscountInput {
            is_disabled: true,
            group_size: Some(4),
            ..base_input()
        });
        assert_eq!(kind, None);
    }

    // -------------------------------------------------------------------------
    // Senior (70%)
    // -------------------------------------------------------------------------

    #[test]
    fn test_senior_discount_at_sixty() {
        let result = evaluate(DiscountInput {
            age: Some(60),
            ..base_input()
        });
        assert_eq!(result.discount_applied, Some(DiscountKind::Senior));
        assert_eq!(result.discount_amount, Money::from_cents(1400));
        assert_eq!(result.final_price, Money::from_cents(600));
        assert!(!result.price_floor_applied);
    }

    #[test]
    fn test_senior_boundaries() {
        assert_eq!(
            applied(DiscountInput { age: Some(75), ..base_input() }),
            Some(DiscountKind::Senior)
        );
        assert_eq!(applied(DiscountInput { age: Some(59), ..base_input() }), None);
    }

    #[test]
    fn test_senior_suppressed_by_group() {
        let kind = applied(DiscountInput {
            age: Some(65),
            group_size: Some(20),
            ..base_input()
        });
        assert_eq!(kind, Some(DiscountKind::SmallGroup));

        let kind = applied(DiscountInput {
            age: Some(65),
            group_size: Some(2),
            ..base_input()
        });
        assert_eq!(kind, None);
    }

    // -------------------------------------------------------------------------
    // Groups (50 / 30 / 20%)
    // -------------------------------------------------------------------------

    #[test]
    fn test_group_brackets() {
        let cases = [
            (14, None),
            (15, Some(DiscountKind::SmallGroup)),
            (20, Some(DiscountKind::SmallGroup)),
            (21, Some(DiscountKind::MediumGroup)),
            (24, Some(DiscountKind::MediumGroup)),
            (25, Some(DiscountKind::LargeGroup)),
            (30, Some(DiscountKind::LargeGroup)),
        ];

        for (size, expected) in cases {
            let kind = applied(DiscountInput {
                group_size: Some(size),
                ..base_input()
            });
            assert_eq!(kind, expected, "group of {size}");
        }
    }

    #[test]
    fn test_group_prices() {
        let small = evaluate(DiscountInput { group_size: Some(15), ..base_input() });
        assert_eq!(small.final_price, Money::from_cents(1600));

        let medium = evaluate(DiscountInput { group_size: Some(21), ..base_input() });
        assert_eq!(medium.final_price, Money::from_cents(1400));

        let large = evaluate(DiscountInput { group_size: Some(25), ..base_input() });
        assert_eq!(large.final_price, Money::from_cents(1000));
    }

    #[test]
    fn test_group_rules_are_mutually_exclusive() {
        let group_kinds = [
            DiscountKind::LargeGroup,
            DiscountKind::MediumGroup,
            DiscountKind::SmallGroup,
        ];

        for size in 0..=60 {
            let input = DiscountInput {
                group_size: Some(size),
                ..base_input()
            };
            let matches = discount_rules()
                .iter()
                .filter(|rule| group_kinds.contains(&rule.kind()))
                .filter(|rule| rule.applies_to(&input))
                .count();
            assert!(matches <= 1, "group of {size} matched {matches} brackets");
        }
    }

    // -------------------------------------------------------------------------
    // Children (50 / 20%)
    // -------------------------------------------------------------------------

    #[test]
    fn test_child_brackets() {
        let toddler = evaluate(DiscountInput { age: Some(3), ..base_input() });
        assert_eq!(toddler.discount_applied, Some(DiscountKind::Toddler));
        assert_eq!(toddler.final_price, Money::from_cents(1000));

        let four = evaluate(DiscountInput { age: Some(4), ..base_input() });
        assert_eq!(four.discount_applied, Some(DiscountKind::Child));
        assert_eq!(four.final_price, Money::from_cents(1600));

        assert_eq!(
            applied(DiscountInput { age: Some(0), ..base_input() }),
            Some(DiscountKind::Toddler)
        );
        assert_eq!(
            applied(DiscountInput { age: Some(11), ..base_input() }),
            Some(DiscountKind::Child)
        );
        assert_eq!(applied(DiscountInput { age: Some(12), ..base_input() }), None);
    }

    #[test]
    fn test_group_beats_child() {
        let result = evaluate(DiscountInput {
            base_price: price("30.00"),
            age: Some(1),
            group_size: Some(25),
            ..base_input()
        });
        assert_eq!(result.discount_applied, Some(DiscountKind::LargeGroup));
        assert_eq!(result.final_price, Money::from_cents(1500));

        let result = evaluate(DiscountInput {
            base_price: price("50.00"),
            age: Some(1),
            group_size: Some(15),
            ..base_input()
        });
        assert_eq!(result.discount_applied, Some(DiscountKind::SmallGroup));
        assert_eq!(result.final_price, Money::from_cents(4000));
    }

    #[test]
    fn test_child_keeps_discount_in_small_party() {
        // below the group brackets a child still qualifies
        let kind = applied(DiscountInput {
            age: Some(1),
            group_size: Some(6),
            ..base_input()
        });
        assert_eq!(kind, Some(DiscountKind::Toddler));
    }

    // -------------------------------------------------------------------------
    // Loyalty (15%)
    // -------------------------------------------------------------------------

    #[test]
    fn test_loyalty_discount() {
        let result = evaluate(DiscountInput {
            has_loyalty_card: true,
            ..base_input()
        });
        assert_eq!(result.discount_applied, Some(DiscountKind::LoyaltyCard));
        assert_eq!(result.final_price, Money::from_cents(1700));
        assert!(!result.price_floor_applied);
    }

    #[test]
    fn test_senior_beats_loyalty() {
        let kind = applied(DiscountInput {
            has_loyalty_card: true,
            age: Some(65),
            ..base_input()
        });
        assert_eq!(kind, Some(DiscountKind::Senior));
    }

    // -------------------------------------------------------------------------
    // Weekend / Early diner (10%, fallback tier)
    // -------------------------------------------------------------------------

    #[test]
    fn test_weekend_discount() {
        for when in [SATURDAY_EVENING, SUNDAY_EVENING] {
            let result = evaluate(DiscountInput {
                order_date: at(when),
                ..base_input()
            });
            assert_eq!(result.discount_applied, Some(DiscountKind::Weekend));
            assert_eq!(result.discount_percentage.value(), 10);
            assert_eq!(result.final_price, Money::from_cents(1800));
        }
    }

    #[test]
    fn test_early_diner_from_order_time() {
        let result = evaluate(DiscountInput {
            order_date: at(MONDAY_AFTERNOON),
            ..base_input()
        });
        assert_eq!(result.discount_applied, Some(DiscountKind::EarlyDiner));
        assert_eq!(result.final_price, Money::from_cents(1800));
    }

    #[test]
    fn test_early_diner_flag_does_not_drive_evaluation() {
        // declared early diner, but ordering at 21:00 on a Monday
        let kind = applied(DiscountInput {
            is_early_diner: true,
            ..base_input()
        });
        assert_eq!(kind, None);
    }

    #[test]
    fn test_weekend_afternoon_is_weekend_not_early_diner() {
        // Saturday 19:00 in Rome
        let kind = applied(DiscountInput {
            order_date: at("2024-01-13T18:00:00Z"),
            is_early_diner: true,
            ..base_input()
        });
        assert_eq!(kind, Some(DiscountKind::Weekend));
    }

    #[test]
    fn test_calendar_rules_never_override_primary() {
        for when in [SATURDAY_EVENING, MONDAY_AFTERNOON] {
            let kind = applied(DiscountInput {
                has_loyalty_card: true,
                order_date: at(when),
                ..base_input()
            });
            assert_eq!(kind, Some(DiscountKind::LoyaltyCard));
        }
    }

    #[test]
    fn test_calendar_rules_never_both_apply() {
        let weekend = &discount_rules()[8];
        let early = &discount_rules()[9];
        let start = at("2024-01-08T00:00:00Z");

        // every half hour across a full week
        for step in 0..(7 * 48) {
            let input = DiscountInput {
                order_date: start + Duration::minutes(30 * step),
                ..base_input()
            };
            assert!(!(weekend.applies_to(&input) && early.applies_to(&input)));
        }
    }

    #[test]
    fn test_weekend_uses_rome_calendar() {
        // Friday 23:30 UTC is Saturday 00:30 in Rome
        let kind = applied(DiscountInput {
            order_date: at("2024-01-12T23:30:00Z"),
            ..base_input()
        });
        assert_eq!(kind, Some(DiscountKind::Weekend));

        // Saturday in UTC+5 is still Friday evening in Rome
        let kind = applied(DiscountInput {
            order_date: at("2024-01-13T01:00:00+05:00"),
            ..base_input()
        });
        assert_eq!(kind, None);
    }

    // -------------------------------------------------------------------------
    // Price floor and rounding
    // -------------------------------------------------------------------------

    #[test]
    fn test_floor_from_disability_on_small_order() {
        let result = evaluate(DiscountInput {
            base_price: price("5.50"),
            is_disabled: true,
            ..base_input()
        });
        assert_eq!(result.final_price, PRICE_FLOOR);
        assert!(result.price_floor_applied);
    }

    #[test]
    fn test_floor_boundary_is_exclusive() {
        // 16.67 × 30% = 5.001: rounds to the floor value, but was never below it
        let result = evaluate(DiscountInput {
            base_price: price("16.67"),
            age: Some(65),
            ..base_input()
        });
        assert_eq!(result.final_price, Money::from_cents(500));
        assert!(!result.price_floor_applied);

        // 10.00 × 50% = 5.00 exactly
        let result = evaluate(DiscountInput {
            base_price: price("10.00"),
            age: Some(2),
            ..base_input()
        });
        assert_eq!(result.final_price, Money::from_cents(500));
        assert!(!result.price_floor_applied);
    }

    #[test]
    fn test_floor_applies_without_discount() {
        let result = evaluate(DiscountInput {
            base_price: price("3.00"),
            ..base_input()
        });
        assert_eq!(result.discount_applied, None);
        assert!(result.discount_amount.is_zero());
        assert_eq!(result.final_price, PRICE_FLOOR);
        assert!(result.price_floor_applied);
    }

    #[test]
    fn test_rounding_half_up() {
        let result = evaluate(DiscountInput {
            base_price: price("10.33"),
            has_loyalty_card: true,
            ..base_input()
        });
        assert_eq!(result.discount_amount, Money::from_cents(155)); // 1.5495
        assert_eq!(result.final_price, Money::from_cents(878)); // 8.7805
    }

    #[test]
    fn test_sub_cent_base_price_is_not_rounded_first() {
        // 10.335 × 15% = 1.55025, 10.335 − 1.55025 = 8.78475
        let result = evaluate(DiscountInput {
            base_price: price("10.335"),
            has_loyalty_card: true,
            ..base_input()
        });
        assert_eq!(result.original_price, price("10.335"));
        assert_eq!(result.discount_amount, Money::from_cents(155));
        assert_eq!(result.final_price, Money::from_cents(878));
        assert!(!result.price_floor_applied);
    }

    #[test]
    fn test_sub_cent_base_price_below_floor() {
        // would round to 5.00, but the exact price is under the floor
        let result = evaluate(DiscountInput {
            base_price: price("4.996"),
            ..base_input()
        });
        assert_eq!(result.discount_applied, None);
        assert_eq!(result.original_price, price("4.996"));
        assert_eq!(result.final_price, PRICE_FLOOR);
        assert!(result.price_floor_applied);

        // 5.004 rounds down to 5.00, but was never below the floor
        let result = evaluate(DiscountInput {
            base_price: price("5.004"),
            ..base_input()
        });
        assert_eq!(result.final_price, Money::from_cents(500));
        assert!(!result.price_floor_applied);
    }

    #[test]
    fn test_sub_cent_negative_base_price_is_rejected() {
        let err = calculate_final_price(&DiscountInput {
            base_price: price("-0.004"),
            ..base_input()
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Base price cannot be negative");
    }

    #[test]
    fn test_unrepresentable_amount_is_an_error() {
        let err = calculate_final_price(&DiscountInput {
            base_price: Decimal::MAX,
            ..base_input()
        })
        .unwrap_err();
        assert!(matches!(err, CoreError::AmountTooLarge));
    }

    #[test]
    fn test_no_discount_defaults() {
        let result = evaluate(base_input());
        assert_eq!(result.original_price, price("20.00"));
        assert_eq!(result.discount_applied, None);
        assert!(result.discount_percentage.is_zero());
        assert!(result.discount_amount.is_zero());
        assert_eq!(result.final_price, Money::from_cents(2000));
        assert!(!result.price_floor_applied);
    }

    // -------------------------------------------------------------------------
    // Properties over a grid of inputs
    // -------------------------------------------------------------------------

    fn input_grid() -> Vec<DiscountInput> {
        let prices = [
            "0", "0.01", "4.99", "4.996", "5", "5.004", "5.50", "10", "10.33", "10.335", "16.66",
            "16.67", "20", "123.45",
        ];
        let ages = [None, Some(0), Some(3), Some(4), Some(11), Some(12), Some(59), Some(60), Some(90)];
        let groups = [None, Some(0), Some(1), Some(14), Some(15), Some(20), Some(21), Some(24), Some(25), Some(40)];
        let times = [MONDAY_EVENING, MONDAY_AFTERNOON, SATURDAY_EVENING, SUNDAY_EVENING];

        let mut grid = Vec::new();
        for &amount in &prices {
            for &age in &ages {
                for &group_size in &groups {
                    for &when in &times {
                        for flags in 0..4u8 {
                            grid.push(DiscountInput {
                                base_price: price(amount),
                                has_loyalty_card: flags & 1 != 0,
                                is_disabled: flags & 2 != 0,
                                is_early_diner: false,
                                age,
                                group_size,
                                order_date: at(when),
                            });
                        }
                    }
                }
            }
        }
        grid
    }

    #[test]
    fn test_properties_hold_across_grid() {
        for input in input_grid() {
            let result = evaluate(input.clone());

            // percentage agrees with the named rule
            let expected_pct = result
                .discount_applied
                .and_then(|kind| discount_rules().iter().find(|rule| rule.kind() == kind))
                .map(DiscountRule::percentage)
                .unwrap_or_default();
            assert_eq!(result.discount_percentage, expected_pct, "{input:?}");

            // floor invariant and flag
            assert!(result.final_price >= PRICE_FLOOR, "{input:?}");
            let pct = result.discount_percentage.to_decimal();
            let exact_final = input.base_price * (Decimal::ONE_HUNDRED - pct) / Decimal::ONE_HUNDRED;
            assert_eq!(result.price_floor_applied, exact_final < price("5"), "{input:?}");
            assert_eq!(result.original_price, input.base_price, "{input:?}");

            // individual discounts never go to a qualifying group
            if input.is_discounted_group() {
                assert!(matches!(
                    result.discount_applied,
                    Some(DiscountKind::LargeGroup | DiscountKind::MediumGroup | DiscountKind::SmallGroup)
                ));
            }
            if !input.has_no_group() {
                assert_ne!(result.discount_applied, Some(DiscountKind::Disability));
                assert_ne!(result.discount_applied, Some(DiscountKind::Senior));
            }

            // a calendar discount means no primary rule matched
            if matches!(
                result.discount_applied,
                Some(DiscountKind::Weekend | DiscountKind::EarlyDiner)
            ) {
                assert!(first_match(RuleTier::Primary, &input).is_none());
            }

            // idempotent
            assert_eq!(evaluate(input.clone()), result);
        }
    }
}
