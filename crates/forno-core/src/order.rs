//! # Order Quoting
//!
//! Turns a menu and a list of order lines into a discounted quote.
//!
//! ```text
//! OrderRequest.items ──► Menu lookup ──► PricedLine (unit × qty)
//!                                              │ Σ
//!                                              ▼
//!                                          subtotal
//!                                              │ + customer attributes
//!                                              ▼
//!                                        DiscountInput ──► calculate_final_price
//!                                                                  │
//!                                                                  ▼
//!                                                         PriceCalculation
//! ```
//!
//! Lines freeze the pizza name and unit price at quote time, so a quote stays
//! readable after the menu changes.

use chrono::{DateTime, FixedOffset};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::discount::calculate_final_price;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{DiscountInput, DiscountResult};
use crate::validation::validate_quantity;
use crate::MAX_ORDER_ITEMS;

// =============================================================================
// Menu
// =============================================================================

/// A pizza on the menu.
///
/// `basePrice` is written in currency units (`8.50`) in menu files, at most
/// two decimal places.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_menu_price")]
    pub base_price: Money,
}

/// The menu a quote is priced against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Menu {
    #[serde(default)]
    pub pizzas: Vec<MenuItem>,
}

impl Menu {
    /// Looks up a pizza by id.
    pub fn find(&self, id: &str) -> Option<&MenuItem> {
        self.pizzas.iter().find(|pizza| pizza.id == id)
    }

    pub fn len(&self) -> usize {
        self.pizzas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pizzas.is_empty()
    }
}

/// Menu prices use [`Money`]'s currency-unit form and must not be negative.
fn deserialize_menu_price<'de, D>(deserializer: D) -> Result<Money, D::Error>
where
    D: Deserializer<'de>,
{
    let price = Money::deserialize(deserializer)?;
    if price.is_negative() {
        return Err(de::Error::custom(format!("menu price cannot be negative: {price}")));
    }
    Ok(price)
}

// =============================================================================
// Order Request
// =============================================================================

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub pizza_id: String,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// An order as submitted from the order form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    #[serde(default)]
    pub customer_age: Option<i64>,
    #[serde(default)]
    pub has_loyalty_card: bool,
    #[serde(default)]
    pub is_disabled: bool,
    #[serde(default)]
    pub is_early_diner: bool,
    #[serde(default)]
    pub group_size: Option<i64>,
    #[serde(deserialize_with = "crate::calendar::deserialize_order_time")]
    pub order_date_time: DateTime<FixedOffset>,
    pub items: Vec<OrderItem>,
}

impl OrderRequest {
    /// Builds the evaluator input for a given subtotal.
    ///
    /// A group size of zero means the form's group field was left at 0.
    pub fn discount_input(&self, subtotal: Money) -> DiscountInput {
        DiscountInput {
            base_price: subtotal.to_decimal(),
            has_loyalty_card: self.has_loyalty_card,
            is_disabled: self.is_disabled,
            is_early_diner: self.is_early_diner,
            age: self.customer_age,
            group_size: self.group_size.filter(|&size| size != 0),
            order_date: self.order_date_time,
        }
    }
}

// =============================================================================
// Quote
// =============================================================================

/// A priced order line with the menu data frozen at quote time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricedLine {
    pub pizza_id: String,
    /// Pizza name at quote time (frozen).
    pub name: String,
    #[ts(type = "number")]
    pub unit_price: Money,
    pub quantity: i64,
    /// unit_price × quantity
    #[ts(type = "number")]
    pub line_total: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Full quote for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceCalculation {
    #[ts(type = "number")]
    pub subtotal: Money,
    pub lines: Vec<PricedLine>,
    pub discount: DiscountResult,
}

impl PriceCalculation {
    /// Amount the customer pays.
    pub fn total(&self) -> Money {
        self.discount.final_price
    }
}

/// Prices an order against a menu.
///
/// ## Errors
/// - `EmptyOrder` / `OrderTooLarge` for the line count
/// - `Validation` for a quantity outside 1..=999, or a negative age/group size
/// - `PizzaNotFound` for an id missing from the menu
/// - `AmountTooLarge` when a line total or the subtotal overflows
///
/// ## Example
/// ```rust
/// use forno_core::order::{price_order, Menu, OrderRequest};
///
/// let menu: Menu = serde_json::from_str(
///     r#"{"pizzas": [{"id": "margherita", "name": "Margherita", "basePrice": 8.5}]}"#,
/// ).unwrap();
/// let request: OrderRequest = serde_json::from_str(
///     r#"{
///         "hasLoyaltyCard": true,
///         "orderDateTime": "2024-01-15T21:00",
///         "items": [{"pizzaId": "margherita", "quantity": 2}]
///     }"#,
/// ).unwrap();
///
/// let quote = price_order(&menu, &request).unwrap();
/// assert_eq!(quote.subtotal.cents(), 1700);
/// assert_eq!(quote.total().cents(), 1445);
/// ```
pub fn price_order(menu: &Menu, request: &OrderRequest) -> CoreResult<PriceCalculation> {
    if request.items.is_empty() {
        return Err(CoreError::EmptyOrder);
    }

    if request.items.len() > MAX_ORDER_ITEMS {
        return Err(CoreError::OrderTooLarge {
            max: MAX_ORDER_ITEMS,
        });
    }

    let lines = request
        .items
        .iter()
        .map(|item| price_line(menu, item))
        .collect::<CoreResult<Vec<_>>>()?;

    let subtotal = lines
        .iter()
        .try_fold(Money::zero(), |sum, line| sum.checked_add(line.line_total))
        .ok_or(CoreError::AmountTooLarge)?;
    let discount = calculate_final_price(&request.discount_input(subtotal))?;

    tracing::debug!(
        lines = lines.len(),
        %subtotal,
        total = %discount.final_price,
        "order priced"
    );

    Ok(PriceCalculation {
        subtotal,
        lines,
        discount,
    })
}

fn price_line(menu: &Menu, item: &OrderItem) -> CoreResult<PricedLine> {
    validate_quantity(item.quantity)?;

    let pizza = menu
        .find(&item.pizza_id)
        .ok_or_else(|| CoreError::PizzaNotFound(item.pizza_id.clone()))?;

    let line_total = pizza
        .base_price
        .checked_mul_quantity(item.quantity)
        .ok_or(CoreError::AmountTooLarge)?;

    Ok(PricedLine {
        pizza_id: pizza.id.clone(),
        name: pizza.name.clone(),
        unit_price: pizza.base_price,
        quantity: item.quantity,
        line_total,
        notes: item.notes.clone(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
