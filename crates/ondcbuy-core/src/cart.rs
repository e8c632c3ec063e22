use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::{parse_price, FeeSchedule};
use crate::CoreError;

pub const MIN_QUANTITY: u32 = 1;
pub const MAX_QUANTITY: u32 = 99;

/// One line in the shopping cart. Unique by `id` within a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    /// Display price exactly as the catalog returned it, e.g. `"₹100"`.
    pub price: String,
    #[serde(default)]
    pub seller: String,
    #[serde(default)]
    pub image: String,
    pub quantity: u32,
    /// Older stored carts lack this field; it defaults to `false`.
    #[serde(default)]
    pub available_on_cod: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
}

impl CartItem {
    #[must_use]
    pub fn new(id: &str, name: &str, price: &str, quantity: u32) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            price: price.to_owned(),
            seller: String::new(),
            image: String::new(),
            quantity,
            available_on_cod: false,
            provider_id: None,
            location_id: None,
        }
    }

    /// Checks required fields and returns the parsed unit price.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingField`] for a blank `id` or `name`, or
    /// [`CoreError::InvalidPrice`] when `price` cannot be parsed.
    pub fn validate(&self) -> Result<Decimal, CoreError> {
        if self.id.trim().is_empty() {
            return Err(CoreError::MissingField("id"));
        }
        if self.name.trim().is_empty() {
            return Err(CoreError::MissingField("name"));
        }
        parse_price(&self.price)
    }

    /// Unit price × quantity. Unparseable prices count as zero.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        parse_price(&self.price).unwrap_or(Decimal::ZERO) * Decimal::from(self.quantity)
    }
}

/// Clamp a requested quantity into `MIN_QUANTITY..=MAX_QUANTITY`.
#[must_use]
pub fn clamp_quantity(requested: u32) -> u32 {
    requested.clamp(MIN_QUANTITY, MAX_QUANTITY)
}

/// Totals derived from the cart contents. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    pub line_count: usize,
    /// Sum of quantities across all lines.
    pub item_count: u32,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub convenience_fee: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl CartSummary {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            line_count: 0,
            item_count: 0,
            subtotal: Decimal::ZERO,
            delivery_fee: Decimal::ZERO,
            convenience_fee: Decimal::ZERO,
            tax: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }
}

/// Computes the cart summary from scratch.
///
/// Fees apply only to a non-empty cart. All amounts are rounded to two
/// decimal places.
#[must_use]
pub fn summarize(items: &[CartItem], fees: &FeeSchedule) -> CartSummary {
    if items.is_empty() {
        return CartSummary::empty();
    }

    let subtotal: Decimal = items.iter().map(CartItem::line_total).sum();
    let subtotal = subtotal.round_dp(2);
    let tax = (subtotal * fees.tax_rate).round_dp(2);
    let total = subtotal + fees.delivery_fee + fees.convenience_fee + tax;

    CartSummary {
        line_count: items.len(),
        item_count: items.iter().map(|i| i.quantity).sum(),
        subtotal,
        delivery_fee: fees.delivery_fee,
        convenience_fee: fees.convenience_fee,
        tax,
        total: total.round_dp(2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_of_single_line() {
        let items = vec![CartItem::new("p1", "Rice", "₹100", 2)];
        let summary = summarize(&items, &FeeSchedule::default());
        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.line_count, 1);
        assert_eq!(summary.subtotal, Decimal::new(20_000, 2));
        assert_eq!(summary.delivery_fee, Decimal::from(40));
        assert_eq!(summary.convenience_fee, Decimal::from(40));
        assert_eq!(summary.tax, Decimal::new(3_600, 2));
        assert_eq!(summary.total, Decimal::new(31_600, 2));
    }

    #[test]
    fn summary_of_empty_cart_is_zero() {
        let summary = summarize(&[], &FeeSchedule::default());
        assert_eq!(summary, CartSummary::empty());
        assert_eq!(summary.total, Decimal::ZERO);
    }

    #[test]
    fn summary_rounds_tax_to_two_places() {
        let items = vec![CartItem::new("p1", "Tea", "₹33.33", 1)];
        let summary = summarize(&items, &FeeSchedule::default());
        // 33.33 * 0.18 = 5.9994
        assert_eq!(summary.tax, Decimal::new(600, 2));
        assert_eq!(summary.total, Decimal::new(11_933, 2));
    }

    #[test]
    fn validate_requires_id_and_name() {
        let mut item = CartItem::new("", "Rice", "₹10", 1);
        assert!(matches!(item.validate(), Err(CoreError::MissingField("id"))));
        item.id = "p1".to_owned();
        item.name = "  ".to_owned();
        assert!(matches!(item.validate(), Err(CoreError::MissingField("name"))));
    }

    #[test]
    fn missing_cod_flag_deserializes_as_false() {
        let item: CartItem = serde_json::from_value(serde_json::json!({
            "id": "p1", "name": "Rice", "price": "₹10", "quantity": 1
        }))
        .unwrap();
        assert!(!item.available_on_cod);
        assert!(item.provider_id.is_none());
    }

    #[test]
    fn clamp_quantity_bounds() {
        assert_eq!(clamp_quantity(0), 1);
        assert_eq!(clamp_quantity(150), 99);
        assert_eq!(clamp_quantity(7), 7);
    }
}
