//! Degraded-mode cart confirmation built from local state.
//!
//! Used only when the confirmation endpoint cannot be reached or keeps
//! failing. The result mirrors the local cart exactly (ids and quantities)
//! and prices it with the local fee schedule; it is never a seller quote.

use ondcbuy_core::{CartItem, CartSummary, TransactionId};
use rust_decimal::Decimal;
use serde_json::json;

use crate::types::{CartConfirmation, ConfirmationItem, Quote, QuotePrice};

const CURRENCY: &str = "INR";

/// Builds a confirmation equivalent to what the seller would echo back for
/// `items`, priced from `summary`.
#[must_use]
pub fn synthesize_confirmation(
    items: &[CartItem],
    summary: &CartSummary,
    transaction_id: &TransactionId,
) -> CartConfirmation {
    let confirmation_items = items
        .iter()
        .map(|item| ConfirmationItem {
            id: item.id.clone(),
            quantity: item.quantity,
            name: Some(item.name.clone()),
            price: Some(item.price.clone()),
        })
        .collect();

    let mut breakup: Vec<serde_json::Value> = items
        .iter()
        .map(|item| {
            json!({
                "@ondc/org/item_id": item.id,
                "@ondc/org/item_quantity": {"count": item.quantity},
                "@ondc/org/title_type": "item",
                "title": item.name,
                "price": price(item.line_total()),
            })
        })
        .collect();
    for (title_type, title, amount) in [
        ("delivery", "Delivery charges", summary.delivery_fee),
        ("misc", "Convenience fee", summary.convenience_fee),
        ("tax", "Tax", summary.tax),
    ] {
        if !amount.is_zero() {
            breakup.push(json!({
                "@ondc/org/title_type": title_type,
                "title": title,
                "price": price(amount),
            }));
        }
    }

    let mut extra = serde_json::Map::new();
    extra.insert("synthesized".to_owned(), serde_json::Value::Bool(true));

    CartConfirmation {
        transaction_id: Some(transaction_id.as_str().to_owned()),
        items: confirmation_items,
        quote: Some(Quote {
            price: QuotePrice {
                currency: CURRENCY.to_owned(),
                value: format!("{:.2}", summary.total),
            },
            breakup,
        }),
        extra,
    }
}

fn price(amount: Decimal) -> serde_json::Value {
    json!({"currency": CURRENCY, "value": format!("{amount:.2}")})
}
