//! `select` and `checkout` handlers.

use ondcbuy_client::{Confirmation, SelectItem, SelectOptions};
use ondcbuy_core::parse_price;

use crate::cart::print_summary;
use crate::{fmt_money, App};

/// Parses `KEY=VALUE`. VALUE is taken as JSON when it parses as JSON,
/// otherwise as a plain string, so `size=M` and `addon={"x":1}` both work.
pub(crate) fn parse_option(raw: &str) -> Result<(String, serde_json::Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("option key is empty in '{raw}'"));
    }
    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_owned()));
    Ok((key.to_owned(), value))
}

pub(crate) async fn run_select(
    app: &App,
    product_ids: &[String],
    quantity: u32,
    options: Vec<(String, serde_json::Value)>,
) -> anyhow::Result<()> {
    let options = options
        .into_iter()
        .fold(SelectOptions::new(), |acc, (k, v)| acc.with(k, v));
    let mut checkout = app.checkout()?;

    for id in product_ids {
        let product = checkout.client().product_detail(id).await?;
        let item = SelectItem::from_product(&product, quantity, options.clone());
        if checkout.attempt_select(item).await? {
            println!("selected {id} x{quantity}");
        } else {
            println!("skipped {id} x{quantity} (already selected)");
        }
    }

    let transaction_id = checkout.session().transaction_id()?;
    println!("transaction {transaction_id}");
    Ok(())
}

pub(crate) async fn run_checkout(app: &App, no_fallback: bool) -> anyhow::Result<()> {
    let cart = app.cart()?;
    if cart.is_empty() {
        anyhow::bail!("cart is empty; add items with `ondcbuy cart add` or `ondcbuy product add`");
    }
    let mut checkout = app.checkout()?;
    if no_fallback {
        checkout = checkout.with_mock_fallback(false);
    }

    let confirmation = checkout.confirm_cart(&cart).await?;
    print_confirmation(&confirmation);
    println!();
    print_summary(&cart.summary());
    Ok(())
}

fn print_confirmation(confirmation: &Confirmation) {
    if confirmation.is_synthesized() {
        println!(
            "seller confirmation unavailable after {} attempt(s); showing the local cart",
            confirmation.attempts
        );
    } else {
        println!(
            "seller confirmed the cart after {} attempt(s)",
            confirmation.attempts
        );
    }
    if let Some(txn) = &confirmation.cart.transaction_id {
        println!("transaction {txn}");
    }
    for item in &confirmation.cart.items {
        println!(
            "  {:<16} x{:<3} {}",
            item.id,
            item.quantity,
            item.name.as_deref().unwrap_or("")
        );
    }
    if let Some(quote) = &confirmation.cart.quote {
        match parse_price(&quote.price.value) {
            Ok(amount) if quote.price.currency == "INR" => {
                println!("quoted total {}", fmt_money(amount));
            }
            _ => println!("quoted total {} {}", quote.price.value, quote.price.currency),
        }
    }
}
