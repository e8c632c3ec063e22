//! Catalog command handlers.

use clap::Subcommand;
use ondcbuy_core::{parse_price, ProductDetail};

use crate::{fmt_money, App};

/// Sub-commands available under `product`.
#[derive(Debug, Subcommand)]
pub enum ProductCommands {
    /// Fetch and print one product
    Show { id: String },
    /// Fetch a product and add it to the cart
    Add {
        id: String,
        #[arg(long, short, default_value_t = 1)]
        quantity: u32,
    },
}

pub(crate) async fn run(app: &App, command: ProductCommands) -> anyhow::Result<()> {
    let client = app.client()?;
    match command {
        ProductCommands::Show { id } => {
            let product = client.product_detail(&id).await?;
            print_product(&product);
        }
        ProductCommands::Add { id, quantity } => {
            let product = client.product_detail(&id).await?;
            let mut cart = app.cart()?;
            let stored = cart.add(product.to_cart_item(quantity))?;
            println!("added {} ({}) now x{}", stored.id, stored.name, stored.quantity);
        }
    }
    Ok(())
}

fn print_product(product: &ProductDetail) {
    println!("{} ({})", product.name, product.id);
    match parse_price(&product.price) {
        Ok(amount) => println!("price:    {}", fmt_money(amount)),
        Err(_) => println!("price:    {}", product.price),
    }
    if !product.seller.is_empty() {
        println!("seller:   {}", product.seller);
    }
    if let Some(category) = &product.category {
        println!("category: {category}");
    }
    println!(
        "cod:      {}",
        if product.available_on_cod { "yes" } else { "no" }
    );
    if let Some(description) = &product.description {
        println!();
        println!("{description}");
    }
}
