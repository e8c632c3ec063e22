//! Local cart command handlers. None of these touch the network.

use clap::Subcommand;
use ondcbuy_core::{CartItem, CartSummary};

use crate::{fmt_money, App};

/// Sub-commands available under `cart`.
#[derive(Debug, Subcommand)]
pub enum CartCommands {
    /// List cart lines
    List,
    /// Add an item, or add to its quantity if already present
    Add {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        /// Display price, e.g. "₹1,299.00"
        #[arg(long)]
        price: String,
        #[arg(long, short, default_value_t = 1)]
        quantity: u32,
        #[arg(long, default_value = "")]
        seller: String,
        #[arg(long)]
        provider: Option<String>,
        #[arg(long)]
        location: Option<String>,
        /// Item can be paid cash-on-delivery
        #[arg(long)]
        cod: bool,
    },
    /// Set a line's quantity (1-99)
    Update {
        id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Increase a line's quantity by one
    Inc { id: String },
    /// Decrease a line's quantity by one
    Dec { id: String },
    /// Remove a line
    Remove { id: String },
    /// Remove every line
    Clear,
    /// Show totals with fees and tax
    Summary,
}

pub(crate) fn run(app: &App, command: CartCommands) -> anyhow::Result<()> {
    let mut cart = app.cart()?;
    match command {
        CartCommands::List => {
            if cart.is_empty() {
                println!("cart is empty");
            }
            for item in cart.items() {
                print_line(item);
            }
        }
        CartCommands::Add {
            id,
            name,
            price,
            quantity,
            seller,
            provider,
            location,
            cod,
        } => {
            let mut item = CartItem::new(&id, &name, &price, quantity);
            item.seller = seller;
            item.provider_id = provider;
            item.location_id = location;
            item.available_on_cod = cod;
            let stored = cart.add(item)?;
            println!("{} now x{}", stored.id, stored.quantity);
        }
        CartCommands::Update { id, quantity } => {
            cart.update_quantity(&id, quantity)?;
            println!("{id} now x{quantity}");
        }
        CartCommands::Inc { id } => {
            cart.increment(&id)?;
            print_quantity(&cart, &id);
        }
        CartCommands::Dec { id } => {
            cart.decrement(&id)?;
            print_quantity(&cart, &id);
        }
        CartCommands::Remove { id } => match cart.remove(&id)? {
            Some(item) => println!("removed {}", item.id),
            None => println!("{id} was not in the cart"),
        },
        CartCommands::Clear => {
            cart.clear()?;
            println!("cart cleared");
        }
        CartCommands::Summary => print_summary(&cart.summary()),
    }
    Ok(())
}

fn print_line(item: &CartItem) {
    println!(
        "{:<16} {:<32} {:>3} x {:<12} = {}",
        item.id,
        item.name,
        item.quantity,
        item.price,
        fmt_money(item.line_total())
    );
}

fn print_quantity(cart: &ondcbuy_store::CartStore, id: &str) {
    if let Some(item) = cart.get(id) {
        println!("{} now x{}", item.id, item.quantity);
    }
}

pub(crate) fn print_summary(summary: &CartSummary) {
    println!(
        "{} line(s), {} item(s)",
        summary.line_count, summary.item_count
    );
    println!("subtotal        {}", fmt_money(summary.subtotal));
    println!("delivery fee    {}", fmt_money(summary.delivery_fee));
    println!("convenience fee {}", fmt_money(summary.convenience_fee));
    println!("tax             {}", fmt_money(summary.tax));
    println!("total           {}", fmt_money(summary.total));
}
