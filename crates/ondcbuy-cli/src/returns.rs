//! Return request handlers.
//!
//! `list` refreshes the local copy from the gateway unless `--offline` is
//! given. `cancel` only changes the local copy.

use clap::Subcommand;
use ondcbuy_core::ReturnRequest;
use ondcbuy_store::ReturnsStore;

use crate::{fmt_money, App};

/// Sub-commands available under `returns`.
#[derive(Debug, Subcommand)]
pub enum ReturnsCommands {
    /// List return requests
    List {
        /// Use the stored list instead of fetching it
        #[arg(long)]
        offline: bool,
    },
    /// Mark a return request as cancelled locally
    Cancel { id: String },
}

pub(crate) async fn run(app: &App, command: ReturnsCommands) -> anyhow::Result<()> {
    let store = ReturnsStore::new(std::sync::Arc::clone(&app.storage));
    match command {
        ReturnsCommands::List { offline } => {
            let requests = if offline {
                store.load()?
            } else {
                let fetched = app.client()?.list_returns().await?;
                store.replace(&fetched)?;
                fetched
            };
            if requests.is_empty() {
                println!("no return requests");
            }
            for request in &requests {
                print_request(request);
            }
        }
        ReturnsCommands::Cancel { id } => {
            let cancelled = store.cancel(&id)?;
            println!(
                "return {} is now {}",
                cancelled.return_request_id, cancelled.status
            );
        }
    }
    Ok(())
}

fn print_request(request: &ReturnRequest) {
    let amount = request
        .total_return_amount
        .map_or_else(|| "-".to_owned(), fmt_money);
    println!(
        "{:<16} order {:<16} {:<10} {}",
        request.return_request_id, request.order_id, request.status, amount
    );
    for item in &request.items {
        let reason = item.reason.as_deref().unwrap_or("");
        println!("    {} x{} {}", item.item_id, item.quantity, reason);
    }
}
