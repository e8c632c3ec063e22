//! Order tracking handlers.

use std::sync::Arc;

use clap::Subcommand;
use ondcbuy_core::TrackingData;
use ondcbuy_store::TrackingStore;

use crate::App;

/// Sub-commands available under `track`.
#[derive(Debug, Subcommand)]
pub enum TrackCommands {
    /// Show the stored tracking data
    Show,
    /// Fetch fresh tracking data for an order and store it
    Refresh {
        /// Order to track; defaults to the order in the stored data
        order_id: Option<String>,
    },
}

pub(crate) async fn run(app: &App, command: TrackCommands) -> anyhow::Result<()> {
    let store = TrackingStore::new(Arc::clone(&app.storage));
    match command {
        TrackCommands::Show => match store.load()? {
            Some(data) => print_tracking(&data),
            None => println!("no tracking data stored"),
        },
        TrackCommands::Refresh { order_id } => {
            let order_id = match order_id {
                Some(id) => id,
                None => store
                    .load()?
                    .and_then(|d| d.order_id)
                    .ok_or_else(|| anyhow::anyhow!("no order id given and none stored"))?,
            };
            let data = app.client()?.track(&order_id).await?;
            store.save(&data)?;
            print_tracking(&data);
        }
    }
    Ok(())
}

fn print_tracking(data: &TrackingData) {
    if let Some(order_id) = &data.order_id {
        println!("order    {order_id}");
    }
    println!(
        "status   {}{}",
        data.tracking.status,
        if data.is_active() { "" } else { " (inactive)" }
    );
    if let Some(url) = &data.tracking.url {
        println!("url      {url}");
    }
    if let Some(location) = &data.tracking.location {
        println!("location {}", location.gps);
    }
    if let Some(updated) = data.last_update() {
        println!("updated  {}", updated.to_rfc3339());
    }
}
