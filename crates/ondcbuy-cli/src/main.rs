mod account;
mod cart;
mod checkout;
mod product;
mod returns;
mod session;
mod track;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use ondcbuy_client::{Checkout, OndcClient, PollPolicy};
use ondcbuy_core::{AppConfig, AuthToken};
use ondcbuy_store::{CartStore, JsonFileStorage, ProfileStore, SessionState, Storage};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use crate::account::RegisterArgs;
use crate::cart::CartCommands;
use crate::product::ProductCommands;
use crate::returns::ReturnsCommands;
use crate::session::SessionCommands;
use crate::track::TrackCommands;

#[derive(Debug, Parser)]
#[command(name = "ondcbuy")]
#[command(about = "ONDC buyer command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Inspect and edit the local cart
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },
    /// Look up catalog products
    Product {
        #[command(subcommand)]
        command: ProductCommands,
    },
    /// Send a select for one or more products (duplicates are skipped)
    Select {
        /// Product ids to select
        #[arg(required = true)]
        product_ids: Vec<String>,
        /// Quantity to select for each product (1-99)
        #[arg(long, short, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=99))]
        quantity: u32,
        /// Item option as KEY=VALUE; VALUE may be JSON (repeatable)
        #[arg(long = "option", short = 'o', value_parser = checkout::parse_option)]
        options: Vec<(String, serde_json::Value)>,
    },
    /// Select the whole cart and wait for the seller's confirmation
    Checkout {
        /// Fail instead of falling back to a locally built confirmation
        #[arg(long)]
        no_fallback: bool,
    },
    /// List and cancel return requests
    Returns {
        #[command(subcommand)]
        command: ReturnsCommands,
    },
    /// Show or refresh order tracking
    Track {
        #[command(subcommand)]
        command: TrackCommands,
    },
    /// Register a buyer account and store the issued token
    Register(RegisterArgs),
    /// Inspect or reset the buyer session
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },
}

/// Configuration and storage shared by every command handler.
pub(crate) struct App {
    pub(crate) config: AppConfig,
    pub(crate) storage: Arc<dyn Storage>,
}

impl App {
    fn open(config: AppConfig) -> anyhow::Result<Self> {
        let storage = JsonFileStorage::open(config.storage_path.clone()).map_err(|e| {
            anyhow::anyhow!(
                "failed to open storage at {}: {e}",
                config.storage_path.display()
            )
        })?;
        tracing::debug!(path = %storage.path().display(), "storage opened");
        Ok(Self {
            config,
            storage: Arc::new(storage),
        })
    }

    /// Loads the cart, telling the user about anything the loader repaired.
    pub(crate) fn cart(&self) -> anyhow::Result<CartStore> {
        let (cart, report) = CartStore::load(Arc::clone(&self.storage))?;
        if !report.is_clean() {
            eprintln!(
                "note: stored cart was repaired (reset: {}, dropped: {}, cod defaulted: {}, \
                 clamped: {}, merged: {})",
                report.reset,
                report.dropped,
                report.defaulted_cod,
                report.clamped,
                report.merged_duplicates
            );
        }
        Ok(cart)
    }

    pub(crate) fn session(&self) -> SessionState {
        SessionState::new(Arc::clone(&self.storage))
    }

    pub(crate) fn profile(&self) -> ProfileStore {
        ProfileStore::new(Arc::clone(&self.storage))
    }

    /// Builds the HTTP client. A token from the environment wins over the
    /// one stored at registration.
    pub(crate) fn client(&self) -> anyhow::Result<OndcClient> {
        let token = match &self.config.auth_token {
            Some(raw) => Some(AuthToken::new(raw.clone())),
            None => self.profile().token()?,
        };
        let client = OndcClient::new(&self.config)
            .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))?;
        Ok(client.with_auth_token(token))
    }

    pub(crate) fn checkout(&self) -> anyhow::Result<Checkout> {
        let context = ondcbuy_core::load_ondc_context(&self.config.context_path)?;
        Ok(Checkout::new(self.client()?, context, self.session())
            .with_poll_policy(PollPolicy::from_config(&self.config))
            .with_mock_fallback(self.config.mock_fallback))
    }
}

/// Formats an amount as rupees with two decimals.
pub(crate) fn fmt_money(amount: Decimal) -> String {
    format!("\u{20b9}{amount:.2}")
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_new(log_level)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("ondcbuy: no command given; run with --help for usage");
        return Ok(());
    };

    let config = ondcbuy_core::load_app_config_from_env()?;
    init_tracing(&config.log_level);
    tracing::debug!(env = %config.env, "configuration loaded");
    let app = App::open(config)?;

    match command {
        Commands::Cart { command } => cart::run(&app, command),
        Commands::Product { command } => product::run(&app, command).await,
        Commands::Select {
            product_ids,
            quantity,
            options,
        } => checkout::run_select(&app, &product_ids, quantity, options).await,
        Commands::Checkout { no_fallback } => checkout::run_checkout(&app, no_fallback).await,
        Commands::Returns { command } => returns::run(&app, command).await,
        Commands::Track { command } => track::run(&app, command).await,
        Commands::Register(args) => account::run_register(&app, args).await,
        Commands::Session { command } => session::run(&app, command),
    }
}

#[cfg(test)]
mod tests;
