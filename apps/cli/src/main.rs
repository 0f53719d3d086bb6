//! # importa: Import Pricing Calculator
//!
//! Command-line entry point. Parses arguments, wires the store and rate
//! service, and dispatches to command handlers.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::AppContext;
use config::AppConfig;
use importa_rates::{RateClient, RateService};
use importa_store::{Store, StoreConfig};

/// Import pricing calculator: landed costs, markups and profit projections
/// across currencies.
#[derive(Debug, Parser)]
#[command(name = "importa", version, about)]
struct Cli {
    /// Path to the config file (defaults to the platform config dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit results as JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Manage the product list.
    #[command(subcommand)]
    Product(commands::catalog::ProductCommand),

    /// Show or change the global cost assumptions.
    #[command(subcommand)]
    Assumptions(commands::settings::AssumptionsCommand),

    /// Manage markup scenarios.
    #[command(subcommand)]
    Markup(commands::settings::MarkupCommand),

    /// Manage the retail projection currencies.
    #[command(subcommand)]
    Retail(commands::settings::RetailCommand),

    /// Manage exchange rates.
    #[command(subcommand)]
    Rates(commands::rates::RatesCommand),

    /// Compute landed-cost breakdowns for every product.
    Calc,

    /// Run the full projection: costs, retail prices and profit rollups.
    Scenario,

    /// Manage landed-cost history snapshots.
    #[command(subcommand)]
    History(commands::project::HistoryCommand),

    /// Manage workspace templates.
    #[command(subcommand)]
    Template(commands::snapshots::TemplateCommand),

    /// Manage comparison scenarios.
    #[command(subcommand)]
    Compare(commands::snapshots::CompareCommand),

    /// Reset the workspace to its seeded defaults.
    Reset,

    /// Delete every stored blob, including the rate cache.
    Wipe {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG controls verbosity; default keeps the CLI quiet.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.clone());

    if let Some(parent) = config.storage.db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store = Store::new(StoreConfig::new(&config.storage.db_path)).await?;
    let rate_service = RateService::with_client(
        store.rate_cache(),
        RateClient::with_endpoint(&config.rates.endpoint),
    );

    let ctx = AppContext {
        store,
        rates: rate_service,
        json: cli.json,
    };

    match cli.command {
        Command::Product(cmd) => commands::catalog::run(&ctx, cmd).await,
        Command::Assumptions(cmd) => commands::settings::run_assumptions(&ctx, cmd).await,
        Command::Markup(cmd) => commands::settings::run_markup(&ctx, cmd).await,
        Command::Retail(cmd) => commands::settings::run_retail(&ctx, cmd).await,
        Command::Rates(cmd) => commands::rates::run(&ctx, cmd).await,
        Command::Calc => commands::project::run_calc(&ctx).await,
        Command::Scenario => commands::project::run_scenario(&ctx).await,
        Command::History(cmd) => commands::project::run_history(&ctx, cmd).await,
        Command::Template(cmd) => commands::snapshots::run_template(&ctx, cmd).await,
        Command::Compare(cmd) => commands::snapshots::run_compare(&ctx, cmd).await,
        Command::Reset => commands::snapshots::run_reset(&ctx).await,
        Command::Wipe { yes } => commands::snapshots::run_wipe(&ctx, yes).await,
    }
}
