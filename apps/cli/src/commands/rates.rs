//! # Exchange-Rate Commands

use anyhow::Result;
use chrono::Utc;
use clap::Subcommand;

use crate::commands::AppContext;
use crate::output;
use importa_core::currency::Currency;
use importa_rates::{is_stale, RATE_BASE};
use importa_store::RateCacheEntry;

#[derive(Debug, Subcommand)]
pub enum RatesCommand {
    /// Show the cached exchange rates (no network).
    Show,

    /// Refresh rates from the provider if the cache is stale.
    Refresh {
        /// Refresh even when the cache is still fresh.
        #[arg(long)]
        force: bool,
    },

    /// Manually pin one rate (units per USD).
    Set { currency: String, rate: f64 },

    /// Drop the cache so the bundled defaults apply.
    Reset,
}

pub async fn run(ctx: &AppContext, cmd: RatesCommand) -> Result<()> {
    match cmd {
        RatesCommand::Show => {
            let cached = ctx.store.rate_cache().load().await?;
            let rates = ctx.rates.cached_rates().await;
            if ctx.json {
                return output::print_json(&rates);
            }
            match cached {
                Some(ref entry) => println!(
                    "Fetched {} ({})",
                    entry.fetched_at.format("%Y-%m-%d %H:%M UTC"),
                    if is_stale(entry) { "stale" } else { "fresh" }
                ),
                None => println!("No cached snapshot, showing bundled defaults"),
            }
            let rows: Vec<Vec<String>> = rates
                .iter()
                .map(|(currency, rate)| vec![currency.code().to_string(), format!("{rate}")])
                .collect();
            output::print_table(&["CURRENCY", "PER USD"], &rows);
        }

        RatesCommand::Refresh { force } => {
            let rates = ctx.rates.rates(force).await;
            if ctx.json {
                return output::print_json(&rates);
            }
            let inr = rates.get(Currency::INR).unwrap_or_default();
            println!("Rates up to date (1 USD = {inr} INR)");
        }

        RatesCommand::Set { currency, rate } => {
            let currency: Currency = currency.parse()?;
            if !rate.is_finite() || rate <= 0.0 {
                anyhow::bail!(importa_core::CoreError::InvalidRate {
                    currency,
                    value: rate
                });
            }

            // Pin into the cached snapshot, preserving its fetch time so a
            // manual tweak doesn't mask staleness.
            let repo = ctx.store.rate_cache();
            let mut entry = match repo.load().await? {
                Some(entry) => entry,
                None => RateCacheEntry {
                    base: RATE_BASE,
                    rates: importa_core::RateTable::bundled_defaults(),
                    fetched_at: Utc::now(),
                },
            };
            entry.rates.set(currency, rate);
            repo.save(&entry).await?;
            println!("Pinned 1 USD = {rate} {currency}");
        }

        RatesCommand::Reset => {
            ctx.rates.reset().await?;
            println!("Rate cache cleared, bundled defaults apply");
        }
    }
    Ok(())
}
