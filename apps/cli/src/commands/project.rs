//! # Projection Commands
//!
//! The pipeline commands: landed-cost breakdowns, the full retail/profit
//! scenario, and history snapshots.

use anyhow::Result;
use clap::Subcommand;

use crate::commands::AppContext;
use crate::output;
use importa_core::currency::format_amount;
use importa_core::pricing::{aggregate_total_investment, calculate_all_product_costs};
use importa_core::projection::{
    best_markup_for_currency, build_history_entry, calculate_scenario, margin_quality,
};

// =============================================================================
// Calc
// =============================================================================

pub async fn run_calc(ctx: &AppContext) -> Result<()> {
    let ws = ctx.load_workspace().await?;
    let rates = ctx.rates.rates(false).await;
    let costs = calculate_all_product_costs(&ws.products, &ws.assumptions, &rates);
    let total = aggregate_total_investment(&costs);
    let base = ws.assumptions.base_currency;

    if ctx.json {
        return output::print_json(&costs);
    }

    let rows: Vec<Vec<String>> = costs
        .iter()
        .map(|c| {
            vec![
                c.product_name.clone(),
                c.quantity.to_string(),
                format!("{:.2} {}", c.unit_price_original, c.supplier_currency),
                format_amount(c.total_per_unit_base, base),
                format_amount(c.total_cost_base, base),
            ]
        })
        .collect();
    output::print_table(
        &["PRODUCT", "QTY", "UNIT PRICE", "LANDED/UNIT", "LANDED TOTAL"],
        &rows,
    );
    println!();
    println!("Total investment: {}", format_amount(total, base));
    Ok(())
}

// =============================================================================
// Scenario
// =============================================================================

pub async fn run_scenario(ctx: &AppContext) -> Result<()> {
    let ws = ctx.load_workspace().await?;
    let rates = ctx.rates.rates(false).await;
    let markups = ws.effective_markups();
    let scenario = calculate_scenario(
        &ws.products,
        &ws.assumptions,
        &markups,
        &ws.retail_currencies,
        &rates,
    );

    if ctx.json {
        return output::print_json(&scenario);
    }

    println!(
        "Total investment: {}",
        format_amount(scenario.total_investment, scenario.base_currency)
    );
    println!();

    let rows: Vec<Vec<String>> = scenario
        .summaries
        .iter()
        .map(|s| {
            vec![
                s.markup_label.clone(),
                s.retail_currency.code().to_string(),
                format_amount(s.total_revenue, s.retail_currency),
                format_amount(s.total_profit, s.retail_currency),
                format!("{:.2}%", s.profit_margin_percent),
                margin_quality(s.profit_margin_percent).to_string(),
            ]
        })
        .collect();
    output::print_table(
        &["MARKUP", "CCY", "REVENUE", "PROFIT", "MARGIN", "QUALITY"],
        &rows,
    );

    println!();
    for &currency in &ws.retail_currencies {
        match best_markup_for_currency(&scenario.summaries, currency) {
            Some(best) => println!(
                "Best for {currency}: {} ({} profit, {:.2}% margin)",
                best.markup_label,
                format_amount(best.total_profit, currency),
                best.profit_margin_percent
            ),
            None => println!("Best for {currency}: no projections"),
        }
    }
    Ok(())
}

// =============================================================================
// History
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// Snapshot the current landed cost of every product.
    Record {
        /// Attach a note to each snapshot.
        #[arg(long)]
        notes: Option<String>,
    },

    /// List history entries, newest first.
    List {
        /// Show at most this many entries.
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Delete every history entry.
    Clear,
}

pub async fn run_history(ctx: &AppContext, cmd: HistoryCommand) -> Result<()> {
    match cmd {
        HistoryCommand::Record { notes } => {
            let mut ws = ctx.load_workspace().await?;
            let rates = ctx.rates.rates(false).await;
            let costs = calculate_all_product_costs(&ws.products, &ws.assumptions, &rates);
            let count = costs.len();
            for cost in &costs {
                ws.record_history(build_history_entry(cost, notes.clone()));
            }
            ctx.save_workspace(&ws).await?;
            println!("Recorded {count} snapshots");
        }

        HistoryCommand::List { limit } => {
            let ws = ctx.load_workspace().await?;
            let entries = &ws.history[..ws.history.len().min(limit)];
            if ctx.json {
                return output::print_json(&entries);
            }
            let rows: Vec<Vec<String>> = entries
                .iter()
                .map(|e| {
                    vec![
                        e.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                        e.product_name.clone().unwrap_or_else(|| e.product_id.clone()),
                        e.quantity.to_string(),
                        format_amount(e.landed_cost_per_unit, e.landed_cost_currency),
                        e.notes.clone().unwrap_or_default(),
                    ]
                })
                .collect();
            output::print_table(&["WHEN", "PRODUCT", "QTY", "LANDED/UNIT", "NOTES"], &rows);
        }

        HistoryCommand::Clear => {
            let mut ws = ctx.load_workspace().await?;
            ws.clear_history();
            ctx.save_workspace(&ws).await?;
            println!("History cleared");
        }
    }
    Ok(())
}
