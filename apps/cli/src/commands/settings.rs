//! # Assumption, Markup and Retail-Currency Commands

use anyhow::Result;
use clap::Subcommand;

use crate::commands::AppContext;
use crate::output;
use importa_core::currency::Currency;
use importa_core::validation::validate_assumptions;

// =============================================================================
// Assumptions
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum AssumptionsCommand {
    /// Show the current cost assumptions.
    Show,

    /// Change one or more assumption fields.
    Set {
        /// Default per-unit shipping cost.
        #[arg(long)]
        shipping: Option<f64>,
        /// Currency of the shipping default.
        #[arg(long)]
        shipping_currency: Option<String>,
        /// Customs duty percent (0-100).
        #[arg(long)]
        customs: Option<f64>,
        /// Import tax percent (0-100).
        #[arg(long)]
        tax: Option<f64>,
        /// Insurance percent (0-100).
        #[arg(long)]
        insurance: Option<f64>,
        /// Miscellaneous flat per-unit cost.
        #[arg(long)]
        misc: Option<f64>,
        /// Currency of the misc cost.
        #[arg(long)]
        misc_currency: Option<String>,
        /// Base currency all cost totals are summed in.
        #[arg(long)]
        base: Option<String>,
        /// Honor per-product customs/tax overrides.
        #[arg(long)]
        apply_overrides: Option<bool>,
    },

    /// Reset assumptions to defaults (keeps the base currency).
    Reset,
}

pub async fn run_assumptions(ctx: &AppContext, cmd: AssumptionsCommand) -> Result<()> {
    match cmd {
        AssumptionsCommand::Show => {
            let ws = ctx.load_workspace().await?;
            if ctx.json {
                return output::print_json(&ws.assumptions);
            }
            let a = &ws.assumptions;
            println!("shipping per unit : {:.2} {}", a.shipping_per_unit, a.shipping_currency);
            println!("customs           : {:.2}%", a.customs_percent);
            println!("import tax        : {:.2}%", a.import_tax_percent);
            println!("insurance         : {:.2}%", a.insurance_percent);
            match a.misc_currency {
                Some(c) => println!("misc per unit     : {:.2} {}", a.misc_per_unit, c),
                None => println!("misc per unit     : {:.2}", a.misc_per_unit),
            }
            println!("base currency     : {}", a.base_currency);
            println!("apply overrides   : {}", a.apply_overrides);
        }

        AssumptionsCommand::Set {
            shipping,
            shipping_currency,
            customs,
            tax,
            insurance,
            misc,
            misc_currency,
            base,
            apply_overrides,
        } => {
            let mut ws = ctx.load_workspace().await?;

            if let Some(v) = shipping {
                ws.assumptions.shipping_per_unit = v;
            }
            if let Some(c) = shipping_currency {
                ws.assumptions.shipping_currency = c.parse()?;
            }
            if let Some(v) = customs {
                ws.assumptions.customs_percent = v;
            }
            if let Some(v) = tax {
                ws.assumptions.import_tax_percent = v;
            }
            if let Some(v) = insurance {
                ws.assumptions.insurance_percent = v;
            }
            if let Some(v) = misc {
                ws.assumptions.misc_per_unit = v;
            }
            if let Some(c) = misc_currency {
                ws.assumptions.misc_currency = Some(c.parse()?);
            }
            if let Some(c) = base {
                let currency: Currency = c.parse()?;
                ws.set_base_currency(currency);
            }
            if let Some(v) = apply_overrides {
                ws.assumptions.apply_overrides = v;
            }

            let errors = validate_assumptions(&ws.assumptions);
            if !errors.is_empty() {
                for e in &errors {
                    eprintln!("error: {e}");
                }
                anyhow::bail!("assumptions rejected ({} validation errors)", errors.len());
            }

            ctx.save_workspace(&ws).await?;
            println!("Assumptions updated");
        }

        AssumptionsCommand::Reset => {
            let mut ws = ctx.load_workspace().await?;
            ws.reset_assumptions();
            ctx.save_workspace(&ws).await?;
            println!("Assumptions reset (base currency kept)");
        }
    }
    Ok(())
}

// =============================================================================
// Markups
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum MarkupCommand {
    /// List the effective markup scenarios (built-ins + custom).
    List,

    /// Add a custom markup. Percent is the raw markup, e.g. 175 for 175%.
    Add { percent: f64 },

    /// Remove a custom markup by percent.
    Remove { percent: f64 },

    /// Drop every custom markup.
    Reset,
}

pub async fn run_markup(ctx: &AppContext, cmd: MarkupCommand) -> Result<()> {
    match cmd {
        MarkupCommand::List => {
            let ws = ctx.load_workspace().await?;
            let markups = ws.effective_markups();
            if ctx.json {
                return output::print_json(&markups);
            }
            let rows: Vec<Vec<String>> = markups
                .iter()
                .map(|m| {
                    vec![
                        m.id.clone(),
                        m.label.clone(),
                        if m.is_custom { "custom" } else { "built-in" }.to_string(),
                    ]
                })
                .collect();
            output::print_table(&["ID", "LABEL", "KIND"], &rows);
        }

        MarkupCommand::Add { percent } => {
            let mut ws = ctx.load_workspace().await?;
            let scenario = ws.upsert_custom_markup(percent / 100.0);
            ctx.save_workspace(&ws).await?;
            println!("Added markup {} ({})", scenario.label, scenario.id);
        }

        MarkupCommand::Remove { percent } => {
            let mut ws = ctx.load_workspace().await?;
            ws.remove_custom_markup(percent / 100.0);
            ctx.save_workspace(&ws).await?;
            println!("Removed markup {percent}%");
        }

        MarkupCommand::Reset => {
            let mut ws = ctx.load_workspace().await?;
            ws.reset_custom_markups();
            ctx.save_workspace(&ws).await?;
            println!("Custom markups cleared");
        }
    }
    Ok(())
}

// =============================================================================
// Retail Currencies
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum RetailCommand {
    /// List the retail projection currencies.
    List,

    /// Replace the list, e.g. `retail set INR USD EUR`.
    Set { currencies: Vec<String> },

    /// Add one retail currency.
    Add { currency: String },

    /// Remove one retail currency.
    Remove { currency: String },
}

pub async fn run_retail(ctx: &AppContext, cmd: RetailCommand) -> Result<()> {
    match cmd {
        RetailCommand::List => {
            let ws = ctx.load_workspace().await?;
            if ctx.json {
                return output::print_json(&ws.retail_currencies);
            }
            for currency in &ws.retail_currencies {
                println!("{currency}");
            }
        }

        RetailCommand::Set { currencies } => {
            let parsed: Vec<Currency> = currencies
                .iter()
                .map(|c| c.parse())
                .collect::<Result<_, _>>()?;
            let mut ws = ctx.load_workspace().await?;
            ws.set_retail_currencies(&parsed);
            ctx.save_workspace(&ws).await?;
            println!(
                "Retail currencies: {}",
                ws.retail_currencies
                    .iter()
                    .map(|c| c.code())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        RetailCommand::Add { currency } => {
            let currency: Currency = currency.parse()?;
            let mut ws = ctx.load_workspace().await?;
            ws.add_retail_currency(currency)?;
            ctx.save_workspace(&ws).await?;
            println!("Added {currency} to retail currencies");
        }

        RetailCommand::Remove { currency } => {
            let currency: Currency = currency.parse()?;
            let mut ws = ctx.load_workspace().await?;
            ws.remove_retail_currency(currency);
            ctx.save_workspace(&ws).await?;
            println!("Removed {currency} from retail currencies");
        }
    }
    Ok(())
}
