//! # Template, Comparison and Reset Commands

use anyhow::Result;
use clap::Subcommand;
use std::io::Write;

use crate::commands::AppContext;
use crate::output;
use importa_core::currency::format_amount;
use importa_core::projection::build_comparison_snapshot;
use importa_core::ApplyMode;

// =============================================================================
// Templates
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum TemplateCommand {
    /// Save the current products, assumptions and markups as a template.
    Save {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },

    /// List templates.
    List,

    /// Rename or re-describe a template.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// Apply a template to the workspace.
    Apply {
        id: String,
        /// Append the template's products instead of replacing everything.
        #[arg(long)]
        merge: bool,
    },

    /// Delete a template.
    Delete { id: String },
}

pub async fn run_template(ctx: &AppContext, cmd: TemplateCommand) -> Result<()> {
    match cmd {
        TemplateCommand::Save { name, description } => {
            let mut ws = ctx.load_workspace().await?;
            let id = ws.save_template(name, description);
            ctx.save_workspace(&ws).await?;
            println!("Saved template {id}");
        }

        TemplateCommand::List => {
            let ws = ctx.load_workspace().await?;
            if ctx.json {
                return output::print_json(&ws.templates);
            }
            let rows: Vec<Vec<String>> = ws
                .templates
                .iter()
                .map(|t| {
                    vec![
                        t.id.clone(),
                        t.name.clone(),
                        t.products.len().to_string(),
                        t.updated_at.format("%Y-%m-%d").to_string(),
                    ]
                })
                .collect();
            output::print_table(&["ID", "NAME", "PRODUCTS", "UPDATED"], &rows);
        }

        TemplateCommand::Update {
            id,
            name,
            description,
        } => {
            let mut ws = ctx.load_workspace().await?;
            ws.update_template(&id, name, description)?;
            ctx.save_workspace(&ws).await?;
            println!("Updated template {id}");
        }

        TemplateCommand::Apply { id, merge } => {
            let mode = if merge {
                ApplyMode::Merge
            } else {
                ApplyMode::Replace
            };
            let mut ws = ctx.load_workspace().await?;
            ws.apply_template(&id, mode)?;
            ctx.save_workspace(&ws).await?;
            println!(
                "Applied template {id} ({})",
                if merge { "merged" } else { "replaced" }
            );
        }

        TemplateCommand::Delete { id } => {
            let mut ws = ctx.load_workspace().await?;
            ws.delete_template(&id)?;
            ctx.save_workspace(&ws).await?;
            println!("Deleted template {id}");
        }
    }
    Ok(())
}

// =============================================================================
// Comparisons
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum CompareCommand {
    /// Save the current products and assumptions as a comparison scenario.
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },

    /// List comparison scenarios with their total investment.
    List,

    /// Rename or annotate a scenario.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Restore a scenario's products and assumptions into the workspace.
    Apply { id: String },

    /// Delete a scenario.
    Delete { id: String },
}

pub async fn run_compare(ctx: &AppContext, cmd: CompareCommand) -> Result<()> {
    match cmd {
        CompareCommand::Create { name, description } => {
            let mut ws = ctx.load_workspace().await?;
            let id = ws.create_comparison(name, description);
            ctx.save_workspace(&ws).await?;
            println!("Created comparison {id}");
        }

        CompareCommand::List => {
            let ws = ctx.load_workspace().await?;
            let rates = ctx.rates.cached_rates().await;
            let snapshots: Vec<_> = ws
                .comparisons
                .iter()
                .map(|c| build_comparison_snapshot(c, &rates))
                .collect();
            if ctx.json {
                return output::print_json(&snapshots);
            }
            let rows: Vec<Vec<String>> = snapshots
                .iter()
                .map(|s| {
                    vec![
                        s.id.clone(),
                        s.name.clone(),
                        s.products.len().to_string(),
                        format_amount(s.total_investment, s.base_currency),
                    ]
                })
                .collect();
            output::print_table(&["ID", "NAME", "PRODUCTS", "INVESTMENT"], &rows);
        }

        CompareCommand::Update { id, name, notes } => {
            let mut ws = ctx.load_workspace().await?;
            ws.update_comparison(&id, name, notes)?;
            ctx.save_workspace(&ws).await?;
            println!("Updated comparison {id}");
        }

        CompareCommand::Apply { id } => {
            let mut ws = ctx.load_workspace().await?;
            ws.apply_comparison(&id)?;
            ctx.save_workspace(&ws).await?;
            println!("Applied comparison {id}");
        }

        CompareCommand::Delete { id } => {
            let mut ws = ctx.load_workspace().await?;
            ws.delete_comparison(&id)?;
            ctx.save_workspace(&ws).await?;
            println!("Deleted comparison {id}");
        }
    }
    Ok(())
}

// =============================================================================
// Reset / Wipe
// =============================================================================

pub async fn run_reset(ctx: &AppContext) -> Result<()> {
    ctx.store.workspace().reset().await?;
    println!("Workspace reset to defaults");
    Ok(())
}

pub async fn run_wipe(ctx: &AppContext, yes: bool) -> Result<()> {
    if !yes {
        print!("This deletes every product, template and snapshot. Type 'wipe' to continue: ");
        std::io::stdout().flush()?;
        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;
        if answer.trim() != "wipe" {
            println!("Aborted");
            return Ok(());
        }
    }
    ctx.store.workspace().wipe_all().await?;
    println!("All data deleted");
    Ok(())
}
