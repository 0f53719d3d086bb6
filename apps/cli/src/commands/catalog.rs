//! # Product Commands
//!
//! CRUD and bulk import for the product list.

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::PathBuf;
use tracing::info;

use crate::commands::AppContext;
use crate::output;
use importa_core::bulk::{bulk_template_csv, parse_bulk_rows, BulkRow};
use importa_core::currency::Currency;
use importa_core::types::Product;
use importa_core::validation::validate_product;

#[derive(Debug, Subcommand)]
pub enum ProductCommand {
    /// Add a product.
    Add {
        /// Product name.
        #[arg(long)]
        name: String,
        /// Price per unit in the supplier currency.
        #[arg(long)]
        price: f64,
        /// Units ordered.
        #[arg(long)]
        qty: i64,
        /// Supplier currency code (USD, EUR, GBP, INR, AUD, CAD, JPY).
        #[arg(long, default_value = "USD")]
        currency: String,
        /// Per-unit shipping override.
        #[arg(long)]
        shipping: Option<f64>,
        /// Currency of the shipping override.
        #[arg(long)]
        shipping_currency: Option<String>,
        /// Customs % override (needs `assumptions set --apply-overrides`).
        #[arg(long)]
        customs: Option<f64>,
        /// Import tax % override (needs `assumptions set --apply-overrides`).
        #[arg(long)]
        tax: Option<f64>,
        /// Free-text notes.
        #[arg(long)]
        notes: Option<String>,
    },

    /// Edit fields of an existing product.
    Update {
        /// Product id.
        id: String,
        /// New name.
        #[arg(long)]
        name: Option<String>,
        /// New price per unit in the supplier currency.
        #[arg(long)]
        price: Option<f64>,
        /// New unit count.
        #[arg(long)]
        qty: Option<i64>,
        /// New supplier currency code.
        #[arg(long)]
        currency: Option<String>,
        /// Per-unit shipping override.
        #[arg(long)]
        shipping: Option<f64>,
        /// New free-text notes.
        #[arg(long)]
        notes: Option<String>,
    },

    /// List products.
    List,

    /// Remove a product by id.
    Remove { id: String },

    /// Duplicate a product by id.
    Duplicate { id: String },

    /// Remove every product.
    Clear,

    /// Bulk-import products from a CSV file.
    Import {
        /// CSV file path; see `product template` for the expected columns.
        path: PathBuf,
    },

    /// Print the bulk-import CSV template.
    Template,

    /// Pin a product to favorites by id.
    Favorite { id: String },

    /// List favorites.
    Favorites,

    /// Remove a favorite by id.
    Unfavorite { id: String },

    /// Copy a favorite back into the product list.
    Recall { id: String },
}

pub async fn run(ctx: &AppContext, cmd: ProductCommand) -> Result<()> {
    match cmd {
        ProductCommand::Add {
            name,
            price,
            qty,
            currency,
            shipping,
            shipping_currency,
            customs,
            tax,
            notes,
        } => {
            let currency: Currency = currency.parse()?;
            let mut product = Product::new(name, price, qty, currency);
            product.shipping_per_unit = shipping;
            product.shipping_currency = shipping_currency
                .as_deref()
                .map(str::parse)
                .transpose()?;
            product.customs_percent_override = customs;
            product.import_tax_percent_override = tax;
            product.notes = notes;

            let errors = validate_product(&product);
            if !errors.is_empty() {
                for e in &errors {
                    eprintln!("error: {e}");
                }
                anyhow::bail!("product rejected ({} validation errors)", errors.len());
            }

            let mut ws = ctx.load_workspace().await?;
            let id = ws.add_product(product);
            ctx.save_workspace(&ws).await?;
            info!(id = %id, "Product added");
            println!("Added product {id}");
        }

        ProductCommand::Update {
            id,
            name,
            price,
            qty,
            currency,
            shipping,
            notes,
        } => {
            let currency: Option<Currency> = currency.as_deref().map(str::parse).transpose()?;
            let mut ws = ctx.load_workspace().await?;
            let updated = ws
                .update_product(&id, |p| {
                    if let Some(name) = name {
                        p.name = name;
                    }
                    if let Some(price) = price {
                        p.unit_price = price;
                    }
                    if let Some(qty) = qty {
                        p.quantity = qty;
                    }
                    if let Some(currency) = currency {
                        p.supplier_currency = currency;
                    }
                    if let Some(shipping) = shipping {
                        p.shipping_per_unit = Some(shipping);
                    }
                    if let Some(notes) = notes {
                        p.notes = Some(notes);
                    }
                })?
                .clone();

            let errors = validate_product(&updated);
            if !errors.is_empty() {
                for e in &errors {
                    eprintln!("error: {e}");
                }
                anyhow::bail!("update rejected ({} validation errors)", errors.len());
            }
            ctx.save_workspace(&ws).await?;
            println!("Updated {id}");
        }

        ProductCommand::List => {
            let ws = ctx.load_workspace().await?;
            if ctx.json {
                return output::print_json(&ws.products);
            }
            let rows: Vec<Vec<String>> = ws
                .products
                .iter()
                .map(|p| {
                    vec![
                        p.id.clone(),
                        p.name.clone(),
                        format!("{:.2} {}", p.unit_price, p.supplier_currency),
                        p.quantity.to_string(),
                        p.tags.join(","),
                    ]
                })
                .collect();
            output::print_table(&["ID", "NAME", "UNIT PRICE", "QTY", "TAGS"], &rows);
        }

        ProductCommand::Remove { id } => {
            let mut ws = ctx.load_workspace().await?;
            let removed = ws.remove_product(&id)?;
            ctx.save_workspace(&ws).await?;
            println!("Removed {} ({})", removed.id, removed.name);
        }

        ProductCommand::Duplicate { id } => {
            let mut ws = ctx.load_workspace().await?;
            let new_id = ws.duplicate_product(&id)?;
            ctx.save_workspace(&ws).await?;
            println!("Duplicated {id} as {new_id}");
        }

        ProductCommand::Clear => {
            let mut ws = ctx.load_workspace().await?;
            let count = ws.products.len();
            ws.clear_products();
            ctx.save_workspace(&ws).await?;
            println!("Removed {count} products");
        }

        ProductCommand::Import { path } => {
            let mut reader = csv::Reader::from_path(&path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            let mut rows: Vec<BulkRow> = Vec::new();
            for record in reader.deserialize() {
                rows.push(record?);
            }
            let products = parse_bulk_rows(&rows);
            let count = products.len();

            let mut ws = ctx.load_workspace().await?;
            ws.add_products_bulk(products);
            ctx.save_workspace(&ws).await?;
            info!(count, "Bulk import complete");
            println!("Imported {count} products from {}", path.display());
        }

        ProductCommand::Template => {
            print!("{}", bulk_template_csv());
        }

        ProductCommand::Favorite { id } => {
            let mut ws = ctx.load_workspace().await?;
            let product = ws
                .products
                .iter()
                .find(|p| p.id == id)
                .ok_or_else(|| importa_core::CoreError::ProductNotFound(id.clone()))?
                .clone();
            ws.add_favorite(product);
            ctx.save_workspace(&ws).await?;
            println!("Pinned {id} to favorites");
        }

        ProductCommand::Favorites => {
            let ws = ctx.load_workspace().await?;
            if ctx.json {
                return output::print_json(&ws.favorites);
            }
            let rows: Vec<Vec<String>> = ws
                .favorites
                .iter()
                .map(|p| {
                    vec![
                        p.id.clone(),
                        p.name.clone(),
                        format!("{:.2} {}", p.unit_price, p.supplier_currency),
                    ]
                })
                .collect();
            output::print_table(&["ID", "NAME", "UNIT PRICE"], &rows);
        }

        ProductCommand::Unfavorite { id } => {
            let mut ws = ctx.load_workspace().await?;
            ws.remove_favorite(&id)?;
            ctx.save_workspace(&ws).await?;
            println!("Removed favorite {id}");
        }

        ProductCommand::Recall { id } => {
            let mut ws = ctx.load_workspace().await?;
            let new_id = ws.recall_favorite(&id)?;
            ctx.save_workspace(&ws).await?;
            println!("Recalled favorite {id} as product {new_id}");
        }
    }
    Ok(())
}
