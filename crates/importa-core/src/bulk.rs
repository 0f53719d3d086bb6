//! # Bulk Import
//!
//! Row model for CSV bulk import of products, plus the downloadable CSV
//! template. Parsing is deliberately forgiving: missing numerics default to
//! zero and unknown currencies fall back to USD, so a messy spreadsheet
//! still lands as rows the user can fix in place.

use serde::{Deserialize, Serialize};

use crate::currency::Currency;
use crate::types::{new_bulk_id, Product};

/// Column order of the bulk-import CSV.
pub const BULK_CSV_HEADER: &str =
    "name,unitPrice,quantity,supplierCurrency,shippingPerUnit,shippingCurrency,notes";

/// One raw row of the bulk-import CSV, before normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRow {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub unit_price: Option<String>,
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(default)]
    pub supplier_currency: Option<String>,
    #[serde(default)]
    pub shipping_per_unit: Option<String>,
    #[serde(default)]
    pub shipping_currency: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Normalizes one raw row into a product.
///
/// ## Rules
/// - Blank name becomes `Product {suffix}` from the generated id.
/// - Unparseable or negative numerics default to zero.
/// - Unknown supplier currency falls back to USD; blank shipping currency
///   falls back to the supplier currency.
pub fn parse_bulk_row(row: &BulkRow) -> Product {
    let id = new_bulk_id();

    let name = match row.name.as_deref().map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => format!("Product {}", &id[id.len() - 4..]),
    };

    let supplier_currency = parse_currency(row.supplier_currency.as_deref()).unwrap_or(Currency::USD);
    let shipping_currency =
        parse_currency(row.shipping_currency.as_deref()).unwrap_or(supplier_currency);

    let mut product = Product::new(
        name,
        parse_amount(row.unit_price.as_deref()),
        parse_count(row.quantity.as_deref()),
        supplier_currency,
    );
    product.id = id;
    product.shipping_per_unit = Some(parse_amount(row.shipping_per_unit.as_deref()));
    product.shipping_currency = Some(shipping_currency);
    product.notes = row
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(String::from);
    product
}

/// Normalizes every row of a bulk import.
pub fn parse_bulk_rows(rows: &[BulkRow]) -> Vec<Product> {
    rows.iter().map(parse_bulk_row).collect()
}

/// The downloadable CSV template: header plus one example row.
pub fn bulk_template_csv() -> String {
    format!(
        "{}\nExample Product,5.25,100,USD,0.1,USD,Optional notes\n",
        BULK_CSV_HEADER
    )
}

fn parse_currency(raw: Option<&str>) -> Option<Currency> {
    raw.and_then(|s| s.trim().parse().ok())
}

fn parse_amount(raw: Option<&str>) -> f64 {
    let value = raw
        .and_then(|s| s.trim().parse::<f64>().ok())
        .unwrap_or(0.0);
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn parse_count(raw: Option<&str>) -> i64 {
    let value = raw
        .and_then(|s| s.trim().parse::<f64>().ok())
        .unwrap_or(0.0);
    if value.is_finite() && value > 0.0 {
        value.floor() as i64
    } else {
        0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, price: &str, qty: &str, currency: &str) -> BulkRow {
        BulkRow {
            name: Some(name.to_string()),
            unit_price: Some(price.to_string()),
            quantity: Some(qty.to_string()),
            supplier_currency: Some(currency.to_string()),
            ..BulkRow::default()
        }
    }

    #[test]
    fn test_well_formed_row() {
        let product = parse_bulk_row(&row("Mug", "2.5", "40", "eur"));
        assert_eq!(product.name, "Mug");
        assert_eq!(product.unit_price, 2.5);
        assert_eq!(product.quantity, 40);
        assert_eq!(product.supplier_currency, Currency::EUR);
        assert!(product.id.starts_with("bulk-"));
        // Shipping currency defaults to the supplier's.
        assert_eq!(product.shipping_currency, Some(Currency::EUR));
    }

    #[test]
    fn test_blank_name_gets_generated_name() {
        let product = parse_bulk_row(&row("  ", "1", "1", "USD"));
        assert!(product.name.starts_with("Product "));
        assert_eq!(product.name.len(), "Product ".len() + 4);
    }

    #[test]
    fn test_garbage_numerics_default_to_zero() {
        let product = parse_bulk_row(&row("Mug", "abc", "-5", "USD"));
        assert_eq!(product.unit_price, 0.0);
        assert_eq!(product.quantity, 0);
    }

    #[test]
    fn test_unknown_currency_falls_back_to_usd() {
        let product = parse_bulk_row(&row("Mug", "1", "1", "XYZ"));
        assert_eq!(product.supplier_currency, Currency::USD);
    }

    #[test]
    fn test_fractional_quantity_floors() {
        let product = parse_bulk_row(&row("Mug", "1", "12.9", "USD"));
        assert_eq!(product.quantity, 12);
    }

    #[test]
    fn test_template_has_header_and_example() {
        let csv = bulk_template_csv();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(BULK_CSV_HEADER));
        assert!(lines.next().unwrap().starts_with("Example Product"));
    }
}
