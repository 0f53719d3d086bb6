//! # Domain Types
//!
//! Core domain types for the import-pricing pipeline.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  INPUTS (persisted)                DERIVED (recomputed on demand)      │
//! │  ┌──────────────────┐              ┌───────────────────────┐           │
//! │  │     Product      │──────────────►│ ProductCostBreakdown  │           │
//! │  │ CostAssumptions  │              │ RetailPricingResult   │           │
//! │  │  MarkupScenario  │              │ ProfitProjectionSummary│          │
//! │  │    RateTable     │              └───────────────────────┘           │
//! │  └──────────────────┘                                                  │
//! │                                                                         │
//! │  SNAPSHOTS (persisted, point-in-time)                                  │
//! │  ┌──────────────────┐                                                  │
//! │  │   HistoryEntry   │  landed cost at a moment in time                 │
//! │  │     Template     │  saved product set + assumptions + markups       │
//! │  │ComparisonScenario│  saved product set + assumptions                 │
//! │  └──────────────────┘                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Field names serialize in camelCase to stay byte-compatible with the
//! original persisted JSON blobs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::Currency;

/// Maximum number of history entries retained per workspace.
pub const HISTORY_LIMIT: usize = 200;

// =============================================================================
// Product
// =============================================================================

/// A product being imported, as entered by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (`prod-`/`bulk-` prefix + random suffix).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Optional free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Price per unit, in the supplier's currency.
    pub unit_price: f64,

    /// Units ordered.
    pub quantity: i64,

    /// Currency the supplier invoices in.
    pub supplier_currency: Currency,

    /// Free-text tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Optional stock-keeping unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,

    /// Optional free-text notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Per-unit shipping override; when absent the global assumption applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_per_unit: Option<f64>,

    /// Currency of the shipping override; defaults to the global shipping
    /// currency, then the supplier currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_currency: Option<Currency>,

    /// Customs % override, honored only when assumptions.apply_overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customs_percent_override: Option<f64>,

    /// Import tax % override, honored only when assumptions.apply_overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_tax_percent_override: Option<f64>,

    /// Supplier lead time in days (informational).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_days: Option<u32>,

    /// When the record was last touched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Product {
    /// Creates a product with sensible field defaults and a fresh id.
    pub fn new(name: impl Into<String>, unit_price: f64, quantity: i64, currency: Currency) -> Self {
        Product {
            id: new_product_id(),
            name: name.into(),
            description: None,
            unit_price,
            quantity,
            supplier_currency: currency,
            tags: Vec::new(),
            sku: None,
            notes: None,
            shipping_per_unit: None,
            shipping_currency: None,
            customs_percent_override: None,
            import_tax_percent_override: None,
            lead_days: None,
            last_updated: None,
        }
    }
}

/// Generates a new product id.
pub fn new_product_id() -> String {
    format!("prod-{}", short_suffix())
}

/// Generates a bulk-import product id.
pub fn new_bulk_id() -> String {
    format!("bulk-{}", short_suffix())
}

/// Generates a template id.
pub fn new_template_id() -> String {
    format!("tpl-{}", short_suffix())
}

/// Generates a comparison-scenario id.
pub fn new_comparison_id() -> String {
    format!("cmp-{}", short_suffix())
}

fn short_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

// =============================================================================
// Cost Assumptions
// =============================================================================

/// Global cost assumptions applied to every product unless overridden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostAssumptions {
    /// Default shipping cost per unit.
    pub shipping_per_unit: f64,

    /// Currency the shipping default is quoted in.
    pub shipping_currency: Currency,

    /// Customs duty as a percentage of unit price (0-100).
    pub customs_percent: f64,

    /// Import tax as a percentage of unit price (0-100).
    pub import_tax_percent: f64,

    /// Insurance as a percentage of unit price (0-100).
    #[serde(default)]
    pub insurance_percent: f64,

    /// Miscellaneous flat cost per unit.
    #[serde(default)]
    pub misc_per_unit: f64,

    /// Currency of the misc cost; falls back to the shipping currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub misc_currency: Option<Currency>,

    /// Currency all cost aggregates are summed in.
    pub base_currency: Currency,

    /// Gates the per-product customs/tax percent overrides.
    #[serde(default)]
    pub apply_overrides: bool,
}

impl Default for CostAssumptions {
    fn default() -> Self {
        CostAssumptions {
            shipping_per_unit: 0.1,
            shipping_currency: Currency::USD,
            customs_percent: 10.0,
            import_tax_percent: 5.0,
            insurance_percent: 0.0,
            misc_per_unit: 0.0,
            misc_currency: Some(Currency::USD),
            base_currency: Currency::INR,
            apply_overrides: false,
        }
    }
}

// =============================================================================
// Markup Scenarios
// =============================================================================

/// Severity-style color token attached to markups and profit bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorToken {
    Success,
    Warning,
    Danger,
    Info,
}

/// A named profit multiplier applied on top of landed cost.
///
/// `percentage` is the fractional multiplier: 1.5 means a 150% markup, so
/// retail = cost × (1 + 1.5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkupScenario {
    pub id: String,
    pub label: String,
    pub percentage: f64,
    #[serde(default)]
    pub is_custom: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_token: Option<ColorToken>,
}

/// The built-in markup scenarios (150% through 300%).
pub fn default_markups() -> Vec<MarkupScenario> {
    vec![
        MarkupScenario {
            id: "markup-150".to_string(),
            label: "150%".to_string(),
            percentage: 1.5,
            is_custom: false,
            color_token: Some(ColorToken::Warning),
        },
        MarkupScenario {
            id: "markup-200".to_string(),
            label: "200%".to_string(),
            percentage: 2.0,
            is_custom: false,
            color_token: Some(ColorToken::Info),
        },
        MarkupScenario {
            id: "markup-250".to_string(),
            label: "250%".to_string(),
            percentage: 2.5,
            is_custom: false,
            color_token: Some(ColorToken::Success),
        },
        MarkupScenario {
            id: "markup-300".to_string(),
            label: "300%".to_string(),
            percentage: 3.0,
            is_custom: false,
            color_token: Some(ColorToken::Success),
        },
    ]
}

// =============================================================================
// Derived Views
// =============================================================================

/// Per-product landed-cost breakdown.
///
/// Every `_base` field is the neighbouring component converted into the base
/// currency independently (convert-then-sum; see `pricing`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCostBreakdown {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub base_currency: Currency,
    pub supplier_currency: Currency,
    pub unit_price_original: f64,
    pub unit_price_in_base: f64,
    pub shipping_per_unit: f64,
    pub shipping_per_unit_base: f64,
    pub customs_per_unit: f64,
    pub customs_per_unit_base: f64,
    pub taxes_per_unit: f64,
    pub taxes_per_unit_base: f64,
    pub insurance_per_unit: f64,
    pub insurance_per_unit_base: f64,
    pub misc_per_unit: f64,
    pub misc_per_unit_base: f64,
    pub total_per_unit: f64,
    pub total_per_unit_base: f64,
    pub total_cost_original: f64,
    pub total_cost_base: f64,
}

/// Pre-rendered display strings for a retail pricing result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedRetail {
    pub retail_price: String,
    pub profit_per_unit: String,
    pub total_revenue: String,
    pub total_profit: String,
    pub profit_margin: String,
}

/// Retail projection for one (product, markup, retail currency) triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetailPricingResult {
    pub product_id: String,
    pub markup_id: String,
    pub markup_label: String,
    pub markup_percent: f64,
    pub retail_currency: Currency,
    pub quantity: i64,
    pub retail_price_per_unit: f64,
    pub profit_per_unit: f64,
    pub total_revenue: f64,
    pub total_profit: f64,
    pub profit_margin_percent: f64,
    pub formatted: FormattedRetail,
}

/// Rollup of retail results by (markup, retail currency).
///
/// Margin is recomputed from the aggregated revenue/profit totals, never
/// averaged across items: the rollup is dollar-weighted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitProjectionSummary {
    pub markup_id: String,
    pub markup_label: String,
    pub markup_percent: f64,
    pub total_units: i64,
    pub total_revenue: f64,
    pub total_cost: f64,
    pub total_profit: f64,
    pub profit_margin_percent: f64,
    pub retail_currency: Currency,
}

// =============================================================================
// Snapshots
// =============================================================================

/// A point-in-time landed-cost snapshot for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub product_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    pub unit_price: f64,
    pub quantity: i64,
    pub landed_cost_per_unit: f64,
    pub landed_cost_currency: Currency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A reusable saved set of products, assumptions and custom markups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub products: Vec<Product>,
    pub assumptions: CostAssumptions,
    pub markups: Vec<MarkupScenario>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A saved what-if scenario for side-by-side comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonScenario {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub products: Vec<Product>,
    pub assumptions: CostAssumptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Computed view of a comparison scenario (costs + total investment).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSnapshot {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub total_investment: f64,
    pub base_currency: Currency,
    pub products: Vec<ProductCostBreakdown>,
}

// =============================================================================
// Sample Data
// =============================================================================

/// Sample products seeded into a fresh workspace.
pub fn sample_products() -> Vec<Product> {
    vec![
        Product {
            id: "sample-1".to_string(),
            name: "Luxury Cotton Towel (40x40cm, 800gsm)".to_string(),
            description: Some("Premium bath towel imported from Turkey".to_string()),
            unit_price: 3.8,
            quantity: 200,
            supplier_currency: Currency::USD,
            tags: vec!["textiles".to_string(), "bath".to_string()],
            sku: None,
            notes: None,
            shipping_per_unit: Some(0.12),
            shipping_currency: None,
            customs_percent_override: None,
            import_tax_percent_override: None,
            lead_days: None,
            last_updated: None,
        },
        Product {
            id: "sample-2".to_string(),
            name: "Aromatherapy Scented Candle".to_string(),
            description: None,
            unit_price: 2.1,
            quantity: 150,
            supplier_currency: Currency::USD,
            tags: vec!["home-fragrance".to_string()],
            sku: None,
            notes: None,
            shipping_per_unit: Some(0.08),
            shipping_currency: None,
            customs_percent_override: None,
            import_tax_percent_override: None,
            lead_days: None,
            last_updated: None,
        },
    ]
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_assumptions() {
        let a = CostAssumptions::default();
        assert_eq!(a.shipping_per_unit, 0.1);
        assert_eq!(a.shipping_currency, Currency::USD);
        assert_eq!(a.customs_percent, 10.0);
        assert_eq!(a.import_tax_percent, 5.0);
        assert_eq!(a.base_currency, Currency::INR);
        assert!(!a.apply_overrides);
    }

    #[test]
    fn test_default_markups_sorted_and_labeled() {
        let markups = default_markups();
        assert_eq!(markups.len(), 4);
        assert_eq!(markups[0].id, "markup-150");
        assert_eq!(markups[0].label, "150%");
        assert_eq!(markups[3].percentage, 3.0);
        assert!(markups.iter().all(|m| !m.is_custom));
    }

    #[test]
    fn test_id_prefixes() {
        assert!(new_product_id().starts_with("prod-"));
        assert!(new_bulk_id().starts_with("bulk-"));
        assert!(new_template_id().starts_with("tpl-"));
        assert!(new_comparison_id().starts_with("cmp-"));
        // Suffix is 8 chars.
        assert_eq!(new_product_id().len(), "prod-".len() + 8);
    }

    #[test]
    fn test_product_wire_format_is_camel_case() {
        let product = Product::new("Widget", 1.0, 10, Currency::USD);
        let json = serde_json::to_string(&product).unwrap();
        assert!(json.contains("\"unitPrice\""));
        assert!(json.contains("\"supplierCurrency\""));
        // Absent optionals stay off the wire.
        assert!(!json.contains("shippingPerUnit"));
    }

    #[test]
    fn test_sample_products() {
        let samples = sample_products();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].unit_price, 3.8);
        assert_eq!(samples[0].quantity, 200);
        assert_eq!(samples[1].shipping_per_unit, Some(0.08));
    }
}
