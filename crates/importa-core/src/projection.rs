//! # Profit Projection
//!
//! Retail pricing, profit rollups and best-markup selection on top of the
//! landed-cost breakdowns produced by [`crate::pricing`].
//!
//! ## Pipeline
//! ```text
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │  ProductCostBreakdown ──► RetailPricingResult (per markup × currency) │
//! │                               │                                       │
//! │                               ├──► ProfitProjectionSummary (rollup)   │
//! │                               └──► best_markup_for_currency           │
//! └───────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//! - Retail price = landed cost in the retail currency × (1 + markup).
//! - Margin = total profit / total revenue × 100; zero revenue yields a
//!   zero margin, never a division error.
//! - Rollup margins are recomputed from summed totals (dollar-weighted),
//!   never averaged across line items.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::currency::{convert, format_amount, round2, Currency, RateTable};
use crate::pricing::{aggregate_total_investment, calculate_all_product_costs};
use crate::types::{
    ColorToken, ComparisonScenario, ComparisonSnapshot, CostAssumptions, FormattedRetail,
    HistoryEntry, MarkupScenario, Product, ProductCostBreakdown, ProfitProjectionSummary,
    RetailPricingResult,
};

// =============================================================================
// Retail Pricing
// =============================================================================

/// Prices one cost breakdown at one markup in one retail currency.
pub fn calculate_retail_for_markup(
    cost: &ProductCostBreakdown,
    markup: &MarkupScenario,
    retail_currency: Currency,
    rates: &RateTable,
) -> RetailPricingResult {
    let cost_retail = convert(
        cost.total_per_unit_base,
        cost.base_currency,
        retail_currency,
        rates,
    );
    let quantity = cost.quantity.max(0);

    let retail_price = round2(cost_retail * (1.0 + markup.percentage));
    let profit_per_unit = round2(retail_price - cost_retail);
    let total_revenue = round2(retail_price * quantity as f64);
    let total_profit = round2(profit_per_unit * quantity as f64);
    let profit_margin = if total_revenue == 0.0 {
        0.0
    } else {
        round2(total_profit / total_revenue * 100.0)
    };

    RetailPricingResult {
        product_id: cost.product_id.clone(),
        markup_id: markup.id.clone(),
        markup_label: markup.label.clone(),
        markup_percent: markup.percentage,
        retail_currency,
        quantity,
        retail_price_per_unit: retail_price,
        profit_per_unit,
        total_revenue,
        total_profit,
        profit_margin_percent: profit_margin,
        formatted: FormattedRetail {
            retail_price: format_amount(retail_price, retail_currency),
            profit_per_unit: format_amount(profit_per_unit, retail_currency),
            total_revenue: format_amount(total_revenue, retail_currency),
            total_profit: format_amount(total_profit, retail_currency),
            profit_margin: format!("{:.2}%", profit_margin),
        },
    }
}

/// Prices every (breakdown, markup, retail currency) combination.
pub fn calculate_retail_results(
    costs: &[ProductCostBreakdown],
    markups: &[MarkupScenario],
    retail_currencies: &[Currency],
    rates: &RateTable,
) -> Vec<RetailPricingResult> {
    let mut results = Vec::with_capacity(costs.len() * markups.len() * retail_currencies.len());
    for cost in costs {
        for markup in markups {
            for &currency in retail_currencies {
                results.push(calculate_retail_for_markup(cost, markup, currency, rates));
            }
        }
    }
    results
}

// =============================================================================
// Rollups
// =============================================================================

/// Aggregates retail results by (markup, retail currency).
///
/// Returned summaries are ordered by profit margin, highest first.
pub fn summarize_projections(results: &[RetailPricingResult]) -> Vec<ProfitProjectionSummary> {
    struct Bucket {
        markup_label: String,
        markup_percent: f64,
        units: i64,
        revenue: f64,
        profit: f64,
    }

    let mut buckets: BTreeMap<(String, Currency), Bucket> = BTreeMap::new();
    for result in results {
        let key = (result.markup_id.clone(), result.retail_currency);
        let bucket = buckets.entry(key).or_insert_with(|| Bucket {
            markup_label: result.markup_label.clone(),
            markup_percent: result.markup_percent,
            units: 0,
            revenue: 0.0,
            profit: 0.0,
        });
        bucket.units += result.quantity;
        bucket.revenue += result.total_revenue;
        bucket.profit += result.total_profit;
    }

    let mut summaries: Vec<ProfitProjectionSummary> = buckets
        .into_iter()
        .map(|((markup_id, retail_currency), bucket)| {
            let revenue = round2(bucket.revenue);
            let profit = round2(bucket.profit);
            let margin = if revenue == 0.0 {
                0.0
            } else {
                round2(profit / revenue * 100.0)
            };
            ProfitProjectionSummary {
                markup_id,
                markup_label: bucket.markup_label,
                markup_percent: bucket.markup_percent,
                total_units: bucket.units,
                total_revenue: revenue,
                total_cost: round2(revenue - profit),
                total_profit: profit,
                profit_margin_percent: margin,
                retail_currency,
            }
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.profit_margin_percent
            .partial_cmp(&a.profit_margin_percent)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    summaries
}

/// Picks the strongest summary for a retail currency.
///
/// Highest profit margin wins; on a margin tie the higher total profit
/// wins; any remaining tie keeps the first candidate seen. Returns `None`
/// when no summary targets the currency.
pub fn best_markup_for_currency(
    summaries: &[ProfitProjectionSummary],
    currency: Currency,
) -> Option<&ProfitProjectionSummary> {
    let mut best: Option<&ProfitProjectionSummary> = None;
    for candidate in summaries.iter().filter(|s| s.retail_currency == currency) {
        best = match best {
            None => Some(candidate),
            Some(current) => {
                if candidate.profit_margin_percent > current.profit_margin_percent
                    || (candidate.profit_margin_percent == current.profit_margin_percent
                        && candidate.total_profit > current.total_profit)
                {
                    Some(candidate)
                } else {
                    Some(current)
                }
            }
        };
    }
    best
}

// =============================================================================
// Profit Bands
// =============================================================================

/// Color band for a profit margin percentage.
pub fn profit_color(margin_percent: f64) -> ColorToken {
    if margin_percent >= 35.0 {
        ColorToken::Success
    } else if margin_percent >= 20.0 {
        ColorToken::Warning
    } else {
        ColorToken::Danger
    }
}

/// Human-readable quality badge for a profit margin percentage.
pub fn margin_quality(margin_percent: f64) -> &'static str {
    if margin_percent >= 40.0 {
        "High Margin"
    } else if margin_percent >= 20.0 {
        "Moderate Margin"
    } else {
        "Low Margin"
    }
}

// =============================================================================
// Scenario Pipeline
// =============================================================================

/// Fully computed view of a product set under one set of assumptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub base_currency: Currency,
    pub total_investment: f64,
    pub costs: Vec<ProductCostBreakdown>,
    pub retail_results: Vec<RetailPricingResult>,
    pub summaries: Vec<ProfitProjectionSummary>,
}

/// Runs the whole pipeline: costs, retail pricing and rollups.
pub fn calculate_scenario(
    products: &[Product],
    assumptions: &CostAssumptions,
    markups: &[MarkupScenario],
    retail_currencies: &[Currency],
    rates: &RateTable,
) -> ScenarioResult {
    let costs = calculate_all_product_costs(products, assumptions, rates);
    let retail_results = calculate_retail_results(&costs, markups, retail_currencies, rates);
    let summaries = summarize_projections(&retail_results);
    ScenarioResult {
        base_currency: assumptions.base_currency,
        total_investment: aggregate_total_investment(&costs),
        costs,
        retail_results,
        summaries,
    }
}

/// Computes the side-by-side view of a saved comparison scenario.
pub fn build_comparison_snapshot(
    scenario: &ComparisonScenario,
    rates: &RateTable,
) -> ComparisonSnapshot {
    let costs = calculate_all_product_costs(&scenario.products, &scenario.assumptions, rates);
    ComparisonSnapshot {
        id: scenario.id.clone(),
        name: scenario.name.clone(),
        description: scenario.description.clone(),
        total_investment: aggregate_total_investment(&costs),
        base_currency: scenario.assumptions.base_currency,
        products: costs,
    }
}

/// Snapshots one cost breakdown into a history entry stamped with now.
pub fn build_history_entry(cost: &ProductCostBreakdown, notes: Option<String>) -> HistoryEntry {
    HistoryEntry {
        id: format!("hist-{}", &Uuid::new_v4().simple().to_string()[..8]),
        product_id: cost.product_id.clone(),
        timestamp: Utc::now(),
        product_name: Some(cost.product_name.clone()),
        unit_price: cost.unit_price_original,
        quantity: cost.quantity,
        landed_cost_per_unit: cost.total_per_unit_base,
        landed_cost_currency: cost.base_currency,
        notes,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::calculate_product_cost;
    use crate::types::default_markups;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn towel_cost() -> ProductCostBreakdown {
        let mut product = Product::new("Towel", 3.8, 200, Currency::USD);
        product.shipping_per_unit = Some(0.1);
        calculate_product_cost(
            &product,
            &CostAssumptions::default(),
            &RateTable::bundled_defaults(),
        )
    }

    #[test]
    fn test_retail_pricing_in_base_currency() {
        let cost = towel_cost();
        let markups = default_markups();
        let result =
            calculate_retail_for_markup(&cost, &markups[0], Currency::INR, &RateTable::bundled_defaults());
        // 371.01 * 2.5 at 150% markup
        assert!(approx(result.retail_price_per_unit, 927.53));
        assert!(approx(result.profit_per_unit, 556.52));
        assert!(approx(result.total_revenue, 185506.0));
        assert!(approx(result.total_profit, 111304.0));
        assert_eq!(result.formatted.retail_price, "₹927.53");
        assert_eq!(result.formatted.profit_margin, "60.00%");
    }

    #[test]
    fn test_margin_is_markup_over_one_plus_markup() {
        // Margin = m / (1 + m): 150% markup yields a 60% margin.
        let cost = towel_cost();
        let rates = RateTable::bundled_defaults();
        for markup in default_markups() {
            let result = calculate_retail_for_markup(&cost, &markup, Currency::INR, &rates);
            let expected = markup.percentage / (1.0 + markup.percentage) * 100.0;
            assert!((result.profit_margin_percent - expected).abs() < 0.05);
        }
    }

    #[test]
    fn test_zero_quantity_yields_zero_margin() {
        let mut cost = towel_cost();
        cost.quantity = 0;
        let markup = &default_markups()[0];
        let result =
            calculate_retail_for_markup(&cost, markup, Currency::INR, &RateTable::bundled_defaults());
        assert_eq!(result.total_revenue, 0.0);
        assert_eq!(result.profit_margin_percent, 0.0);
    }

    #[test]
    fn test_zero_markup_sells_at_cost() {
        let cost = towel_cost();
        let markup = crate::markup::custom_markup(0.0);
        let result =
            calculate_retail_for_markup(&cost, &markup, Currency::INR, &RateTable::bundled_defaults());
        assert!(approx(result.retail_price_per_unit, 371.01));
        assert_eq!(result.profit_per_unit, 0.0);
        assert_eq!(result.total_profit, 0.0);
        assert_eq!(result.profit_margin_percent, 0.0);
    }

    #[test]
    fn test_summaries_group_and_sort_by_margin() {
        let cost = towel_cost();
        let markups = default_markups();
        let rates = RateTable::bundled_defaults();
        let results =
            calculate_retail_results(&[cost], &markups, &[Currency::INR, Currency::USD], &rates);
        assert_eq!(results.len(), 8);

        let summaries = summarize_projections(&results);
        // One bucket per (markup, currency).
        assert_eq!(summaries.len(), 8);
        for pair in summaries.windows(2) {
            assert!(pair[0].profit_margin_percent >= pair[1].profit_margin_percent);
        }
        // Highest markup produces the top margin.
        assert_eq!(summaries[0].markup_id, "markup-300");
    }

    #[test]
    fn test_summary_margin_is_dollar_weighted() {
        let rates = RateTable::bundled_defaults();
        let assumptions = CostAssumptions::default();
        let big = Product::new("Big", 10.0, 1000, Currency::USD);
        let small = Product::new("Small", 1.0, 10, Currency::USD);
        let costs = calculate_all_product_costs(&[big, small], &assumptions, &rates);
        let markups = default_markups();
        let results = calculate_retail_results(&costs, &markups[..1], &[Currency::INR], &rates);
        let summaries = summarize_projections(&results);
        assert_eq!(summaries.len(), 1);
        let s = &summaries[0];
        let expected = round2(s.total_profit / s.total_revenue * 100.0);
        assert!(approx(s.profit_margin_percent, expected));
        assert!(approx(s.total_cost, round2(s.total_revenue - s.total_profit)));
        assert_eq!(s.total_units, 1010);
    }

    #[test]
    fn test_best_markup_prefers_margin_then_profit() {
        let mk = |id: &str, margin: f64, profit: f64| ProfitProjectionSummary {
            markup_id: id.to_string(),
            markup_label: id.to_string(),
            markup_percent: 2.0,
            total_units: 10,
            total_revenue: 100.0,
            total_cost: 100.0 - profit,
            total_profit: profit,
            profit_margin_percent: margin,
            retail_currency: Currency::INR,
        };
        let summaries = vec![
            mk("a", 50.0, 100.0),
            mk("b", 60.0, 50.0),
            mk("c", 60.0, 80.0),
        ];
        let best = best_markup_for_currency(&summaries, Currency::INR).unwrap();
        assert_eq!(best.markup_id, "c");
    }

    #[test]
    fn test_best_markup_none_for_missing_currency() {
        assert!(best_markup_for_currency(&[], Currency::EUR).is_none());
    }

    #[test]
    fn test_profit_bands() {
        assert_eq!(profit_color(50.0), ColorToken::Success);
        assert_eq!(profit_color(35.0), ColorToken::Success);
        assert_eq!(profit_color(25.0), ColorToken::Warning);
        assert_eq!(profit_color(10.0), ColorToken::Danger);
        assert_eq!(margin_quality(45.0), "High Margin");
        assert_eq!(margin_quality(30.0), "Moderate Margin");
        assert_eq!(margin_quality(5.0), "Low Margin");
    }

    #[test]
    fn test_scenario_pipeline() {
        let products = crate::types::sample_products();
        let scenario = calculate_scenario(
            &products,
            &CostAssumptions::default(),
            &default_markups(),
            &[Currency::INR],
            &RateTable::bundled_defaults(),
        );
        assert_eq!(scenario.costs.len(), 2);
        assert_eq!(scenario.retail_results.len(), 8);
        assert_eq!(scenario.summaries.len(), 4);
        assert!(scenario.total_investment > 0.0);
        assert_eq!(scenario.base_currency, Currency::INR);
    }

    #[test]
    fn test_history_entry_snapshots_cost() {
        let cost = towel_cost();
        let entry = build_history_entry(&cost, Some("restock".to_string()));
        assert!(entry.id.starts_with("hist-"));
        assert_eq!(entry.product_id, cost.product_id);
        assert!(approx(entry.landed_cost_per_unit, cost.total_per_unit_base));
        assert_eq!(entry.landed_cost_currency, Currency::INR);
    }
}
