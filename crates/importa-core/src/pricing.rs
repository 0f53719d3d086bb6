//! # Landed Cost Engine
//!
//! Computes the per-unit and total landed cost of each product in the
//! workspace's base currency.
//!
//! ## Cost Model
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │  per-unit landed cost (base currency)                              │
//! │                                                                    │
//! │    unit price        (supplier currency) ──► convert ──┐           │
//! │  + shipping          (shipping currency) ──► convert ──┤           │
//! │  + customs duty  %   (supplier currency) ──► convert ──┼──► sum    │
//! │  + import tax    %   (supplier currency) ──► convert ──┤           │
//! │  + insurance     %   (supplier currency) ──► convert ──┤           │
//! │  + misc flat         (misc currency)     ──► convert ──┘           │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//! - Percentage components are computed on the unit price in the supplier
//!   currency, rounded to cents there, then converted.
//! - Each component converts to base independently; the base total is the
//!   rounded sum of the converted components (convert-then-sum).
//! - Per-product customs/tax overrides are honored only when
//!   `assumptions.apply_overrides` is set. The shipping override always
//!   applies.
//! - Negative or non-finite inputs clamp to zero; quantity floors to a
//!   non-negative integer.

use crate::currency::{clamp_rate, convert, round2, Currency, RateTable};
use crate::types::{CostAssumptions, Product, ProductCostBreakdown};

// =============================================================================
// Resolvers
// =============================================================================

/// Resolves the effective per-unit shipping cost for a product.
pub fn resolve_shipping_per_unit(product: &Product, assumptions: &CostAssumptions) -> f64 {
    clamp_rate(product.shipping_per_unit, clamp_rate(Some(assumptions.shipping_per_unit), 0.0))
}

/// Resolves the currency the shipping component is quoted in.
pub fn resolve_shipping_currency(product: &Product, assumptions: &CostAssumptions) -> Currency {
    product
        .shipping_currency
        .unwrap_or(assumptions.shipping_currency)
}

/// Resolves the effective customs percentage, honoring the per-product
/// override only when the override gate is open.
pub fn resolve_customs_percent(product: &Product, assumptions: &CostAssumptions) -> f64 {
    let global = clamp_rate(Some(assumptions.customs_percent), 0.0);
    if assumptions.apply_overrides {
        clamp_rate(product.customs_percent_override, global)
    } else {
        global
    }
}

/// Resolves the effective import-tax percentage, same gating as customs.
pub fn resolve_import_tax_percent(product: &Product, assumptions: &CostAssumptions) -> f64 {
    let global = clamp_rate(Some(assumptions.import_tax_percent), 0.0);
    if assumptions.apply_overrides {
        clamp_rate(product.import_tax_percent_override, global)
    } else {
        global
    }
}

/// Resolves the currency the misc flat cost is quoted in. The per-product
/// shipping-currency override never applies here; the fallback is the
/// global shipping currency.
pub fn resolve_misc_currency(assumptions: &CostAssumptions) -> Currency {
    assumptions.misc_currency.unwrap_or(assumptions.shipping_currency)
}

// =============================================================================
// Landed Cost
// =============================================================================

/// Computes the full landed-cost breakdown for one product.
///
/// ## Example
/// ```
/// use importa_core::currency::{Currency, RateTable};
/// use importa_core::pricing::calculate_product_cost;
/// use importa_core::types::{CostAssumptions, Product};
///
/// let product = Product::new("Towel", 3.8, 200, Currency::USD);
/// let assumptions = CostAssumptions::default(); // base INR, 10% customs, 5% tax
/// let cost = calculate_product_cost(&product, &assumptions, &RateTable::bundled_defaults());
/// assert_eq!(cost.customs_per_unit, 0.38);  // 10% of 3.8 USD
/// assert_eq!(cost.total_per_unit_base, 371.01); // INR at the bundled 83.0 rate
/// ```
pub fn calculate_product_cost(
    product: &Product,
    assumptions: &CostAssumptions,
    rates: &RateTable,
) -> ProductCostBreakdown {
    let base = assumptions.base_currency;
    let supplier = product.supplier_currency;

    let unit_price = if product.unit_price.is_finite() && product.unit_price > 0.0 {
        product.unit_price
    } else {
        0.0
    };
    let quantity = product.quantity.max(0);

    let shipping_per_unit = resolve_shipping_per_unit(product, assumptions);
    let shipping_currency = resolve_shipping_currency(product, assumptions);

    let customs_percent = resolve_customs_percent(product, assumptions);
    let tax_percent = resolve_import_tax_percent(product, assumptions);
    let insurance_percent = clamp_rate(Some(assumptions.insurance_percent), 0.0);

    let misc_per_unit = clamp_rate(Some(assumptions.misc_per_unit), 0.0);
    let misc_currency = resolve_misc_currency(assumptions);

    // Percentage components, rounded in the supplier currency.
    let customs_per_unit = round2(unit_price * customs_percent / 100.0);
    let taxes_per_unit = round2(unit_price * tax_percent / 100.0);
    let insurance_per_unit = round2(unit_price * insurance_percent / 100.0);

    // Each component converts to base independently.
    let unit_price_in_base = convert(unit_price, supplier, base, rates);
    let shipping_per_unit_base = convert(shipping_per_unit, shipping_currency, base, rates);
    let customs_per_unit_base = convert(customs_per_unit, supplier, base, rates);
    let taxes_per_unit_base = convert(taxes_per_unit, supplier, base, rates);
    let insurance_per_unit_base = convert(insurance_per_unit, supplier, base, rates);
    let misc_per_unit_base = convert(misc_per_unit, misc_currency, base, rates);

    let total_per_unit = round2(
        unit_price
            + shipping_per_unit
            + customs_per_unit
            + taxes_per_unit
            + insurance_per_unit
            + misc_per_unit,
    );
    let total_per_unit_base = round2(
        unit_price_in_base
            + shipping_per_unit_base
            + customs_per_unit_base
            + taxes_per_unit_base
            + insurance_per_unit_base
            + misc_per_unit_base,
    );

    ProductCostBreakdown {
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        quantity,
        base_currency: base,
        supplier_currency: supplier,
        unit_price_original: round2(unit_price),
        unit_price_in_base,
        shipping_per_unit: round2(shipping_per_unit),
        shipping_per_unit_base,
        customs_per_unit,
        customs_per_unit_base,
        taxes_per_unit,
        taxes_per_unit_base,
        insurance_per_unit,
        insurance_per_unit_base,
        misc_per_unit: round2(misc_per_unit),
        misc_per_unit_base,
        total_per_unit,
        total_per_unit_base,
        total_cost_original: round2(total_per_unit * quantity as f64),
        total_cost_base: round2(total_per_unit_base * quantity as f64),
    }
}

/// Computes breakdowns for every product in a list.
pub fn calculate_all_product_costs(
    products: &[Product],
    assumptions: &CostAssumptions,
    rates: &RateTable,
) -> Vec<ProductCostBreakdown> {
    products
        .iter()
        .map(|p| calculate_product_cost(p, assumptions, rates))
        .collect()
}

/// Sums the total landed cost across breakdowns, in the base currency.
pub fn aggregate_total_investment(costs: &[ProductCostBreakdown]) -> f64 {
    round2(costs.iter().map(|c| c.total_cost_base).sum())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn towel() -> Product {
        let mut p = Product::new("Towel", 3.8, 200, Currency::USD);
        p.shipping_per_unit = Some(0.1);
        p
    }

    #[test]
    fn test_worked_example_usd_to_inr() {
        // 3.8 USD x 200, INR base at 83, 10% customs, 5% tax, 0.1 shipping.
        let cost = calculate_product_cost(
            &towel(),
            &CostAssumptions::default(),
            &RateTable::bundled_defaults(),
        );
        assert!(approx(cost.customs_per_unit, 0.38));
        assert!(approx(cost.taxes_per_unit, 0.19));
        assert!(approx(cost.unit_price_in_base, 315.4));
        assert!(approx(cost.shipping_per_unit_base, 8.3));
        assert!(approx(cost.customs_per_unit_base, 31.54));
        assert!(approx(cost.taxes_per_unit_base, 15.77));
        assert!(approx(cost.total_per_unit_base, 371.01));
        assert!(approx(cost.total_cost_base, 74202.0));
        assert!(approx(cost.total_per_unit, 4.47));
        assert!(approx(cost.total_cost_original, 894.0));
    }

    #[test]
    fn test_overrides_ignored_when_gate_closed() {
        let mut product = towel();
        product.customs_percent_override = Some(20.0);
        let cost = calculate_product_cost(
            &product,
            &CostAssumptions::default(),
            &RateTable::bundled_defaults(),
        );
        assert!(approx(cost.customs_per_unit, 0.38)); // still 10%
    }

    #[test]
    fn test_overrides_applied_when_gate_open() {
        let mut product = towel();
        product.customs_percent_override = Some(20.0);
        let assumptions = CostAssumptions {
            apply_overrides: true,
            ..CostAssumptions::default()
        };
        let cost =
            calculate_product_cost(&product, &assumptions, &RateTable::bundled_defaults());
        assert!(approx(cost.customs_per_unit, 0.76)); // 20% of 3.8
    }

    #[test]
    fn test_negative_inputs_clamp_to_zero() {
        let mut product = Product::new("Junk", -5.0, -3, Currency::USD);
        product.shipping_per_unit = Some(-1.0);
        let cost = calculate_product_cost(
            &product,
            &CostAssumptions::default(),
            &RateTable::bundled_defaults(),
        );
        assert_eq!(cost.quantity, 0);
        assert!(approx(cost.unit_price_original, 0.0));
        // Negative shipping override falls back to the global default.
        assert!(approx(cost.shipping_per_unit, 0.1));
        assert!(approx(cost.total_cost_base, 0.0));
    }

    #[test]
    fn test_same_currency_skips_conversion() {
        let product = Product::new("Local", 100.0, 10, Currency::INR);
        let assumptions = CostAssumptions {
            shipping_currency: Currency::INR,
            misc_currency: Some(Currency::INR),
            shipping_per_unit: 5.0,
            ..CostAssumptions::default()
        };
        let cost =
            calculate_product_cost(&product, &assumptions, &RateTable::bundled_defaults());
        assert!(approx(cost.unit_price_in_base, 100.0));
        // 100 + 5 shipping + 10 customs + 5 tax
        assert!(approx(cost.total_per_unit_base, 120.0));
    }

    #[test]
    fn test_misc_falls_back_to_global_shipping_currency() {
        let mut product = Product::new("Widget", 1.0, 1, Currency::USD);
        // A per-product shipping currency moves shipping, never misc.
        product.shipping_currency = Some(Currency::EUR);
        let assumptions = CostAssumptions {
            misc_per_unit: 1.0,
            misc_currency: None,
            ..CostAssumptions::default()
        };
        let rates = RateTable::bundled_defaults();
        let cost = calculate_product_cost(&product, &assumptions, &rates);
        // Misc converts at the global USD rate (83), not the EUR override.
        assert!(approx(cost.misc_per_unit_base, 83.0));
        assert_eq!(resolve_misc_currency(&assumptions), Currency::USD);
        assert_eq!(
            resolve_shipping_currency(&product, &assumptions),
            Currency::EUR
        );
    }

    #[test]
    fn test_aggregate_total_investment() {
        let rates = RateTable::bundled_defaults();
        let assumptions = CostAssumptions::default();
        let products = vec![towel(), Product::new("Pen", 1.0, 100, Currency::USD)];
        let costs = calculate_all_product_costs(&products, &assumptions, &rates);
        let total = aggregate_total_investment(&costs);
        assert!(approx(total, costs[0].total_cost_base + costs[1].total_cost_base));
    }
}
