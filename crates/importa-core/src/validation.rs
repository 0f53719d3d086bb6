//! # Input Validation
//!
//! Validation of user-entered products and cost assumptions. Validators
//! collect every problem rather than stopping at the first, so a caller can
//! surface the full list at once.

use crate::error::ValidationError;
use crate::types::{CostAssumptions, Product};

// =============================================================================
// Validators
// =============================================================================

/// Validates a product, returning every problem found.
///
/// ## Rules
/// - Name must be non-blank.
/// - Unit price must be finite and strictly positive.
/// - Quantity must be strictly positive.
/// - Customs/tax percent overrides, when present, must fall in 0-100.
pub fn validate_product(product: &Product) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if product.name.trim().is_empty() {
        errors.push(ValidationError::NameRequired);
    }
    if !product.unit_price.is_finite() || product.unit_price <= 0.0 {
        errors.push(ValidationError::UnitPriceNotPositive);
    }
    if product.quantity <= 0 {
        errors.push(ValidationError::QuantityNotPositive);
    }
    if let Some(pct) = product.customs_percent_override {
        if !percent_in_range(pct) {
            errors.push(ValidationError::CustomsPercentOutOfRange);
        }
    }
    if let Some(pct) = product.import_tax_percent_override {
        if !percent_in_range(pct) {
            errors.push(ValidationError::ImportTaxPercentOutOfRange);
        }
    }

    errors
}

/// Validates the global cost assumptions.
pub fn validate_assumptions(assumptions: &CostAssumptions) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if !percent_in_range(assumptions.customs_percent) {
        errors.push(ValidationError::CustomsPercentOutOfRange);
    }
    if !percent_in_range(assumptions.import_tax_percent) {
        errors.push(ValidationError::ImportTaxPercentOutOfRange);
    }
    if !percent_in_range(assumptions.insurance_percent) {
        errors.push(ValidationError::InsurancePercentOutOfRange);
    }

    errors
}

fn percent_in_range(pct: f64) -> bool {
    pct.is_finite() && (0.0..=100.0).contains(&pct)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::Currency;

    #[test]
    fn test_valid_product_passes() {
        let product = Product::new("Towel", 3.8, 200, Currency::USD);
        assert!(validate_product(&product).is_empty());
    }

    #[test]
    fn test_blank_name_and_bad_numbers_all_reported() {
        let product = Product::new("   ", 0.0, 0, Currency::USD);
        let errors = validate_product(&product);
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::NameRequired));
        assert!(errors.contains(&ValidationError::UnitPriceNotPositive));
        assert!(errors.contains(&ValidationError::QuantityNotPositive));
    }

    #[test]
    fn test_override_percent_bounds() {
        let mut product = Product::new("Towel", 3.8, 200, Currency::USD);
        product.customs_percent_override = Some(150.0);
        product.import_tax_percent_override = Some(-1.0);
        let errors = validate_product(&product);
        assert!(errors.contains(&ValidationError::CustomsPercentOutOfRange));
        assert!(errors.contains(&ValidationError::ImportTaxPercentOutOfRange));
    }

    #[test]
    fn test_non_finite_price_rejected() {
        let product = Product::new("Towel", f64::NAN, 1, Currency::USD);
        let errors = validate_product(&product);
        assert!(errors.contains(&ValidationError::UnitPriceNotPositive));
    }

    #[test]
    fn test_assumptions_bounds() {
        let good = CostAssumptions::default();
        assert!(validate_assumptions(&good).is_empty());

        let bad = CostAssumptions {
            customs_percent: 101.0,
            insurance_percent: f64::INFINITY,
            ..CostAssumptions::default()
        };
        let errors = validate_assumptions(&bad);
        assert!(errors.contains(&ValidationError::CustomsPercentOutOfRange));
        assert!(errors.contains(&ValidationError::InsurancePercentOutOfRange));
    }
}
