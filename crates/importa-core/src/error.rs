//! # Error Types
//!
//! Domain-specific error types for importa-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  importa-core errors (this file)                                       │
//! │  ├── CoreError        - General domain errors (lookups, boundaries)    │
//! │  └── ValidationError  - Input validation findings                      │
//! │                                                                         │
//! │  importa-store errors (separate crate)                                 │
//! │  └── StoreError       - Persistence failures                           │
//! │                                                                         │
//! │  importa-rates errors (separate crate)                                 │
//! │  └── RatesError       - Fetch/cache failures (swallowed internally)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Validation findings are collected into a `Vec`, never thrown: a form
//!    with three problems reports all three at once
//! 3. Errors are enum variants, never bare Strings

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A currency code outside the closed supported set reached a boundary
    /// that requires strict parsing (bulk import instead defaults to USD).
    #[error("Unsupported currency code: {0}")]
    UnknownCurrency(String),

    /// Product lookup by id failed.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Favorite lookup by id failed.
    #[error("Favorite not found: {0}")]
    FavoriteNotFound(String),

    /// Template lookup by id failed.
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// Comparison scenario lookup by id failed.
    #[error("Comparison scenario not found: {0}")]
    ComparisonNotFound(String),

    /// A currency outside the retail set was requested as a retail currency.
    #[error("{0} is not a supported retail currency")]
    NotARetailCurrency(crate::currency::Currency),

    /// A manual exchange-rate override was not a positive finite number.
    #[error("Exchange rate for {currency} must be a positive number, got {value}")]
    InvalidRate {
        currency: crate::currency::Currency,
        value: f64,
    },
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single validation finding.
///
/// Returned in lists from `validation::validate_*`; the messages are shown to
/// the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Product name is required")]
    NameRequired,

    #[error("Unit price must be greater than zero")]
    UnitPriceNotPositive,

    #[error("Quantity must be greater than zero")]
    QuantityNotPositive,

    #[error("Customs duty must be 0 - 100%")]
    CustomsPercentOutOfRange,

    #[error("Import tax must be 0 - 100%")]
    ImportTaxPercentOutOfRange,

    #[error("Insurance must be 0 - 100%")]
    InsurancePercentOutOfRange,
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::Currency;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CoreError::UnknownCurrency("XYZ".to_string()).to_string(),
            "Unsupported currency code: XYZ"
        );
        assert_eq!(
            CoreError::NotARetailCurrency(Currency::JPY).to_string(),
            "JPY is not a supported retail currency"
        );
    }

    #[test]
    fn test_validation_messages_are_user_facing() {
        assert_eq!(
            ValidationError::NameRequired.to_string(),
            "Product name is required"
        );
        assert_eq!(
            ValidationError::UnitPriceNotPositive.to_string(),
            "Unit price must be greater than zero"
        );
        assert_eq!(
            ValidationError::CustomsPercentOutOfRange.to_string(),
            "Customs duty must be 0 - 100%"
        );
    }
}
