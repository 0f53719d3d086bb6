//! # Currency Module
//!
//! The closed currency set, the exchange-rate table, and conversion.
//!
//! ## Why a Pivot Currency?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PIVOT CONVERSION (all rates are quoted relative to USD)                │
//! │                                                                         │
//! │  EUR ──► USD ──► INR                                                    │
//! │                                                                         │
//! │  amount_usd = amount / rate[EUR]                                        │
//! │  amount_inr = amount_usd * rate[INR]                                    │
//! │                                                                         │
//! │  One table of N rates covers all N×N currency pairs. The public rate    │
//! │  API quotes against a single base, so this is also the wire format.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Degradation Contract
//! A missing, zero, or non-finite rate never aborts a calculation: conversion
//! short-circuits and returns the amount unconverted (rounded). The bundled
//! default table backfills any hole before conversion runs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// =============================================================================
// Rounding
// =============================================================================

/// Rounds a monetary value to 2 decimal places using standard rounding.
///
/// Non-finite inputs round to 0: every monetary output of this crate flows
/// through here, so NaN/infinity can never escape into persisted state.
#[inline]
pub fn round2(value: f64) -> f64 {
    if value.is_finite() {
        (value * 100.0).round() / 100.0
    } else {
        0.0
    }
}

/// Clamps an optional rate-like value to a non-negative finite number,
/// falling back when the value is absent, negative, or non-finite.
#[inline]
pub fn clamp_rate(value: Option<f64>, fallback: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        _ => fallback,
    }
}

// =============================================================================
// Currency
// =============================================================================

/// The closed set of supported currencies.
///
/// The original data model carried currency codes as free-form strings; here
/// they are a closed enumeration validated at the boundary. Unknown codes are
/// rejected at parse time (bulk import defaults them to USD instead).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Currency {
    /// United States dollar - the pivot currency.
    USD,
    /// Euro.
    EUR,
    /// Pound sterling.
    GBP,
    /// Indian rupee - the default base currency for cost aggregation.
    INR,
    /// Australian dollar.
    AUD,
    /// Canadian dollar.
    CAD,
    /// Japanese yen.
    JPY,
}

impl Currency {
    /// All supported currencies, in the canonical order.
    pub const ALL: [Currency; 7] = [
        Currency::USD,
        Currency::EUR,
        Currency::GBP,
        Currency::INR,
        Currency::AUD,
        Currency::CAD,
        Currency::JPY,
    ];

    /// Currencies offered as retail (selling) currencies.
    pub const RETAIL: [Currency; 5] = [
        Currency::INR,
        Currency::USD,
        Currency::EUR,
        Currency::GBP,
        Currency::AUD,
    ];

    /// The three-letter ISO code.
    pub const fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::INR => "INR",
            Currency::AUD => "AUD",
            Currency::CAD => "CAD",
            Currency::JPY => "JPY",
        }
    }

    /// Display symbol used by [`format_amount`].
    pub const fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::INR => "₹",
            Currency::AUD => "A$",
            Currency::CAD => "C$",
            Currency::JPY => "¥",
        }
    }

    /// The bundled default rate relative to USD.
    ///
    /// Used whenever the live table is missing or carries a bad entry.
    pub const fn default_rate(&self) -> f64 {
        match self {
            Currency::USD => 1.0,
            Currency::EUR => 0.92,
            Currency::GBP => 0.8,
            Currency::INR => 83.0,
            Currency::AUD => 1.52,
            Currency::CAD => 1.36,
            Currency::JPY => 151.0,
        }
    }

    /// True if this currency may be selected as a retail currency.
    pub fn is_retail(&self) -> bool {
        Currency::RETAIL.contains(self)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            "INR" => Ok(Currency::INR),
            "AUD" => Ok(Currency::AUD),
            "CAD" => Ok(Currency::CAD),
            "JPY" => Ok(Currency::JPY),
            other => Err(CoreError::UnknownCurrency(other.to_string())),
        }
    }
}

/// Formats a monetary amount with the currency symbol and 2 decimals.
///
/// ## Example
/// ```rust
/// use importa_core::currency::{format_amount, Currency};
///
/// assert_eq!(format_amount(1099.5, Currency::INR), "₹1099.50");
/// assert_eq!(format_amount(-3.2, Currency::USD), "-$3.20");
/// ```
pub fn format_amount(value: f64, currency: Currency) -> String {
    let value = round2(value);
    if value < 0.0 {
        format!("-{}{:.2}", currency.symbol(), value.abs())
    } else {
        format!("{}{:.2}", currency.symbol(), value)
    }
}

// =============================================================================
// Rate Table
// =============================================================================

/// Exchange rates relative to USD (the pivot).
///
/// ## Invariant
/// Every calculation path runs through [`RateTable::ensured`], so by the time
/// a rate is used it is positive and finite. The raw map may contain holes or
/// garbage (it is deserialized from a cache that outside code can corrupt).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable(BTreeMap<Currency, f64>);

impl RateTable {
    /// An empty table. Rarely useful on its own; see [`RateTable::ensured`].
    pub fn new() -> Self {
        RateTable(BTreeMap::new())
    }

    /// The bundled default table (USD 1, INR 83, EUR 0.92, ...).
    pub fn bundled_defaults() -> Self {
        let mut map = BTreeMap::new();
        for currency in Currency::ALL {
            map.insert(currency, currency.default_rate());
        }
        RateTable(map)
    }

    /// Returns the raw rate for a currency, if present.
    pub fn get(&self, currency: Currency) -> Option<f64> {
        self.0.get(&currency).copied()
    }

    /// Sets a rate. Callers are expected to have validated positivity;
    /// [`RateTable::ensured`] repairs anything that slips through.
    pub fn set(&mut self, currency: Currency, rate: f64) {
        self.0.insert(currency, rate);
    }

    /// Iterates over all entries in canonical currency order.
    pub fn iter(&self) -> impl Iterator<Item = (Currency, f64)> + '_ {
        self.0.iter().map(|(c, r)| (*c, *r))
    }

    /// Produces a sanitized table: this table merged over the bundled
    /// defaults, with every missing/zero/negative/non-finite entry replaced
    /// by the default rate.
    ///
    /// ## Example
    /// ```rust
    /// use importa_core::currency::{Currency, RateTable};
    ///
    /// let mut table = RateTable::new();
    /// table.set(Currency::INR, 84.5);
    /// table.set(Currency::EUR, -1.0); // bad entry
    ///
    /// let ensured = table.ensured();
    /// assert_eq!(ensured.get(Currency::INR), Some(84.5));
    /// assert_eq!(ensured.get(Currency::EUR), Some(0.92)); // repaired
    /// assert_eq!(ensured.get(Currency::JPY), Some(151.0)); // backfilled
    /// ```
    pub fn ensured(&self) -> RateTable {
        let mut map = BTreeMap::new();
        for currency in Currency::ALL {
            let rate = match self.0.get(&currency) {
                Some(&r) if r.is_finite() && r > 0.0 => r,
                _ => currency.default_rate(),
            };
            map.insert(currency, rate);
        }
        RateTable(map)
    }
}

impl Default for RateTable {
    /// The default table is the bundled defaults, not an empty map: a freshly
    /// created workspace can price immediately without a rate sync.
    fn default() -> Self {
        RateTable::bundled_defaults()
    }
}

// =============================================================================
// Conversion
// =============================================================================

/// Converts an amount between currencies via the USD pivot.
///
/// ## Algorithm
/// ```text
/// amount_usd = from == USD ? amount : amount / rate[from]
/// amount_to  = to   == USD ? amount_usd : amount_usd * rate[to]
/// ```
///
/// ## Edge Cases
/// - Non-finite amount → 0
/// - `from == to` → round2(amount), no table lookup
/// - Missing/zero rate after ensuring → round2(amount) unconverted
///
/// All outputs are rounded to 2 decimals.
pub fn convert(amount: f64, from: Currency, to: Currency, rates: &RateTable) -> f64 {
    if !amount.is_finite() {
        return 0.0;
    }
    if from == to {
        return round2(amount);
    }

    let safe = rates.ensured();
    let from_rate = safe.get(from).unwrap_or(0.0);
    let to_rate = safe.get(to).unwrap_or(0.0);
    if from_rate == 0.0 || to_rate == 0.0 {
        return round2(amount);
    }

    let amount_usd = if from == Currency::USD {
        amount
    } else {
        amount / from_rate
    };
    let converted = if to == Currency::USD {
        amount_usd
    } else {
        amount_usd * to_rate
    };
    round2(converted)
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

    #[test]
    fn test_round2() {
        assert!(approx(round2(1.006), 1.01));
        assert!(approx(round2(3.14159), 3.14));
        assert!(approx(round2(-2.347), -2.35));
        assert!(approx(round2(f64::NAN), 0.0));
        assert!(approx(round2(f64::INFINITY), 0.0));
    }

    #[test]
    fn test_clamp_rate() {
        assert!(approx(clamp_rate(Some(0.5), 1.0), 0.5));
        assert!(approx(clamp_rate(Some(-1.0), 1.0), 1.0));
        assert!(approx(clamp_rate(Some(f64::NAN), 1.0), 1.0));
        assert!(approx(clamp_rate(None, 1.0), 1.0));
        assert!(approx(clamp_rate(Some(0.0), 1.0), 0.0));
    }

    #[test]
    fn test_currency_parsing() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::USD);
        assert_eq!(" Inr ".parse::<Currency>().unwrap(), Currency::INR);
        assert!("XYZ".parse::<Currency>().is_err());
        assert!("".parse::<Currency>().is_err());
    }

    #[test]
    fn test_currency_serde_format() {
        // Wire format must stay the bare ISO code.
        assert_eq!(serde_json::to_string(&Currency::INR).unwrap(), "\"INR\"");
        let parsed: Currency = serde_json::from_str("\"JPY\"").unwrap();
        assert_eq!(parsed, Currency::JPY);
    }

    #[test]
    fn test_ensured_repairs_bad_entries() {
        let mut table = RateTable::new();
        table.set(Currency::INR, 84.5);
        table.set(Currency::EUR, 0.0);
        table.set(Currency::GBP, f64::NAN);

        let ensured = table.ensured();
        assert_eq!(ensured.get(Currency::INR), Some(84.5));
        assert_eq!(ensured.get(Currency::EUR), Some(0.92));
        assert_eq!(ensured.get(Currency::GBP), Some(0.8));
        // Backfilled from defaults.
        assert_eq!(ensured.get(Currency::CAD), Some(1.36));
    }

    #[test]
    fn test_convert_same_currency() {
        let rates = RateTable::bundled_defaults();
        assert!(approx(convert(10.555, Currency::USD, Currency::USD, &rates), 10.56));
    }

    #[test]
    fn test_convert_via_pivot() {
        let rates = RateTable::bundled_defaults();
        // USD -> INR is a straight multiply.
        assert!(approx(convert(3.8, Currency::USD, Currency::INR, &rates), 315.4));
        // INR -> USD is a straight divide.
        assert!(approx(convert(83.0, Currency::INR, Currency::USD, &rates), 1.0));
        // EUR -> INR pivots through USD: 1 EUR = 1/0.92 USD = 90.22 INR.
        assert!(approx(convert(1.0, Currency::EUR, Currency::INR, &rates), 90.22));
    }

    #[test]
    fn test_convert_round_trip() {
        let rates = RateTable::bundled_defaults();
        for from in Currency::ALL {
            for to in Currency::ALL {
                let amount = 125.37;
                let there = convert(amount, from, to, &rates);
                let back = convert(there, to, from, &rates);
                // Within rounding tolerance (each leg rounds to 2 decimals).
                assert!(
                    (back - amount).abs() < 0.05,
                    "round trip {from}->{to} drifted: {back}"
                );
            }
        }
    }

    #[test]
    fn test_convert_non_finite_amount() {
        let rates = RateTable::bundled_defaults();
        assert!(approx(convert(f64::NAN, Currency::USD, Currency::INR, &rates), 0.0));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(10.0, Currency::USD), "$10.00");
        assert_eq!(format_amount(371.009, Currency::INR), "₹371.01");
        assert_eq!(format_amount(-5.5, Currency::GBP), "-£5.50");
    }
}
