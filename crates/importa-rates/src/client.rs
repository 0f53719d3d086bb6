//! # Rate Provider Client
//!
//! HTTP client for the open.er-api.com exchange-rate endpoint.
//!
//! ## Provider Contract
//! ```text
//! GET https://open.er-api.com/v6/latest/USD
//!
//! {
//!   "result": "success",
//!   "rates": { "USD": 1, "EUR": 0.92, "INR": 83.1, ... }
//! }
//! ```
//!
//! Responses are sanitized before use: only supported currencies survive,
//! non-positive or non-finite rates are dropped, the base pins to 1.0, and
//! any hole backfills from the bundled defaults.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

use crate::error::{RatesError, RatesResult};
use importa_core::currency::{Currency, RateTable};

/// Default provider endpoint. The base currency code is appended.
pub const DEFAULT_ENDPOINT: &str = "https://open.er-api.com/v6/latest/";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Wire shape of the provider response. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct ProviderPayload {
    result: Option<String>,
    rates: Option<BTreeMap<String, f64>>,
}

/// HTTP client for the rate provider.
#[derive(Debug, Clone)]
pub struct RateClient {
    http: reqwest::Client,
    endpoint: String,
}

impl RateClient {
    /// Creates a client against the default provider endpoint.
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Creates a client against a custom endpoint (used by tests and
    /// self-hosted mirrors).
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        RateClient {
            http: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
        }
    }

    /// Fetches and sanitizes the latest rates against a base currency.
    pub async fn fetch(&self, base: Currency) -> RatesResult<RateTable> {
        let url = format!("{}{}", self.endpoint, base.code());
        debug!(url = %url, "Fetching exchange rates");

        let payload: ProviderPayload = self.http.get(&url).send().await?.json().await?;

        if payload.result.as_deref() != Some("success") {
            return Err(RatesError::Provider(format!(
                "result was {:?}",
                payload.result
            )));
        }
        let raw = payload
            .rates
            .ok_or_else(|| RatesError::Provider("rates missing from payload".to_string()))?;

        Ok(normalize_rates(&raw, base))
    }
}

impl Default for RateClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Sanitizes a raw provider rate map into a usable table.
///
/// ## Rules
/// - Unknown currency codes are dropped.
/// - Non-positive or non-finite rates are dropped.
/// - The base currency pins to exactly 1.0.
/// - Missing currencies backfill from the bundled defaults.
pub fn normalize_rates(raw: &BTreeMap<String, f64>, base: Currency) -> RateTable {
    let mut table = RateTable::new();
    for (code, &rate) in raw {
        if let Ok(currency) = code.parse::<Currency>() {
            if rate.is_finite() && rate > 0.0 {
                table.set(currency, rate);
            }
        }
    }
    table.set(base, 1.0);
    table.ensured()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs
            .iter()
            .map(|(code, rate)| (code.to_string(), *rate))
            .collect()
    }

    #[test]
    fn test_normalize_keeps_known_positive_rates() {
        let table = normalize_rates(
            &raw(&[("USD", 1.0), ("INR", 84.2), ("EUR", 0.93)]),
            Currency::USD,
        );
        assert_eq!(table.get(Currency::INR), Some(84.2));
        assert_eq!(table.get(Currency::EUR), Some(0.93));
    }

    #[test]
    fn test_normalize_drops_unknown_and_bad_values() {
        let table = normalize_rates(
            &raw(&[("XYZ", 5.0), ("INR", -2.0), ("EUR", f64::NAN)]),
            Currency::USD,
        );
        // Bad entries backfill from bundled defaults.
        assert_eq!(table.get(Currency::INR), Some(Currency::INR.default_rate()));
        assert_eq!(table.get(Currency::EUR), Some(Currency::EUR.default_rate()));
    }

    #[test]
    fn test_normalize_pins_base_to_one() {
        let table = normalize_rates(&raw(&[("USD", 1.0002), ("INR", 84.0)]), Currency::USD);
        assert_eq!(table.get(Currency::USD), Some(1.0));
    }

    #[test]
    fn test_normalize_backfills_missing_currencies() {
        let table = normalize_rates(&raw(&[("INR", 84.0)]), Currency::USD);
        for currency in Currency::ALL {
            assert!(table.get(currency).is_some());
        }
    }
}
