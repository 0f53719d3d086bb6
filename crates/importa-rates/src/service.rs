//! # Rate Sync Service
//!
//! TTL-based refresh policy over the provider client and the persisted
//! cache.
//!
//! ## Refresh Decision
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  rates(force)                                                           │
//! │       │                                                                 │
//! │       ├── cache fresh, base matches, not forced ──► cached table        │
//! │       │                                                                 │
//! │       ├── refresh already in flight ──► cached-or-default table         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  fetch from provider                                                    │
//! │       │                                                                 │
//! │       ├── success ──► sanitize, cache, return                           │
//! │       └── failure ──► cached-or-default table (tool never blocks)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every rate the tool uses is expressed against USD; conversion between
//! two non-USD currencies pivots through it (see `importa_core::convert`).

use chrono::{Duration as ChronoDuration, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::client::RateClient;
use crate::error::RatesResult;
use importa_core::currency::{Currency, RateTable};
use importa_store::{RateCacheEntry, RateCacheRepository};

/// Base currency for all cached snapshots.
pub const RATE_BASE: Currency = Currency::USD;

/// How long a cached snapshot stays fresh.
pub const CACHE_TTL_HOURS: i64 = 6;

/// Exchange-rate sync service.
#[derive(Debug)]
pub struct RateService {
    client: RateClient,
    cache: RateCacheRepository,
    /// Collapses concurrent refreshes: the holder fetches, everyone else
    /// reads the cache.
    refresh_guard: Mutex<()>,
}

impl RateService {
    /// Creates a service over a cache repository and the default provider.
    pub fn new(cache: RateCacheRepository) -> Self {
        Self::with_client(cache, RateClient::new())
    }

    /// Creates a service with a custom client (tests, mirrors).
    pub fn with_client(cache: RateCacheRepository, client: RateClient) -> Self {
        RateService {
            client,
            cache,
            refresh_guard: Mutex::new(()),
        }
    }

    /// Returns a usable rate table, refreshing from the provider when the
    /// cache is stale, missing, base-mismatched, or `force` is set.
    ///
    /// Never fails: a failed fetch falls back to the cached snapshot, then
    /// to the bundled defaults, and cache I/O trouble is logged and
    /// treated as an empty cache.
    pub async fn rates(&self, force: bool) -> RateTable {
        let entry = match self.cache.load().await {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Rate cache read failed, proceeding without it");
                None
            }
        };

        if !force {
            if let Some(ref entry) = entry {
                if entry.base == RATE_BASE && !is_stale(entry) {
                    debug!("Using fresh cached exchange rates");
                    return entry.rates.ensured();
                }
            }
        }

        // Only one refresh at a time; latecomers take whatever is cached.
        let guard = match self.refresh_guard.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                debug!("Refresh already in flight, using cached rates");
                return cached_or_default(entry);
            }
        };

        let result = self.client.fetch(RATE_BASE).await;
        drop(guard);

        match result {
            Ok(rates) => {
                let fresh = RateCacheEntry {
                    base: RATE_BASE,
                    rates: rates.clone(),
                    fetched_at: Utc::now(),
                };
                match self.cache.save(&fresh).await {
                    Ok(()) => info!("Exchange rates refreshed from provider"),
                    Err(e) => {
                        warn!(error = %e, "Rate cache write failed, serving fetched rates uncached");
                    }
                }
                rates
            }
            Err(e) => {
                warn!(error = %e, "Rate refresh failed, falling back to cached rates");
                cached_or_default(entry)
            }
        }
    }

    /// Returns the cached table without any network access, falling back
    /// to the bundled defaults when nothing is cached or the cache is
    /// unreadable.
    pub async fn cached_rates(&self) -> RateTable {
        match self.cache.load().await {
            Ok(entry) => cached_or_default(entry),
            Err(e) => {
                warn!(error = %e, "Rate cache read failed, using bundled defaults");
                RateTable::bundled_defaults()
            }
        }
    }

    /// Drops the cached snapshot so the next read starts from defaults.
    pub async fn reset(&self) -> RatesResult<()> {
        self.cache.clear().await?;
        Ok(())
    }
}

/// Whether a cached snapshot has outlived the TTL.
pub fn is_stale(entry: &RateCacheEntry) -> bool {
    Utc::now() - entry.fetched_at >= ChronoDuration::hours(CACHE_TTL_HOURS)
}

fn cached_or_default(entry: Option<RateCacheEntry>) -> RateTable {
    match entry {
        Some(entry) => entry.rates.ensured(),
        None => RateTable::bundled_defaults(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use importa_store::{Store, StoreConfig};

    async fn service() -> RateService {
        let store = Store::new(StoreConfig::in_memory()).await.unwrap();
        // Unroutable endpoint so fetches always fail fast in tests.
        RateService::with_client(
            store.rate_cache(),
            RateClient::with_endpoint("http://127.0.0.1:1/latest/"),
        )
    }

    fn snapshot(age_hours: i64) -> RateCacheEntry {
        let mut rates = RateTable::bundled_defaults();
        rates.set(Currency::INR, 84.5);
        RateCacheEntry {
            base: RATE_BASE,
            rates,
            fetched_at: Utc::now() - ChronoDuration::hours(age_hours),
        }
    }

    #[test]
    fn test_staleness_boundary() {
        assert!(!is_stale(&snapshot(0)));
        assert!(!is_stale(&snapshot(5)));
        assert!(is_stale(&snapshot(6)));
        assert!(is_stale(&snapshot(48)));
    }

    #[tokio::test]
    async fn test_fresh_cache_short_circuits() {
        let service = service().await;
        service.cache.save(&snapshot(1)).await.unwrap();

        // Fresh cache wins without touching the (dead) endpoint.
        let rates = service.rates(false).await;
        assert_eq!(rates.get(Currency::INR), Some(84.5));
    }

    #[tokio::test]
    async fn test_failed_fetch_falls_back_to_stale_cache() {
        let service = service().await;
        service.cache.save(&snapshot(12)).await.unwrap();

        let rates = service.rates(false).await;
        assert_eq!(rates.get(Currency::INR), Some(84.5));
    }

    #[tokio::test]
    async fn test_failed_fetch_with_empty_cache_uses_defaults() {
        let service = service().await;
        let rates = service.rates(true).await;
        assert_eq!(rates, RateTable::bundled_defaults());
    }

    #[tokio::test]
    async fn test_force_ignores_fresh_cache() {
        let service = service().await;
        service.cache.save(&snapshot(0)).await.unwrap();

        // Forced refresh hits the dead endpoint, then falls back to cache.
        let rates = service.rates(true).await;
        assert_eq!(rates.get(Currency::INR), Some(84.5));
    }

    #[tokio::test]
    async fn test_cached_rates_never_touch_network() {
        let service = service().await;
        assert_eq!(
            service.cached_rates().await,
            RateTable::bundled_defaults()
        );

        service.cache.save(&snapshot(100)).await.unwrap();
        let rates = service.cached_rates().await;
        assert_eq!(rates.get(Currency::INR), Some(84.5));
    }

    #[tokio::test]
    async fn test_closed_store_degrades_to_defaults() {
        let store = Store::new(StoreConfig::in_memory()).await.unwrap();
        let service = RateService::with_client(
            store.rate_cache(),
            RateClient::with_endpoint("http://127.0.0.1:1/latest/"),
        );
        store.close().await;

        // Cache reads and writes fail against the closed pool; the service
        // still hands back a usable table.
        assert_eq!(service.rates(true).await, RateTable::bundled_defaults());
        assert_eq!(service.cached_rates().await, RateTable::bundled_defaults());
    }

    #[tokio::test]
    async fn test_reset_clears_cache() {
        let service = service().await;
        service.cache.save(&snapshot(0)).await.unwrap();
        service.reset().await.unwrap();
        assert_eq!(
            service.cached_rates().await,
            RateTable::bundled_defaults()
        );
    }
}
