//! # Exchange-Rate Cache Repository
//!
//! Persistence for the last fetched exchange-rate snapshot. The snapshot
//! carries its fetch time so callers can decide freshness without touching
//! the network.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::StoreResult;
use crate::kv;
use importa_core::currency::{Currency, RateTable};

/// Key the rate snapshot persists under.
pub const RATES_KEY: &str = "import-tool:exchange-rates";

/// A cached exchange-rate snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateCacheEntry {
    /// Currency every rate is expressed against (rate = units per base).
    pub base: Currency,

    /// The rate table, sanitized before caching.
    pub rates: RateTable,

    /// When the snapshot was fetched.
    pub fetched_at: DateTime<Utc>,
}

/// Repository for exchange-rate cache persistence.
#[derive(Debug, Clone)]
pub struct RateCacheRepository {
    pool: SqlitePool,
}

impl RateCacheRepository {
    /// Creates a new RateCacheRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RateCacheRepository { pool }
    }

    /// Loads the cached snapshot, `None` when absent or malformed.
    pub async fn load(&self) -> StoreResult<Option<RateCacheEntry>> {
        kv::get(&self.pool, RATES_KEY).await
    }

    /// Replaces the cached snapshot.
    pub async fn save(&self, entry: &RateCacheEntry) -> StoreResult<()> {
        kv::put(&self.pool, RATES_KEY, entry).await
    }

    /// Drops the cached snapshot. The next read falls back to bundled
    /// defaults.
    pub async fn clear(&self) -> StoreResult<()> {
        kv::remove(&self.pool, RATES_KEY).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Store, StoreConfig};

    async fn test_store() -> Store {
        Store::new(StoreConfig::in_memory()).await.unwrap()
    }

    fn entry() -> RateCacheEntry {
        let mut rates = RateTable::bundled_defaults();
        rates.set(Currency::INR, 84.5);
        RateCacheEntry {
            base: Currency::USD,
            rates,
            fetched_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_empty_cache_is_none() {
        let store = test_store().await;
        assert!(store.rate_cache().load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_load_round_trip() {
        let store = test_store().await;
        let repo = store.rate_cache();
        let entry = entry();
        repo.save(&entry).await.unwrap();

        let loaded = repo.load().await.unwrap().unwrap();
        assert_eq!(loaded, entry);
        assert_eq!(loaded.rates.get(Currency::INR), Some(84.5));
    }

    #[tokio::test]
    async fn test_clear_drops_snapshot() {
        let store = test_store().await;
        let repo = store.rate_cache();
        repo.save(&entry()).await.unwrap();
        repo.clear().await.unwrap();
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_snapshot_reads_as_none() {
        let store = test_store().await;
        sqlx::query("INSERT INTO state (key, value, updated_at) VALUES (?, '42', '')")
            .bind(RATES_KEY)
            .execute(store.pool())
            .await
            .unwrap();
        assert!(store.rate_cache().load().await.unwrap().is_none());
    }
}
