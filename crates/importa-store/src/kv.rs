//! # JSON Key-Value Storage
//!
//! Thin JSON blob storage over the `state` table. Each workspace section
//! persists as one blob under a stable key, so schema evolution happens in
//! serde instead of SQL.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::error::{StoreError, StoreResult};

/// Reads a JSON blob, returning `None` when the key is absent.
///
/// A blob that fails to deserialize is treated as absent and logged, so a
/// hand-edited or version-skewed database degrades to defaults instead of
/// wedging the tool.
pub async fn get<T: DeserializeOwned>(pool: &SqlitePool, key: &str) -> StoreResult<Option<T>> {
    let row: Option<String> = sqlx::query_scalar("SELECT value FROM state WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    match row {
        None => Ok(None),
        Some(json) => match serde_json::from_str(&json) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key = %key, error = %e, "Discarding malformed state blob");
                Ok(None)
            }
        },
    }
}

/// Writes a JSON blob under a key, replacing any previous value.
pub async fn put<T: Serialize>(pool: &SqlitePool, key: &str, value: &T) -> StoreResult<()> {
    let json = serde_json::to_string(value).map_err(|e| StoreError::InvalidBlob {
        key: key.to_string(),
        message: e.to_string(),
    })?;

    sqlx::query(
        "INSERT INTO state (key, value, updated_at) VALUES (?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
    )
    .bind(key)
    .bind(json)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Deletes a key. Missing keys are a no-op.
pub async fn remove(pool: &SqlitePool, key: &str) -> StoreResult<()> {
    sqlx::query("DELETE FROM state WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;
    Ok(())
}

/// Deletes every key. Used by the full data wipe.
pub async fn clear(pool: &SqlitePool) -> StoreResult<()> {
    sqlx::query("DELETE FROM state").execute(pool).await?;
    Ok(())
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

    #[tokio::test]
    async fn test_put_get_round_trip() {
        let store = test_store().await;
        put(store.pool(), "k", &vec![1, 2, 3]).await.unwrap();
        let back: Option<Vec<i32>> = get(store.pool(), "k").await.unwrap();
        assert_eq!(back, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let store = test_store().await;
        let value: Option<String> = get(store.pool(), "absent").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_put_replaces() {
        let store = test_store().await;
        put(store.pool(), "k", &"first").await.unwrap();
        put(store.pool(), "k", &"second").await.unwrap();
        let back: Option<String> = get(store.pool(), "k").await.unwrap();
        assert_eq!(back.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_malformed_blob_reads_as_none() {
        let store = test_store().await;
        sqlx::query("INSERT INTO state (key, value, updated_at) VALUES ('k', 'not json', '')")
            .execute(store.pool())
            .await
            .unwrap();
        let value: Option<Vec<i32>> = get(store.pool(), "k").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let store = test_store().await;
        put(store.pool(), "a", &1).await.unwrap();
        put(store.pool(), "b", &2).await.unwrap();

        remove(store.pool(), "a").await.unwrap();
        let a: Option<i32> = get(store.pool(), "a").await.unwrap();
        assert!(a.is_none());

        clear(store.pool()).await.unwrap();
        let b: Option<i32> = get(store.pool(), "b").await.unwrap();
        assert!(b.is_none());
    }
}
