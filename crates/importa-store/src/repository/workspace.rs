//! # Workspace Repository
//!
//! Load/save of the full [`WorkspaceState`] aggregate.
//!
//! ## Storage Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  state table                                                            │
//! │                                                                         │
//! │  key: import-tool:state-v1                                              │
//! │  value: { "products": [...], "assumptions": {...}, ... }               │
//! │                                                                         │
//! │  The whole workspace serializes as one JSON blob. Mutations happen     │
//! │  in memory (importa-core) and the caller saves the result back.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A missing or malformed blob loads as the freshly-seeded default
//! workspace, never an error: the tool must always start.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::StoreResult;
use crate::kv;
use importa_core::WorkspaceState;

/// Key the workspace blob persists under. Versioned so a future breaking
/// layout change can migrate by key.
pub const WORKSPACE_KEY: &str = "import-tool:state-v1";

/// Repository for workspace-state persistence.
#[derive(Debug, Clone)]
pub struct WorkspaceRepository {
    pool: SqlitePool,
}

impl WorkspaceRepository {
    /// Creates a new WorkspaceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        WorkspaceRepository { pool }
    }

    /// Loads the workspace, falling back to the seeded default when no
    /// usable blob exists.
    pub async fn load(&self) -> StoreResult<WorkspaceState> {
        let state: Option<WorkspaceState> = kv::get(&self.pool, WORKSPACE_KEY).await?;
        match state {
            Some(state) => Ok(state),
            None => {
                debug!("No stored workspace, starting from defaults");
                Ok(WorkspaceState::default())
            }
        }
    }

    /// Saves the workspace, replacing the previous blob.
    pub async fn save(&self, state: &WorkspaceState) -> StoreResult<()> {
        kv::put(&self.pool, WORKSPACE_KEY, state).await
    }

    /// Resets the workspace to the seeded default and persists it.
    pub async fn reset(&self) -> StoreResult<WorkspaceState> {
        let state = WorkspaceState::default();
        self.save(&state).await?;
        Ok(state)
    }

    /// Deletes every stored blob - workspace, rate cache, everything.
    pub async fn wipe_all(&self) -> StoreResult<()> {
        kv::clear(&self.pool).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Store, StoreConfig};
    use importa_core::currency::Currency;
    use importa_core::types::Product;

    async fn test_store() -> Store {
        Store::new(StoreConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_load_defaults_when_empty() {
        let store = test_store().await;
        let state = store.workspace().load().await.unwrap();
        assert_eq!(state, WorkspaceState::default());
    }

    #[tokio::test]
    async fn test_save_load_round_trip() {
        let store = test_store().await;
        let repo = store.workspace();

        let mut state = WorkspaceState::default();
        state.add_product(Product::new("Mug", 2.0, 50, Currency::EUR));
        repo.save(&state).await.unwrap();

        let loaded = repo.load().await.unwrap();
        assert_eq!(loaded, state);
        assert_eq!(loaded.products.len(), 3);
    }

    #[tokio::test]
    async fn test_malformed_blob_loads_defaults() {
        let store = test_store().await;
        sqlx::query("INSERT INTO state (key, value, updated_at) VALUES (?, '{broken', '')")
            .bind(WORKSPACE_KEY)
            .execute(store.pool())
            .await
            .unwrap();

        let state = store.workspace().load().await.unwrap();
        assert_eq!(state, WorkspaceState::default());
    }

    #[tokio::test]
    async fn test_reset_persists_defaults() {
        let store = test_store().await;
        let repo = store.workspace();

        let mut state = WorkspaceState::default();
        state.clear_products();
        repo.save(&state).await.unwrap();

        repo.reset().await.unwrap();
        let loaded = repo.load().await.unwrap();
        assert_eq!(loaded.products.len(), 2);
    }

    #[tokio::test]
    async fn test_wipe_all_clears_everything() {
        let store = test_store().await;
        let repo = store.workspace();
        repo.save(&WorkspaceState::default()).await.unwrap();

        repo.wipe_all().await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM state")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
