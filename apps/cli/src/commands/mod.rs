//! # Command Handlers
//!
//! One module per command group. Every handler follows the same shape:
//! load the workspace, mutate or compute through importa-core, save, print.

pub mod catalog;
pub mod project;
pub mod rates;
pub mod settings;
pub mod snapshots;

use anyhow::Result;
use importa_core::WorkspaceState;
use importa_rates::RateService;
use importa_store::Store;

/// Shared handles every command handler receives.
pub struct AppContext {
    pub store: Store,
    pub rates: RateService,
    /// Emit JSON instead of tables.
    pub json: bool,
}

impl AppContext {
    /// Loads the workspace (defaults when nothing is stored yet).
    pub async fn load_workspace(&self) -> Result<WorkspaceState> {
        Ok(self.store.workspace().load().await?)
    }

    /// Persists the workspace.
    pub async fn save_workspace(&self, state: &WorkspaceState) -> Result<()> {
        Ok(self.store.workspace().save(state).await?)
    }
}
