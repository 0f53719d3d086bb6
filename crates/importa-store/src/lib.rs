//! # importa-store: Persistence Layer for Importa
//!
//! SQLite-backed persistence for workspace state and the exchange-rate
//! cache.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Importa Architecture                            │
//! │                                                                         │
//! │  CLI (apps/cli)                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  importa-core ← pure pricing logic, owns all the types                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ★ importa-store (THIS CRATE) ★                                         │
//! │                                                                         │
//! │   ┌──────────┐  ┌────────────┐  ┌──────────────────────────┐           │
//! │   │   pool   │  │ migrations │  │       repository         │           │
//! │   │  Store   │  │  embedded  │  │  workspace │ rate cache  │           │
//! │   └──────────┘  └────────────┘  └──────────────────────────┘           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite (WAL mode, single `state` table of JSON blobs)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`pool`] - Connection pool and the [`Store`] handle
//! - [`migrations`] - Embedded schema migrations
//! - [`kv`] - JSON blob storage over the `state` table
//! - [`repository`] - Workspace and rate-cache repositories
//! - [`error`] - Persistence error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod kv;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use pool::{Store, StoreConfig};
pub use repository::rates::{RateCacheEntry, RateCacheRepository, RATES_KEY};
pub use repository::workspace::{WorkspaceRepository, WORKSPACE_KEY};
