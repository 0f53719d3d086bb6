//! # importa-rates: Exchange-Rate Sync for Importa
//!
//! Keeps the local rate table in sync with a public provider, with a
//! persisted cache so the tool works offline.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CLI (apps/cli)                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ★ importa-rates (THIS CRATE) ★                                         │
//! │                                                                         │
//! │   ┌──────────────┐        ┌──────────────┐                              │
//! │   │  RateClient  │        │ RateService  │                              │
//! │   │ HTTP + parse │◄───────│ TTL policy   │                              │
//! │   └──────┬───────┘        └──────┬───────┘                              │
//! │          │                       │                                      │
//! │          ▼                       ▼                                      │
//! │  open.er-api.com          importa-store (cache)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`client`] - Provider HTTP client and response sanitization
//! - [`service`] - TTL-based refresh policy with offline fallback
//! - [`error`] - Sync error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod client;
pub mod error;
pub mod service;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use client::{normalize_rates, RateClient, DEFAULT_ENDPOINT};
pub use error::{RatesError, RatesResult};
pub use service::{is_stale, RateService, CACHE_TTL_HOURS, RATE_BASE};
