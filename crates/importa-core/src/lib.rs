//! # importa-core: Pure Pricing Logic for Importa
//!
//! This crate is the **heart** of Importa. It contains all pricing logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Importa Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     CLI (apps/cli)                              │   │
//! │  │    product ──► assumptions ──► rates ──► scenario ──► history  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ importa-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ currency  │  │  pricing  │  │projection │  │ workspace │  │   │
//! │  │   │ RateTable │  │ landed    │  │  retail   │  │   state   │  │   │
//! │  │   │ convert   │  │  cost     │  │  rollups  │  │ mutations │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        importa-store (SQLite)        importa-rates (HTTP)       │   │
//! │  │     workspace + rate-cache state    live exchange-rate sync     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`currency`] - Currency set, rate tables and USD-pivot conversion
//! - [`types`] - Domain types (Product, CostAssumptions, MarkupScenario, etc.)
//! - [`pricing`] - Landed-cost breakdowns in the base currency
//! - [`projection`] - Retail pricing, profit rollups and best-markup picks
//! - [`markup`] - Markup scenario construction and merging
//! - [`bulk`] - CSV bulk-import row normalization
//! - [`workspace`] - The persisted workspace aggregate and its mutations
//! - [`validation`] - Input validation rules
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Cent Rounding**: Every monetary result passes through `round2` so
//!    totals are stable regardless of the path that produced them
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use importa_core::currency::{Currency, RateTable};
//! use importa_core::pricing::calculate_product_cost;
//! use importa_core::types::{CostAssumptions, Product};
//!
//! let towel = Product::new("Towel", 3.8, 200, Currency::USD);
//! let assumptions = CostAssumptions::default(); // INR base
//! let rates = RateTable::bundled_defaults();
//!
//! let cost = calculate_product_cost(&towel, &assumptions, &rates);
//! assert_eq!(cost.total_per_unit_base, 371.01);
//! assert_eq!(cost.total_cost_base, 74202.0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bulk;
pub mod currency;
pub mod error;
pub mod markup;
pub mod pricing;
pub mod projection;
pub mod types;
pub mod validation;
pub mod workspace;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use importa_core::Currency` instead of
// `use importa_core::currency::Currency`

pub use currency::{convert, format_amount, round2, Currency, RateTable};
pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;
pub use workspace::{ApplyMode, WorkspaceState, DEFAULT_RETAIL_CURRENCIES};
