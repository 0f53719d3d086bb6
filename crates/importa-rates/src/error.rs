//! # Rate Sync Error Types

use thiserror::Error;

/// Exchange-rate sync errors.
///
/// Most callers never see these: the service swallows fetch failures and
/// falls back to cached or bundled rates. They surface only from explicit
/// cache operations.
#[derive(Debug, Error)]
pub enum RatesError {
    /// The HTTP request failed (network down, DNS, timeout).
    #[error("Rate provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered but with an unusable payload.
    #[error("Rate provider returned an unusable response: {0}")]
    Provider(String),

    /// Reading or writing the persisted cache failed.
    #[error(transparent)]
    Store(#[from] importa_store::StoreError),
}

/// Result type for rate sync operations.
pub type RatesResult<T> = Result<T, RatesError>;
