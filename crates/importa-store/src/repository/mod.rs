//! # Repository Modules
//!
//! One repository per persisted aggregate:
//! - [`workspace`] - the full workspace state blob
//! - [`rates`] - the cached exchange-rate snapshot

pub mod rates;
pub mod workspace;
