#![forbid(unsafe_code)]

//! Core domain model and calculations for Dosemix.
//!
//! This crate provides:
//! - Dosage input/output types and field metadata
//! - The dosage calculator (medication + carrier liquid mixture)
//! - Query-string codec and location synchronization
//! - Share links with QR rendering
//! - Report rendering (table, JSON, CSV)

pub mod types;
pub mod error;
pub mod calculator;
pub mod config;
pub mod logging;
pub mod query;
pub mod sync;
pub mod share;
pub mod report;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use calculator::{calculate, ceil_to_nearest, compute};
pub use config::Config;
pub use sync::{DosageSession, Location, MemoryLocation, Synchronizer};
pub use report::Format;
