//! Quote Common - shared types for supplier price quotes
//!
//! Records, the composite offer key, the lowest-price index and the error type
//! used by the analyzer and anything that consumes its output.

pub mod error;
pub mod models;

pub use error::{QuoteError, Result};
pub use models::{LowestPriceIndex, PriceRecord, RecordKey, RemovedRecord};
