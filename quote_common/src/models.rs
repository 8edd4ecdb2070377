//! Core data contract for supplier quotes.
//!
//! Everything downstream of ingestion (session, export, sharing, persistence)
//! works on these types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identity of one offer: a product as quoted by one supplier.
///
/// Ordered by product, then supplier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    pub product: String,
    pub supplier: String,
}

impl RecordKey {
    pub fn new(product: impl Into<String>, supplier: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            supplier: supplier.into(),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.product, self.supplier)
    }
}

/// One observed price point from the quote spreadsheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRecord {
    pub product: String,
    pub supplier: String,
    /// Unit price, always finite and > 0
    pub price: f64,
    /// Order quantity entered by the user
    #[serde(default)]
    pub quantity: u32,
    /// 1-based spreadsheet row (header is row 1)
    #[serde(default)]
    pub source_row: usize,
}

impl PriceRecord {
    pub fn new(
        product: impl Into<String>,
        supplier: impl Into<String>,
        price: f64,
        source_row: usize,
    ) -> Self {
        Self {
            product: product.into(),
            supplier: supplier.into(),
            price,
            quantity: 0,
            source_row,
        }
    }

    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.product.clone(), self.supplier.clone())
    }

    /// Unit price times quantity
    pub fn total_price(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// An offer taken out of the active set, kept so it can be restored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovedRecord {
    /// Record as it was at removal time (price and quantity)
    pub record: PriceRecord,
    pub removed_at: DateTime<Utc>,
}

impl RemovedRecord {
    pub fn new(record: PriceRecord) -> Self {
        Self {
            record,
            removed_at: Utc::now(),
        }
    }

    pub fn key(&self) -> RecordKey {
        self.record.key()
    }
}

/// Which offers hold the minimum price for their product.
///
/// A derived view: built by the selection engine from the active records and
/// replaced wholesale after every mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LowestPriceIndex {
    flags: BTreeMap<RecordKey, bool>,
}

impl LowestPriceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags an offer as holding the lowest price
    pub fn mark(&mut self, key: RecordKey) {
        self.flags.insert(key, true);
    }

    pub fn is_lowest(&self, key: &RecordKey) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    /// Number of flagged offers
    pub fn len(&self) -> usize {
        self.flags.values().filter(|flag| **flag).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flagged offers in key order
    pub fn iter(&self) -> impl Iterator<Item = &RecordKey> {
        self.flags
            .iter()
            .filter(|(_, flag)| **flag)
            .map(|(key, _)| key)
    }

    /// Entries as `[key, flag]` pairs, the persisted form
    pub fn to_pairs(&self) -> Vec<(RecordKey, bool)> {
        self.flags
            .iter()
            .map(|(key, flag)| (key.clone(), *flag))
            .collect()
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (RecordKey, bool)>) -> Self {
        Self {
            flags: pairs.into_iter().collect(),
        }
    }
}
