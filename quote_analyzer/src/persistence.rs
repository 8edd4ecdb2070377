//! Session persistence.
//!
//! The whole session is written as one JSON snapshot and read back wholesale.
//! There is no locking: two processes sharing the same file overwrite each
//! other, last writer wins.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use quote_common::{LowestPriceIndex, PriceRecord, RecordKey, RemovedRecord, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::session::QuoteSession;

/// Serialized form of a [`QuoteSession`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub suppliers: Vec<String>,
    pub products: Vec<String>,
    pub data: Vec<PriceRecord>,
    /// `[key, flag]` pairs; informational, recomputed on load
    pub lowest_prices: Vec<(RecordKey, bool)>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub removed: Vec<RemovedRecord>,
    #[serde(default)]
    pub finished_suppliers: Vec<String>,
    #[serde(default)]
    pub units: BTreeMap<String, String>,
    #[serde(default)]
    pub original_suppliers: Vec<String>,
    #[serde(default)]
    pub original: Vec<PriceRecord>,
}

impl Snapshot {
    pub fn from_session(session: &QuoteSession) -> Self {
        Self {
            suppliers: session.suppliers.clone(),
            products: session.products().into_iter().map(String::from).collect(),
            data: session.records.values().cloned().collect(),
            lowest_prices: session.lowest.to_pairs(),
            timestamp: Utc::now(),
            removed: session.removed.clone(),
            finished_suppliers: session.finished.iter().cloned().collect(),
            units: session.units.clone(),
            original_suppliers: session.original_suppliers.clone(),
            original: session.original.clone(),
        }
    }

    /// Rebuilds the session, or `None` when the snapshot holds no offers at all.
    ///
    /// A session whose active offers were all removed still loads. The
    /// lowest-price index is recomputed from `data`. Duplicate offers keep the
    /// first occurrence.
    pub fn into_session(self) -> Option<QuoteSession> {
        if self.data.is_empty() && self.original.is_empty() {
            warn!("Saved snapshot has no offers");
            return None;
        }

        let mut records = BTreeMap::new();
        for record in self.data {
            let key = record.key();
            if records.contains_key(&key) {
                warn!("Duplicate offer {key} in saved snapshot, keeping the first");
                continue;
            }
            records.insert(key, record);
        }

        let (original, original_suppliers) = if self.original.is_empty() {
            (records.values().cloned().collect(), self.suppliers.clone())
        } else {
            (self.original, self.original_suppliers)
        };

        let saved_index = LowestPriceIndex::from_pairs(self.lowest_prices);
        let mut session = QuoteSession {
            suppliers: self.suppliers,
            records,
            removed: self.removed,
            finished: self.finished_suppliers.into_iter().collect::<BTreeSet<_>>(),
            units: self.units,
            original_suppliers,
            original,
            lowest: LowestPriceIndex::new(),
        };
        session.recompute();

        if session.lowest != saved_index {
            warn!("Saved lowest-price flags were stale, using recomputed flags");
        }
        Some(session)
    }
}

/// File-backed store holding one snapshot
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the default state path: <data_dir>/quote_analyzer/state.json
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quote_analyzer")
            .join("state.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the saved session.
    ///
    /// A missing, unreadable or corrupt snapshot yields `None` so callers can
    /// fall back to an empty state.
    pub fn load(&self) -> Option<QuoteSession> {
        match self.load_snapshot() {
            Ok(Some(snapshot)) => {
                debug!("Loaded snapshot saved at {}", snapshot.timestamp);
                snapshot.into_session()
            }
            Ok(None) => {
                info!("No saved state at {}", self.path.display());
                None
            }
            Err(e) => {
                warn!("Ignoring unreadable state at {}: {e}", self.path.display());
                None
            }
        }
    }

    /// Reads the raw snapshot, `Ok(None)` if the file does not exist.
    pub fn load_snapshot(&self) -> Result<Option<Snapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let snapshot = serde_json::from_str(&content)?;
        Ok(Some(snapshot))
    }

    /// Writes the session, replacing any previous snapshot.
    pub fn save(&self, session: &QuoteSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
                info!("Created directory: {}", parent.display());
            }
        }

        let snapshot = Snapshot::from_session(session);
        let json = serde_json::to_string_pretty(&snapshot)?;

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.path)?;

        debug!(
            "Saved {} offers to {}",
            snapshot.data.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Deletes the saved snapshot, if any.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            info!("Removed saved state at {}", self.path.display());
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "persistence_tests.rs"]
mod tests;
